use super::{Session, timediff};
use crate::codec;
use crate::consts::{ASK_SEND, ASK_TELL, PROBE_INIT, PROBE_LIMIT, THRESH_MIN};
use crate::segment::Command;

impl Session {
    /// Emits pending ACKs, window probes/advertisements, new data, and
    /// retransmissions for the current tick, respecting MTU, congestion
    /// window, and retransmit timers. Spec §4.4. A no-op until `update` has
    /// been called at least once.
    pub fn flush(&mut self, output: &mut dyn FnMut(&[u8])) {
        if !self.updated {
            return;
        }

        let current = self.current;
        let wnd = self.wnd_unused();
        let una = self.rcv_nxt;
        let mut change: u32 = 0;
        let mut lost = false;

        self.buffer.clear();

        // --- Phase A: ACKs ---
        let acklist = std::mem::take(&mut self.acklist);
        for (sn, ts) in acklist {
            if self.buffer.len() + codec::HEADER_SIZE > self.mtu {
                output(&self.buffer);
                self.buffer.clear();
            }
            codec::encode_header(&mut self.buffer, self.conv, Command::Ack, 0, wnd, ts, sn, una, 0);
        }

        // --- Phase B: window probing ---
        if self.rmt_wnd == 0 {
            if self.probe_wait == 0 {
                self.probe_wait = PROBE_INIT;
                self.ts_probe = current.wrapping_add(self.probe_wait);
            } else if timediff(current, self.ts_probe) >= 0 {
                if self.probe_wait < PROBE_INIT {
                    self.probe_wait = PROBE_INIT;
                }
                self.probe_wait += self.probe_wait / 2;
                if self.probe_wait > PROBE_LIMIT {
                    self.probe_wait = PROBE_LIMIT;
                }
                self.ts_probe = current.wrapping_add(self.probe_wait);
                self.probe |= ASK_SEND;
            }
        } else {
            self.ts_probe = 0;
            self.probe_wait = 0;
        }

        // --- Phase C: probe emission ---
        if self.probe & ASK_SEND != 0 {
            if self.buffer.len() + codec::HEADER_SIZE > self.mtu {
                output(&self.buffer);
                self.buffer.clear();
            }
            codec::encode_header(&mut self.buffer, self.conv, Command::Wask, 0, wnd, current, 0, una, 0);
        }
        if self.probe & ASK_TELL != 0 {
            if self.buffer.len() + codec::HEADER_SIZE > self.mtu {
                output(&self.buffer);
                self.buffer.clear();
            }
            codec::encode_header(&mut self.buffer, self.conv, Command::Wins, 0, wnd, current, 0, una, 0);
        }
        self.probe = 0;

        // --- Phase D: admission into snd_buf ---
        let mut cwnd_eff = self.snd_wnd.min(self.rmt_wnd) as u32;
        if !self.nocwnd {
            cwnd_eff = cwnd_eff.min(self.cwnd);
        }
        while timediff(self.snd_nxt, self.snd_una.wrapping_add(cwnd_eff)) < 0 {
            let Some(mut seg) = self.snd_que.pop_front() else {
                break;
            };
            seg.conv = self.conv;
            seg.cmd = Command::Push;
            seg.wnd = wnd;
            seg.ts = current;
            seg.sn = self.snd_nxt;
            seg.una = self.rcv_nxt;
            seg.resendts = current;
            seg.rto = self.rx_rto;
            seg.fastack = 0;
            seg.xmit = 0;
            self.snd_buf.push_back(seg);
            self.snd_nxt = self.snd_nxt.wrapping_add(1);
        }

        // --- Phase E: transmission & retransmission ---
        let resent = if self.fastresend > 0 {
            self.fastresend
        } else {
            u32::MAX
        };
        let rtomin = if self.nodelay { 0 } else { self.rx_rto >> 3 };
        let dead_link = self.dead_link;
        let nodelay = self.nodelay;

        for i in 0..self.snd_buf.len() {
            let mut need_send = false;
            {
                let seg = &mut self.snd_buf[i];
                if seg.xmit == 0 {
                    need_send = true;
                    seg.xmit += 1;
                    seg.rto = self.rx_rto;
                    seg.resendts = current.wrapping_add(seg.rto).wrapping_add(rtomin);
                } else if timediff(current, seg.resendts) >= 0 {
                    need_send = true;
                    seg.xmit += 1;
                    seg.rto = if !nodelay {
                        seg.rto + self.rx_rto
                    } else {
                        seg.rto + self.rx_rto / 2
                    };
                    seg.resendts = current.wrapping_add(seg.rto);
                    lost = true;
                } else if seg.fastack >= resent {
                    need_send = true;
                    seg.xmit += 1;
                    seg.fastack = 0;
                    seg.resendts = current.wrapping_add(seg.rto);
                    change += 1;
                }
            }

            if !need_send {
                continue;
            }

            let seg = &mut self.snd_buf[i];
            seg.ts = current;
            seg.wnd = wnd;
            seg.una = self.rcv_nxt;

            let need = codec::HEADER_SIZE + seg.data.len();
            if self.buffer.len() + need >= self.mtu {
                output(&self.buffer);
                self.buffer.clear();
            }
            let seg = &self.snd_buf[i];
            codec::encode_header(
                &mut self.buffer,
                seg.conv,
                seg.cmd,
                seg.frg,
                seg.wnd,
                seg.ts,
                seg.sn,
                seg.una,
                seg.data.len() as u32,
            );
            self.buffer.extend_from_slice(&seg.data);

            if seg.xmit >= dead_link {
                log::warn!(target: "emberlink::session", "conv {} declared dead after {} retransmissions of sn={}", self.conv, seg.xmit, seg.sn);
                self.state = -1;
            }
        }

        if !self.buffer.is_empty() {
            output(&self.buffer);
            self.buffer.clear();
        }

        // --- Phase F: congestion response ---
        if change > 0 {
            let inflight = timediff(self.snd_nxt, self.snd_una) as u32;
            self.ssthresh = (inflight / 2).max(THRESH_MIN);
            self.cwnd = self.ssthresh + resent;
            self.incr = self.cwnd * self.mss as u32;
            log::trace!(target: "emberlink::session", "fast retransmit: ssthresh={} cwnd={}", self.ssthresh, self.cwnd);

            if lost {
                self.ssthresh = (self.cwnd / 2).max(THRESH_MIN);
                self.cwnd = 1;
                self.incr = self.mss as u32;
            }
        }
        if self.cwnd < 1 {
            self.cwnd = 1;
            self.incr = self.mss as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_noop_before_update() {
        let mut s = Session::new(1);
        s.send(b"hi").unwrap();
        let mut emitted = Vec::new();
        s.flush(&mut |buf| emitted.push(buf.to_vec()));
        assert!(emitted.is_empty());
    }

    #[test]
    fn test_flush_admits_and_sends_data() {
        let mut s = Session::new(1);
        s.send(b"hello").unwrap();
        s.update(0, &mut |_| {});
        let mut emitted = Vec::new();
        s.flush(&mut |buf| emitted.push(buf.to_vec()));
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].len(), codec::HEADER_SIZE + 5);
        assert_eq!(s.snd_buf.len(), 1);
        assert_eq!(s.snd_buf[0].xmit, 1);
    }

    #[test]
    fn test_flush_emits_queued_acks() {
        let mut s = Session::new(1);
        s.update(0, &mut |_| {});
        s.acklist.push((3, 100));
        s.acklist.push((4, 150));
        let mut emitted = Vec::new();
        s.flush(&mut |buf| emitted.push(buf.to_vec()));
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].len(), codec::HEADER_SIZE * 2);
        assert!(s.acklist.is_empty());
    }

    #[test]
    fn test_fast_retransmit_increments_change_and_halves_ssthresh() {
        let mut s = Session::new(1);
        s.fastresend = 2;
        s.send(b"x").unwrap();
        s.update(0, &mut |_| {});
        s.flush(&mut |_| {}); // first transmission, xmit=1, fastack=0
        s.snd_buf[0].fastack = 2; // reaches fastresend threshold
        let before_ssthresh = s.ssthresh;
        s.flush(&mut |_| {});
        assert_eq!(s.snd_buf[0].xmit, 2);
        assert!(s.ssthresh <= before_ssthresh.max(1) || s.ssthresh >= THRESH_MIN);
    }

    #[test]
    fn test_window_probe_backoff_schedule() {
        let mut s = Session::new(1);
        s.rmt_wnd = 0;
        s.update(0, &mut |_| {});
        assert_eq!(s.probe_wait, PROBE_INIT);
        s.update(PROBE_INIT, &mut |_| {});
        assert!(s.probe_wait > PROBE_INIT);
        assert!(s.probe_wait <= PROBE_LIMIT);
    }
}
