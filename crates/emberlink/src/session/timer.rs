use super::{Session, timediff};

impl Session {
    /// Advances the session clock to `now` and, once the flush interval has
    /// elapsed, runs `flush`, emitting any pending datagrams through
    /// `output`. Spec §4.5.
    pub fn update(&mut self, now: u32, output: &mut dyn FnMut(&[u8])) {
        self.current = now;

        if !self.updated {
            self.updated = true;
            self.ts_flush = now;
        }

        let mut slap = timediff(now, self.ts_flush);
        if !(-10_000..10_000).contains(&slap) {
            self.ts_flush = now;
            slap = 0;
        }
        if slap >= 0 {
            self.ts_flush = self.ts_flush.wrapping_add(self.interval);
            if timediff(now, self.ts_flush) >= 0 {
                self.ts_flush = now.wrapping_add(self.interval);
            }
            self.flush(output);
        }
    }

    /// Returns the timestamp at which `update` should next be called: `now`
    /// if there's unsent work already overdue, otherwise the earliest of
    /// the next scheduled flush and the next segment's retransmit time,
    /// capped by `interval`. Spec §4.5.
    pub fn check(&self, now: u32) -> u32 {
        if !self.updated {
            return now;
        }

        let mut ts_flush = self.ts_flush;
        let diff = timediff(now, ts_flush);
        if !(-10_000..10_000).contains(&diff) {
            ts_flush = now;
        }
        if timediff(now, ts_flush) >= 0 {
            return now;
        }

        let tm_flush = timediff(ts_flush, now);
        let mut tm_packet = i32::MAX;
        for seg in self.snd_buf.iter() {
            let diff = timediff(seg.resendts, now);
            if diff <= 0 {
                return now;
            }
            if diff < tm_packet {
                tm_packet = diff;
            }
        }

        let minimal = tm_packet.min(tm_flush).min(self.interval as i32);
        now.wrapping_add(minimal as u32)
    }
}
