use super::Session;
use crate::consts::MAX_FRAGMENTS;
use crate::error::SendError;
use crate::segment::{Command, Segment};
use bytes::Bytes;

impl Session {
    /// Fragments `data` into `ceil(len / mss)` segments and appends them to
    /// `snd_que`. `snd_nxt` is not assigned here — segments get a `sn` only
    /// when flush admits them into `snd_buf` (spec §4.2).
    pub fn send(&mut self, data: &[u8]) -> Result<(), SendError> {
        if data.is_empty() {
            return Err(SendError::EmptyPayload);
        }

        let count = data.len().div_ceil(self.mss);
        if count > MAX_FRAGMENTS {
            return Err(SendError::TooLarge {
                fragments: count,
                max: MAX_FRAGMENTS,
            });
        }

        for i in 0..count {
            let start = i * self.mss;
            let end = (start + self.mss).min(data.len());
            let mut seg = Segment::new(self.conv, Command::Push, Bytes::copy_from_slice(&data[start..end]));
            // last fragment (i == count - 1) gets frg == 0
            seg.frg = (count - i - 1) as u8;
            self.snd_que.push_back(seg);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_mss(mss: usize) -> Session {
        let mut s = Session::new(1);
        // force a small mss for fragmentation tests without a 1400-byte mtu
        s.mss = mss;
        s
    }

    #[test]
    fn test_empty_payload_rejected() {
        let mut s = Session::new(1);
        assert!(matches!(s.send(&[]), Err(SendError::EmptyPayload)));
    }

    #[test]
    fn test_single_fragment() {
        let mut s = Session::new(1);
        s.send(b"hello").unwrap();
        assert_eq!(s.snd_que.len(), 1);
        assert_eq!(s.snd_que[0].frg, 0);
        assert_eq!(&s.snd_que[0].data[..], b"hello");
    }

    #[test]
    fn test_fragmentation_order() {
        let mut s = session_with_mss(4);
        s.send(b"abcdefghij").unwrap(); // 10 bytes / mss 4 -> 3 fragments
        assert_eq!(s.snd_que.len(), 3);
        assert_eq!(s.snd_que[0].frg, 2);
        assert_eq!(s.snd_que[1].frg, 1);
        assert_eq!(s.snd_que[2].frg, 0);
        assert_eq!(&s.snd_que[0].data[..], b"abcd");
        assert_eq!(&s.snd_que[1].data[..], b"efgh");
        assert_eq!(&s.snd_que[2].data[..], b"ij");
    }

    #[test]
    fn test_too_large_rejected() {
        let mut s = session_with_mss(1);
        let data = vec![0u8; MAX_FRAGMENTS + 1];
        assert!(matches!(
            s.send(&data),
            Err(SendError::TooLarge { fragments, max }) if fragments == MAX_FRAGMENTS + 1 && max == MAX_FRAGMENTS
        ));
    }
}
