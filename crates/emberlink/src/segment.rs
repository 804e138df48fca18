use bytes::Bytes;

/// Segment header command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Carries application data.
    Push = 81,
    /// Carries a selective ACK for one `sn`.
    Ack = 82,
    /// "Window ask" — probe the peer for its current receive window.
    Wask = 83,
    /// "Window ins(pect)" — tell the peer our receive window.
    Wins = 84,
}

impl Command {
    pub fn from_u8(value: u8) -> Option<Command> {
        match value {
            81 => Some(Command::Push),
            82 => Some(Command::Ack),
            83 => Some(Command::Wask),
            84 => Some(Command::Wins),
            _ => None,
        }
    }
}

/// One protocol segment: the 24-byte wire header plus payload, plus the
/// send-local scratch fields a segment accumulates while it sits in
/// `snd_buf` waiting to be (re)transmitted.
#[derive(Debug, Clone)]
pub struct Segment {
    pub conv: u32,
    pub cmd: Command,
    /// Fragment index, counting down to 0 for the last fragment.
    pub frg: u8,
    /// Sender's advertised free receive-window slots.
    pub wnd: u16,
    /// Timestamp (ms) this segment was last sent.
    pub ts: u32,
    pub sn: u32,
    /// Sender's next-unacked `sn` at time of send (cumulative ACK).
    pub una: u32,
    pub data: Bytes,

    // --- send-local scratch, not on the wire ---
    /// Scheduled retransmit time.
    pub resendts: u32,
    /// Current per-segment retransmit timeout.
    pub rto: u32,
    /// Count of later-`sn` ACKs seen since this segment was sent.
    pub fastack: u32,
    /// Transmission attempts.
    pub xmit: u32,
}

impl Segment {
    pub fn new(conv: u32, cmd: Command, data: Bytes) -> Segment {
        Segment {
            conv,
            cmd,
            frg: 0,
            wnd: 0,
            ts: 0,
            sn: 0,
            una: 0,
            data,
            resendts: 0,
            rto: 0,
            fastack: 0,
            xmit: 0,
        }
    }
}
