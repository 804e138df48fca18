//! A reliable, ordered, message-oriented transport protocol engine layered
//! over an unreliable datagram substrate.
//!
//! This crate is the *core* only: segment codec, sliding-window send/receive
//! state, ACK/UNA/fast-retransmit processing, RTO/SRTT estimation, window
//! probing, and congestion control. It is a pure state machine with no I/O
//! of its own — no sockets, no clock, no threads. The caller drives it with
//! a monotonic clock (`Session::update`/`Session::check`) and receives
//! outbound datagrams through a sink closure passed to `update`/`flush`.

pub mod codec;
mod consts;
pub mod error;
pub mod segment;
mod session;

pub use codec::{Header, HEADER_SIZE};
pub use error::{CodecError, InputError, RecvError, SendError, SetMtuError};
pub use segment::{Command, Segment};
pub use session::Session;
