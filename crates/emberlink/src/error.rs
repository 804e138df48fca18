use emberlink_binary::BinaryError;
use thiserror::Error;

/// Errors from decoding a single segment header.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Binary(#[from] BinaryError),

    #[error("unknown command byte: {0}")]
    UnknownCommand(u8),
}

/// Errors from `Session::input`. Maps to spec §6.2's
/// `{0 | ConvMismatch | Truncated | UnknownCmd}`.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("conv mismatch: expected {expected}, got {got}")]
    ConvMismatch { expected: u32, got: u32 },

    #[error("datagram truncated: header declared more payload than remained")]
    Truncated,

    /// Covers spec §4.3.1 step 2 ("cmd not in {PUSH,ACK,WASK,WINS}") via
    /// `CodecError::UnknownCommand`.
    #[error(transparent)]
    Decode(#[from] CodecError),
}

/// Errors from `Session::recv`. `Empty`/`Incomplete` are conditional
/// non-errors per spec §7 — ordinary signaling, not failure.
#[derive(Error, Debug)]
pub enum RecvError {
    /// Maps to spec's sentinel `-1`: nothing in `rcv_que`.
    #[error("no message available")]
    Empty,

    /// Maps to spec's sentinel `-2`: the next message's fragments haven't
    /// all arrived yet.
    #[error("next message incomplete")]
    Incomplete,

    /// Maps to spec's sentinel `-3`.
    #[error("output buffer too small: needed {needed}, available {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors from `Session::send`.
#[derive(Error, Debug)]
pub enum SendError {
    /// Maps to spec's sentinel `-1`.
    #[error("cannot send an empty payload")]
    EmptyPayload,

    /// Maps to spec's sentinel `-2`.
    #[error("payload requires {fragments} fragments, exceeding the {max} limit")]
    TooLarge { fragments: usize, max: usize },
}

/// Errors from `Session::set_mtu`.
#[derive(Error, Debug)]
pub enum SetMtuError {
    #[error("requested mtu {requested} is below the minimum of {min}")]
    TooSmall { requested: usize, min: usize },
}
