//! Protocol constants. Values not pinned down numerically by the governing
//! specification are taken from the reference implementation this protocol
//! describes; see `DESIGN.md`.

/// Minimum RTO (ms) when `nodelay` is enabled.
pub const RTO_NDL: u32 = 30;
/// Minimum RTO (ms) in normal mode.
pub const RTO_MIN: u32 = 100;
/// Initial RTO (ms) before any RTT sample has been taken.
pub const RTO_DEF: u32 = 200;
/// Upper bound on RTO (ms).
pub const RTO_MAX: u32 = 60_000;

/// Floor for `ssthresh`, and its initial value.
pub const THRESH_MIN: u32 = 2;

/// Initial window-probe backoff (ms).
pub const PROBE_INIT: u32 = 7_000;
/// Maximum window-probe backoff (ms).
pub const PROBE_LIMIT: u32 = 120_000;

/// Default number of retransmissions before a segment is declared dead.
pub const DEAD_LINK: u32 = 10;

/// Default MTU.
pub const DEFAULT_MTU: usize = 1400;
/// Minimum MTU accepted by `set_mtu`.
pub const MIN_MTU: usize = 50;

/// Default send/receive window size, in segments.
pub const DEFAULT_WND: u16 = 32;

/// Default and bounds for the flush interval (ms).
pub const INTERVAL_DEFAULT: u32 = 100;
pub const INTERVAL_MIN: u32 = 10;
pub const INTERVAL_MAX: u32 = 5_000;

/// Bitfield values for `Session::probe`.
pub const ASK_SEND: u32 = 1;
pub const ASK_TELL: u32 = 2;

/// `send()` bounds a message to this many fragments.
pub const MAX_FRAGMENTS: usize = 255;
