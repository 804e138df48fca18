//! The session: the sliding-window state machine for one conversation.
//!
//! One `Session` per logical conversation. All operations are synchronous
//! and must be serialized by the caller — see spec §5 ("Concurrency &
//! Resource Model"): no internal locking, no I/O, no threads.

mod flush;
mod recv;
mod send;
mod timer;

use crate::consts::*;
use crate::error::SetMtuError;
use crate::segment::Segment;
use bytes::BytesMut;
use std::collections::VecDeque;

/// Signed 32-bit difference between two wrap-aware counters (timestamps or
/// sequence numbers). `later - earlier`, interpreted as signed, so callers
/// can compare with ordinary `<`/`>=` even across a `u32` wraparound.
#[inline]
pub(crate) fn timediff(later: u32, earlier: u32) -> i32 {
    later.wrapping_sub(earlier) as i32
}

/// One session (conversation). See spec §3.2 for the field-by-field
/// rationale.
pub struct Session {
    conv: u32,

    mtu: usize,
    mss: usize,
    snd_wnd: u16,
    rcv_wnd: u16,
    rmt_wnd: u16,

    snd_una: u32,
    snd_nxt: u32,
    rcv_nxt: u32,

    snd_que: VecDeque<Segment>,
    snd_buf: VecDeque<Segment>,
    rcv_buf: VecDeque<Segment>,
    rcv_que: VecDeque<Segment>,
    acklist: Vec<(u32, u32)>,

    rx_srtt: i32,
    rx_rttval: i32,
    rx_rto: u32,
    rx_minrto: u32,

    current: u32,
    interval: u32,
    ts_flush: u32,
    updated: bool,

    cwnd: u32,
    incr: u32,
    ssthresh: u32,
    nocwnd: bool,
    nodelay: bool,
    fastresend: u32,
    dead_link: u32,
    state: i32,

    probe: u32,
    ts_probe: u32,
    probe_wait: u32,

    buffer: BytesMut,
}

impl Session {
    /// Creates a new session for conversation id `conv`, with every tuning
    /// knob at its protocol default.
    pub fn new(conv: u32) -> Session {
        let mtu = DEFAULT_MTU;
        Session {
            conv,
            mtu,
            mss: mtu - crate::codec::HEADER_SIZE,
            snd_wnd: DEFAULT_WND,
            rcv_wnd: DEFAULT_WND,
            rmt_wnd: DEFAULT_WND,

            snd_una: 0,
            snd_nxt: 0,
            rcv_nxt: 0,

            snd_que: VecDeque::new(),
            snd_buf: VecDeque::new(),
            rcv_buf: VecDeque::new(),
            rcv_que: VecDeque::new(),
            acklist: Vec::new(),

            rx_srtt: 0,
            rx_rttval: 0,
            rx_rto: RTO_DEF,
            rx_minrto: RTO_MIN,

            current: 0,
            interval: INTERVAL_DEFAULT,
            ts_flush: INTERVAL_DEFAULT,
            updated: false,

            cwnd: 0,
            incr: 0,
            ssthresh: THRESH_MIN,
            nocwnd: false,
            nodelay: false,
            fastresend: 0,
            dead_link: DEAD_LINK,
            state: 0,

            probe: 0,
            ts_probe: 0,
            probe_wait: 0,

            buffer: BytesMut::with_capacity(3 * (mtu + crate::codec::HEADER_SIZE)),
        }
    }

    pub fn conv(&self) -> u32 {
        self.conv
    }

    /// `0` while healthy, `-1` once the link is declared dead (spec §3.2 /
    /// §5). The engine never acts on this itself; callers poll it.
    pub fn state(&self) -> i32 {
        self.state
    }

    /// Our current free receive-window, advertised in outbound headers.
    pub(crate) fn wnd_unused(&self) -> u16 {
        if (self.rcv_que.len() as u32) < self.rcv_wnd as u32 {
            self.rcv_wnd - self.rcv_que.len() as u16
        } else {
            0
        }
    }

    /// `|snd_buf| + |snd_que|` — total segments not yet fully acknowledged.
    pub fn wait_snd(&self) -> usize {
        self.snd_buf.len() + self.snd_que.len()
    }

    pub fn set_mtu(&mut self, mtu: usize) -> Result<(), SetMtuError> {
        if mtu < MIN_MTU.max(crate::codec::HEADER_SIZE) {
            return Err(SetMtuError::TooSmall {
                requested: mtu,
                min: MIN_MTU.max(crate::codec::HEADER_SIZE),
            });
        }
        self.buffer = BytesMut::with_capacity(3 * (mtu + crate::codec::HEADER_SIZE));
        self.mtu = mtu;
        self.mss = mtu - crate::codec::HEADER_SIZE;
        Ok(())
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.clamp(INTERVAL_MIN, INTERVAL_MAX);
    }

    /// `nd`/`fr`/`nc` negative means "leave unchanged", matching the
    /// reference API's sentinel-based setters.
    pub fn set_nodelay(&mut self, nd: i32, iv: i32, fr: i32, nc: i32) {
        if nd >= 0 {
            self.nodelay = nd != 0;
            self.rx_minrto = if self.nodelay { RTO_NDL } else { RTO_MIN };
        }
        if iv >= 0 {
            self.set_interval(iv as u32);
        }
        if fr >= 0 {
            self.fastresend = fr as u32;
        }
        if nc >= 0 {
            self.nocwnd = nc != 0;
        }
    }

    pub fn wnd_size(&mut self, snd_wnd: u16, rcv_wnd: u16) {
        if snd_wnd > 0 {
            self.snd_wnd = snd_wnd;
        }
        if rcv_wnd > 0 {
            self.rcv_wnd = rcv_wnd;
        }
    }
}
