//! Transport glue for `emberlink`: UDP socket I/O, one `Session` per peer
//! address, the clock source, and the tick loop — everything spec.md §1
//! calls an external collaborator rather than core engine responsibility.

mod config;

use dashmap::DashMap;
use emberlink::{RecvError, Session};
use emberlink_log::EmberlinkLogger;
use log::{debug, error, info, warn, Level};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::time::{self, Duration, Instant};

/// Larger than any single `Session`'s mtu can realistically be; just a
/// receive scratch buffer, not a protocol limit.
const MAX_DATAGRAM_SIZE: usize = 65_536;
/// How often idle sessions get a chance to retransmit/probe even with no
/// fresh input. `Session::check` would let us space this out further; a
/// fixed fast tick keeps the demo simple and is still well inside every
/// session's configured `interval`.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[tokio::main]
async fn main() {
    EmberlinkLogger::init(Level::Info, 1024).expect("failed to install logger");

    let config = match config::handle() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let socket = match UdpSocket::bind(&config.network.listen).await {
        Ok(socket) => socket,
        Err(e) => {
            error!("Failed to bind {}: {e}", config.network.listen);
            std::process::exit(1);
        }
    };
    info!("emberlink-demo listening on {}", config.network.listen);

    let peer: Option<SocketAddr> = config.network.peer.as_ref().map(|p| {
        p.parse()
            .expect("network.peer already validated by config::handle")
    });
    if let Some(peer) = peer {
        info!("will actively send stdin lines to {peer}");
    }

    let sessions: DashMap<SocketAddr, Session> = DashMap::new();
    let start = Instant::now();
    let mut recv_buf = [0u8; MAX_DATAGRAM_SIZE];
    let mut ticker = time::interval(TICK_INTERVAL);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            recv_result = socket.recv_from(&mut recv_buf) => {
                match recv_result {
                    Ok((len, src)) => {
                        handle_datagram(&socket, &sessions, &config, src, &recv_buf[..len], now_ms(start));
                    }
                    Err(e) => warn!("recv_from failed: {e}"),
                }
            }
            _ = ticker.tick() => {
                tick_sessions(&socket, &sessions, now_ms(start));
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(text)) => match peer {
                        Some(addr) => send_line(&socket, &sessions, &config, addr, text, now_ms(start)),
                        None => warn!("no network.peer configured; dropping stdin line"),
                    },
                    Ok(None) => {
                        debug!("stdin closed; continuing to serve the network side");
                        stdin_open = false;
                    }
                    Err(e) => warn!("stdin read failed: {e}"),
                }
            }
        }
    }
}

fn now_ms(start: Instant) -> u32 {
    start.elapsed().as_millis() as u32
}

fn new_session(config: &config::Config, addr: SocketAddr) -> Session {
    info!("new session for {addr}");
    let sc = &config.session;
    let mut session = Session::new(sc.conv);
    if let Err(e) = session.set_mtu(sc.mtu) {
        warn!("configured session.mtu rejected ({e}); keeping the default");
    }
    session.set_nodelay(
        sc.nodelay as i32,
        sc.interval as i32,
        sc.fastresend as i32,
        sc.nocwnd as i32,
    );
    session.wnd_size(sc.snd_wnd, sc.rcv_wnd);
    session
}

/// Feeds one inbound datagram to the right session, echoes every completed
/// message back to the sender, and flushes immediately for low latency.
fn handle_datagram(
    socket: &UdpSocket,
    sessions: &DashMap<SocketAddr, Session>,
    config: &config::Config,
    src: SocketAddr,
    data: &[u8],
    now: u32,
) {
    let mut entry = sessions.entry(src).or_insert_with(|| new_session(config, src));
    let session = entry.value_mut();

    if let Err(e) = session.input(data) {
        warn!("dropping malformed datagram from {src}: {e}");
        return;
    }

    for message in drain_messages(session, src) {
        if let Err(e) = session.send(&message) {
            warn!("failed to echo {} bytes back to {src}: {e}", message.len());
        }
    }

    flush_session(socket, session, src, now);
}

fn send_line(
    socket: &UdpSocket,
    sessions: &DashMap<SocketAddr, Session>,
    config: &config::Config,
    addr: SocketAddr,
    text: String,
    now: u32,
) {
    let mut entry = sessions.entry(addr).or_insert_with(|| new_session(config, addr));
    let session = entry.value_mut();
    if let Err(e) = session.send(text.as_bytes()) {
        warn!("failed to queue stdin line to {addr}: {e}");
        return;
    }
    flush_session(socket, session, addr, now);
}

/// Drains every complete message currently reassembled in `session`.
fn drain_messages(session: &mut Session, src: SocketAddr) -> Vec<Vec<u8>> {
    let mut scratch = vec![0u8; MAX_DATAGRAM_SIZE];
    let mut messages = Vec::new();
    loop {
        match session.recv(&mut scratch) {
            Ok(n) => {
                info!(
                    "{src}: received {n} bytes: {:?}",
                    String::from_utf8_lossy(&scratch[..n])
                );
                messages.push(scratch[..n].to_vec());
            }
            Err(RecvError::Empty) | Err(RecvError::Incomplete) => break,
            Err(e) => {
                warn!("recv error from {src}: {e}");
                break;
            }
        }
    }
    messages
}

fn flush_session(socket: &UdpSocket, session: &mut Session, addr: SocketAddr, now: u32) {
    session.update(now, &mut |buf| {
        if let Err(e) = socket.try_send_to(buf, addr) {
            warn!("send to {addr} failed: {e}");
        }
    });
}

/// Drives retransmission/probe timing for every session, even the ones
/// that haven't seen fresh input since the last tick, and reaps any whose
/// link has been declared dead.
fn tick_sessions(socket: &UdpSocket, sessions: &DashMap<SocketAddr, Session>, now: u32) {
    let mut dead = Vec::new();
    for mut entry in sessions.iter_mut() {
        let addr = *entry.key();
        let session = entry.value_mut();
        flush_session(socket, session, addr, now);
        if session.state() < 0 {
            dead.push(addr);
        }
    }
    for addr in dead {
        debug!("reaping dead-link session for {addr}");
        sessions.remove(&addr);
    }
}
