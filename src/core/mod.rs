use std::{
    io::ErrorKind,
    net::{SocketAddr, UdpSocket},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, info};
use rosc::OscType;

use self::codec::Message;
use self::config::BridgeConfig;

pub mod codec;
pub mod config;
mod folders;
pub mod tracking;

pub const AVATAR_CHANGE_ADDR: &str = "/avatar/change";

const RECV_BUF_SIZE: usize = 2048;
const RECV_TIMEOUT: Duration = Duration::from_millis(1000);

/// Invoked with the new avatar id whenever the remote application announces
/// an avatar switch. One-way; the transport keeps no avatar state.
pub type AvatarChangeSink = Box<dyn Fn(&str) + Send>;

pub struct TrackingOsc {
    upstream: UdpSocket,
    listen_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    recv_thread: Mutex<Option<JoinHandle<()>>>,
}

impl TrackingOsc {
    /// Opens the outbound and inbound sockets and starts the single
    /// background receive thread.
    pub fn spawn(config: &BridgeConfig, on_avatar_change: AvatarChangeSink) -> anyhow::Result<Self> {
        let listener = UdpSocket::bind(SocketAddr::new(config.bind_addr, config.in_port))?;
        listener.set_read_timeout(Some(RECV_TIMEOUT))?;
        let listen_addr = listener.local_addr()?;

        let upstream = UdpSocket::bind(SocketAddr::new(config.bind_addr, 0))?;
        upstream.connect(SocketAddr::new(config.bind_addr, config.out_port))?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let cancel = shutdown.clone();
        let recv_thread = thread::Builder::new()
            .name("osc-recv".into())
            .spawn(move || recv_loop(listener, cancel, on_avatar_change))?;

        Ok(Self {
            upstream,
            listen_addr,
            shutdown,
            recv_thread: Mutex::new(Some(recv_thread)),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    /// One blocking datagram write. No retry, no queueing; datagram loss is
    /// the caller's problem.
    pub fn send(&self, msg: &Message) -> anyhow::Result<usize> {
        let buf = msg.encode()?;
        Ok(self.upstream.send(&buf)?)
    }

    /// Signals the receive loop and waits for it to exit. The loop observes
    /// the flag between receive cycles, so this returns within one receive
    /// timeout interval.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Ok(mut thread) = self.recv_thread.lock() {
            if let Some(handle) = thread.take() {
                handle.join().ok();
            }
        }
    }
}

impl Drop for TrackingOsc {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn recv_loop(listener: UdpSocket, cancel: Arc<AtomicBool>, on_avatar_change: AvatarChangeSink) {
    let mut buf = [0u8; RECV_BUF_SIZE];

    while !cancel.load(Ordering::Relaxed) {
        let size = match listener.recv_from(&mut buf) {
            Ok((size, _)) => size,
            // timeouts are the steady state; everything else is transient too
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) => {
                debug!("receive fault: {}", e);
                continue;
            }
        };

        let msg = match Message::decode(&buf[..size]) {
            Ok(msg) => msg,
            Err(e) => {
                debug!("dropping datagram: {}", e);
                continue;
            }
        };

        if msg.addr == AVATAR_CHANGE_ADDR {
            if let Some(OscType::String(avatar)) = msg.args.first() {
                info!("Avatar changed: {:?}", avatar);
                on_avatar_change(avatar);
            }
        }
        // other addresses: future parameter sync hooks in here
    }

    debug!("receive loop exiting");
}
