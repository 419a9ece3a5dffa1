//! UDP 传输
//!
//! 每个数据报承载一个 JSON [`Envelope`]。所有发布都发往固定的对端地址
//! （仿真器桥接进程），本地 socket 上收到的数据报按话题分发给订阅者。
//!
//! 无连接、无确认、无重传：丢包即丢失。

use drone_protocol::Envelope;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::registry::{RawCallback, SubscriberTable, SubscriptionId};
use crate::{Transport, TransportError};

/// 接收缓冲区大小（单个 UDP 数据报上限）
const MAX_DATAGRAM: usize = 65_536;

/// 接收线程检查停止标志的周期
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// UDP 发布/订阅传输
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    subscribers: Arc<SubscriberTable>,
    stop: Arc<AtomicBool>,
    receiver: Mutex<Option<thread::JoinHandle<()>>>,
}

impl UdpTransport {
    /// 绑定本地地址并设置对端
    ///
    /// # 参数
    /// - `bind`: 本地地址（如 "0.0.0.0:0"）
    /// - `peer`: 对端地址（如 "127.0.0.1:11345"）
    pub fn bind(bind: &str, peer: &str) -> Result<Self, TransportError> {
        let bind_addr = parse_addr(bind)?;
        let peer = parse_addr(peer)?;

        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;

        let subscribers = Arc::new(SubscriberTable::default());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let socket = socket.try_clone()?;
            let subscribers = Arc::clone(&subscribers);
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("drone-udp-rx".to_string())
                .spawn(move || receive_loop(socket, subscribers, stop))?
        };

        tracing::info!("UDP transport bound to {}, peer {}", socket.local_addr()?, peer);

        Ok(Self {
            socket,
            peer,
            subscribers,
            stop,
            receiver: Mutex::new(Some(handle)),
        })
    }

    /// 本地实际绑定的地址（绑定端口 0 时由系统分配）
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

fn parse_addr(addr: &str) -> Result<SocketAddr, TransportError> {
    addr.parse()
        .map_err(|e| TransportError::InvalidAddress(format!("{}: {}", addr, e)))
}

fn receive_loop(socket: UdpSocket, subscribers: Arc<SubscriberTable>, stop: Arc<AtomicBool>) {
    let mut buf = vec![0u8; MAX_DATAGRAM];

    while !stop.load(Ordering::Acquire) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => match Envelope::from_bytes(&buf[..len]) {
                Ok(envelope) => {
                    let delivered = subscribers.dispatch(&envelope);
                    tracing::trace!(
                        "udp rx {} from {} -> {} subscriber(s)",
                        envelope.topic,
                        from,
                        delivered
                    );
                },
                Err(e) => tracing::warn!("Discarding datagram from {}: {}", from, e),
            },
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {},
            Err(e) => {
                tracing::warn!("UDP receive error: {}", e);
                thread::sleep(READ_TIMEOUT);
            },
        }
    }
    tracing::debug!("UDP receiver stopped");
}

impl Transport for UdpTransport {
    fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        let bytes = envelope.to_bytes()?;
        self.socket.send_to(&bytes, self.peer)?;
        tracing::debug!("udp tx {} ({} bytes) -> {}", envelope.topic, bytes.len(), self.peer);
        Ok(())
    }

    fn register(
        &self,
        topic: &str,
        callback: RawCallback,
    ) -> Result<SubscriptionId, TransportError> {
        Ok(self.subscribers.insert(topic, callback))
    }

    fn unregister(&self, topic: &str, id: SubscriptionId) {
        self.subscribers.remove(topic, id);
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.receiver.lock().take()
            && handle.thread().id() != thread::current().id()
        {
            let _ = handle.join();
        }
    }
}
