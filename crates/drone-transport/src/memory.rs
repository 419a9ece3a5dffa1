//! 进程内总线
//!
//! 发布端只把 [`Envelope`] 放进有界队列，由独立的分发线程调用订阅回调，
//! 与外部仿真器的回调线程行为一致。队列满时丢弃新消息。

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use drone_protocol::Envelope;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::registry::{RawCallback, SubscriberTable, SubscriptionId};
use crate::{Transport, TransportError};

/// 默认队列容量
pub const DEFAULT_QUEUE_SIZE: usize = 10;

/// 分发线程检查停止标志的周期
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 进程内发布/订阅总线
pub struct MemoryTransport {
    tx: Sender<Envelope>,
    subscribers: Arc<SubscriberTable>,
    stop: Arc<AtomicBool>,
    dispatcher: Mutex<Option<thread::JoinHandle<()>>>,
}

impl MemoryTransport {
    /// 创建总线（队列容量 `queue_size`，最小为 1）
    pub fn new(queue_size: usize) -> Result<Self, TransportError> {
        let (tx, rx) = bounded::<Envelope>(queue_size.max(1));
        let subscribers = Arc::new(SubscriberTable::default());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let subscribers = Arc::clone(&subscribers);
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("drone-memory-bus".to_string())
                .spawn(move || dispatch_loop(rx, subscribers, stop))?
        };

        Ok(Self {
            tx,
            subscribers,
            stop,
            dispatcher: Mutex::new(Some(handle)),
        })
    }
}

fn dispatch_loop(rx: Receiver<Envelope>, subscribers: Arc<SubscriberTable>, stop: Arc<AtomicBool>) {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(envelope) => {
                let delivered = subscribers.dispatch(&envelope);
                tracing::trace!("memory bus: {} -> {} subscriber(s)", envelope.topic, delivered);
            },
            Err(RecvTimeoutError::Timeout) => {
                if stop.load(Ordering::Acquire) {
                    break;
                }
            },
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("memory bus dispatcher stopped");
}

impl Transport for MemoryTransport {
    fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        match self.tx.try_send(envelope) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(envelope)) => {
                tracing::warn!("memory bus queue full, dropping message on {}", envelope.topic);
                Ok(())
            },
            Err(TrySendError::Disconnected(_)) => Err(TransportError::Closed),
        }
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

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.dispatcher.lock().take()
            && handle.thread().id() != thread::current().id()
        {
            let _ = handle.join();
        }
    }
}
