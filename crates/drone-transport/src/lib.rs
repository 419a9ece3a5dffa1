//! # Drone Transport Layer
//!
//! 发布/订阅传输抽象，提供统一的 `advertise` / `publish` / `subscribe` 接口。
//!
//! ## 后端
//!
//! - [`MemoryTransport`]: 进程内总线（独立分发线程），用于测试和离线演示
//! - [`UdpTransport`]: 每个数据报一个 JSON [`Envelope`]，发往固定对端
//!
//! ## 投递语义
//!
//! 发布是 fire-and-forget：无确认、无重传、不保证顺序。
//! 订阅回调在后端自己的线程上执行，与调用方的主循环并发。

use drone_protocol::{Envelope, Message, ProtocolError};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
mod registry;
pub mod udp;

pub use memory::MemoryTransport;
pub use registry::{RawCallback, SubscriptionId};
pub use udp::UdpTransport;

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Transport closed")]
    Closed,
}

/// 传输后端
///
/// 后端只搬运 [`Envelope`]；类型化的接口由 [`Node`] 提供。
pub trait Transport: Send + Sync {
    /// 发送一个封装好的消息（不等待投递）
    fn send(&self, envelope: Envelope) -> Result<(), TransportError>;

    /// 注册话题回调，回调在后端的接收线程上执行
    fn register(
        &self,
        topic: &str,
        callback: RawCallback,
    ) -> Result<SubscriptionId, TransportError>;

    /// 注销回调（未知 ID 静默忽略）
    fn unregister(&self, topic: &str, id: SubscriptionId);
}

/// 传输节点：类型化的发布/订阅入口
#[derive(Clone)]
pub struct Node {
    transport: Arc<dyn Transport>,
}

impl Node {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 声明一个话题发布者
    pub fn advertise<M: Message>(&self, topic: &str) -> Publisher<M> {
        tracing::debug!("advertise {} [{}]", topic, M::TYPE_NAME);
        Publisher {
            topic: topic.to_string(),
            transport: Arc::clone(&self.transport),
            _marker: PhantomData,
        }
    }

    /// 订阅话题
    ///
    /// 类型名不符或无法解码的消息会被丢弃并记录 `warn`。
    /// 返回的 [`Subscription`] 被 drop 时自动注销。
    pub fn subscribe<M, F>(&self, topic: &str, callback: F) -> Result<Subscription, TransportError>
    where
        M: Message,
        F: Fn(M) + Send + Sync + 'static,
    {
        let raw: RawCallback = Arc::new(move |envelope: &Envelope| match envelope.open::<M>() {
            Ok(message) => callback(message),
            Err(e) => tracing::warn!("Dropping message on {}: {}", envelope.topic, e),
        });

        let id = self.transport.register(topic, raw)?;
        tracing::debug!("subscribe {} [{}] -> {:?}", topic, M::TYPE_NAME, id);

        Ok(Subscription {
            topic: topic.to_string(),
            id,
            transport: Arc::clone(&self.transport),
        })
    }
}

/// 类型化发布者
pub struct Publisher<M> {
    topic: String,
    transport: Arc<dyn Transport>,
    _marker: PhantomData<fn(M)>,
}

impl<M: Message> Publisher<M> {
    /// 发布消息（fire-and-forget）
    pub fn publish(&self, message: &M) -> Result<(), TransportError> {
        let envelope = Envelope::wrap(&self.topic, message)?;
        self.transport.send(envelope)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// 订阅句柄（RAII 注销）
pub struct Subscription {
    topic: String,
    id: SubscriptionId,
    transport: Arc<dyn Transport>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.transport.unregister(&self.topic, self.id);
    }
}
