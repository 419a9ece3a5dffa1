//! # Drone Protocol
//!
//! 无人机遥控的消息定义（无 I/O 依赖）
//!
//! ## 模块
//!
//! - `messages`: 位姿 / 速度消息类型
//! - `topics`: 话题名称与消息类型名常量
//! - `envelope`: JSON 线格式封装（topic + type_name + payload）
//!
//! 传输层（`drone-transport`）只负责搬运 [`Envelope`]，
//! 消息的序列化与类型检查都在本 crate 完成。

pub mod envelope;
pub mod messages;
pub mod topics;

// 重新导出常用类型
pub use envelope::Envelope;
pub use messages::*;
pub use topics::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message type mismatch on '{topic}': expected {expected}, got {actual}")]
    TypeMismatch {
        topic: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Empty datagram")]
    Empty,
}
