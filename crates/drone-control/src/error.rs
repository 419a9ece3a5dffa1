//! 控制层错误类型定义

use drone_transport::TransportError;
use thiserror::Error;

/// 控制层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 传输层错误（发布失败、订阅失败等）
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 配置参数非法
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
