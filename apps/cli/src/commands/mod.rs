//! 命令定义和实现

pub mod config;
pub mod local;
pub mod pose;
pub mod stream;

pub use config::ConfigCommand;
pub use local::LocalCommand;
pub use pose::PoseCommand;
pub use stream::StreamCommand;

use clap::Args;
use std::path::PathBuf;

use crate::config::{CliConfig, TransportKind};

/// 位移与 REPL 相关的公共参数
#[derive(Args, Debug, Clone, Default)]
pub struct MotionArgs {
    /// 每条移动命令的步长（米）
    #[arg(long)]
    pub step: Option<f64>,

    /// 每条命令后的停顿（毫秒）
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// 行编辑历史文件
    #[arg(long)]
    pub history: Option<PathBuf>,
}

impl MotionArgs {
    /// 命令行参数覆盖配置文件
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(step) = self.step {
            config.motion.step = step;
        }
        if let Some(delay) = self.delay_ms {
            config.motion.command_delay_ms = delay;
        }
        if let Some(ref history) = self.history {
            config.repl.history_file = Some(history.clone());
        }
    }
}

/// 传输相关的公共参数
#[derive(Args, Debug, Clone, Default)]
pub struct TransportArgs {
    /// 传输后端
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    /// 本地绑定地址（UDP）
    #[arg(long)]
    pub bind: Option<String>,

    /// 对端地址（UDP）
    #[arg(long)]
    pub peer: Option<String>,
}

impl TransportArgs {
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(kind) = self.transport {
            config.transport.kind = kind;
        }
        if let Some(ref bind) = self.bind {
            config.transport.bind = bind.clone();
        }
        if let Some(ref peer) = self.peer {
            config.transport.peer = peer.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let mut config = CliConfig::default();
        MotionArgs {
            step: Some(0.25),
            delay_ms: Some(0),
            history: None,
        }
        .apply(&mut config);
        TransportArgs {
            transport: Some(TransportKind::Memory),
            bind: None,
            peer: Some("10.0.0.2:9000".to_string()),
        }
        .apply(&mut config);

        assert_eq!(config.motion.step, 0.25);
        assert_eq!(config.motion.command_delay_ms, 0);
        assert_eq!(config.transport.kind, TransportKind::Memory);
        assert_eq!(config.transport.bind, "0.0.0.0:0");
        assert_eq!(config.transport.peer, "10.0.0.2:9000");
    }
}
