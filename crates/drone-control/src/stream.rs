//! 速度指令流
//!
//! 以固定频率在 `/cmd_vel` 上发布同一条 [`Twist`]，直到停止标志被清除
//! （通常由 Ctrl+C 处理器清除）或达到 `max_iterations`。
//!
//! 单次发布失败只记录 `warn`，不会中断流。

use drone_protocol::{CMD_VEL_TOPIC, Twist, Vector3};
use drone_transport::{Node, Publisher};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ControlError;
use crate::rate::Rate;

/// 流配置
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// 发布频率（Hz）
    pub rate_hz: f64,
    /// 每次发布的速度指令
    pub twist: Twist,
    /// 最大发布次数（None 表示直到停止）
    pub max_iterations: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            rate_hz: 10.0,
            twist: Twist {
                linear: Vector3::new(1.0, 0.0, 0.0),
                angular: Vector3::new(0.0, 0.0, 0.5),
            },
            max_iterations: None,
        }
    }
}

/// 速度指令发布器
pub struct VelocityStreamer {
    publisher: Publisher<Twist>,
    config: StreamConfig,
}

impl VelocityStreamer {
    pub fn new(node: &Node, config: StreamConfig) -> Result<Self, ControlError> {
        Self::with_topic(node, config, CMD_VEL_TOPIC)
    }

    pub fn with_topic(
        node: &Node,
        config: StreamConfig,
        topic: &str,
    ) -> Result<Self, ControlError> {
        // 提前校验频率，避免运行时才失败
        Rate::new(config.rate_hz)?;
        Ok(Self {
            publisher: node.advertise::<Twist>(topic),
            config,
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// 阻塞运行，返回成功发布的次数
    ///
    /// `running` 在每次发布前检查；被置为 `false` 后循环退出。
    pub fn run(&self, running: &AtomicBool) -> Result<usize, ControlError> {
        let mut rate = Rate::new(self.config.rate_hz)?;
        let mut iteration = 0usize;
        let mut published = 0usize;

        tracing::info!(
            "streaming {:?} on {} at {} Hz",
            self.config.twist,
            self.publisher.topic(),
            self.config.rate_hz
        );

        while running.load(Ordering::Acquire) {
            if let Some(max) = self.config.max_iterations
                && iteration >= max
            {
                break;
            }

            match self.publisher.publish(&self.config.twist) {
                Ok(()) => published += 1,
                Err(e) => tracing::warn!("cmd_vel publish failed: {}", e),
            }
            iteration += 1;

            rate.sleep();
        }

        tracing::info!("stream stopped after {} message(s)", published);
        Ok(published)
    }
}
