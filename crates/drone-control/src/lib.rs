//! # Drone Control
//!
//! 命令解析、位姿模型与三种控制器：
//!
//! - [`LocalController`]: 纯本地位姿记账，带飞行状态守卫
//! - [`PoseController`]: 通过传输层发布目标位姿，订阅位姿遥测
//! - [`VelocityStreamer`]: 以固定频率发布速度指令
//!
//! 交互式的 REPL 循环在 `drone-cli` 中，本 crate 只负责
//! "一条命令 → 一次状态变更 → 一段回复文本"。

pub mod cell;
pub mod command;
pub mod controller;
pub mod error;
pub mod local;
pub mod motion;
pub mod rate;
pub mod remote;
pub mod stream;

// 重新导出常用类型
pub use cell::PoseCell;
pub use command::{Command, CommandInfo};
pub use controller::{Controller, EXIT_MESSAGE, Reply};
pub use error::ControlError;
pub use local::{LocalController, LocalState};
pub use motion::{Direction, MotionConfig};
pub use rate::Rate;
pub use remote::PoseController;
pub use stream::{StreamConfig, VelocityStreamer};
