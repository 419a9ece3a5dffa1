//! 位移规则
//!
//! 坐标约定：`forward/backward` 沿 ±Y，`right/left` 沿 ±X，`up/down` 沿 ±Z。
//! 只有高度在下降时被钳位到 `min_altitude`，其余分量不设界。

use drone_protocol::Vector3;

use crate::command::Command;
use crate::error::ControlError;

/// 默认步长（米）
pub const DEFAULT_STEP: f64 = 1.0;

/// 默认最低高度（米）
pub const DEFAULT_MIN_ALTITUDE: f64 = 0.5;

/// 默认初始高度（米）
pub const DEFAULT_INITIAL_ALTITUDE: f64 = 2.0;

/// 位移参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// 每条移动命令的步长
    pub step: f64,
    /// 下降时的最低高度
    pub min_altitude: f64,
    /// 启动时的高度（x = y = 0）
    pub initial_altitude: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            min_altitude: DEFAULT_MIN_ALTITUDE,
            initial_altitude: DEFAULT_INITIAL_ALTITUDE,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ControlError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ControlError::InvalidConfig(format!(
                "step must be > 0, got {}",
                self.step
            )));
        }
        if !(self.min_altitude.is_finite() && self.min_altitude >= 0.0) {
            return Err(ControlError::InvalidConfig(format!(
                "min_altitude must be >= 0, got {}",
                self.min_altitude
            )));
        }
        if !self.initial_altitude.is_finite() {
            return Err(ControlError::InvalidConfig(format!(
                "initial_altitude must be finite, got {}",
                self.initial_altitude
            )));
        }
        Ok(())
    }

    /// 起始位置 `(0, 0, initial_altitude)`
    pub fn initial_position(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.initial_altitude)
    }

    /// 沿 `direction` 移动 `distance`，返回新位置
    pub fn displace(&self, position: Vector3, direction: Direction, distance: f64) -> Vector3 {
        let mut next = position;
        match direction {
            Direction::Forward => next.y += distance,
            Direction::Backward => next.y -= distance,
            Direction::Left => next.x -= distance,
            Direction::Right => next.x += distance,
            Direction::Up => next.z += distance,
            Direction::Down => next.z = (position.z - distance).max(self.min_altitude),
        }
        next
    }
}

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn from_command(command: &Command) -> Option<Self> {
        match command {
            Command::Forward => Some(Direction::Forward),
            Command::Backward => Some(Direction::Backward),
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}
