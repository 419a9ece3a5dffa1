//! 本地控制器（无传输）
//!
//! 只在内存中记账：`takeoff`/`land` 切换飞行状态，移动命令要求处于飞行中。
//!
//! ```rust
//! use drone_control::{Command, Controller, LocalController, MotionConfig};
//!
//! let mut drone = LocalController::new(MotionConfig::default()).unwrap();
//! drone.handle(&Command::Takeoff).unwrap();
//! drone.handle(&Command::Up).unwrap();
//! assert_eq!(drone.state().pose.position.z, 3.0);
//! ```

use drone_protocol::{Pose, Vector3};

use crate::command::{Command, CommandInfo};
use crate::controller::{Controller, Reply};
use crate::error::ControlError;
use crate::motion::{Direction, MotionConfig};

const LOCAL_COMMANDS: &[CommandInfo] = &[
    CommandInfo::new("takeoff", "Start flying"),
    CommandInfo::new("land", "Land the drone"),
    CommandInfo::new("forward", "Move forward"),
    CommandInfo::new("backward", "Move backward"),
    CommandInfo::new("left", "Move left"),
    CommandInfo::new("right", "Move right"),
    CommandInfo::new("up", "Move up"),
    CommandInfo::new("down", "Move down"),
    CommandInfo::new("status", "Show current position"),
    CommandInfo::new("quit", "Exit the controller"),
];

/// 移动被飞行守卫拒绝时的提示
pub const MUST_BE_FLYING: &str = "Drone must be flying to move!";

/// 本地状态：位姿 + 飞行标志
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalState {
    pub pose: Pose,
    pub flying: bool,
}

/// 本地控制器
#[derive(Debug, Clone)]
pub struct LocalController {
    state: LocalState,
    motion: MotionConfig,
}

impl LocalController {
    pub fn new(motion: MotionConfig) -> Result<Self, ControlError> {
        motion.validate()?;
        let position = motion.initial_position();
        Ok(Self {
            state: LocalState {
                pose: Pose::from_xyz(position.x, position.y, position.z),
                flying: false,
            },
            motion,
        })
    }

    pub fn state(&self) -> &LocalState {
        &self.state
    }

    pub fn is_flying(&self) -> bool {
        self.state.flying
    }

    /// 直接设置位置（不受飞行守卫限制）
    pub fn set_position(&mut self, x: f64, y: f64, z: f64) -> Reply {
        self.state.pose.position = Vector3::new(x, y, z);
        Reply::line(format!("Position set to: {}", self.state.pose.position))
    }

    pub fn takeoff(&mut self) -> Reply {
        if self.state.flying {
            return Reply::line("Drone is already flying!");
        }
        self.state.flying = true;
        tracing::debug!("local: takeoff");
        Reply::line("Drone taking off...")
    }

    pub fn land(&mut self) -> Reply {
        if !self.state.flying {
            return Reply::line("Drone is already on the ground!");
        }
        self.state.flying = false;
        tracing::debug!("local: land");
        Reply::line("Drone landing...")
    }

    /// 移动 `distance` 米（需要处于飞行中）
    pub fn move_by(&mut self, direction: Direction, distance: f64) -> Reply {
        if !self.state.flying {
            return Reply::line(MUST_BE_FLYING);
        }

        let position = self.state.pose.position;
        self.state.pose.position = self.motion.displace(position, direction, distance);
        tracing::debug!("local: {} -> {}", direction.label(), self.state.pose.position);

        Reply::line(format!("Moving {} {:?}m", direction.label(), distance))
    }

    /// 多行状态报告
    pub fn status(&self) -> Reply {
        let mut reply = Reply::line("Drone Status:");
        reply.push(format!("  Position: {}", self.state.pose.position));
        reply.push(format!("  Orientation: {}", self.state.pose.orientation));
        reply.push(format!("  Flying: {}", self.state.flying));
        reply
    }
}

impl Controller for LocalController {
    fn name(&self) -> &str {
        "Simple Drone Controller"
    }

    fn commands(&self) -> &'static [CommandInfo] {
        LOCAL_COMMANDS
    }

    fn execute(&mut self, command: &Command) -> Result<Reply, ControlError> {
        let reply = match command {
            Command::Takeoff => self.takeoff(),
            Command::Land => self.land(),
            Command::Status => self.status(),
            other => match Direction::from_command(other) {
                Some(direction) => self.move_by(direction, self.motion.step),
                None => crate::controller::unknown_command(other),
            },
        };
        Ok(reply)
    }
}
