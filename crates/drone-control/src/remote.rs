//! 传输驱动的位姿控制器
//!
//! 每条移动命令基于工作位姿计算目标位姿，写回 [`PoseCell`]，
//! 然后发布到 set-pose 话题（fire-and-forget）。遥测订阅在传输层的
//! 接收线程上把仿真器上报的位姿整体写入同一个单元。
//!
//! 与本地控制器不同，这里没有飞行状态守卫：`takeoff`/`land` 只是
//! 上升/下降一个步长。

use drone_protocol::{POSE_TOPIC, Pose, SET_POSE_TOPIC, Vector3};
use drone_transport::{Node, Publisher, Subscription};

use crate::cell::PoseCell;
use crate::command::{Command, CommandInfo};
use crate::controller::{Controller, Reply, unknown_command};
use crate::error::ControlError;
use crate::motion::{Direction, MotionConfig};

const POSE_COMMANDS: &[CommandInfo] = &[
    CommandInfo::new("takeoff", "Move drone up"),
    CommandInfo::new("land", "Move drone down"),
    CommandInfo::new("forward", "Move drone forward"),
    CommandInfo::new("backward", "Move drone backward"),
    CommandInfo::new("left", "Move drone left"),
    CommandInfo::new("right", "Move drone right"),
    CommandInfo::new("hover", "Keep drone in current position"),
    CommandInfo::new("quit", "Exit the controller"),
];

/// 位姿控制器
pub struct PoseController {
    cell: PoseCell,
    publisher: Publisher<Pose>,
    _telemetry: Subscription,
    motion: MotionConfig,
}

impl PoseController {
    /// 使用默认话题连接
    pub fn connect(node: &Node, motion: MotionConfig) -> Result<Self, ControlError> {
        Self::with_topics(node, motion, SET_POSE_TOPIC, POSE_TOPIC)
    }

    /// 指定 set-pose / 遥测话题
    pub fn with_topics(
        node: &Node,
        motion: MotionConfig,
        set_pose_topic: &str,
        telemetry_topic: &str,
    ) -> Result<Self, ControlError> {
        motion.validate()?;

        let position = motion.initial_position();
        let cell = PoseCell::new(Pose::from_xyz(position.x, position.y, position.z));

        let publisher = node.advertise::<Pose>(set_pose_topic);
        let telemetry = {
            let cell = cell.clone();
            node.subscribe::<Pose, _>(telemetry_topic, move |pose| {
                tracing::trace!("telemetry: {}", pose.position);
                cell.store(pose);
            })?
        };

        tracing::info!(
            "pose controller: publishing on {}, telemetry from {}",
            set_pose_topic,
            telemetry_topic
        );

        Ok(Self {
            cell,
            publisher,
            _telemetry: telemetry,
            motion,
        })
    }

    /// 当前工作位姿
    pub fn current_pose(&self) -> Pose {
        self.cell.load()
    }

    /// 发布目标位置（姿态清零）
    ///
    /// 发布成功后才写回工作位姿。
    pub fn set_pose(&self, x: f64, y: f64, z: f64) -> Result<Reply, ControlError> {
        let target = Pose::from_xyz(x, y, z);
        self.publisher.publish(&target)?;
        self.cell.store(target);

        tracing::debug!("set_pose -> {} on {}", target.position, self.publisher.topic());
        Ok(Reply::line(format!(
            "Moving drone to position: {}",
            target.position
        )))
    }

    fn move_to(&self, position: Vector3) -> Result<Reply, ControlError> {
        self.set_pose(position.x, position.y, position.z)
    }

    fn step(&self, direction: Direction) -> Result<Reply, ControlError> {
        let current = self.cell.load().position;
        self.move_to(self.motion.displace(current, direction, self.motion.step))
    }

    pub fn takeoff(&self) -> Result<Reply, ControlError> {
        self.step(Direction::Up)
    }

    pub fn land(&self) -> Result<Reply, ControlError> {
        self.step(Direction::Down)
    }

    pub fn hover(&self) -> Reply {
        Reply::line("Hovering at current position")
    }
}

impl Controller for PoseController {
    fn name(&self) -> &str {
        "Drone Controller"
    }

    fn commands(&self) -> &'static [CommandInfo] {
        POSE_COMMANDS
    }

    fn execute(&mut self, command: &Command) -> Result<Reply, ControlError> {
        match command {
            Command::Takeoff => self.takeoff(),
            Command::Land => self.land(),
            Command::Hover => Ok(self.hover()),
            other => match Direction::from_command(other) {
                Some(direction) => self.step(direction),
                None => Ok(unknown_command(other)),
            },
        }
    }
}
