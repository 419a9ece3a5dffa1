//! 话题名称与消息类型名常量

/// 目标位姿话题（控制器 → 仿真器）
pub const SET_POSE_TOPIC: &str = "/model/drone/set_pose";

/// 位姿遥测话题（仿真器 → 控制器）
pub const POSE_TOPIC: &str = "/model/drone/pose";

/// 速度指令话题（中间件变体）
pub const CMD_VEL_TOPIC: &str = "/cmd_vel";

/// `Pose` 的线上类型名
pub const POSE_TYPE: &str = "gz.msgs.Pose";

/// `Twist` 的线上类型名
pub const TWIST_TYPE: &str = "geometry_msgs/Twist";
