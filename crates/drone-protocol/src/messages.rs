//! 消息类型定义
//!
//! 所有消息都是纯数据（`Copy`），可以在回调线程与主循环之间自由传递。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::topics::{POSE_TYPE, TWIST_TYPE};

/// 可在总线上传输的消息
///
/// `TYPE_NAME` 写入 [`Envelope`](crate::Envelope) 的 `type_name` 字段，
/// 接收端据此拒绝类型不符的负载。
pub trait Message: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
}

/// 三维向量（米 或 米/秒）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// 姿态（欧拉角）
///
/// 只随位姿一起搬运，不参与任何计算。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.roll, self.pitch, self.yaw)
    }
}

/// 位姿：位置 + 姿态
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Pose {
    /// 指定位置、零姿态
    pub const fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: Orientation {
                roll: 0.0,
                pitch: 0.0,
                yaw: 0.0,
            },
        }
    }
}

impl Message for Pose {
    const TYPE_NAME: &'static str = POSE_TYPE;
}

/// 速度指令：线速度 + 角速度
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Message for Twist {
    const TYPE_NAME: &'static str = TWIST_TYPE;
}
