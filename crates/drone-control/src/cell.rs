//! 共享位姿单元
//!
//! 命令循环与遥测回调线程共享同一个工作位姿。每次读写都是整条
//! [`Pose`] 记录（ArcSwap，无锁），后写者覆盖先写者。

use arc_swap::ArcSwap;
use drone_protocol::Pose;
use std::sync::Arc;

/// 工作位姿单元（可跨线程克隆）
#[derive(Clone)]
pub struct PoseCell {
    inner: Arc<ArcSwap<Pose>>,
}

impl PoseCell {
    pub fn new(pose: Pose) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(pose)),
        }
    }

    /// 读取当前位姿（Wait-Free）
    pub fn load(&self) -> Pose {
        **self.inner.load()
    }

    /// 整体替换位姿
    pub fn store(&self, pose: Pose) {
        self.inner.store(Arc::new(pose));
    }
}

impl std::fmt::Debug for PoseCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PoseCell").field(&self.load()).finish()
    }
}
