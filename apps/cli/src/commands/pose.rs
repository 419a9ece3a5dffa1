//! 位姿控制器命令

use anyhow::Result;
use clap::Args;
use drone_control::PoseController;
use drone_protocol::{POSE_TOPIC, SET_POSE_TOPIC};

use super::{MotionArgs, TransportArgs};
use crate::config::CliConfig;
use crate::modes::repl::{ReplOptions, run_repl};
use crate::transport::open_node;

#[derive(Args, Debug)]
pub struct PoseCommand {
    #[command(flatten)]
    pub motion: MotionArgs,

    #[command(flatten)]
    pub transport: TransportArgs,

    /// 目标位姿话题
    #[arg(long, default_value = SET_POSE_TOPIC)]
    pub set_pose_topic: String,

    /// 位姿遥测话题
    #[arg(long, default_value = POSE_TOPIC)]
    pub pose_topic: String,
}

impl PoseCommand {
    pub async fn execute(self, mut config: CliConfig) -> Result<()> {
        self.motion.apply(&mut config);
        self.transport.apply(&mut config);
        config.validate()?;

        let node = open_node(&config.transport)?;
        let controller = PoseController::with_topics(
            &node,
            config.motion_config(),
            &self.set_pose_topic,
            &self.pose_topic,
        )?;

        run_repl(controller, ReplOptions::from_config(&config)).await
    }
}
