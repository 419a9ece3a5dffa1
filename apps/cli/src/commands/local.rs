//! 本地控制器命令

use anyhow::Result;
use clap::Args;
use drone_control::LocalController;

use super::MotionArgs;
use crate::config::CliConfig;
use crate::modes::repl::{ReplOptions, run_repl};

#[derive(Args, Debug)]
pub struct LocalCommand {
    #[command(flatten)]
    pub motion: MotionArgs,
}

impl LocalCommand {
    pub async fn execute(self, mut config: CliConfig) -> Result<()> {
        self.motion.apply(&mut config);
        config.validate()?;

        let controller = LocalController::new(config.motion_config())?;
        run_repl(controller, ReplOptions::from_config(&config)).await
    }
}
