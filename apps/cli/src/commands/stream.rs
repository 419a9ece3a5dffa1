//! 速度指令流命令
//!
//! 非交互：以固定频率发布，直到 Ctrl+C 或达到 `--count`。

use anyhow::{Context, Result};
use clap::Args;
use drone_control::VelocityStreamer;
use drone_protocol::CMD_VEL_TOPIC;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::TransportArgs;
use crate::config::CliConfig;
use crate::transport::open_node;

#[derive(Args, Debug)]
pub struct StreamCommand {
    #[command(flatten)]
    pub transport: TransportArgs,

    /// 发布频率（Hz）
    #[arg(long)]
    pub rate: Option<f64>,

    /// 发布次数后退出（默认直到 Ctrl+C）
    #[arg(long)]
    pub count: Option<usize>,

    /// 速度指令话题
    #[arg(long, default_value = CMD_VEL_TOPIC)]
    pub topic: String,
}

impl StreamCommand {
    pub async fn execute(self, mut config: CliConfig) -> Result<()> {
        self.transport.apply(&mut config);
        if let Some(rate) = self.rate {
            config.stream.rate_hz = rate;
        }
        config.validate()?;

        let mut stream_config = config.stream_config();
        stream_config.max_iterations = self.count;

        let node = open_node(&config.transport)?;
        let streamer = VelocityStreamer::with_topic(&node, stream_config, &self.topic)?;

        let running = Arc::new(AtomicBool::new(true));
        {
            let running = Arc::clone(&running);
            ctrlc::set_handler(move || {
                running.store(false, Ordering::Release);
            })
            .context("无法安装 Ctrl+C 处理器")?;
        }

        println!(
            "Streaming on {} at {} Hz (Ctrl+C to stop)...",
            self.topic, streamer.config().rate_hz
        );

        let published = tokio::task::spawn_blocking(move || streamer.run(&running)).await??;

        println!("Stream stopped after {} message(s)", published);
        Ok(())
    }
}
