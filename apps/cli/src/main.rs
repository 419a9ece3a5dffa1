//! # Drone CLI
//!
//! Interactive command-line drone controllers.
//!
//! ## 三种控制器
//!
//! ### Local（无传输，带飞行守卫）
//!
//! ```bash
//! $ drone-cli local
//! > takeoff
//! > up
//! > status
//! > quit
//! ```
//!
//! ### Pose（发布目标位姿，订阅遥测）
//!
//! ```bash
//! drone-cli pose --peer 127.0.0.1:11345
//! ```
//!
//! ### Stream（固定频率发布速度指令，Ctrl+C 停止）
//!
//! ```bash
//! drone-cli stream --rate 10
//! ```
//!
//! ## 配置
//!
//! ```bash
//! drone-cli config set motion.step 0.5
//! drone-cli config check
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod modes;
mod transport;

use commands::{ConfigCommand, LocalCommand, PoseCommand, StreamCommand};
use config::CliConfig;

/// Drone CLI - 无人机命令行控制器
#[derive(Parser, Debug)]
#[command(name = "drone-cli")]
#[command(about = "Interactive command-line drone controllers", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/drone/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 本地控制器（仅内存记账）
    Local {
        #[command(flatten)]
        args: LocalCommand,
    },

    /// 位姿控制器（通过传输层驱动仿真器）
    Pose {
        #[command(flatten)]
        args: PoseCommand,
    },

    /// 速度指令流（/cmd_vel）
    Stream {
        #[command(flatten)]
        args: StreamCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（stderr，避免与 REPL 输出交错）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drone_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => CliConfig::default_path()?,
    };

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config_path).await,

        Commands::Local { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(config).await
        },

        Commands::Pose { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(config).await
        },

        Commands::Stream { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(config).await
        },
    }
}
