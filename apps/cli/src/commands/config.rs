//! 配置管理命令
//!
//! 用于读写 CLI 配置文件（步长、传输地址等）

use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

use crate::config::{CliConfig, KEYS};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 配置项名称（如 motion.step, transport.peer）
        key: String,

        /// 新值（repl.history_file 传空字符串表示清除）
        value: String,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub async fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set { key, value } => Self::set_(path, &key, &value),

            ConfigCommand::Get { key } => Self::get_(path, &key),

            ConfigCommand::Check => Self::check_(path),
        }
    }

    fn set_(path: &Path, key: &str, value: &str) -> Result<()> {
        // 不预先校验：允许修复已经无效的配置文件
        let mut config = CliConfig::load_unchecked(path)?;
        config.set(key, value)?;
        config.save(path)?;

        println!("✅ {} = {}", key, config.get(key).unwrap_or_default());
        Ok(())
    }

    fn get_(path: &Path, key: &str) -> Result<()> {
        let config = CliConfig::load(path)?;

        if key == "all" {
            print_all(&config);
            return Ok(());
        }

        match config.get(key) {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("未知配置项: {} (可用: {})", key, KEYS.join(", ")),
        }
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let exists = path.exists();
        let config = CliConfig::load(path)?;

        println!("配置文件: {}", path.display());
        if !exists {
            println!("  (文件不存在，使用默认值)");
        }
        print_all(&config);
        println!("✅ 配置有效");
        Ok(())
    }
}

fn print_all(config: &CliConfig) {
    println!("Drone CLI 配置:");
    for key in KEYS {
        println!("  {} = {}", key, config.get(key).unwrap_or_default());
    }
}
