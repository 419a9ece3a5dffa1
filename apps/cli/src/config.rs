//! CLI 配置
//!
//! TOML 文件，默认位于 `<config_dir>/drone/config.toml`。文件不存在时使用默认值；
//! 缺失的字段也回落到默认值。命令行参数优先于文件。

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use drone_control::{MotionConfig, Rate, StreamConfig};
use drone_protocol::{Twist, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 可通过 `config get/set` 访问的键
pub const KEYS: &[&str] = &[
    "motion.step",
    "motion.min_altitude",
    "motion.initial_altitude",
    "motion.command_delay_ms",
    "transport.kind",
    "transport.bind",
    "transport.peer",
    "transport.queue_size",
    "stream.rate_hz",
    "stream.linear_x",
    "stream.angular_z",
    "repl.history_file",
];

/// 传输后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// UDP 数据报（JSON 封装）
    #[default]
    Udp,
    /// 进程内总线（离线演示）
    Memory,
}

impl TransportKind {
    fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Udp => "udp",
            TransportKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSection {
    pub step: f64,
    pub min_altitude: f64,
    pub initial_altitude: f64,
    /// 每条命令后的停顿（毫秒）
    pub command_delay_ms: u64,
}

impl Default for MotionSection {
    fn default() -> Self {
        let motion = MotionConfig::default();
        Self {
            step: motion.step,
            min_altitude: motion.min_altitude,
            initial_altitude: motion.initial_altitude,
            command_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    pub kind: TransportKind,
    pub bind: String,
    pub peer: String,
    /// 进程内总线的队列容量
    pub queue_size: usize,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            kind: TransportKind::Udp,
            bind: "0.0.0.0:0".to_string(),
            peer: "127.0.0.1:11345".to_string(),
            queue_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSection {
    pub rate_hz: f64,
    pub linear_x: f64,
    pub angular_z: f64,
}

impl Default for StreamSection {
    fn default() -> Self {
        let stream = StreamConfig::default();
        Self {
            rate_hz: stream.rate_hz,
            linear_x: stream.twist.linear.x,
            angular_z: stream.twist.angular.z,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplSection {
    /// 行编辑历史文件（仅交互终端）
    pub history_file: Option<PathBuf>,
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub motion: MotionSection,
    pub transport: TransportSection,
    pub stream: StreamSection,
    pub repl: ReplSection,
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
        path.push("drone");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载并校验配置（文件不存在时返回默认值）
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::load_unchecked(path)?;
        config
            .validate()
            .with_context(|| format!("配置文件无效: {}", path.display()))?;
        Ok(config)
    }

    /// 加载配置但不校验取值
    ///
    /// 供 `config set` 修复已经无效的文件；`set` 会校验修改后的结果。
    pub fn load_unchecked(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置（自动创建目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let body = toml::to_string_pretty(self).context("序列化配置失败")?;
        let content = format!("# Drone CLI Configuration\n\n{}", body);
        fs::write(path, content).context("写入配置文件失败")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.motion_config().validate()?;
        if !(self.stream.rate_hz.is_finite() && self.stream.rate_hz > 0.0) {
            bail!("stream.rate_hz must be > 0, got {}", self.stream.rate_hz);
        }
        Rate::new(self.stream.rate_hz)?;
        if self.transport.queue_size == 0 {
            bail!("transport.queue_size must be > 0");
        }
        Ok(())
    }

    pub fn motion_config(&self) -> MotionConfig {
        MotionConfig {
            step: self.motion.step,
            min_altitude: self.motion.min_altitude,
            initial_altitude: self.motion.initial_altitude,
        }
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.motion.command_delay_ms)
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            rate_hz: self.stream.rate_hz,
            twist: Twist {
                linear: Vector3::new(self.stream.linear_x, 0.0, 0.0),
                angular: Vector3::new(0.0, 0.0, self.stream.angular_z),
            },
            max_iterations: None,
        }
    }

    /// 读取单个键（未知键返回 None）
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "motion.step" => self.motion.step.to_string(),
            "motion.min_altitude" => self.motion.min_altitude.to_string(),
            "motion.initial_altitude" => self.motion.initial_altitude.to_string(),
            "motion.command_delay_ms" => self.motion.command_delay_ms.to_string(),
            "transport.kind" => self.transport.kind.as_str().to_string(),
            "transport.bind" => self.transport.bind.clone(),
            "transport.peer" => self.transport.peer.clone(),
            "transport.queue_size" => self.transport.queue_size.to_string(),
            "stream.rate_hz" => self.stream.rate_hz.to_string(),
            "stream.linear_x" => self.stream.linear_x.to_string(),
            "stream.angular_z" => self.stream.angular_z.to_string(),
            "repl.history_file" => match &self.repl.history_file {
                Some(path) => path.display().to_string(),
                None => "(未设置)".to_string(),
            },
            _ => return None,
        };
        Some(value)
    }

    /// 设置单个键（解析失败或未知键返回错误，配置保持不变）
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match key {
            "motion.step" => next.motion.step = parse(key, value)?,
            "motion.min_altitude" => next.motion.min_altitude = parse(key, value)?,
            "motion.initial_altitude" => next.motion.initial_altitude = parse(key, value)?,
            "motion.command_delay_ms" => next.motion.command_delay_ms = parse(key, value)?,
            "transport.kind" => {
                next.transport.kind = TransportKind::from_str(value, true)
                    .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", key, e))?
            },
            "transport.bind" => next.transport.bind = value.to_string(),
            "transport.peer" => next.transport.peer = value.to_string(),
            "transport.queue_size" => next.transport.queue_size = parse(key, value)?,
            "stream.rate_hz" => next.stream.rate_hz = parse(key, value)?,
            "stream.linear_x" => next.stream.linear_x = parse(key, value)?,
            "stream.angular_z" => next.stream.angular_z = parse(key, value)?,
            "repl.history_file" => {
                next.repl.history_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            },
            _ => bail!("未知配置项: {} (可用: {})", key, KEYS.join(", ")),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid value for {}: {} ({})", key, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_controller_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.motion_config(), MotionConfig::default());
        assert_eq!(config.stream_config(), StreamConfig::default());
        assert_eq!(config.command_delay(), Duration::from_millis(100));
        assert_eq!(config.transport.kind, TransportKind::Udp);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CliConfig::default();
        config.set("motion.step", "0.5").unwrap();
        config.set("transport.kind", "memory").unwrap();
        config.set("repl.history_file", "/tmp/drone_history").unwrap();
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.motion.step, 0.5);
        assert_eq!(loaded.transport.kind, TransportKind::Memory);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[motion]\nstep = 2.0\n").unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.motion.step, 2.0);
        assert_eq!(config.motion.min_altitude, 0.5);
        assert_eq!(config.stream, StreamSection::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[motion]\nstep = -1.0\n").unwrap();
        assert!(CliConfig::load(&path).is_err());

        fs::write(&path, "this is not toml = = =").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn test_invalid_file_can_be_repaired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[motion]\nstep = -1.0\n").unwrap();

        let mut config = CliConfig::load_unchecked(&path).unwrap();
        assert_eq!(config.motion.step, -1.0);
        assert!(config.set("motion.min_altitude", "0.2").is_err());

        config.set("motion.step", "0.5").unwrap();
        config.save(&path).unwrap();
        assert_eq!(CliConfig::load(&path).unwrap().motion.step, 0.5);
    }

    #[test]
    fn test_set_rejects_bad_values_without_mutation() {
        let mut config = CliConfig::default();
        assert!(config.set("motion.step", "abc").is_err());
        assert!(config.set("motion.step", "0").is_err());
        assert!(config.set("stream.rate_hz", "-1").is_err());
        assert!(config.set("stream.rate_hz", "1e-300").is_err());
        assert!(config.set("transport.kind", "carrier-pigeon").is_err());
        assert!(config.set("no.such.key", "1").is_err());
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_get_every_key() {
        let config = CliConfig::default();
        for key in KEYS {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
        assert_eq!(config.get("motion.step").as_deref(), Some("1"));
        assert_eq!(config.get("transport.kind").as_deref(), Some("udp"));
        assert_eq!(config.get("bogus"), None);
    }
}
