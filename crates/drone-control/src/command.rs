//! 命令解析
//!
//! 输入行先转小写、去掉首尾空白，再与固定的字面量做精确匹配。
//! 任何不匹配的文本（包括空行）都解析为 [`Command::Unknown`]。

use std::fmt;

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Takeoff,
    Land,
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Hover,
    Status,
    Help,
    /// `quit` 或 `exit`
    Quit,
    /// 未识别的输入（已归一化）
    Unknown(String),
}

impl Command {
    /// 解析一行输入
    pub fn parse(line: &str) -> Self {
        let normalized = line.trim().to_lowercase();
        match normalized.as_str() {
            "takeoff" => Command::Takeoff,
            "land" => Command::Land,
            "forward" => Command::Forward,
            "backward" => Command::Backward,
            "left" => Command::Left,
            "right" => Command::Right,
            "up" => Command::Up,
            "down" => Command::Down,
            "hover" => Command::Hover,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(normalized),
        }
    }

    /// 命令的字面量（`Unknown` 返回原文本）
    pub fn literal(&self) -> &str {
        match self {
            Command::Takeoff => "takeoff",
            Command::Land => "land",
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::Left => "left",
            Command::Right => "right",
            Command::Up => "up",
            Command::Down => "down",
            Command::Hover => "hover",
            Command::Status => "status",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::Unknown(text) => text,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// 控制器支持的命令及其说明（用于启动横幅和 help）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub literal: &'static str,
    pub description: &'static str,
}

impl CommandInfo {
    pub const fn new(literal: &'static str, description: &'static str) -> Self {
        Self {
            literal,
            description,
        }
    }

    /// 该条目是否描述了给定命令
    pub fn describes(&self, command: &Command) -> bool {
        !matches!(command, Command::Unknown(_)) && command.literal() == self.literal
    }
}
