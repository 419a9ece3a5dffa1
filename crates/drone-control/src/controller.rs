//! Controller trait - 控制器通用接口
//!
//! 每个控制器声明自己支持的命令（[`Controller::commands`]），并实现
//! [`Controller::execute`]。`help`、`quit` 以及不支持/未识别的命令
//! 由 [`Controller::handle`] 统一处理，因此"该变体没有这条命令"与
//! "输入了乱码"的表现完全一致。

use std::fmt;

use crate::command::{Command, CommandInfo};
use crate::error::ControlError;

/// 退出提示
pub const EXIT_MESSAGE: &str = "Exiting drone controller...";

/// 一条命令的回复（若干行文本）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    lines: Vec<String>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 是否有任意一行包含 `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// 未识别命令的标准回复
pub fn unknown_command(command: &Command) -> Reply {
    let mut reply = Reply::line(format!("Unknown command: {}", command.literal()));
    reply.push("Type 'help' for available commands");
    reply
}

/// 控制器通用接口
pub trait Controller {
    /// 控制器名称（横幅与日志）
    fn name(&self) -> &str;

    /// 该变体接受的命令（按 help 中的顺序，包含 `quit`）
    fn commands(&self) -> &'static [CommandInfo];

    /// 执行一条受支持的命令
    ///
    /// 只会收到 [`Controller::commands`] 中列出的、且不是 `help`/`quit` 的命令。
    fn execute(&mut self, command: &Command) -> Result<Reply, ControlError>;

    /// 是否支持该命令
    fn supports(&self, command: &Command) -> bool {
        self.commands().iter().any(|info| info.describes(command))
    }

    /// `help` 输出的单行命令列表
    fn help_line(&self) -> String {
        let literals: Vec<&str> = self.commands().iter().map(|info| info.literal).collect();
        format!("Commands: {}", literals.join(", "))
    }

    /// 启动横幅
    fn banner(&self) -> Reply {
        let mut reply = Reply::line(format!("{} initialized!", self.name()));
        reply.push("Commands:");
        for info in self.commands() {
            reply.push(format!("  '{}' - {}", info.literal, info.description));
        }
        reply
    }

    /// 处理任意命令
    fn handle(&mut self, command: &Command) -> Result<Reply, ControlError> {
        match command {
            Command::Help => Ok(Reply::line(self.help_line())),
            Command::Quit => Ok(Reply::line(EXIT_MESSAGE)),
            supported if self.supports(supported) => self.execute(supported),
            other => Ok(unknown_command(other)),
        }
    }
}
