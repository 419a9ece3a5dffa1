//! REPL 模式（交互式 Shell）
//!
//! 专用输入线程 + 有界通道：
//! - 交互终端：rustyline（保留历史记录，Ctrl+C 作为 Interrupt 事件）
//! - 管道输入：逐行读取 stdin，不打印提示符
//!
//! 主循环在 tokio 中 `select!` 输入事件和 Ctrl+C 信号；
//! 命令执行中的错误（包括 panic）只打印，不会终止循环。

use anyhow::Result;
use drone_control::{Command, Controller, EXIT_MESSAGE};
use std::io::{self, BufRead, IsTerminal, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender, channel};

use crate::config::CliConfig;

const PROMPT: &str = "> ";

/// REPL 运行参数
#[derive(Debug, Clone, Default)]
pub struct ReplOptions {
    /// 每条命令后的停顿
    pub command_delay: Duration,
    /// 历史记录文件（仅交互终端）
    pub history_file: Option<PathBuf>,
}

impl ReplOptions {
    pub fn from_config(config: &CliConfig) -> Self {
        Self {
            command_delay: config.command_delay(),
            history_file: config.repl.history_file.clone(),
        }
    }
}

/// 输入事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// Ctrl+C（行编辑器捕获）
    Interrupt,
    /// Ctrl+D / 输入结束
    Eof,
}

/// 命令处理后的流程控制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// REPL 会话：持有控制器，处理单行输入
pub struct ReplSession<C> {
    controller: C,
}

impl<C: Controller> ReplSession<C> {
    pub fn new(controller: C) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// 打印启动横幅
    pub fn print_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.controller.banner())?;
        writeln!(out)?;
        writeln!(out, "{} is running...", self.controller.name())?;
        writeln!(out, "Type commands (or 'help' for commands list):")?;
        out.flush()
    }

    /// 处理一行输入
    pub fn step<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = Command::parse(line);
        if command == Command::Quit {
            writeln!(out, "{}", EXIT_MESSAGE)?;
            out.flush()?;
            return Ok(Flow::Exit);
        }

        // ⭐ 错误隔离：防止 panic 导致 REPL 崩溃
        let controller = &mut self.controller;
        match panic::catch_unwind(AssertUnwindSafe(|| controller.handle(&command))) {
            Ok(Ok(reply)) => {
                if !reply.is_empty() {
                    writeln!(out, "{}", reply)?;
                }
            },
            Ok(Err(err)) => {
                tracing::warn!("command '{}' failed: {}", command, err);
                writeln!(out, "Error: {}", err)?;
            },
            Err(_) => {
                tracing::error!("command '{}' panicked", command);
                writeln!(out, "Error: command panicked")?;
            },
        }
        out.flush()?;
        Ok(Flow::Continue)
    }
}

/// REPL 输入（专用输入线程）
pub struct ReplInput {
    events: tokio::sync::Mutex<Receiver<InputEvent>>,
    _input_thread: Option<thread::JoinHandle<()>>,
}

impl ReplInput {
    /// 创建专用输入线程
    pub fn spawn(history_file: Option<PathBuf>) -> Self {
        let (tx, rx) = channel::<InputEvent>(10);

        let handle = if io::stdin().is_terminal() {
            thread::spawn(move || {
                if let Err(e) = editor_loop(&tx, history_file) {
                    eprintln!("Error: {}", e);
                    let _ = tx.blocking_send(InputEvent::Eof);
                }
            })
        } else {
            thread::spawn(move || piped_loop(&tx))
        };

        Self {
            events: tokio::sync::Mutex::new(rx),
            _input_thread: Some(handle),
        }
    }

    /// 由现成的通道构造（无输入线程）
    #[cfg(test)]
    pub fn from_receiver(events: Receiver<InputEvent>) -> Self {
        Self {
            events: tokio::sync::Mutex::new(events),
            _input_thread: None,
        }
    }

    /// 等待下一个输入事件（通道关闭时返回 None）
    ///
    /// 可安全取消：`select!` 中被 Ctrl+C 抢先时不会丢失或阻塞输入线程。
    pub async fn recv(&self) -> Option<InputEvent> {
        self.events.lock().await.recv().await
    }
}

/// 交互终端：rustyline 行编辑
fn editor_loop(tx: &Sender<InputEvent>, history_file: Option<PathBuf>) -> Result<()> {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    let mut rl = DefaultEditor::new()
        .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {}", e))?;

    if let Some(ref path) = history_file {
        rl.load_history(path).ok(); // 忽略错误（首次运行）
    }

    let save_history = |rl: &mut DefaultEditor| {
        if let Some(ref path) = history_file
            && let Err(e) = rl.save_history(path)
        {
            tracing::warn!("Failed to save history to {}: {}", path.display(), e);
        }
    };

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }

                let quit = Command::parse(trimmed) == Command::Quit;
                if quit {
                    save_history(&mut rl);
                }

                if tx.blocking_send(InputEvent::Line(line)).is_err() || quit {
                    break; // 主线程已关闭 / 用户退出
                }
            },

            Err(ReadlineError::Interrupted) => {
                save_history(&mut rl);
                let _ = tx.blocking_send(InputEvent::Interrupt);
                break;
            },

            Err(ReadlineError::Eof) => {
                save_history(&mut rl);
                let _ = tx.blocking_send(InputEvent::Eof);
                break;
            },

            Err(err) => {
                eprintln!("Error: {:?}", err);
                let _ = tx.blocking_send(InputEvent::Eof);
                break;
            },
        }
    }

    Ok(())
}

/// 管道输入：逐行读取
fn piped_loop(tx: &Sender<InputEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(InputEvent::Line(line)).is_err() {
                    return;
                }
            },
            Err(e) => {
                tracing::warn!("stdin read error: {}", e);
                break;
            },
        }
    }
    let _ = tx.blocking_send(InputEvent::Eof);
}

/// 运行 REPL 模式
pub async fn run_repl<C: Controller>(controller: C, options: ReplOptions) -> Result<()> {
    let input = ReplInput::spawn(options.history_file.clone());
    let mut out = io::stdout();
    run_session(controller, &input, &mut out, options.command_delay).await
}

/// REPL 主循环
///
/// 退出条件：`quit`/`exit`、Ctrl+C、输入结束。所有退出路径都返回 `Ok(())`。
pub async fn run_session<C, W>(
    controller: C,
    input: &ReplInput,
    out: &mut W,
    command_delay: Duration,
) -> Result<()>
where
    C: Controller,
    W: Write,
{
    let mut session = ReplSession::new(controller);
    session.print_banner(out)?;
    tracing::info!("{} started", session.controller().name());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            // ⭐ 优先级1：用户输入
            event = input.recv() => match event {
                Some(InputEvent::Line(line)) => {
                    if session.step(&line, out)? == Flow::Exit {
                        break;
                    }
                    if !command_delay.is_zero() {
                        tokio::time::sleep(command_delay).await;
                    }
                },
                Some(InputEvent::Interrupt) => {
                    writeln!(out, "\n{}", EXIT_MESSAGE)?;
                    break;
                },
                Some(InputEvent::Eof) | None => break,
            },

            // ⭐ 优先级2：Ctrl+C（非行编辑模式下由信号触发）
            _ = &mut ctrl_c => {
                writeln!(out, "\n{}", EXIT_MESSAGE)?;
                break;
            }
        }
    }

    out.flush()?;
    tracing::info!("{} stopped", session.controller().name());
    Ok(())
}
