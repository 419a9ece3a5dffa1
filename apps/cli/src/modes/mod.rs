//! 运行模式
//!
//! 交互式控制器共用同一个 REPL 循环（见 [`repl`]）。

pub mod repl;
