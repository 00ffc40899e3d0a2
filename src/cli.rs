// src/cli.rs

use crate::config::Strategy;
use clap::{Parser, ValueEnum, crate_version};

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["root", "locator", "interactive"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 列出目录根节点及其分类
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub root: bool,
    /// 解析指定定位符的节点 (如 'brmediathek://letter/A')
    #[arg(short, long, value_name = "LOCATOR", help_heading = "Mode")]
    pub locator: Option<String>,
    /// 启动交互式浏览，逐级展开目录
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,

    // --- 选项 (Options) ---
    /// 根节点使用的上游策略，覆盖配置文件中的 default_strategy
    #[arg(short, long, value_enum, help_heading = "Options")]
    pub strategy: Option<Strategy>,
    /// 以 JSON 格式输出节点
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub json: bool,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
