// src/cli.rs

use crate::{config::ConflictPolicy, constants};
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

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

/// 爬取模式
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CrawlMode {
    /// 课程章节中的文档预览图片 (链接需包含 chapterId)
    #[default]
    Course,
    /// 作业答案区域中的图片
    Homework,
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
    clap::ArgGroup::new("action")
        .required(true)
        .args(&["url", "cookie_help", "save_cookie"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 要爬取的课程章节或作业页面链接
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// 显示如何获取 Cookie 的指南并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub cookie_help: bool,
    /// 将 --cookie 提供的 Cookie 保存到本地配置文件
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode", requires = "cookie")]
    pub save_cookie: bool,

    // --- 爬取选项 (Options) ---
    /// 爬取模式
    #[arg(short, long, value_enum, default_value_t = CrawlMode::Course, help_heading = "Options")]
    pub mode: CrawlMode,
    /// 登录后的 Cookie 字符串 (形如 'UID=...; _uid=...')，优先级最高
    #[arg(long, help_heading = "Options")]
    pub cookie: Option<String>,
    /// 开始爬取前先检查 Cookie 是否有效
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub check_session: bool,
    /// 设置图片保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,
    /// 目标文件已存在时的处理方式
    #[arg(long, value_enum, help_heading = "Options")]
    pub on_conflict: Option<ConflictPolicy>,
    /// 两次图片下载之间的间隔 (毫秒)
    #[arg(long, value_name = "MS", help_heading = "Options")]
    pub delay_ms: Option<u64>,
    /// 所有网络请求的超时时间 (秒)
    #[arg(long, value_name = "SECS", help_heading = "Options")]
    pub timeout: Option<u64>,

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
