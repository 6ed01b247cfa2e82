// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod models;
pub mod session;
pub mod sink;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::{Cli, CrawlMode},
    client::{RobustClient, SessionStatus},
    config::AppConfig,
    downloader::ImageCrawler,
    error::{AppError, AppResult},
    session::SessionContext,
    sink::{ConsoleSink, LogSink},
};
use colored::*;
use log::{debug, info, warn};
use std::sync::Arc;

/// 一次爬取运行所需的共享状态。会话 Cookie 固化在 `http_client` 中，运行期间只读。
#[derive(Clone)]
pub struct CrawlContext {
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub sink: Arc<dyn LogSink>,
}

impl CrawlContext {
    pub fn new(
        config: Arc<AppConfig>,
        session: &SessionContext,
        sink: Arc<dyn LogSink>,
    ) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(config.clone(), session)?);
        Ok(Self {
            config,
            http_client,
            sink,
        })
    }
}

/// 库的公共入口点，由 `main.rs` 调用。返回本次运行是否成功。
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<bool> {
    debug!("CLI 参数: {:?}", args);
    if args.cookie_help {
        ui::box_message(
            "获取 Cookie 指南",
            constants::HELP_COOKIE_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        println!(
            "\n{} 安全提醒: Cookie 等同于登录凭据，请妥善保管，不要分享给他人。",
            *symbols::INFO
        );
        return Ok(true);
    }

    if args.save_cookie {
        // clap 保证 --save-cookie 与 --cookie 同时出现
        let cookie = args.cookie.as_deref().unwrap_or_default();
        cookie.parse::<SessionContext>()?;
        let path = config::cookie::save_cookie(cookie)?;
        println!("{} Cookie 已成功保存至: {}", *symbols::OK, path.display());
        if args.url.is_none() {
            return Ok(true);
        }
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let (cookie_opt, source) = config::cookie::resolve_cookie(args.cookie.as_deref());
    let Some(cookie) = cookie_opt else {
        info!("未找到 Cookie");
        return Err(AppError::CookieMissing);
    };
    info!("从 {} 加载 Cookie", source);
    println!("{} 已从 {} 加载 Cookie。", *symbols::INFO, source);
    let session: SessionContext = cookie.parse()?;

    let context = CrawlContext::new(config, &session, Arc::new(ConsoleSink))?;

    if args.check_session {
        println!("{} 正在验证 Cookie 有效性...", *symbols::INFO);
        match context.http_client.probe_session().await? {
            SessionStatus::Valid => println!("{} Cookie 验证通过", *symbols::OK),
            SessionStatus::Invalid => return Err(AppError::SessionInvalid),
            SessionStatus::Unknown(code) => {
                warn!("会话探测返回无法识别的状态码 {}，继续执行", code);
                println!("{} 无法确认 Cookie 状态 (状态码: {})，继续尝试爬取。", *symbols::WARN, code);
            }
        }
    }

    // clap 的参数组保证此时一定提供了 --url
    let Some(url) = args.url.as_deref() else {
        return Ok(true);
    };

    let mode_text = match args.mode {
        CrawlMode::Course => "课程图片",
        CrawlMode::Homework => "作业图片",
    };
    ui::print_header(&format!("开始爬取任务 - {}", mode_text));

    let success = ImageCrawler::new(context).run(args.mode, url, &args.output).await;
    if success {
        println!("\n{} {}", *symbols::OK, "爬取任务完成！".green());
    } else {
        eprintln!("\n{} {}", *symbols::ERROR, "爬取任务失败".red());
    }
    Ok(success)
}
