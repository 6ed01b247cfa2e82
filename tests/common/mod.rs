// tests/common/mod.rs

#![allow(dead_code)]

use cx_img_dl::{
    CrawlContext,
    config::AppConfig,
    session::SessionContext,
    sink::{ChannelSink, LogLine},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub const TEST_COOKIE: &str = "_uid=305455632; UID=305455632; fid=1895";
/// `SessionContext` 按键名排序后序列化的结果
pub const EXPECTED_COOKIE_HEADER: &str = "UID=305455632; _uid=305455632; fid=1895";

/// 把所有平台接口指向模拟服务器，并关闭下载间隔
pub fn test_config(server_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.download_delay = Duration::ZERO;
    config.timeout = Duration::from_secs(5);
    config.endpoints.base_url = format!("{}/", server_url);
    config.endpoints.cards = format!(
        "{}/mooc-ans/knowledge/cards?clazzid={{clazzid}}&courseid={{courseid}}&knowledgeid={{chapterid}}&num=0&cpi={{cpi}}",
        server_url
    );
    config.endpoints.preview = format!(
        "{}/preview/objectshowpreview.html?objectid={{objectid}}&puid={{puid}}&ext={{ext}}",
        server_url
    );
    config.endpoints.probe = format!("{}/mooc-ans/mycourse/studentstudy", server_url);
    config
}

pub fn test_context(config: AppConfig) -> (CrawlContext, UnboundedReceiver<LogLine>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = SessionContext::parse(TEST_COOKIE);
    let context = CrawlContext::new(Arc::new(config), &session, Arc::new(ChannelSink::new(tx)))
        .expect("构造测试上下文失败");
    (context, rx)
}

/// 取出目前为止收到的全部日志行
pub fn drain(rx: &mut UnboundedReceiver<LogLine>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line.message);
    }
    lines
}

pub fn contains_line(lines: &[String], needle: &str) -> bool {
    lines.iter().any(|l| l.contains(needle))
}
