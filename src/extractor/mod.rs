// src/extractor/mod.rs

pub mod course;
pub mod homework;
pub mod labels;
pub mod params;
pub mod patterns;

use crate::{CrawlContext, error::*};
use async_trait::async_trait;

/// 一次发现阶段的结果：用于命名的课程/题目标签，以及待下载的图片地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub subject: String,
    pub topic: String,
    pub images: Vec<String>,
}

/// 从一个页面链接出发，定位出所有候选图片。
/// 找不到图片时返回 `AppError::NotFound`，不会返回空的 `Discovery`。
#[async_trait]
pub trait ImageExtractor: Send + Sync {
    async fn discover(&self, url: &str, context: &CrawlContext) -> AppResult<Discovery>;
}
