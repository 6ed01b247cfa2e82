// src/extractor/homework.rs

use super::{
    Discovery, ImageExtractor,
    labels::{self, LabelRule},
    patterns,
};
use crate::{CrawlContext, constants, error::*};
use async_trait::async_trait;

const SUBJECT_RULES: &[LabelRule] = &[labels::course_name];
const TOPIC_RULES: &[LabelRule] = &[labels::mark_title, labels::knowledge_name];

/// 作业页面：直接抓取页面，在学生作答区域中查找图片
#[derive(Debug, Default, Clone, Copy)]
pub struct HomeworkExtractor;

impl HomeworkExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageExtractor for HomeworkExtractor {
    async fn discover(&self, url: &str, context: &CrawlContext) -> AppResult<Discovery> {
        let sink = &context.sink;

        sink.info("正在获取作业页面...");
        let html = context.http_client.fetch_text(url).await?;
        sink.info(&format!("页面响应长度: {}", html.len()));

        let subject = labels::resolve(&html, SUBJECT_RULES, constants::labels::COURSE_FALLBACK);
        let topic = labels::resolve(&html, TOPIC_RULES, constants::labels::HOMEWORK_FALLBACK);
        sink.info(&format!("课程名称: {}", subject));
        sink.info(&format!("题目名称: {}", topic));

        sink.info("正在查找作业图片...");
        let sections = patterns::answer_sections(&html);
        sink.info(&format!("找到 {} 个作答区域", sections.len()));

        let images = patterns::extract_images_from_sections(&sections);
        if images.is_empty() {
            return Err(AppError::NotFound {
                what: "未在作答区域中找到图片".to_string(),
                hint: constants::hints::HOMEWORK_NO_IMAGES,
            });
        }

        Ok(Discovery {
            subject,
            topic,
            images,
        })
    }
}
