// src/extractor/course.rs

use super::{
    Discovery, ImageExtractor,
    labels::{self, LabelRule},
    params::{CourseLocator, fill_template},
    patterns,
};
use crate::{CrawlContext, constants, error::*, utils};
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static OBJECT_ID_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""objectid"\s*:\s*"([^"]+)""#).unwrap());
static OBJECT_ID_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"objectid=([^\s"'>&]+)"#).unwrap());

const SUBJECT_RULES: &[LabelRule] = &[labels::course_name];
const TOPIC_RULES: &[LabelRule] = &[labels::knowledge_name];

/// 在卡片接口响应中查找文档的 objectid，先找 JSON 字段，再找 `objectid=` 形式
pub fn find_object_id(cards: &str) -> Option<String> {
    [&*OBJECT_ID_JSON_RE, &*OBJECT_ID_BARE_RE]
        .into_iter()
        .find_map(|re| re.captures(cards).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().to_string())
}

/// 课程章节：卡片接口 → objectid → 文档预览页 → 图片地址
#[derive(Debug, Default, Clone, Copy)]
pub struct CourseExtractor;

impl CourseExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageExtractor for CourseExtractor {
    async fn discover(&self, url: &str, context: &CrawlContext) -> AppResult<Discovery> {
        let sink = &context.sink;
        let endpoints = &context.config.endpoints;

        sink.info("正在从URL提取参数...");
        let locator = CourseLocator::from_url(url, &context.config.locator_defaults)?;
        sink.info(&format!(
            "课程ID: {}, 章节ID: {}, 班级ID: {}",
            locator.course_id, locator.chapter_id, locator.clazz_id
        ));

        let cards_url = fill_template(&endpoints.cards, &locator.template_params());
        sink.info(&format!(
            "正在请求卡片API: {}",
            utils::truncate_text(&cards_url, constants::URL_PREVIEW_LENGTH)
        ));
        let cards = context.http_client.fetch_text(&cards_url).await?;
        sink.info(&format!("卡片API响应长度: {}", cards.len()));

        let subject = labels::resolve(&cards, SUBJECT_RULES, constants::labels::COURSE_FALLBACK);
        let topic = labels::resolve(&cards, TOPIC_RULES, constants::labels::CHAPTER_FALLBACK);
        sink.info(&format!("课程名称: {}", subject));
        sink.info(&format!("章节名称: {}", topic));

        sink.info("正在查找文档信息...");
        let object_id = find_object_id(&cards).ok_or(AppError::NotFound {
            what: "未找到objectid，该章节可能不包含文档".to_string(),
            hint: constants::hints::COURSE_NO_IMAGES,
        })?;
        sink.info(&format!("找到objectid: {}", object_id));

        let preview_url = fill_template(
            &endpoints.preview,
            &[
                ("objectid", object_id.as_str()),
                ("puid", endpoints.preview_puid.as_str()),
                ("ext", endpoints.preview_ext.as_str()),
            ],
        );
        sink.info(&format!(
            "正在请求预览页面: {}",
            utils::truncate_text(&preview_url, constants::URL_PREVIEW_LENGTH)
        ));
        let preview = context.http_client.fetch_text(&preview_url).await?;
        sink.info(&format!("预览页面响应长度: {}", preview.len()));

        let images = patterns::extract_course_images(&preview);
        debug!("课程 '{}' 章节 '{}' 共提取到图片: {:?}", subject, topic, images);
        if images.is_empty() {
            return Err(AppError::NotFound {
                what: "未在文档预览页中找到图片".to_string(),
                hint: constants::hints::COURSE_NO_IMAGES,
            });
        }

        Ok(Discovery {
            subject,
            topic,
            images,
        })
    }
}
