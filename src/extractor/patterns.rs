// src/extractor/patterns.rs

//! 基于正则的图片地址提取。
//!
//! 课程模式先用一组宽松的规则匹配所有可能的图片地址，再用
//! [`passes_gate`] 只保留文档存储路径或 CDN 域名下的地址；
//! 两步需要一起调整，单独放宽任一步都会引入页面装饰图等噪声。

use crate::constants::image_gate;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static COURSE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"<img[^>]+src="([^"]+)""#,
        r#"<img[^>]+src='([^']+)'"#,
        r#""url":"([^"]+\.jpg[^"]*)""#,
        r#""url":"([^"]+\.png[^"]*)""#,
        r#""orig":"([^"]+)""#,
        r#"background-image:\s*url\(["']?([^)"']+)["']?\)"#,
        r#"https?://[^"'>\s]+ananas[^"'>\s]+"#,
        r#"https?://[^"'>\s]+/sv-w8/[^"'>\s]+"#,
        r#"https://s[0-9]\.ananas\.chaoxing\.com[^\s"'<>]+"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ANSWER_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<dd[^>]*\bclass="[^"]*\bstuAnswerContent\b[^"]*"[^>]*>(.*?)</dd>"#).unwrap()
});
static DATA_ORIGINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-original="([^"]+)""#).unwrap());
static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src="([^"]+)""#).unwrap());

/// 对规则的匹配结果取第 1 个捕获组；没有捕获组的规则取整个匹配
fn match_all<'a>(re: &'a Regex, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(text).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str())
    })
}

fn is_data_uri(candidate: &str) -> bool {
    candidate.starts_with("data:")
}

/// 只有文档存储路径或 CDN 域名下的地址才算作文档图片
pub fn passes_gate(candidate: &str) -> bool {
    !is_data_uri(candidate)
        && (candidate.contains(image_gate::DOC_STORAGE_SEGMENT)
            || candidate.contains(image_gate::CDN_HOST_FRAGMENT))
}

/// 课程模式：从文档预览页中提取图片地址，结果去重，按首次出现的规则顺序排列
pub fn extract_course_images(payload: &str) -> Vec<String> {
    let images: Vec<String> = COURSE_RULES
        .iter()
        .flat_map(|re| match_all(re, payload))
        .filter(|candidate| !candidate.is_empty() && passes_gate(candidate))
        .unique()
        .map(str::to_string)
        .collect();
    debug!("课程模式规则共提取到 {} 个候选图片", images.len());
    images
}

/// 找出页面中所有学生作答区域的内部 HTML
pub fn answer_sections(html: &str) -> Vec<&str> {
    ANSWER_SECTION_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// 作业模式：在单个作答区域内优先取 `data-original` (原图)，没有时才退回 `<img src>`
pub fn extract_section_images(section: &str) -> Vec<&str> {
    let originals: Vec<&str> = match_all(&DATA_ORIGINAL_RE, section)
        .filter(|c| !is_data_uri(c))
        .collect();
    if !originals.is_empty() {
        return originals;
    }
    match_all(&IMG_SRC_RE, section)
        .filter(|c| !is_data_uri(c))
        .collect()
}

/// 作业模式：对已定位的作答区域求图片并集并去重
pub fn extract_images_from_sections(sections: &[&str]) -> Vec<String> {
    sections
        .iter()
        .flat_map(|&section| extract_section_images(section))
        .unique()
        .map(str::to_string)
        .collect()
}

/// 作业模式：定位页面中的作答区域并提取其中的图片
pub fn extract_homework_images(html: &str) -> Vec<String> {
    let sections = answer_sections(html);
    debug!("找到 {} 个作答区域", sections.len());
    extract_images_from_sections(&sections)
}
