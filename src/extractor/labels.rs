// src/extractor/labels.rs

use regex::Regex;
use std::sync::LazyLock;

static COURSE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""coursename"\s*:\s*"([^"]+)""#).unwrap());
static KNOWLEDGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""knowledgename"\s*:\s*"([^"]+)""#).unwrap());
static MARK_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h2 class="mark_title"[^>]*>([^<]+)</h2>"#).unwrap());

/// 从页面中提取一个标签值，找不到时返回 `None`
pub type LabelRule = fn(&str) -> Option<String>;

fn first_capture(re: &Regex, payload: &str) -> Option<String> {
    re.captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn course_name(payload: &str) -> Option<String> {
    first_capture(&COURSE_NAME_RE, payload)
}

pub fn knowledge_name(payload: &str) -> Option<String> {
    first_capture(&KNOWLEDGE_NAME_RE, payload)
}

pub fn mark_title(payload: &str) -> Option<String> {
    first_capture(&MARK_TITLE_RE, payload)
}

/// 依次尝试每条规则，取第一个非空结果；全部落空时使用 `fallback`
pub fn resolve(payload: &str, rules: &[LabelRule], fallback: &str) -> String {
    rules
        .iter()
        .find_map(|rule| rule(payload))
        .unwrap_or_else(|| fallback.to_string())
}
