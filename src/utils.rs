// src/utils.rs

use crate::constants;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// 把文件名中的 `<>:"/\|?*` 替换为 `_`，并限制字节长度 (保留扩展名)
pub fn sanitize_filename(name: &str) -> String {
    let name = ILLEGAL_CHARS_RE.replace_all(name, "_").into_owned();
    if name.len() <= constants::MAX_FILENAME_BYTES {
        return name;
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= 16 => {
            let ext = &name[dot..];
            let max_stem_bytes = constants::MAX_FILENAME_BYTES.saturating_sub(ext.len());
            format!("{}{}", safe_truncate_utf8(&name[..dot], max_stem_bytes), ext)
        }
        _ => safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string(),
    }
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

/// 取 URL 路径最后一段的扩展名 (含 `.`)，查询串和锚点不参与判断；没有扩展名时返回 `.png`
pub fn derive_extension(resource_url: &str) -> String {
    let path = match Url::parse(resource_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => resource_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < last_segment.len() => last_segment[dot..].to_string(),
        _ => constants::DEFAULT_EXTENSION.to_string(),
    }
}

/// 生成 `{课程}-{题目}-{序号}{扩展名}` 形式的文件名
pub fn image_filename(subject: &str, topic: &str, index: usize, resource_url: &str) -> String {
    sanitize_filename(&format!(
        "{}-{}-{}{}",
        subject,
        topic,
        index,
        derive_extension(resource_url)
    ))
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
