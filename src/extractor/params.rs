// src/extractor/params.rs

use crate::{
    config::LocatorDefaults,
    error::{AppError, AppResult},
};
use log::debug;
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use std::sync::LazyLock;

static CHAPTER_ID_RE: LazyLock<Regex> = LazyLock::new(|| query_param_re("chapterId"));
static COURSE_ID_RE: LazyLock<Regex> = LazyLock::new(|| query_param_re("courseId"));
static CLAZZ_ID_RE: LazyLock<Regex> = LazyLock::new(|| query_param_re("clazzid"));
static CPI_RE: LazyLock<Regex> = LazyLock::new(|| query_param_re("cpi"));

/// 参数名大小写不敏感；值截止到下一个 `&`、`#` 或字符串末尾
fn query_param_re(name: &str) -> Regex {
    Regex::new(&format!(r"(?:^|[?&#])(?i:{})=([^&#]+)", regex::escape(name))).unwrap()
}

/// 从课程章节链接中解析出的定位参数，解析后在整个运行期间不再变化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLocator {
    pub chapter_id: String,
    pub course_id: String,
    pub clazz_id: String,
    pub cpi: String,
}

impl CourseLocator {
    /// `chapterId` 必须存在；其余三个参数缺失时使用配置中的默认值。
    /// 所有值都会先做百分号解码。
    pub fn from_url(url: &str, defaults: &LocatorDefaults) -> AppResult<Self> {
        let chapter_id =
            capture(&CHAPTER_ID_RE, url).ok_or(AppError::MissingParameter("chapterId"))?;
        let locator = Self {
            chapter_id,
            course_id: capture(&COURSE_ID_RE, url).unwrap_or_else(|| defaults.course_id.clone()),
            clazz_id: capture(&CLAZZ_ID_RE, url).unwrap_or_else(|| defaults.clazz_id.clone()),
            cpi: capture(&CPI_RE, url).unwrap_or_else(|| defaults.cpi.clone()),
        };
        debug!("解析到课程定位参数: {:?}", locator);
        Ok(locator)
    }

    /// 用于填充卡片接口模板的占位符，值已重新编码
    pub fn template_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chapterid", encode(&self.chapter_id)),
            ("courseid", encode(&self.course_id)),
            ("clazzid", encode(&self.clazz_id)),
            ("cpi", encode(&self.cpi)),
        ]
    }
}

fn capture(re: &Regex, url: &str) -> Option<String> {
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| percent_decode_str(m.as_str()).decode_utf8_lossy().into_owned())
        .filter(|v| !v.is_empty())
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// 用参数替换模板中的 `{key}` 占位符，参数值原样插入
pub fn fill_template<K: AsRef<str>, V: AsRef<str>>(template: &str, params: &[(K, V)]) -> String {
    params.iter().fold(template.to_string(), |url, (key, val)| {
        url.replace(&format!("{{{}}}", key.as_ref()), val.as_ref())
    })
}
