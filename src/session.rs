// src/session.rs

use crate::error::{AppError, AppResult};
use reqwest::header::HeaderValue;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// 一次运行所使用的登录会话，即解析后的 Cookie 键值对。
///
/// 运行期间只读；调用方可以为下一次运行重新构造。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    cookies: BTreeMap<String, String>,
}

impl SessionContext {
    /// 解析 `k1=v1; k2=v2` 形式的 Cookie 字符串。
    /// 以 `;` 分段、以首个 `=` 切分，键和值都去除首尾空白；不含 `=` 的片段被忽略。
    pub fn parse(cookie_str: &str) -> Self {
        let cookies = cookie_str
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { cookies }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cookies.get(key).map(String::as_str)
    }

    /// 生成 `Cookie` 请求头。
    pub fn header_value(&self) -> AppResult<HeaderValue> {
        HeaderValue::from_str(&self.to_string())
            .map_err(|e| AppError::InvalidCookie(e.to_string()))
    }
}

impl FromStr for SessionContext {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let session = Self::parse(s);
        if session.is_empty() {
            return Err(AppError::InvalidCookie(
                "未解析出任何 key=value 键值对".to_string(),
            ));
        }
        Ok(session)
    }
}

impl fmt::Display for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.cookies {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}
