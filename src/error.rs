// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("缺少必需的 URL 参数: {0}")]
    MissingParameter(&'static str),
    #[error("会话无效 (Cookie 已失效或未登录)")]
    SessionInvalid,
    #[error("未提供 Cookie，无法访问平台")]
    CookieMissing,
    #[error("Cookie 格式无效: {0}")]
    InvalidCookie(String),
    #[error("请求 '{url}' 失败，状态码: {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("{what}")]
    NotFound {
        what: String,
        hint: &'static [&'static str],
    },
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
