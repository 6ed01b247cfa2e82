// src/models.rs

use crate::error::AppError;
use std::{io::ErrorKind, path::PathBuf};

/// 单张图片的下载结果
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    HttpError(u16),
    NetworkError,
    ConnectionError,
    TimeoutError,
    IoError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn description(&self) -> String {
        match self {
            DownloadStatus::Success => "下载成功".to_string(),
            DownloadStatus::Skipped => "文件已存在，跳过".to_string(),
            DownloadStatus::HttpError(code) => format!("服务器返回错误 (状态码: {})", code),
            DownloadStatus::NetworkError => "网络请求失败".to_string(),
            DownloadStatus::ConnectionError => "无法建立连接".to_string(),
            DownloadStatus::TimeoutError => "网络连接超时".to_string(),
            DownloadStatus::IoError => "本地文件读写错误".to_string(),
            DownloadStatus::UnexpectedError => "发生未预期的程序错误".to_string(),
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::HttpStatus { status, .. } => DownloadStatus::HttpError(*status),
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                classify_reqwest(err)
            }
            // 经过重试中间件后，底层错误被包在 anyhow 错误链中
            AppError::NetworkMiddleware(reqwest_middleware::Error::Middleware(err)) => {
                classify_chain(err)
            }
            AppError::Io(_) | AppError::TempFilePersist(_) => DownloadStatus::IoError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

fn classify_reqwest(err: &reqwest::Error) -> DownloadStatus {
    if err.is_timeout() {
        DownloadStatus::TimeoutError
    } else if err.is_connect() {
        DownloadStatus::ConnectionError
    } else if let Some(status) = err.status() {
        DownloadStatus::HttpError(status.as_u16())
    } else {
        DownloadStatus::NetworkError
    }
}

fn classify_io(err: &std::io::Error) -> Option<DownloadStatus> {
    match err.kind() {
        ErrorKind::TimedOut => Some(DownloadStatus::TimeoutError),
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::NotConnected
        | ErrorKind::AddrNotAvailable => Some(DownloadStatus::ConnectionError),
        _ => None,
    }
}

/// 沿错误链查找可识别的底层错误。透明包装会跳过 `reqwest::Error` 本身，
/// 因此还要检查更底层的 io 错误和超时错误。
fn classify_chain(err: &anyhow::Error) -> DownloadStatus {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
            return classify_reqwest(e);
        }
        if let Some(reqwest_middleware::Error::Reqwest(e)) =
            cause.downcast_ref::<reqwest_middleware::Error>()
        {
            return classify_reqwest(e);
        }
        if let Some(status) = cause.downcast_ref::<std::io::Error>().and_then(classify_io) {
            return status;
        }
        if cause.to_string().contains("timed out") {
            return DownloadStatus::TimeoutError;
        }
    }
    DownloadStatus::NetworkError
}

/// 一次下载尝试所需的全部信息，下载前构造，结束后丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub url: String,
    pub target_dir: PathBuf,
    pub subject: String,
    pub topic: String,
    pub index: usize,
}

impl ImageTask {
    pub fn filename(&self) -> String {
        crate::utils::image_filename(&self.subject, &self.topic, self.index, &self.url)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub filename: String,
    pub status: DownloadStatus,
    pub message: Option<String>,
}

/// 一次运行的统计结果；只要有一张图片成功写入磁盘即视为成功
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.succeeded > 0
    }
}
