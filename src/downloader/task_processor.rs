// src/downloader/task_processor.rs

use crate::{
    CrawlContext,
    config::ConflictPolicy,
    error::*,
    models::{DownloadResult, DownloadStatus, ImageTask},
};
use log::{debug, error, info};
use reqwest::StatusCode;
use std::{
    io::Write as IoWrite,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use url::Url;

/// 把相对地址补全为基于 `base_url` 的绝对地址
pub fn resolve_resource_url(resource_url: &str, base_url: &str) -> AppResult<Url> {
    if resource_url.starts_with("http") {
        return Ok(Url::parse(resource_url)?);
    }
    Ok(Url::parse(base_url)?.join(resource_url)?)
}

/// 按冲突策略决定最终写入路径；`None` 表示应跳过
fn resolve_target_path(dir: &Path, filename: &str, policy: ConflictPolicy) -> Option<PathBuf> {
    let path = dir.join(filename);
    match policy {
        ConflictPolicy::Overwrite => Some(path),
        ConflictPolicy::Skip if path.exists() => None,
        ConflictPolicy::Skip => Some(path),
        ConflictPolicy::Rename => {
            if !path.exists() {
                return Some(path);
            }
            let (stem, ext) = match filename.rfind('.') {
                Some(dot) => filename.split_at(dot),
                None => (filename, ""),
            };
            (1..)
                .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
                .find(|candidate| !candidate.exists())
        }
    }
}

/// `TaskProcessor` 处理单张图片：补全地址、请求、写入文件。
/// 任何失败都只体现在返回的 `DownloadResult` 中，不会中断整个批次。
pub struct TaskProcessor<'a> {
    context: &'a CrawlContext,
}

impl<'a> TaskProcessor<'a> {
    pub fn new(context: &'a CrawlContext) -> Self {
        Self { context }
    }

    pub async fn process(&self, task: &ImageTask) -> DownloadResult {
        let filename = task.filename();
        let Some(target) =
            resolve_target_path(&task.target_dir, &filename, self.context.config.on_conflict)
        else {
            return DownloadResult {
                filename,
                status: DownloadStatus::Skipped,
                message: None,
            };
        };
        let filename = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(filename);

        match self.download(task, &target).await {
            Ok(()) => DownloadResult {
                filename,
                status: DownloadStatus::Success,
                message: Some(target.display().to_string()),
            },
            Err(e) => {
                error!("下载图片 '{}' 失败: {}", task.url, e);
                DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                }
            }
        }
    }

    async fn download(&self, task: &ImageTask, target: &Path) -> AppResult<()> {
        let url = resolve_resource_url(&task.url, &self.context.config.endpoints.base_url)?;
        debug!("下载 {} -> {}", url, target.display());

        let res = self.context.http_client.client.get(url.clone()).send().await?;
        if res.status() != StatusCode::OK {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }
        let bytes = res.bytes().await?;

        // 先写入同目录的临时文件，完整写完后再替换目标文件
        let mut tmp = NamedTempFile::new_in(&task.target_dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(target)?;
        info!("已保存 {} ({} 字节)", target.display(), bytes.len());
        Ok(())
    }
}
