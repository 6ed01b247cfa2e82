// src/downloader/task_runner.rs

use super::{DownloadManager, task_processor::TaskProcessor};
use crate::{
    CrawlContext, constants,
    models::{DownloadStatus, ImageTask, RunOutcome},
    utils,
};

/// 逐个执行下载任务。两次下载之间固定等待 `download_delay`，
/// 单张失败只记录，不影响后续任务。
pub async fn execute_tasks(context: &CrawlContext, tasks: &[ImageTask]) -> RunOutcome {
    let sink = context.sink.as_ref();
    let processor = TaskProcessor::new(context);
    let mut manager = DownloadManager::new();
    manager.start_batch(tasks.len());

    for (i, task) in tasks.iter().enumerate() {
        if i > 0 && !context.config.download_delay.is_zero() {
            tokio::time::sleep(context.config.download_delay).await;
        }
        sink.info(&format!(
            "[{}/{}] 正在下载: {}",
            i + 1,
            tasks.len(),
            utils::truncate_text(&task.url, constants::URL_PREVIEW_LENGTH)
        ));

        let result = processor.process(task).await;
        match result.status {
            DownloadStatus::Success => {
                sink.info(&format!("下载成功: {}", result.filename));
                if let Some(path) = &result.message {
                    sink.info(&format!("保存路径: {}", path));
                }
            }
            DownloadStatus::Skipped => {
                sink.info(&format!("文件已存在，跳过: {}", result.filename));
            }
            failed => {
                sink.warn(&format!(
                    "下载失败: {} ({}{})",
                    task.url,
                    failed.description(),
                    result
                        .message
                        .as_deref()
                        .map(|m| format!(", 详情: {}", m))
                        .unwrap_or_default()
                ));
            }
        }
        manager.record(&result.filename, result.status);
    }

    manager.print_report(sink);
    manager.outcome()
}
