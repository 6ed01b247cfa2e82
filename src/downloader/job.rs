// src/downloader/job.rs

use super::task_runner;
use crate::{
    CrawlContext,
    cli::CrawlMode,
    error::*,
    models::{ImageTask, RunOutcome},
};
use log::{debug, error, info};
use std::{fs, path::Path};

/// 爬取流程的入口。所有错误都在这里转换为日志行和 `false`，
/// 不会有 `AppError` 传给调用方。
pub struct ImageCrawler {
    pub(super) context: CrawlContext,
}

impl ImageCrawler {
    pub fn new(context: CrawlContext) -> Self {
        Self { context }
    }

    pub async fn run_course(&self, url: &str, output_dir: &Path) -> bool {
        self.run(CrawlMode::Course, url, output_dir).await
    }

    pub async fn run_homework(&self, url: &str, output_dir: &Path) -> bool {
        self.run(CrawlMode::Homework, url, output_dir).await
    }

    /// 执行一次完整的爬取，当且仅当至少有一张图片成功写入磁盘时返回 `true`
    pub async fn run(&self, mode: CrawlMode, url: &str, output_dir: &Path) -> bool {
        info!("开始处理 URL: {} (模式: {:?})", url, mode);
        match self.run_detailed(mode, url, output_dir).await {
            Ok(outcome) => {
                if outcome.is_success() {
                    self.context
                        .sink
                        .info(&format!("图片已保存到: {}", output_dir.display()));
                }
                outcome.is_success()
            }
            Err(e) => {
                error!("URL '{}' 处理失败: {}", url, e);
                self.report_error(&e);
                false
            }
        }
    }

    /// 与 [`run`](Self::run) 相同，但返回统计结果或终止本次运行的错误
    pub async fn run_detailed(
        &self,
        mode: CrawlMode,
        url: &str,
        output_dir: &Path,
    ) -> AppResult<RunOutcome> {
        fs::create_dir_all(output_dir)?;
        let absolute_path = dunce::canonicalize(output_dir)?;
        self.context
            .sink
            .info(&format!("保存目录: {}", absolute_path.display()));

        let extractor = self.create_extractor(mode);
        let discovery = extractor.discover(url, &self.context).await?;
        self.context
            .sink
            .info(&format!("找到 {} 张图片", discovery.images.len()));

        let tasks: Vec<ImageTask> = discovery
            .images
            .into_iter()
            .enumerate()
            .map(|(i, url)| ImageTask {
                url,
                target_dir: absolute_path.clone(),
                subject: discovery.subject.clone(),
                topic: discovery.topic.clone(),
                index: i + 1,
            })
            .collect();
        debug!("生成 {} 个下载任务", tasks.len());

        Ok(task_runner::execute_tasks(&self.context, &tasks).await)
    }

    fn report_error(&self, e: &AppError) {
        let sink = self.context.sink.as_ref();
        match e {
            AppError::MissingParameter(name) => {
                sink.warn(&format!("无法从URL提取{}", name));
                print_hint(sink, crate::constants::hints::COURSE_USAGE);
            }
            AppError::NotFound { what, hint } => {
                sink.warn(&format!("未找到图片: {}", what));
                print_hint(sink, hint);
            }
            AppError::SessionInvalid => {
                sink.error(&e.to_string());
                sink.info("请更新 Cookie 后重试，使用 --cookie-help 查看获取方法。");
            }
            AppError::HttpStatus { status, .. } => {
                sink.error(&format!("请求失败，状态码: {}", status));
            }
            _ => sink.error(&format!("爬取失败: {}", e)),
        }
    }
}

fn print_hint(sink: &dyn crate::sink::LogSink, lines: &[&str]) {
    sink.info("提示:");
    for line in lines {
        sink.info(&format!("    - {}", line));
    }
}
