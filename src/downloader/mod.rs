// src/downloader/mod.rs

mod dispatcher;
mod job;
mod task_processor;
mod task_runner;

pub use job::ImageCrawler;
pub use task_processor::TaskProcessor;
pub use task_runner::execute_tasks;

use crate::{
    models::{DownloadStatus, RunOutcome},
    sink::LogSink,
};
use log::info;
use std::collections::BTreeMap;

/// 记录一批下载任务的统计与失败明细。
/// 整个批次在同一个任务中顺序执行，不需要加锁。
#[derive(Debug, Default)]
pub struct DownloadManager {
    outcome: RunOutcome,
    failed_downloads: Vec<(String, String)>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_batch(&mut self, total_tasks: usize) {
        info!("开始新一批下载任务，总数: {}", total_tasks);
        self.outcome = RunOutcome::default();
        self.failed_downloads.clear();
    }

    pub fn record(&mut self, filename: &str, status: DownloadStatus) {
        self.outcome.attempted += 1;
        match status {
            DownloadStatus::Success => self.outcome.succeeded += 1,
            DownloadStatus::Skipped => {
                info!("跳过文件 '{}'", filename);
                self.outcome.skipped += 1;
            }
            failed => {
                log::error!("文件 '{}' 下载失败，状态: {:?}", filename, failed);
                self.outcome.failed += 1;
                self.failed_downloads
                    .push((filename.to_string(), failed.description()));
            }
        }
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    pub fn print_report(&self, sink: &dyn LogSink) {
        let stats = self.outcome;
        info!(
            "下载报告: Attempted={}, Success={}, Skipped={}, Failed={}",
            stats.attempted, stats.succeeded, stats.skipped, stats.failed
        );

        if !self.failed_downloads.is_empty() {
            sink.warn(&format!("失败的文件 ({}个):", stats.failed));
            let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for (filename, reason) in &self.failed_downloads {
                grouped.entry(reason).or_default().push(filename);
            }
            for (reason, mut filenames) in grouped {
                sink.warn(&format!("  - 原因: {}", reason));
                filenames.sort();
                for filename in filenames {
                    sink.warn(&format!("    - {}", filename));
                }
            }
        }
        if stats.skipped > 0 {
            sink.info(&format!("已跳过 {} 个已存在的文件", stats.skipped));
        }
        sink.info(&format!(
            "下载完成! 成功下载 {}/{} 张图片",
            stats.succeeded, stats.attempted
        ));
    }
}
