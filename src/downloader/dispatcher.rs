// src/downloader/dispatcher.rs

use super::job::ImageCrawler;
use crate::{
    cli::CrawlMode,
    extractor::{ImageExtractor, course::CourseExtractor, homework::HomeworkExtractor},
};
use log::debug;

/// 这部分 `impl` 负责把爬取模式调度到对应的提取器。
impl ImageCrawler {
    pub(super) fn create_extractor(&self, mode: CrawlMode) -> Box<dyn ImageExtractor> {
        match mode {
            CrawlMode::Course => {
                debug!("创建 CourseExtractor");
                Box::new(CourseExtractor::new())
            }
            CrawlMode::Homework => {
                debug!("创建 HomeworkExtractor");
                Box::new(HomeworkExtractor::new())
            }
        }
    }
}
