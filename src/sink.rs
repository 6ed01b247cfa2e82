// src/sink.rs

//! 面向用户的运行日志输出。
//!
//! 爬取流程不返回结构化结果，只通过 [`LogSink`] 逐行报告进度；
//! 调用方可以打印到终端，也可以通过通道把日志行转交给别的任务。

use crate::symbols;
use log::Level;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub message: String,
}

pub trait LogSink: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// 默认输出：带状态符号打印到终端，同时写入 `log`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn emit(&self, level: Level, message: &str) {
        log::log!(level, "{}", message);
        match level {
            Level::Error => eprintln!("{} {}", *symbols::ERROR, message),
            Level::Warn => println!("{} {}", *symbols::WARN, message),
            _ => println!("{} {}", *symbols::INFO, message),
        }
    }
}

/// 把每一行日志发送到通道。接收端关闭后的日志行会被丢弃。
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<LogLine>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<LogLine>) -> Self {
        Self { sender }
    }
}

impl LogSink for ChannelSink {
    fn emit(&self, level: Level, message: &str) {
        log::log!(level, "{}", message);
        let line = LogLine {
            level,
            message: message.to_string(),
        };
        if self.sender.send(line).is_err() {
            log::debug!("日志接收端已关闭，丢弃: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_channel_sink_forwards_lines_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        sink.info("第一行");
        sink.warn("第二行");

        assert_eq!(rx.try_recv().unwrap().message, "第一行");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, Level::Warn);
        assert_eq!(second.message, "第二行");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelSink::new(tx).error("无人接收");
    }
}
