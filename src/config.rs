// src/config.rs

pub mod cookie;

use self::cookie::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// 平台接口地址。模板中的 `{name}` 占位符在请求前被替换。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub cards: String,
    pub preview: String,
    pub preview_ext: String,
    pub preview_puid: String,
    pub probe: String,
    pub login_marker: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mooc1.chaoxing.com/".into(),
            cards: "https://mooc1.chaoxing.com/mooc-ans/knowledge/cards?clazzid={clazzid}&courseid={courseid}&knowledgeid={chapterid}&num=0&ut=s&cpi={cpi}&v=2025-0424-1038-3&mooc2=1&isMicroCourse=false&editorPreview=0".into(),
            preview: "https://pan-yz.chaoxing.com/preview/objectshowpreview.html?objectid={objectid}&puid={puid}&ext={ext}".into(),
            preview_ext: "%7B%22_from_%22%3A%22254411132_126771918_305455632_834b328b9c76ad47c6ea0999c20c6ba0%22%7D".into(),
            preview_puid: "111690846".into(),
            probe: "https://mooc1.chaoxing.com/mooc-ans/mycourse/studentstudy".into(),
            login_marker: "passport2.chaoxing.com".into(),
        }
    }
}

/// URL 中缺少 courseId / clazzid / cpi 时使用的默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorDefaults {
    pub course_id: String,
    pub clazz_id: String,
    pub cpi: String,
}

impl Default for LocatorDefaults {
    fn default() -> Self {
        Self {
            course_id: "254411132".into(),
            clazz_id: "126771918".into(),
            cpi: "355954326".into(),
        }
    }
}

/// 目标文件已存在时的处理方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// 直接覆盖
    #[default]
    Overwrite,
    /// 保留已有文件，不再下载
    Skip,
    /// 在文件名后追加序号
    Rename,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub delay_ms: u64,
    pub on_conflict: ConflictPolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            on_conflict: ConflictPolicy::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_saved_at: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub locator_defaults: LocatorDefaults,
    #[serde(default)]
    pub download: DownloadConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            network: NetworkConfig {
                connect_timeout_secs: Some(10),
                timeout_secs: Some(10),
                max_retries: Some(0),
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub endpoints: EndpointConfig,
    pub locator_defaults: LocatorDefaults,
    pub download_delay: Duration,
    pub on_conflict: ConflictPolicy,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        let mut config = Self::from_external(external_config);
        if let Some(secs) = args.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = args.delay_ms {
            config.download_delay = Duration::from_millis(ms);
        }
        if let Some(policy) = args.on_conflict {
            config.on_conflict = policy;
        }
        Ok(config)
    }

    pub fn from_external(external_config: ExternalConfig) -> Self {
        Self {
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(10)),
            max_retries: external_config.network.max_retries.unwrap_or(0),
            endpoints: external_config.endpoints,
            locator_defaults: external_config.locator_defaults,
            download_delay: Duration::from_millis(external_config.download.delay_ms),
            on_conflict: external_config.download.on_conflict,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_external(ExternalConfig::default_app_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_file_falls_back_to_defaults() {
        let json = r#"{ "network": { "timeout_secs": 30 }, "download": { "delay_ms": 0 } }"#;
        let external: ExternalConfig = serde_json::from_str(json).unwrap();
        let config = AppConfig::from_external(external);

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.download_delay, Duration::ZERO);
        assert_eq!(config.on_conflict, ConflictPolicy::Overwrite);
        assert_eq!(config.locator_defaults.cpi, "355954326");
        assert!(config.endpoints.cards.contains("{chapterid}"));
    }

    #[test]
    fn test_sections_accept_single_overridden_key() {
        let json = r#"{
            "download": { "on_conflict": "skip" },
            "endpoints": { "login_marker": "passport.example.com" },
            "locator_defaults": { "cpi": "1" }
        }"#;
        let external: ExternalConfig = serde_json::from_str(json).unwrap();
        let config = AppConfig::from_external(external);

        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert_eq!(config.download_delay, Duration::from_millis(500));
        assert_eq!(config.endpoints.login_marker, "passport.example.com");
        assert_eq!(config.endpoints.base_url, "https://mooc1.chaoxing.com/");
        assert!(config.endpoints.preview.contains("{objectid}"));
        assert_eq!(config.locator_defaults.cpi, "1");
        assert_eq!(config.locator_defaults.course_id, "254411132");
    }

    #[test]
    fn test_conflict_policy_serializes_lowercase() {
        let json = serde_json::to_string(&ConflictPolicy::Rename).unwrap();
        assert_eq!(json, "\"rename\"");
    }
}
