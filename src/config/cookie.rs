// src/config/cookie.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{fs, path::PathBuf};

pub(crate) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 把 Cookie 连同保存时间写入配置文件，返回配置文件路径
pub fn save_cookie(cookie: &str) -> AppResult<PathBuf> {
    let config_path = get_config_path()?;
    let mut config = load_or_create_external_config()?;

    config.cookie = Some(cookie.trim().to_string());
    config.cookie_saved_at = Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());

    let json_content = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, json_content)
        .with_context(|| format!("保存 Cookie 到 '{}' 失败", config_path.display()))?;

    info!("Cookie 已保存至配置文件: {}", config_path.display());
    Ok(config_path)
}

/// 读取已保存的 Cookie 及其保存时间
pub fn load_cookie() -> Option<(String, Option<String>)> {
    load_or_create_external_config()
        .ok()
        .and_then(|config| config.cookie.map(|c| (c, config.cookie_saved_at)))
}

/// 按 命令行参数 → 环境变量 → 配置文件 的顺序查找 Cookie。
/// 返回 (Cookie, 来源描述)。
pub fn resolve_cookie(cli_cookie: Option<&str>) -> (Option<String>, String) {
    if let Some(cookie) = cli_cookie.map(str::trim).filter(|c| !c.is_empty()) {
        debug!("使用来自命令行参数的 Cookie");
        return (Some(cookie.to_string()), "命令行参数".to_string());
    }
    if let Some(cookie) = std::env::var(constants::COOKIE_ENV_VAR)
        .ok()
        .filter(|c| !c.trim().is_empty())
    {
        debug!("使用来自环境变量 {} 的 Cookie", constants::COOKIE_ENV_VAR);
        return (
            Some(cookie),
            format!("环境变量 ({})", constants::COOKIE_ENV_VAR),
        );
    }
    if let Some((cookie, saved_at)) = load_cookie().filter(|(c, _)| !c.trim().is_empty()) {
        debug!("使用来自本地配置文件的 Cookie (保存于 {:?})", saved_at);
        let source = match saved_at {
            Some(at) => format!("本地配置文件 (保存于 {})", at),
            None => "本地配置文件".to_string(),
        };
        return (Some(cookie), source);
    }
    debug!("未在任何位置找到可用的 Cookie");
    (None, "未找到".to_string())
}
