// src/client.rs

use crate::{config::AppConfig, error::*, session::SessionContext};
use anyhow::anyhow;
use log::{debug, warn};
use reqwest::{
    IntoUrl, Response, StatusCode,
    header::{self, HeaderMap},
    redirect::Policy,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::sync::Arc;

/// 会话探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Valid,
    Invalid,
    /// 服务器给出了无法判断的响应，按可用处理
    Unknown(u16),
}

/// 携带会话 Cookie 的 HTTP 客户端，一次运行只构造一个。
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    headers: HeaderMap,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>, session: &SessionContext) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if !session.is_empty() {
            headers.insert(header::COOKIE, session.header_value()?);
        }

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .default_headers(headers.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self {
            client,
            headers,
            config,
        })
    }

    /// 发起 GET 请求；401/403 或被重定向到登录页视为会话失效，其它非 2xx 状态返回 `HttpStatus`。
    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let url = url.into_url()?;
        debug!("GET {}", url);
        let res = self.client.get(url.clone()).send().await?;
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::SessionInvalid);
        }
        if self.is_login_redirect(res.url().as_str()) {
            warn!("请求 {} 被重定向到登录页: {}", url, res.url());
            return Err(AppError::SessionInvalid);
        }
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(res)
    }

    /// 获取页面或接口内容，按 UTF-8 解码
    pub async fn fetch_text(&self, url: &str) -> AppResult<String> {
        let res = self.get(url).await?;
        let bytes = res.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 用一次不跟随重定向的请求检查 Cookie 是否仍然有效
    pub async fn probe_session(&self) -> AppResult<SessionStatus> {
        let probe_client = reqwest::Client::builder()
            .user_agent(self.config.user_agent.clone())
            .default_headers(self.headers.clone())
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.timeout)
            .redirect(Policy::none())
            .build()?;
        let res = probe_client.get(&self.config.endpoints.probe).send().await?;
        let status = res.status();
        debug!("会话探测响应状态码: {}", status);

        if status.is_success() {
            return Ok(SessionStatus::Valid);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(SessionStatus::Invalid);
        }
        if status.is_redirection() {
            let location = res
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Other(anyhow!("重定向响应缺少 Location 头")))?;
            return Ok(if self.is_login_redirect(location) || location.contains("login") {
                SessionStatus::Invalid
            } else {
                SessionStatus::Valid
            });
        }
        Ok(SessionStatus::Unknown(status.as_u16()))
    }

    fn is_login_redirect(&self, url: &str) -> bool {
        let marker = &self.config.endpoints.login_marker;
        !marker.is_empty() && url.contains(marker.as_str())
    }
}
