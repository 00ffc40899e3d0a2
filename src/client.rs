// src/client.rs

use crate::{config::AppConfig, error::*};
use async_trait::async_trait;
use log::{debug, error};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;

/// 解析核心所依赖的传输层。任何失败都会让当前这一步解析失败，核心不做重试。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        charset: &str,
    ) -> AppResult<String>;

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
        charset: &str,
    ) -> AppResult<String>;
}

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client })
    }

    async fn send_text(
        &self,
        mut request: RequestBuilder,
        url: &str,
        headers: &[(&str, &str)],
        charset: &str,
    ) -> AppResult<String> {
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let res = request.send().await.inspect_err(|e| {
            error!("请求 '{}' 失败: {}", url, e);
        })?;
        debug!("'{}' 返回状态 {}", url, res.status());
        let res = res.error_for_status()?;
        Ok(res.text_with_charset(charset).await?)
    }
}

#[async_trait]
impl Transport for RobustClient {
    async fn fetch_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        charset: &str,
    ) -> AppResult<String> {
        debug!("GET {}", url);
        self.send_text(self.client.get(url), url, headers, charset)
            .await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
        charset: &str,
    ) -> AppResult<String> {
        debug!("POST {}", url);
        let request = self.client.post(url).body(serde_json::to_string(body)?);
        self.send_text(request, url, headers, charset).await
    }
}
