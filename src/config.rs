// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants::{self, defaults, endpoints},
    error::AppResult,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 上游适配策略
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 解析网页与播放器 XML 配置 (旧)
    Markup,
    /// 分页查询接口 (当前)
    Graphql,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_uri: String,
    pub root_uri: String,
    pub graphql_uri: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_uri: endpoints::BASE_URI.into(),
            root_uri: format!("{}{}", endpoints::BASE_URI, endpoints::ROOT_PATH),
            graphql_uri: endpoints::GRAPHQL_URI.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default = "default_strategy")]
    pub default_strategy: Strategy,
    #[serde(default)]
    pub episode_page_size: Option<u32>,
}

fn default_strategy() -> Strategy {
    Strategy::Graphql
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            network: NetworkConfig {
                connect_timeout_secs: Some(defaults::CONNECT_TIMEOUT_SECS),
                timeout_secs: Some(defaults::TIMEOUT_SECS),
                max_retries: Some(defaults::MAX_RETRIES),
            },
            endpoints: EndpointConfig::default(),
            default_strategy: default_strategy(),
            episode_page_size: Some(defaults::EPISODE_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub strategy: Strategy,
    pub base_uri: String,
    pub root_uri: String,
    pub graphql_uri: String,
    pub episode_page_size: u32,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Ok(Self::from_external(external_config, args.strategy))
    }

    pub fn from_external(external: ExternalConfig, strategy: Option<Strategy>) -> Self {
        Self {
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external
                    .network
                    .connect_timeout_secs
                    .unwrap_or(defaults::CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                external.network.timeout_secs.unwrap_or(defaults::TIMEOUT_SECS),
            ),
            max_retries: external.network.max_retries.unwrap_or(defaults::MAX_RETRIES),
            strategy: strategy.unwrap_or(external.default_strategy),
            base_uri: external.endpoints.base_uri.trim_end_matches('/').to_string(),
            root_uri: external.endpoints.root_uri,
            graphql_uri: external.endpoints.graphql_uri,
            episode_page_size: external
                .episode_page_size
                .filter(|n| *n > 0)
                .unwrap_or(defaults::EPISODE_PAGE_SIZE),
        }
    }

    /// 测试中把所有上游地址指向同一个模拟服务器
    pub fn with_base_uri(mut self, base_uri: &str) -> Self {
        let base = base_uri.trim_end_matches('/');
        self.base_uri = base.to_string();
        self.root_uri = format!("{}{}", base, endpoints::ROOT_PATH);
        self.graphql_uri = format!("{}/graphql", base);
        self
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            strategy: Strategy::Graphql,
            base_uri: endpoints::BASE_URI.to_string(),
            root_uri: format!("{}{}", endpoints::BASE_URI, endpoints::ROOT_PATH),
            graphql_uri: endpoints::GRAPHQL_URI.to_string(),
            episode_page_size: 10,
        }
    }
}
