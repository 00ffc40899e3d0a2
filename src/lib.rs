// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod models;
pub mod resolver;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::AppResult,
    locator::Locator,
    resolver::Resolver,
};
use log::debug;
use std::sync::Arc;

/// 一次命令行运行所需的全部上下文
#[derive(Clone)]
pub struct ResolveContext {
    pub resolver: Arc<Resolver>,
    pub config: Arc<AppConfig>,
    pub args: Arc<Cli>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    // 定位符在读取配置和访问网络之前就完成校验
    let locator = args
        .locator
        .as_deref()
        .map(|input| Locator::parse(input.trim()))
        .transpose()?;

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let http_client = Arc::new(RobustClient::new(&config)?);
    let context = ResolveContext {
        resolver: Arc::new(Resolver::new(http_client, &config)),
        config,
        args: args.clone(),
    };

    if args.interactive {
        workflows::run_interactive(context).await
    } else if let Some(locator) = locator {
        workflows::run_locator(locator, context).await
    } else {
        workflows::run_root(context).await
    }
}
