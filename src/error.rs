// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("无效的定位符 '{locator}': {reason}")]
    MalformedLocator { locator: String, reason: String },
    #[error("不支持的节点类型 '{kind}' (定位符: '{locator}')")]
    UnsupportedKind { locator: String, kind: String },
    #[error("缺少必需字段 '{field}' ({context})")]
    RequiredFieldMissing { field: String, context: String },
    #[error("查询 '{query}' 的响应结构不符合预期: {detail}")]
    UnexpectedResponseShape { query: String, detail: String },
    #[error("视频 '{locator}' 没有可播放的媒体文件")]
    NoPlayableAsset { locator: String },
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("XML 解析错误: {0}")]
    XmlParse(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        AppError::RequiredFieldMissing {
            field: field.into(),
            context: context.into(),
        }
    }

    pub(crate) fn shape(query: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::UnexpectedResponseShape {
            query: query.into(),
            detail: detail.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
