// src/locator.rs

//! 节点定位符的编解码。
//!
//! 支持两种语法，由 scheme 部分区分：
//! - 当前语法: `brmediathek://<kind>/<id>`
//! - 旧语法: 完整的上游 `http(s)` 地址，片段标明节点类型，
//!   如 `http://www.br.de#letter=A`、`<url>#program`、`<url>#video`、`<url>#root`

use crate::{
    constants::{endpoints, locator as consts},
    error::{AppError, AppResult},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// 网页解析策略使用的完整上游地址
    Legacy,
    /// 查询接口策略使用的 `brmediathek://` 地址
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Letter,
    Program,
    Video,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => consts::KIND_ROOT,
            NodeKind::Letter => consts::KIND_LETTER,
            NodeKind::Program => consts::KIND_PROGRAM,
            NodeKind::Video => consts::KIND_VIDEO,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            consts::KIND_ROOT => Some(NodeKind::Root),
            consts::KIND_LETTER => Some(NodeKind::Letter),
            consts::KIND_PROGRAM => Some(NodeKind::Program),
            consts::KIND_VIDEO => Some(NodeKind::Video),
            _ => None,
        }
    }

    pub fn is_expandable(&self) -> bool {
        !matches!(self, NodeKind::Video)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    scheme: Scheme,
    kind: NodeKind,
    id: String,
    raw: String,
}

impl Locator {
    /// 编码 (scheme, kind, id)。对合法的组合总能成功，且结果可以无损解码。
    pub fn new(scheme: Scheme, kind: NodeKind, id: impl Into<String>) -> AppResult<Self> {
        let id = id.into();
        let raw = match scheme {
            Scheme::Current => format!("{}://{}/{}", consts::CURRENT_SCHEME, kind, id),
            Scheme::Legacy => match kind {
                NodeKind::Letter => format!("{}#{}={}", endpoints::BASE_URI, consts::KIND_LETTER, id),
                _ => format!("{}#{}", id, kind),
            },
        };
        let invalid = |reason: &str| AppError::MalformedLocator {
            locator: raw.clone(),
            reason: reason.to_string(),
        };

        if id.is_empty() {
            return Err(invalid("标识符为空"));
        }
        if scheme == Scheme::Legacy {
            if id.contains('#') {
                return Err(invalid("旧式标识符不能包含 '#'"));
            }
            if kind != NodeKind::Letter && !is_http_url(&id) {
                return Err(invalid("旧式标识符必须是 http(s) 地址"));
            }
        }

        Ok(Self { scheme, kind, id, raw })
    }

    pub fn current(kind: NodeKind, id: impl Into<String>) -> AppResult<Self> {
        Self::new(Scheme::Current, kind, id)
    }

    pub fn legacy(kind: NodeKind, id: impl Into<String>) -> AppResult<Self> {
        Self::new(Scheme::Legacy, kind, id)
    }

    /// 解码定位符文本。不涉及任何网络访问。
    ///
    /// 标识符中的空白原样保留，调用方需要自行去掉输入两端的空白。
    pub fn parse(input: &str) -> AppResult<Self> {
        let prefix = format!("{}://", consts::CURRENT_SCHEME);
        if let Some(rest) = input.strip_prefix(&prefix) {
            let (segment, id) = rest
                .split_once('/')
                .ok_or_else(|| malformed(input, "缺少 '/<id>' 部分"))?;
            if segment.is_empty() {
                return Err(malformed(input, "节点类型为空"));
            }
            let kind = NodeKind::from_segment(segment).ok_or_else(|| AppError::UnsupportedKind {
                locator: input.to_string(),
                kind: segment.to_string(),
            })?;
            return Self::current(kind, id);
        }

        if is_http_url(input) {
            let (url, fragment) = input
                .split_once('#')
                .ok_or_else(|| malformed(input, "旧式定位符缺少 '#<kind>' 片段"))?;
            if let Some(letter) = fragment.strip_prefix(&format!("{}=", consts::KIND_LETTER)) {
                return Self::legacy(NodeKind::Letter, letter);
            }
            let kind = NodeKind::from_segment(fragment)
                .filter(|k| *k != NodeKind::Letter)
                .ok_or_else(|| AppError::UnsupportedKind {
                    locator: input.to_string(),
                    kind: fragment.to_string(),
                })?;
            return Self::legacy(kind, url);
        }

        Err(malformed(input, "无法识别的 scheme"))
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn malformed(input: &str, reason: &str) -> AppError {
    AppError::MalformedLocator {
        locator: input.to_string(),
        reason: reason.to_string(),
    }
}

fn is_http_url(text: &str) -> bool {
    url::Url::parse(text)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Locator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Locator::parse(&raw).map_err(serde::de::Error::custom)
    }
}
