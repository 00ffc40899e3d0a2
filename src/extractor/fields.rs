// src/extractor/fields.rs

//! 字段提取器：最佳媒体/缩略图选择、时长解析、发布日期解析。
//! 这里的函数都不会返回错误，解析失败时记录警告并返回约定的默认值。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})$").unwrap());

const BROADCAST_DATE_FORMAT: &str = "%d.%m.%Y";
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 参与选择的候选项：一个尺寸 (宽或高) 和一个地址。选择完成后即丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    pub dimension: Option<u32>,
    pub location: String,
}

impl AssetCandidate {
    pub fn new(dimension: Option<u32>, location: impl Into<String>) -> Self {
        Self {
            dimension,
            location: location.into(),
        }
    }

    /// 从文本尺寸构造，非数字的尺寸视为缺失
    pub fn from_text(dimension: Option<&str>, location: impl Into<String>) -> Self {
        Self::new(dimension.and_then(|d| d.trim().parse().ok()), location)
    }

    /// 从 JSON 尺寸构造，接受数字或数字字符串
    pub fn from_json(dimension: Option<&Value>, location: impl Into<String>) -> Self {
        Self::new(dimension.and_then(dimension_from_json), location)
    }
}

fn dimension_from_json(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 选择尺寸严格最大的候选项，并列时保留先出现的。
/// 尺寸缺失或非数字的候选项不参与比较；全部被排除或集合为空时返回 None。
pub fn select_best<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = AssetCandidate>,
{
    let mut best: Option<(u32, String)> = None;
    for candidate in candidates {
        let Some(dimension) = candidate.dimension else {
            warn!("忽略没有有效尺寸的候选项: {}", candidate.location);
            continue;
        };
        if best.as_ref().is_none_or(|(d, _)| dimension > *d) {
            best = Some((dimension, candidate.location));
        }
    }
    best.map(|(dimension, location)| {
        debug!("选中尺寸 {} 的候选项: {}", dimension, location);
        location
    })
}

/// 缩略图选择与媒体选择使用同一算法，没有可用候选时返回 None (不是错误)
pub fn select_thumbnail<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = AssetCandidate>,
{
    let thumbnail = select_best(candidates);
    if thumbnail.is_none() {
        debug!("没有可用的缩略图");
    }
    thumbnail
}

/// `HH:MM:SS` 转换为总秒数，格式不符时返回 0
pub fn parse_duration(text: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(text.trim()) else {
        warn!("无法解析时长 '{}'，使用 0", text);
        return 0;
    };
    let group = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    match (group(1), group(2), group(3)) {
        (Some(h), Some(m), Some(s)) => h * 3600 + m * 60 + s,
        _ => {
            warn!("无法解析时长 '{}'，使用 0", text);
            0
        }
    }
}

/// 查询接口返回的时长 (整数秒)，非数字时返回 0
pub fn seconds_from_json(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or_else(|| {
                warn!("时长 {} 不是有效的秒数，使用 0", n);
                0
            }),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
            warn!("时长 '{}' 不是有效的秒数，使用 0", s);
            0
        }),
        Some(Value::Null) | None => {
            warn!("缺少时长，使用 0");
            0
        }
        Some(other) => {
            warn!("时长 {} 类型不符，使用 0", other);
            0
        }
    }
}

/// 网页播放器配置中的播出日期 (`日.月.年`)，解析失败时返回 Unix 纪元
pub fn parse_broadcast_date(text: &str) -> DateTime<Utc> {
    match NaiveDate::parse_from_str(text.trim(), BROADCAST_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        Some(dt) => dt.and_utc(),
        None => {
            warn!("无法解析发布日期 '{}'，使用 Unix 纪元", text);
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

/// 查询接口中的 ISO-8601 时间 (带毫秒和 Z)，解析失败时返回 Unix 纪元
pub fn parse_iso_timestamp(text: &str) -> DateTime<Utc> {
    match NaiveDateTime::parse_from_str(text.trim(), ISO_TIMESTAMP_FORMAT) {
        Ok(dt) => dt.and_utc(),
        Err(e) => {
            warn!("无法解析发布时间 '{}': {}，使用 Unix 纪元", text, e);
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}
