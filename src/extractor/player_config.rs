// src/extractor/player_config.rs

//! 解析网页播放器的 XML 配置。
//!
//! `title` 和 `permalink` 是必需字段，缺失时解析失败；
//! 其余字段 (描述、日期、时长、单个媒体/缩略图的尺寸) 缺失或格式错误时降级为默认值。

use super::{
    absolute_url,
    fields::{self, AssetCandidate},
    xml::XmlElement,
};
use crate::{
    error::*,
    locator::{Locator, NodeKind},
    models::VideoPage,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};

const CONTEXT: &str = "播放器配置";

pub fn parse_player_config(xml: &str, base_uri: &str) -> AppResult<VideoPage> {
    let doc = XmlElement::parse(xml)?;
    let video = doc
        .first_descendant("video")
        .ok_or_else(|| AppError::missing("video", CONTEXT))?;

    let title = required_text(video, "title")?;
    let permalink = required_text(video, "permalink")?;
    let locator = Locator::legacy(NodeKind::Video, absolute_url(base_uri, permalink)?)?;

    let description = match video.child_text("desc") {
        Some(desc) => desc.to_string(),
        None => {
            debug!("视频 '{}' 没有描述", title);
            String::new()
        }
    };

    let publish_date: DateTime<Utc> = match video.child_text("broadcastDate") {
        Some(text) => fields::parse_broadcast_date(text),
        None => {
            warn!("视频 '{}' 缺少播出日期，使用 Unix 纪元", title);
            DateTime::<Utc>::UNIX_EPOCH
        }
    };

    let duration = match video.child_text("duration") {
        Some(text) => fields::parse_duration(text),
        None => {
            warn!("视频 '{}' 缺少时长，使用 0", title);
            0
        }
    };

    let video_uri = fields::select_best(asset_candidates(&doc));
    let thumbnail = fields::select_thumbnail(thumbnail_candidates(&doc, base_uri));

    Ok(VideoPage {
        locator,
        title: title.to_string(),
        description,
        publish_date,
        duration,
        thumbnail,
        video_uri,
    })
}

fn required_text<'a>(element: &'a XmlElement, name: &str) -> AppResult<&'a str> {
    element
        .child_text(name)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::missing(name, CONTEXT))
}

fn asset_candidates(doc: &XmlElement) -> Vec<AssetCandidate> {
    doc.descendants("asset")
        .into_iter()
        .filter_map(|asset| match asset.child_text("downloadUrl") {
            Some(url) if !url.is_empty() => {
                Some(AssetCandidate::from_text(asset.child_text("frameWidth"), url))
            }
            _ => {
                warn!("忽略没有 downloadUrl 的媒体文件");
                None
            }
        })
        .collect()
}

fn thumbnail_candidates(doc: &XmlElement, base_uri: &str) -> Vec<AssetCandidate> {
    doc.descendants("variant")
        .into_iter()
        .filter_map(|variant| {
            let url = variant.child_text("url").filter(|u| !u.is_empty())?;
            match absolute_url(base_uri, url) {
                Ok(location) => Some(AssetCandidate::from_text(variant.child_text("width"), location)),
                Err(e) => {
                    warn!("忽略无法解析的缩略图地址 '{}': {}", url, e);
                    None
                }
            }
        })
        .collect()
}
