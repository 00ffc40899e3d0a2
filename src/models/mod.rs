// src/models/mod.rs

pub mod api;

use crate::locator::{Locator, NodeKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 可展开的节点 (根、字母分类、节目)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    pub locator: Locator,
    pub title: String,
    /// 插入顺序即展示顺序，只追加不删除
    pub children: Vec<Page>,
}

impl OverviewPage {
    pub fn new(locator: Locator, title: impl Into<String>) -> Self {
        Self {
            locator,
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// 终端节点：一个视频
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoPage {
    pub locator: Locator,
    pub title: String,
    /// 不可用时为空字符串
    pub description: String,
    /// 解析失败时为 Unix 纪元
    pub publish_date: DateTime<Utc>,
    /// 总秒数，解析失败或缺失时为 0
    pub duration: u64,
    pub thumbnail: Option<String>,
    /// 终端解析成功后一定不为空
    pub video_uri: Option<String>,
}

impl VideoPage {
    /// 只带标题和定位符的视频外壳，等待后续解析
    pub fn shell(locator: Locator, title: impl Into<String>) -> Self {
        Self {
            locator,
            title: title.into(),
            description: String::new(),
            publish_date: DateTime::<Utc>::UNIX_EPOCH,
            duration: 0,
            thumbnail: None,
            video_uri: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.video_uri.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Page {
    Overview(OverviewPage),
    Video(VideoPage),
}

impl Page {
    /// 根据定位符类型创建一个空节点
    pub fn from_locator(locator: Locator, title: impl Into<String>) -> Self {
        match locator.kind() {
            NodeKind::Video => Page::Video(VideoPage::shell(locator, title)),
            _ => Page::Overview(OverviewPage::new(locator, title)),
        }
    }

    pub fn locator(&self) -> &Locator {
        match self {
            Page::Overview(p) => &p.locator,
            Page::Video(v) => &v.locator,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Overview(p) => &p.title,
            Page::Video(v) => &v.title,
        }
    }

    pub fn children(&self) -> &[Page] {
        match self {
            Page::Overview(p) => &p.children,
            Page::Video(_) => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Page::Video(_))
    }
}

impl From<OverviewPage> for Page {
    fn from(page: OverviewPage) -> Self {
        Page::Overview(page)
    }
}

impl From<VideoPage> for Page {
    fn from(video: VideoPage) -> Self {
        Page::Video(video)
    }
}
