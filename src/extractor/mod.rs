// src/extractor/mod.rs

pub mod fields;
pub mod graphql;
pub mod markup;
pub mod partition;
pub mod player_config;
pub mod queries;
mod xml;

use crate::{
    error::*,
    locator::{Locator, Scheme},
    models::{OverviewPage, VideoPage},
};
use async_trait::async_trait;
use url::Url;

/// 一种上游表示 (网页或查询接口) 的适配器。
/// 只负责抓取并规范化记录，不做任何树状态上的决定。
#[async_trait]
pub trait CatalogExtractor: Send + Sync {
    /// 该适配器产生的定位符所用的语法
    fn scheme(&self) -> Scheme;

    fn root_locator(&self) -> AppResult<Locator>;

    /// 根节点的子节点：每个分区一个分类页
    async fn list_categories(&self) -> AppResult<Vec<OverviewPage>>;

    /// 某个分区下的所有节目
    async fn list_programs(&self, partition: &str) -> AppResult<Vec<OverviewPage>>;

    /// 节目落地页自身的主视频；没有时返回 `Ok(None)`
    async fn primary_video(&self, program: &Locator) -> AppResult<Option<VideoPage>>;

    /// 节目的剧集列表，只包含视频外壳 (尚未解析播放地址)
    async fn list_episodes(&self, program: &Locator) -> AppResult<Vec<VideoPage>>;

    /// 补全视频的描述和播放地址
    async fn resolve_video(&self, video: &VideoPage) -> AppResult<VideoPage>;
}

/// 将站内链接转换为不带片段的绝对地址
pub(crate) fn absolute_url(base: &str, href: &str) -> AppResult<String> {
    let mut url = Url::parse(base)?.join(href.trim())?;
    url.set_fragment(None);
    Ok(url.to_string())
}
