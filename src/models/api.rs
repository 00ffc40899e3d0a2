// src/models/api.rs

//! 查询接口 (GraphQL) 的响应结构体。
//!
//! 结构性的嵌套对象 (data / edges / node / id) 均为必需字段，缺失即反序列化失败；
//! 内容性字段 (标题、时长、尺寸等) 一律为 Option，由字段提取器负责降级。

use serde::Deserialize;
use serde_json::Value;

// --- 通用结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Connection<N> {
    pub edges: Vec<Edge<N>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Edge<N> {
    pub node: N,
}

impl<N> Connection<N> {
    pub fn into_nodes(self) -> impl Iterator<Item = N> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub public_location: Option<String>,
    pub width: Option<Value>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeaserImage {
    pub image_files: Option<Connection<ImageFile>>,
}

// --- 节目目录 (按分区) ---

#[derive(Deserialize, Debug, Clone)]
pub struct CatalogData {
    pub viewer: CatalogViewer,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CatalogViewer {
    pub all_series: Connection<SeriesNode>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SeriesNode {
    pub id: String,
    pub title: Option<String>,
}

// --- 节目的剧集列表 ---

#[derive(Deserialize, Debug, Clone)]
pub struct EpisodesData {
    pub series: SeriesEpisodes,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SeriesEpisodes {
    pub episodes: Connection<EpisodeNode>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeNode {
    pub id: String,
    pub title: Option<String>,
    pub duration: Option<Value>,
    pub version_from: Option<String>,
    pub default_teaser_image: Option<TeaserImage>,
}

// --- 单个视频详情 ---

#[derive(Deserialize, Debug, Clone)]
pub struct VideoDetailData {
    pub video: ClipNode,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClipNode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_files: Connection<VideoFile>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoFile {
    pub public_location: Option<String>,
    pub video_profile: Option<VideoProfile>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VideoProfile {
    pub height: Option<Value>,
    pub width: Option<Value>,
}
