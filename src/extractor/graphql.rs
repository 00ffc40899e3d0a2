// src/extractor/graphql.rs

use super::{
    CatalogExtractor,
    fields::{self, AssetCandidate},
    partition::{PARTITIONS, Partition},
    queries::{self, QueryTemplate},
};
use crate::{
    client::Transport,
    config::AppConfig,
    constants,
    error::*,
    locator::{Locator, NodeKind, Scheme},
    models::{
        OverviewPage, VideoPage,
        api::{CatalogData, EpisodeNode, EpisodesData, GraphqlResponse, VideoDetailData},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// 通过分页查询接口读取目录的当前适配器
pub struct GraphqlExtractor {
    transport: Arc<dyn Transport>,
    endpoint: String,
    page_size: u32,
}

impl GraphqlExtractor {
    pub fn new(transport: Arc<dyn Transport>, config: &AppConfig) -> Self {
        Self {
            transport,
            endpoint: config.graphql_uri.clone(),
            page_size: config.episode_page_size,
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        template: &QueryTemplate,
        variables: Value,
    ) -> AppResult<T> {
        debug!("提交查询 {} 变量: {}", template.name, variables);
        let body = template.body(variables);
        let text = self
            .transport
            .post_json(&self.endpoint, constants::GRAPHQL_HEADERS, &body, constants::CHARSET)
            .await?;
        decode_response(template.name, &text)
    }
}

/// 解析查询响应。任何一层嵌套对象缺失都视为结构错误，不做部分恢复。
pub fn decode_response<T: DeserializeOwned>(query: &str, text: &str) -> AppResult<T> {
    let response: GraphqlResponse<T> =
        serde_json::from_str(text).map_err(|e| AppError::shape(query, e.to_string()))?;
    match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!(
                    "查询 {} 返回了部分错误: {}",
                    query,
                    response.errors.iter().map(|e| e.message.as_str()).join("; ")
                );
            }
            Ok(data)
        }
        None if response.errors.is_empty() => Err(AppError::shape(query, "响应中缺少 data")),
        None => Err(AppError::shape(
            query,
            response.errors.iter().map(|e| e.message.as_str()).join("; "),
        )),
    }
}

fn episode_shell(node: EpisodeNode) -> AppResult<VideoPage> {
    let locator = Locator::current(NodeKind::Video, node.id)?;
    let title = node.title.unwrap_or_default();
    let publish_date = match node.version_from.as_deref() {
        Some(text) => fields::parse_iso_timestamp(text),
        None => {
            warn!("剧集 '{}' 缺少发布时间，使用 Unix 纪元", title);
            DateTime::<Utc>::UNIX_EPOCH
        }
    };
    let thumbnail = fields::select_thumbnail(
        node.default_teaser_image
            .and_then(|image| image.image_files)
            .into_iter()
            .flat_map(|files| files.into_nodes())
            .filter_map(|file| {
                let location = file.public_location?;
                Some(AssetCandidate::from_json(file.width.as_ref(), location))
            }),
    );

    Ok(VideoPage {
        publish_date,
        duration: fields::seconds_from_json(node.duration.as_ref()),
        thumbnail,
        ..VideoPage::shell(locator, title)
    })
}

#[async_trait]
impl CatalogExtractor for GraphqlExtractor {
    fn scheme(&self) -> Scheme {
        Scheme::Current
    }

    fn root_locator(&self) -> AppResult<Locator> {
        Locator::current(NodeKind::Root, constants::locator::ROOT_ID)
    }

    async fn list_categories(&self) -> AppResult<Vec<OverviewPage>> {
        PARTITIONS
            .iter()
            .map(|p| Ok(OverviewPage::new(Locator::current(NodeKind::Letter, p.key)?, p.key)))
            .collect()
    }

    async fn list_programs(&self, partition: &str) -> AppResult<Vec<OverviewPage>> {
        let Some(part) = Partition::find(partition) else {
            return Err(AppError::MalformedLocator {
                locator: partition.to_string(),
                reason: "未知的目录分区".into(),
            });
        };
        let data: CatalogData = self
            .query(
                &queries::CATALOG_BY_PARTITION,
                queries::catalog_variables(part.title_filter()),
            )
            .await?;

        let programs = data
            .viewer
            .all_series
            .into_nodes()
            .map(|series| {
                Ok(OverviewPage::new(
                    Locator::current(NodeKind::Program, series.id)?,
                    series.title.unwrap_or_default(),
                ))
            })
            .collect::<AppResult<Vec<_>>>()?;
        info!("分区 '{}' 中找到 {} 个节目", part.key, programs.len());
        Ok(programs)
    }

    async fn primary_video(&self, program: &Locator) -> AppResult<Option<VideoPage>> {
        debug!("查询接口中的节目没有落地页主视频: {}", program);
        Ok(None)
    }

    async fn list_episodes(&self, program: &Locator) -> AppResult<Vec<VideoPage>> {
        let data: EpisodesData = self
            .query(
                &queries::PROGRAM_EPISODES,
                queries::episodes_variables(program.id(), self.page_size),
            )
            .await?;
        let episodes = data
            .series
            .episodes
            .into_nodes()
            .map(episode_shell)
            .collect::<AppResult<Vec<_>>>()?;
        info!("节目 '{}' 中找到 {} 个剧集", program, episodes.len());
        Ok(episodes)
    }

    async fn resolve_video(&self, video: &VideoPage) -> AppResult<VideoPage> {
        let data: VideoDetailData = self
            .query(&queries::VIDEO_DETAIL, queries::detail_variables(video.locator.id()))
            .await?;
        let clip = data.video;

        let video_uri = fields::select_best(clip.video_files.into_nodes().filter_map(|file| {
            let location = file.public_location?;
            let height = file.video_profile.and_then(|profile| profile.height);
            Some(AssetCandidate::from_json(height.as_ref(), location))
        }));

        let title = if video.title.is_empty() {
            clip.title.unwrap_or_default()
        } else {
            video.title.clone()
        };
        Ok(VideoPage {
            title,
            description: clip.description.unwrap_or_default(),
            video_uri,
            ..video.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_catalog_response() {
        let text = json!({
            "data": {"viewer": {"allSeries": {"edges": [
                {"node": {"id": "av:1", "title": "Alpha"}},
                {"node": {"id": "av:2", "title": null}}
            ]}}}
        })
        .to_string();
        let data: CatalogData = decode_response("CatalogByPartition", &text).unwrap();
        let nodes: Vec<_> = data.viewer.all_series.into_nodes().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].title.as_deref(), Some("Alpha"));
        assert_eq!(nodes[1].title, None);
    }

    #[test]
    fn missing_nested_objects_are_shape_errors() {
        for text in [
            json!({"data": {"viewer": {}}}).to_string(),
            json!({"data": {"viewer": {"allSeries": {"edges": [{}]}}}}).to_string(),
            json!({"data": {"viewer": null}}).to_string(),
            json!({}).to_string(),
            "not json".to_string(),
        ] {
            let result = decode_response::<CatalogData>("CatalogByPartition", &text);
            assert!(
                matches!(result, Err(AppError::UnexpectedResponseShape { .. })),
                "应当是结构错误: {text}"
            );
        }
    }

    #[test]
    fn upstream_errors_are_reported_in_shape_error() {
        let text = json!({
            "data": null,
            "errors": [{"message": "boom"}, {"message": "bang"}]
        })
        .to_string();
        let err = decode_response::<CatalogData>("CatalogByPartition", &text).unwrap_err();
        assert!(matches!(err, AppError::UnexpectedResponseShape { ref detail, .. } if detail == "boom; bang"));
    }

    #[test]
    fn episode_shells_tolerate_poor_content() {
        let text = json!({"data": {"series": {"episodes": {"edges": [
            {"node": {
                "id": "av:clip-1",
                "title": "Folge 1",
                "duration": 1800,
                "versionFrom": "2018-04-22T23:30:00.000Z",
                "defaultTeaserImage": {"imageFiles": {"edges": [
                    {"node": {"publicLocation": "https://img/s.jpg", "width": 320}},
                    {"node": {"publicLocation": "https://img/l.jpg", "width": 1280}},
                    {"node": {"publicLocation": "https://img/x.jpg", "width": "n/a"}}
                ]}}
            }},
            {"node": {"id": "av:clip-2", "title": "Folge 2", "duration": null, "versionFrom": "bald"}}
        ]}}}})
        .to_string();
        let data: EpisodesData = decode_response("ProgramEpisodes", &text).unwrap();
        let shells: Vec<_> = data
            .series
            .episodes
            .into_nodes()
            .map(episode_shell)
            .collect::<AppResult<_>>()
            .unwrap();

        assert_eq!(shells[0].locator.as_str(), "brmediathek://video/av:clip-1");
        assert_eq!(shells[0].duration, 1800);
        assert_eq!(shells[0].publish_date, Utc.with_ymd_and_hms(2018, 4, 22, 23, 30, 0).unwrap());
        assert_eq!(shells[0].thumbnail.as_deref(), Some("https://img/l.jpg"));
        assert_eq!(shells[0].video_uri, None);

        assert_eq!(shells[1].duration, 0);
        assert_eq!(shells[1].publish_date, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(shells[1].thumbnail, None);
    }
}
