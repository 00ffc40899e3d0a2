// src/resolver.rs

//! 层级解析器：根据节点定位符的类型和语法，决定调用哪个适配器，
//! 并把结果 (子节点或视频字段) 附加回节点。
//!
//! 解析是惰性的，只有宿主显式请求时才展开某个节点。
//! 每次解析都是严格顺序的 抓取 → 解析 → 规范化 → 附加，解析器本身不持有可变共享状态。

use crate::{
    client::Transport,
    config::{AppConfig, Strategy},
    constants,
    error::*,
    extractor::{
        CatalogExtractor, graphql::GraphqlExtractor, markup::MarkupExtractor,
        partition::Partition,
    },
    locator::{Locator, NodeKind, Scheme},
    models::{OverviewPage, Page, VideoPage},
};
use log::{debug, info, warn};
use std::sync::Arc;

pub struct Resolver {
    markup: Arc<dyn CatalogExtractor>,
    graphql: Arc<dyn CatalogExtractor>,
    default_scheme: Scheme,
}

impl Resolver {
    pub fn new(transport: Arc<dyn Transport>, config: &AppConfig) -> Self {
        Self::with_extractors(
            Arc::new(MarkupExtractor::new(transport.clone(), config)),
            Arc::new(GraphqlExtractor::new(transport, config)),
            config.strategy,
        )
    }

    pub fn with_extractors(
        markup: Arc<dyn CatalogExtractor>,
        graphql: Arc<dyn CatalogExtractor>,
        strategy: Strategy,
    ) -> Self {
        let default_scheme = match strategy {
            Strategy::Markup => Scheme::Legacy,
            Strategy::Graphql => Scheme::Current,
        };
        Self {
            markup,
            graphql,
            default_scheme,
        }
    }

    fn extractor_for(&self, scheme: Scheme) -> &dyn CatalogExtractor {
        match scheme {
            Scheme::Legacy => self.markup.as_ref(),
            Scheme::Current => self.graphql.as_ref(),
        }
    }

    /// 返回根节点，其直接子节点 (分类) 已经填充
    pub async fn resolve_root(&self) -> AppResult<Page> {
        let extractor = self.extractor_for(self.default_scheme);
        debug!("根节点使用 {:?} 适配器", extractor.scheme());
        let locator = extractor.root_locator()?;
        let root = Page::from_locator(locator, constants::PROVIDER_TITLE);
        self.resolve(&root).await
    }

    /// 解析任意一个之前返回的节点。
    ///
    /// 可展开节点返回填充了子节点的副本；视频节点返回补全了描述和播放地址的副本。
    /// 出错时传入的节点保持不变。
    pub async fn resolve(&self, page: &Page) -> AppResult<Page> {
        let locator = page.locator().clone();
        let extractor = self.extractor_for(locator.scheme());
        debug!("解析 {} 节点 {}", locator.kind(), locator);

        if let Page::Overview(overview) = page
            && locator.kind().is_expandable()
            && !overview.children.is_empty()
        {
            debug!("节点 {} 已经展开，保持不变", locator);
            return Ok(page.clone());
        }

        // 子节点先完整收集，成功后才附加，失败时不会留下半更新的节点
        let children = match locator.kind() {
            NodeKind::Video => {
                let shell = match page {
                    Page::Video(video) => video.clone(),
                    Page::Overview(overview) => VideoPage::shell(locator, overview.title.clone()),
                };
                return self.refine_video(extractor, shell).await.map(Page::Video);
            }
            NodeKind::Root => self.expand_root(extractor).await?,
            NodeKind::Letter => self.expand_category(extractor, &locator).await?,
            NodeKind::Program => self.expand_program(extractor, &locator).await?,
        };

        let mut node = match page {
            Page::Overview(overview) => overview.clone(),
            Page::Video(video) => OverviewPage::new(locator, video.title.clone()),
        };
        node.children.extend(children);
        info!("节点 '{}' 展开得到 {} 个子节点", node.title, node.children.len());
        Ok(Page::Overview(node))
    }

    async fn expand_root(&self, extractor: &dyn CatalogExtractor) -> AppResult<Vec<Page>> {
        let categories = extractor.list_categories().await?;
        // 网页总览会直接带出各分类的节目，同样按分区过滤
        Ok(categories
            .into_iter()
            .map(|mut category| {
                let programs = std::mem::take(&mut category.children);
                category.children = admit_by_partition(category.locator.id(), programs);
                Page::from(category)
            })
            .collect())
    }

    async fn expand_category(
        &self,
        extractor: &dyn CatalogExtractor,
        locator: &Locator,
    ) -> AppResult<Vec<Page>> {
        let programs = extractor.list_programs(locator.id()).await?;
        Ok(admit_by_partition(
            locator.id(),
            programs.into_iter().map(Page::from).collect(),
        ))
    }

    async fn expand_program(
        &self,
        extractor: &dyn CatalogExtractor,
        locator: &Locator,
    ) -> AppResult<Vec<Page>> {
        let mut children = Vec::new();

        // 很多节目的落地页本身没有视频，主视频查找失败不影响剧集列表
        match extractor.primary_video(locator).await {
            Ok(Some(video)) if video.is_resolved() => children.push(Page::Video(video)),
            Ok(Some(video)) => warn!("节目页上的视频 '{}' 没有可播放文件，已忽略", video.title),
            Ok(None) => debug!("节目页 {} 上没有主视频", locator),
            Err(e) => warn!("节目页 {} 上没有找到视频: {}", locator, e),
        }

        let episodes = extractor.list_episodes(locator).await?;
        children.extend(episodes.into_iter().map(Page::Video));
        Ok(children)
    }

    async fn refine_video(
        &self,
        extractor: &dyn CatalogExtractor,
        shell: VideoPage,
    ) -> AppResult<VideoPage> {
        let video = extractor.resolve_video(&shell).await?;
        if !video.is_resolved() {
            return Err(AppError::NoPlayableAsset {
                locator: shell.locator.to_string(),
            });
        }
        debug!("视频 '{}' 的播放地址: {:?}", video.title, video.video_uri);
        Ok(video)
    }
}

/// 只保留标题属于该分区的节目；不在分区表中的分类键不过滤
fn admit_by_partition(key: &str, mut programs: Vec<Page>) -> Vec<Page> {
    if let Some(partition) = Partition::find(key) {
        programs.retain(|program| {
            let admitted = partition.admits(program.title());
            if !admitted {
                debug!("节目 '{}' 不属于分区 '{}'，已忽略", program.title(), partition.key);
            }
            admitted
        });
    }
    programs
}
