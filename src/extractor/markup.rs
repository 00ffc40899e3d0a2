// src/extractor/markup.rs

use super::{CatalogExtractor, absolute_url, player_config::parse_player_config};
use crate::{
    client::Transport,
    config::AppConfig,
    constants,
    error::*,
    locator::{Locator, NodeKind, Scheme},
    models::{OverviewPage, Page, VideoPage},
};
use async_trait::async_trait;
use itertools::Itertools;
use log::{debug, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};

static BROADCAST_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.broadcastList").unwrap());
static PROGRAM_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.clearFix li").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static LINK_LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a > span").unwrap());
static SERIES_TEASERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#teaserBundleSeries article a").unwrap());
static HOME_TEASERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#teaserBundleHome article a").unwrap());
static TEASER_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".name").unwrap());
static TEASER_EPISODE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".episode").unwrap());

static PLAYER_SETUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.setup\(\{dataURL:'([^']+)'\}").unwrap());

/// 解析服务端渲染的网页和播放器 XML 配置的旧适配器
pub struct MarkupExtractor {
    transport: Arc<dyn Transport>,
    base_uri: String,
    root_uri: String,
}

impl MarkupExtractor {
    pub fn new(transport: Arc<dyn Transport>, config: &AppConfig) -> Self {
        Self {
            transport,
            base_uri: config.base_uri.clone(),
            root_uri: config.root_uri.clone(),
        }
    }

    async fn fetch(&self, url: &str) -> AppResult<String> {
        self.transport.fetch_text(url, &[], constants::CHARSET).await
    }

    /// 从落地页中找到播放器配置并解析；页面上没有播放器时返回 `Ok(None)`
    async fn video_from_page(&self, page_url: &str) -> AppResult<Option<VideoPage>> {
        debug!("加载视频页面 {}", page_url);
        let content = self.fetch(page_url).await?;
        let Some(path) = find_player_config_path(&content) else {
            return Ok(None);
        };
        let config_url = absolute_url(&self.base_uri, &path)?;
        debug!("找到播放器配置 {}", config_url);
        let xml = self.fetch(&config_url).await?;
        let video = parse_player_config(&xml, &self.base_uri)?;
        debug!("视频地址 {:?}", video.video_uri);
        Ok(Some(video))
    }
}

#[async_trait]
impl CatalogExtractor for MarkupExtractor {
    fn scheme(&self) -> Scheme {
        Scheme::Legacy
    }

    fn root_locator(&self) -> AppResult<Locator> {
        Locator::legacy(NodeKind::Root, self.root_uri.as_str())
    }

    async fn list_categories(&self) -> AppResult<Vec<OverviewPage>> {
        let content = self.fetch(&self.root_uri).await?;
        let categories = parse_category_listing(&content, &self.base_uri)?;
        info!("节目总览中找到 {} 个分类", categories.len());
        Ok(categories)
    }

    async fn list_programs(&self, partition: &str) -> AppResult<Vec<OverviewPage>> {
        let categories = self.list_categories().await?;
        match categories.into_iter().find(|c| c.title.eq_ignore_ascii_case(partition)) {
            Some(category) => Ok(category
                .children
                .into_iter()
                .filter_map(|child| match child {
                    Page::Overview(program) => Some(program),
                    Page::Video(_) => None,
                })
                .collect()),
            None => {
                warn!("节目总览中没有分类 '{}'", partition);
                Ok(Vec::new())
            }
        }
    }

    async fn primary_video(&self, program: &Locator) -> AppResult<Option<VideoPage>> {
        self.video_from_page(program.id()).await
    }

    async fn list_episodes(&self, program: &Locator) -> AppResult<Vec<VideoPage>> {
        let content = self.fetch(program.id()).await?;
        let episodes = parse_teasers(&content, &self.base_uri)?;
        info!("节目 '{}' 中找到 {} 个剧集", program, episodes.len());
        Ok(episodes)
    }

    async fn resolve_video(&self, video: &VideoPage) -> AppResult<VideoPage> {
        let page_url = video.locator.id();
        let resolved = self
            .video_from_page(page_url)
            .await?
            .ok_or_else(|| AppError::missing("dataURL", page_url))?;

        // 定位符和已有标题保持不变，其余字段以上游为准
        let title = if video.title.is_empty() {
            resolved.title
        } else {
            video.title.clone()
        };
        Ok(VideoPage {
            locator: video.locator.clone(),
            title,
            ..resolved
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).join(" ")
}

/// 节目总览：每个 `div.broadcastList` 是一个分类，其中每个列表项是一个节目
pub fn parse_category_listing(html: &str, base_uri: &str) -> AppResult<Vec<OverviewPage>> {
    let document = Html::parse_document(html);
    let mut categories = Vec::new();

    for container in document.select(&BROADCAST_LIST) {
        let key = container
            .value()
            .attr("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::missing("id", "div.broadcastList"))?;
        let mut category = OverviewPage::new(Locator::legacy(NodeKind::Letter, key)?, key);

        for item in container.select(&PROGRAM_ITEMS) {
            let href = item
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| AppError::missing("a[href]", format!("分类 {}", key)))?;
            let title = item
                .select(&LINK_LABEL)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::missing("a > span", format!("分类 {}", key)))?;
            let locator = Locator::legacy(NodeKind::Program, absolute_url(base_uri, href)?)?;
            category.children.push(OverviewPage::new(locator, title).into());
        }
        debug!("分类 '{}' 包含 {} 个节目", key, category.children.len());
        categories.push(category);
    }

    Ok(categories)
}

/// 页面内嵌的 `.setup({dataURL:'...'})` 调用给出播放器配置的路径
pub fn find_player_config_path(html: &str) -> Option<String> {
    PLAYER_SETUP_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 节目页上的剧集预告链接，优先使用系列区块，没有时退回首页区块
pub fn parse_teasers(html: &str, base_uri: &str) -> AppResult<Vec<VideoPage>> {
    let document = Html::parse_document(html);
    let mut links: Vec<ElementRef<'_>> = document.select(&SERIES_TEASERS).collect();
    if links.is_empty() {
        links = document.select(&HOME_TEASERS).collect();
    }

    links
        .into_iter()
        .map(|link| {
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| AppError::missing("href", "剧集预告"))?;
            let name = link
                .select(&TEASER_NAME)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::missing(".name", href))?;
            let title = match link.select(&TEASER_EPISODE).next().map(element_text) {
                Some(episode) if !episode.is_empty() => format!("{} - {}", name, episode),
                _ => name,
            };
            let locator = Locator::legacy(NodeKind::Video, absolute_url(base_uri, href)?)?;
            Ok(VideoPage::shell(locator, title))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://www.br.de";

    #[test]
    fn parses_categories_with_programs() {
        let html = r#"<html><body>
            <div class="broadcastList" id="A">
              <ul class="clearFix">
                <li><a href="/mediathek/video/sendungen/abendschau/index.html"><img src="x.jpg"/><span>Abendschau</span></a></li>
                <li><a href="/mediathek/video/sendungen/alpha/index.html"><span> alpha-Forum </span></a></li>
              </ul>
            </div>
            <div class="broadcastList" id="B"><ul class="clearFix"></ul></div>
        </body></html>"#;

        let categories = parse_category_listing(html, BASE).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].title, "A");
        assert_eq!(categories[0].locator.as_str(), "http://www.br.de#letter=A");
        let titles: Vec<_> = categories[0].children.iter().map(Page::title).collect();
        assert_eq!(titles, ["Abendschau", "alpha-Forum"]);
        assert_eq!(
            categories[0].children[0].locator().id(),
            "http://www.br.de/mediathek/video/sendungen/abendschau/index.html"
        );
        assert_eq!(categories[0].children[0].locator().kind(), NodeKind::Program);
        assert!(categories[1].children.is_empty());
    }

    #[test]
    fn program_item_without_label_is_an_error() {
        let html = r#"<div class="broadcastList" id="C"><ul class="clearFix"><li><a href="/c.html"></a></li></ul></div>"#;
        assert!(matches!(
            parse_category_listing(html, BASE),
            Err(AppError::RequiredFieldMissing { .. })
        ));
    }

    #[test]
    fn finds_embedded_player_config() {
        let html = r#"<script>player.setup({dataURL:'/mediathek/video/abendschau-100~xml.xml'});</script>"#;
        assert_eq!(
            find_player_config_path(html).as_deref(),
            Some("/mediathek/video/abendschau-100~xml.xml")
        );
        assert_eq!(find_player_config_path("<p>kein Player</p>"), None);
    }

    #[test]
    fn parses_series_teasers_before_home_teasers() {
        let html = r#"
            <section id="teaserBundleSeries"><article>
              <a href="/v/1.html"><span class="name">Abendschau</span><span class="episode">Folge 1</span></a>
            </article><article>
              <a href="/v/2.html"><span class="name">Abendschau</span></a>
            </article></section>
            <section id="teaserBundleHome"><article><a href="/v/home.html"><span class="name">Home</span></a></article></section>"#;

        let episodes = parse_teasers(html, BASE).unwrap();
        let titles: Vec<_> = episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Abendschau - Folge 1", "Abendschau"]);
        assert_eq!(episodes[0].locator.as_str(), "http://www.br.de/v/1.html#video");
        assert!(!episodes[0].is_resolved());
    }

    #[test]
    fn falls_back_to_home_teasers() {
        let html = r#"<section id="teaserBundleHome"><article><a href="/v/home.html"><span class="name">Home</span><span class="episode">Spezial</span></a></article></section>"#;
        let episodes = parse_teasers(html, BASE).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].title, "Home - Spezial");
    }
}
