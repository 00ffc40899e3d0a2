// tests/markup_extractor_test.rs

use br_mediathek::{
    client::RobustClient,
    config::{AppConfig, Strategy},
    error::{AppError, AppResult},
    extractor::{CatalogExtractor, markup::MarkupExtractor},
    locator::{Locator, NodeKind, Scheme},
    models::{Page, VideoPage},
    resolver::Resolver,
};
use chrono::{TimeZone, Utc};
use mockito::{Mock, ServerGuard};
use std::fs;
use std::sync::Arc;

const ROOT_PATH: &str = "/mediathek/video/sendungen/index.html";

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name)).expect("无法读取模拟响应文件")
}

async fn serve(server: &mut ServerGuard, path: &str, fixture_name: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(fixture(fixture_name))
        .create_async()
        .await
}

fn markup_config(server_url: &str) -> AppConfig {
    AppConfig {
        strategy: Strategy::Markup,
        ..AppConfig::default()
    }
    .with_base_uri(server_url)
}

fn markup_resolver(server_url: &str) -> AppResult<Resolver> {
    let config = markup_config(server_url);
    let client = Arc::new(RobustClient::new(&config)?);
    Ok(Resolver::new(client, &config))
}

#[tokio::test]
async fn test_root_lists_categories_from_overview_page() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let root_mock = serve(&mut server, ROOT_PATH, "markup_root.html").await;

    let resolver = markup_resolver(&server.url())?;
    let root = resolver.resolve_root().await?;

    root_mock.assert_async().await;
    assert_eq!(root.locator().scheme(), Scheme::Legacy);
    assert_eq!(root.locator().kind(), NodeKind::Root);
    let titles: Vec<_> = root.children().iter().map(Page::title).collect();
    assert_eq!(titles, ["A", "B"]);
    assert!(root.children().iter().all(|c| c.locator().kind() == NodeKind::Letter));

    // 总览页直接带出分类下的节目，错列在 A 下的 "Zeitreise" 被过滤
    let programs: Vec<_> = root.children()[0].children().iter().map(Page::title).collect();
    assert_eq!(programs, ["Abendschau", "alpha-Forum"]);
    assert_eq!(root.children()[1].children().len(), 1);

    // 已经带有节目的分类再次解析时保持不变，不会重新抓取
    let letter_a = resolver.resolve(&root.children()[0]).await?;
    assert_eq!(&letter_a, &root.children()[0]);
    root_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_category_from_bare_locator_filters_by_partition() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let _root_mock = serve(&mut server, ROOT_PATH, "markup_root.html").await;
    let server_url = server.url();

    let resolver = markup_resolver(&server_url)?;
    let locator = Locator::parse("http://www.br.de#letter=A")?;
    let category = resolver.resolve(&Page::from_locator(locator, "A")).await?;

    // "Zeitreise" 被错误地列在 A 下，按分区过滤后不应出现
    let titles: Vec<_> = category.children().iter().map(Page::title).collect();
    assert_eq!(titles, ["Abendschau", "alpha-Forum"]);
    assert_eq!(
        category.children()[0].locator().as_str(),
        format!("{}/sendungen/abendschau/index.html#program", server_url)
    );
    assert_eq!(category.children()[1].locator().kind(), NodeKind::Program);
    Ok(())
}

#[tokio::test]
async fn test_program_with_primary_video_and_episodes() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let _program_mock =
        serve(&mut server, "/sendungen/abendschau/index.html", "markup_program.html").await;
    let config_mock = server
        .mock("GET", "/sendungen/abendschau/player~xml.xml")
        .with_status(200)
        .with_header("content-type", "application/xml; charset=utf-8")
        .with_body(fixture("player_config.xml"))
        .create_async()
        .await;
    let server_url = server.url();

    let resolver = markup_resolver(&server_url)?;
    let program_url = format!("{}/sendungen/abendschau/index.html", server_url);
    let program = Page::from_locator(Locator::legacy(NodeKind::Program, program_url)?, "Abendschau");
    let resolved = resolver.resolve(&program).await?;

    config_mock.assert_async().await;
    let children = resolved.children();
    assert_eq!(children.len(), 3);

    // 第一个子节点是节目页上的主视频，已经完整解析
    let Page::Video(primary) = &children[0] else {
        panic!("第一个子节点应当是视频: {:?}", children[0]);
    };
    assert_eq!(primary.title, "Abendschau");
    assert_eq!(primary.description, "Nachrichten und Geschichten aus Bayern");
    assert_eq!(
        primary.locator.as_str(),
        format!("{}/mediathek/video/abendschau-100.html#video", server_url)
    );
    assert_eq!(primary.publish_date, Utc.with_ymd_and_hms(2018, 4, 22, 0, 0, 0).unwrap());
    assert_eq!(primary.duration, 1785);
    assert_eq!(primary.video_uri.as_deref(), Some("http://cdn.example/abendschau-960.mp4"));
    assert_eq!(
        primary.thumbnail.as_deref(),
        Some(format!("{}/img/abendschau-1024.jpg", server_url).as_str())
    );

    // 其后是剧集外壳，尚未解析
    let episode_titles: Vec<_> = children[1..].iter().map(Page::title).collect();
    assert_eq!(episode_titles, ["Abendschau - Folge 1", "Abendschau - Folge 2"]);
    assert!(children[1..].iter().all(|c| matches!(c, Page::Video(v) if !v.is_resolved())));
    Ok(())
}

#[tokio::test]
async fn test_program_without_player_still_lists_episodes() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let _program_mock = serve(
        &mut server,
        "/sendungen/alpha-forum/index.html",
        "markup_program_plain.html",
    )
    .await;
    let server_url = server.url();

    let config = markup_config(&server_url);
    let extractor = MarkupExtractor::new(Arc::new(RobustClient::new(&config)?), &config);
    let program = Locator::legacy(
        NodeKind::Program,
        format!("{}/sendungen/alpha-forum/index.html", server_url),
    )?;

    assert!(extractor.primary_video(&program).await?.is_none());
    let episodes = extractor.list_episodes(&program).await?;
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "alpha-Forum - Das Gespräch");
    assert_eq!(
        episodes[0].locator.as_str(),
        format!("{}/v/alpha-forum-gespraech.html#video", server_url)
    );
    Ok(())
}

#[tokio::test]
async fn test_video_refinement_keeps_locator_and_is_idempotent() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let _video_mock = serve(&mut server, "/v/abendschau-folge-1.html", "markup_video.html").await;
    let _config_mock = server
        .mock("GET", "/v/abendschau-folge-1~xml.xml")
        .with_status(200)
        .with_body(fixture("player_config.xml"))
        .create_async()
        .await;
    let server_url = server.url();

    let resolver = markup_resolver(&server_url)?;
    let locator = Locator::legacy(
        NodeKind::Video,
        format!("{}/v/abendschau-folge-1.html", server_url),
    )?;
    let shell = Page::Video(VideoPage::shell(locator.clone(), "Abendschau - Folge 1"));

    let first = resolver.resolve(&shell).await?;
    let Page::Video(video) = &first else {
        panic!("视频节点解析后仍应是视频: {:?}", first);
    };
    assert_eq!(video.locator, locator);
    assert_eq!(video.title, "Abendschau - Folge 1");
    assert_eq!(video.duration, 1785);
    assert_eq!(video.video_uri.as_deref(), Some("http://cdn.example/abendschau-960.mp4"));

    let second = resolver.resolve(&first).await?;
    assert_eq!(second, first);
    Ok(())
}

#[tokio::test]
async fn test_video_page_without_player_is_an_error() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let _page_mock = serve(&mut server, "/v/kein-player.html", "markup_program_plain.html").await;
    let server_url = server.url();

    let resolver = markup_resolver(&server_url)?;
    let locator = Locator::legacy(NodeKind::Video, format!("{}/v/kein-player.html", server_url))?;
    let shell = Page::Video(VideoPage::shell(locator, "Ohne Player"));

    let err = resolver.resolve(&shell).await.unwrap_err();
    assert!(
        matches!(err, AppError::RequiredFieldMissing { ref field, .. } if field == "dataURL"),
        "意外的错误: {err}"
    );
    Ok(())
}
