// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const TITLE_TRUNCATE_LENGTH: usize = 70;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const CHARSET: &str = "UTF-8";
pub const PROVIDER_TITLE: &str = "BR Mediathek";

pub mod endpoints {
    pub const BASE_URI: &str = "http://www.br.de";
    pub const ROOT_PATH: &str = "/mediathek/video/sendungen/index.html";
    pub const GRAPHQL_URI: &str = "https://api.mediathek.br.de/graphql";
}

pub mod locator {
    pub const CURRENT_SCHEME: &str = "brmediathek";
    pub const ROOT_ID: &str = "catalog";
    pub const KIND_ROOT: &str = "root";
    pub const KIND_LETTER: &str = "letter";
    pub const KIND_PROGRAM: &str = "program";
    pub const KIND_VIDEO: &str = "video";
}

pub mod defaults {
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const TIMEOUT_SECS: u64 = 60;
    pub const MAX_RETRIES: u32 = 0;
    pub const EPISODE_PAGE_SIZE: u32 = 50;
}

/// 查询接口固定使用的请求头
pub const GRAPHQL_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
    ("Origin", "https://www.br.de"),
    ("Referer", "https://www.br.de/mediathek/"),
    ("x-client-name", "br-mediathek-web"),
];
