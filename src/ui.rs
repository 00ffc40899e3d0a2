// src/ui.rs

use crate::{
    constants,
    models::{OverviewPage, Page, VideoPage},
    symbols, utils,
};
use colored::*;
use std::io::{self, Write};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn box_message(title: &str, content: &[String], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

/// 读取一行输入并去掉两端空白，标准输入关闭时返回错误
pub fn prompt(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "输入已结束"));
    }
    Ok(input.trim().to_string())
}

pub fn print_page(page: &Page) {
    match page {
        Page::Overview(overview) => print_overview(overview),
        Page::Video(video) => print_video(video),
    }
}

fn print_overview(page: &OverviewPage) {
    print_header(&page.title);
    println!(" {} {}", *symbols::INFO, page.locator.as_str().dimmed());
    if page.children.is_empty() {
        println!("\n {} 此节点没有子节点。", *symbols::WARN);
        return;
    }
    let pad = page.children.len().to_string().len();
    for (i, child) in page.children.iter().enumerate() {
        let marker = if child.is_terminal() { &*symbols::VIDEO } else { &*symbols::FOLDER };
        println!(
            "  [{}] {} {}",
            format!("{:<pad$}", i + 1, pad = pad).yellow(),
            marker,
            utils::truncate_text(child.title(), constants::TITLE_TRUNCATE_LENGTH)
        );
    }
}

fn print_video(video: &VideoPage) {
    let mut lines = vec![
        format!("定位符: {}", video.locator),
        format!("发布时间: {}", video.publish_date.format("%Y-%m-%d %H:%M")),
        format!("时长: {}", utils::format_duration(video.duration)),
        format!("缩略图: {}", video.thumbnail.as_deref().unwrap_or("-")),
        format!(
            "播放地址: {}",
            video.video_uri.as_deref().unwrap_or("(尚未解析)")
        ),
    ];
    if !video.description.is_empty() {
        lines.push(String::new());
        lines.push(utils::truncate_text(&video.description, constants::UI_WIDTH * 2));
    }
    box_message(&video.title, &lines, |s| s.cyan());
}
