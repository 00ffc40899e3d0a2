// src/utils.rs

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

pub fn format_duration(total_secs: u64) -> String {
    let (h, m, s) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// 解析交互菜单中的单个序号 (从 1 开始)
pub fn parse_menu_index(input: &str, total_items: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(num) if num > 0 && num <= total_items => Some(num - 1),
        _ => None,
    }
}
