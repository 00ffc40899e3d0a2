// src/workflows.rs

use crate::{
    ResolveContext,
    error::{AppError, AppResult},
    locator::{Locator, NodeKind},
    models::Page,
    symbols, ui, utils,
};
use colored::*;
use log::{debug, error};

fn emit(page: &Page, context: &ResolveContext) -> AppResult<()> {
    if context.args.json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        ui::print_page(page);
    }
    Ok(())
}

/// 列出根节点 (--root)
pub(crate) async fn run_root(context: ResolveContext) -> AppResult<()> {
    let root = context.resolver.resolve_root().await?;
    emit(&root, &context)
}

/// 解析单个定位符 (--locator)
pub(crate) async fn run_locator(locator: Locator, context: ResolveContext) -> AppResult<()> {
    // 视频标题留空，由上游详情补全
    let title = match locator.kind() {
        NodeKind::Video => String::new(),
        _ => locator.id().to_string(),
    };
    let page = Page::from_locator(locator, title);
    let resolved = context.resolver.resolve(&page).await?;
    emit(&resolved, &context)
}

/// 交互模式：逐级展开目录，0 返回上一级，空行退出
pub(crate) async fn run_interactive(context: ResolveContext) -> AppResult<()> {
    // 栈中每一项记录节点及其在父节点中的序号，返回上一级时写回父节点
    let mut stack: Vec<(Page, Option<usize>)> = vec![(context.resolver.resolve_root().await?, None)];

    loop {
        let Some((current, _)) = stack.last() else { break };
        ui::print_page(current);
        let total = current.children().len();

        let input = match ui::prompt(&format!(
            "输入序号展开，0 返回上一级，直接回车退出 (按 {} 可退出)",
            *symbols::CTRL_C
        )) {
            Ok(input) => input,
            Err(_) => return Err(AppError::UserInterrupt),
        };

        if input.is_empty() {
            break;
        }
        if input == "0" {
            pop_into_parent(&mut stack);
            continue;
        }
        let Some(index) = utils::parse_menu_index(&input, total) else {
            eprintln!("\n{} 无效的选择 '{}'。", *symbols::WARN, input);
            continue;
        };

        let child = current.children()[index].clone();
        match context.resolver.resolve(&child).await {
            Ok(resolved) if resolved.is_terminal() => {
                ui::print_page(&resolved);
                replace_child(&mut stack, index, resolved);
            }
            Ok(resolved) => stack.push((resolved, Some(index))),
            Err(e) => {
                error!("解析节点 '{}' 失败: {}", child.locator(), e);
                eprintln!("\n{} 解析失败: {}", *symbols::ERROR, e.to_string().red());
            }
        }
    }

    println!("\n{} 退出交互模式。", *symbols::INFO);
    Ok(())
}

fn pop_into_parent(stack: &mut Vec<(Page, Option<usize>)>) {
    if stack.len() <= 1 {
        println!("\n{} 已经在根节点。", *symbols::INFO);
        return;
    }
    if let Some((page, Some(index))) = stack.pop() {
        replace_child(stack, index, page);
    }
}

fn replace_child(stack: &mut [(Page, Option<usize>)], index: usize, resolved: Page) {
    if let Some((Page::Overview(parent), _)) = stack.last_mut()
        && let Some(slot) = parent.children.get_mut(index)
    {
        debug!("更新子节点 {}", resolved.locator());
        *slot = resolved;
    }
}
