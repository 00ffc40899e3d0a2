// src/symbols.rs

use std::sync::LazyLock;
use colored::{Colorize, ColoredString};

pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
pub static FOLDER: LazyLock<ColoredString> = LazyLock::new(|| "[+]".blue());
pub static VIDEO: LazyLock<ColoredString> = LazyLock::new(|| "[>]".green());
pub static CTRL_C: LazyLock<ColoredString> = LazyLock::new(|| "Ctrl+C".yellow());
