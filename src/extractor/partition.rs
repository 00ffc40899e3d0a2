// src/extractor/partition.rs

//! 目录分区表：A-Z 各一个分区，外加一个非拉丁字母开头的 "0-9" 分区。

use serde_json::{Value, json};

pub const RESIDUAL_KEY: &str = "0-9";
const RESIDUAL_REGEX: &str = "^[^A-Za-z]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionFilter {
    StartsWith(char),
    NotLatinLetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub key: &'static str,
    pub filter: PartitionFilter,
}

const fn letter(key: &'static str, c: char) -> Partition {
    Partition {
        key,
        filter: PartitionFilter::StartsWith(c),
    }
}

#[rustfmt::skip]
pub static PARTITIONS: [Partition; 27] = [
    letter("A", 'A'), letter("B", 'B'), letter("C", 'C'), letter("D", 'D'),
    letter("E", 'E'), letter("F", 'F'), letter("G", 'G'), letter("H", 'H'),
    letter("I", 'I'), letter("J", 'J'), letter("K", 'K'), letter("L", 'L'),
    letter("M", 'M'), letter("N", 'N'), letter("O", 'O'), letter("P", 'P'),
    letter("Q", 'Q'), letter("R", 'R'), letter("S", 'S'), letter("T", 'T'),
    letter("U", 'U'), letter("V", 'V'), letter("W", 'W'), letter("X", 'X'),
    letter("Y", 'Y'), letter("Z", 'Z'),
    Partition {
        key: RESIDUAL_KEY,
        filter: PartitionFilter::NotLatinLetter,
    },
];

impl Partition {
    pub fn find(key: &str) -> Option<&'static Partition> {
        PARTITIONS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
    }

    /// 本地判断一个节目标题是否属于该分区
    pub fn admits(&self, title: &str) -> bool {
        let first = title.trim_start().chars().next();
        match self.filter {
            PartitionFilter::StartsWith(c) => first.is_some_and(|f| f.eq_ignore_ascii_case(&c)),
            PartitionFilter::NotLatinLetter => first.is_some_and(|f| !f.is_ascii_alphabetic()),
        }
    }

    /// 查询接口使用的标题过滤条件
    pub fn title_filter(&self) -> Value {
        match self.filter {
            PartitionFilter::StartsWith(c) => json!({ "startsWith": c.to_string() }),
            PartitionFilter::NotLatinLetter => json!({ "regex": RESIDUAL_REGEX }),
        }
    }
}
