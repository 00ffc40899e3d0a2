// src/extractor/xml.rs

//! 基于 quick-xml 构建的最小元素树，只提供播放器配置解析所需的查找能力。

use crate::error::{AppError, AppResult};
use quick_xml::{Reader, events::Event};

#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn parse(xml: &str) -> AppResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // 虚拟的文档节点，真正的根元素是它的子节点
        let mut stack = vec![XmlElement::default()];
        loop {
            let event = reader
                .read_event()
                .map_err(|e| AppError::XmlParse(format!("位置 {}: {}", reader.buffer_position(), e)))?;
            match event {
                Event::Start(e) => stack.push(XmlElement {
                    name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    ..Default::default()
                }),
                Event::Empty(e) => {
                    let element = XmlElement {
                        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        ..Default::default()
                    };
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| AppError::XmlParse(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => {
                    let finished = stack
                        .pop()
                        .ok_or_else(|| AppError::XmlParse("多余的结束标签".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(finished),
                        None => return Err(AppError::XmlParse("多余的结束标签".into())),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(AppError::XmlParse("文档在元素闭合前结束".into()));
        }
        stack
            .pop()
            .and_then(|doc| doc.children.into_iter().next())
            .ok_or_else(|| AppError::XmlParse("文档没有根元素".into()))
    }

    /// 只查找直接子元素
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// 文档序遍历所有同名后代元素 (包含自身)
    pub fn descendants<'a>(&'a self, name: &'a str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_descendants(name, found);
        }
    }

    pub fn first_descendant(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.first_descendant(name))
    }
}
