// src/extractor/queries.rs

//! 查询接口使用的三个固定查询模板

use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplate {
    pub name: &'static str,
    pub text: &'static str,
}

impl QueryTemplate {
    pub fn body(&self, variables: Value) -> Value {
        json!({
            "operationName": self.name,
            "query": self.text,
            "variables": variables,
        })
    }
}

pub static CATALOG_BY_PARTITION: QueryTemplate = QueryTemplate {
    name: "CatalogByPartition",
    text: r#"query CatalogByPartition($seriesFilter: SeriesFilter) {
  viewer {
    allSeries(first: 1000, orderBy: TITLE_ASC, filter: $seriesFilter) {
      edges { node { id title } }
    }
  }
}"#,
};

pub static PROGRAM_EPISODES: QueryTemplate = QueryTemplate {
    name: "ProgramEpisodes",
    text: r#"query ProgramEpisodes($id: ID!, $count: Int) {
  series: node(id: $id) {
    ... on Series {
      episodes(first: $count, orderBy: VERSIONFROM_DESC) {
        edges {
          node {
            id
            title
            duration
            versionFrom
            defaultTeaserImage {
              imageFiles(first: 20) { edges { node { publicLocation width } } }
            }
          }
        }
      }
    }
  }
}"#,
};

pub static VIDEO_DETAIL: QueryTemplate = QueryTemplate {
    name: "VideoDetail",
    text: r#"query VideoDetail($clipId: ID!) {
  video: node(id: $clipId) {
    ... on ClipInterface {
      title
      description
      videoFiles(first: 50) {
        edges { node { publicLocation videoProfile { height width } } }
      }
    }
  }
}"#,
};

pub fn catalog_variables(title_filter: Value) -> Value {
    json!({
        "seriesFilter": {
            "title": title_filter,
            "audioOnly": { "eq": false },
        }
    })
}

pub fn episodes_variables(program_id: &str, count: u32) -> Value {
    json!({ "id": program_id, "count": count })
}

pub fn detail_variables(clip_id: &str) -> Value {
    json!({ "clipId": clip_id })
}
