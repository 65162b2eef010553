use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "node_kind", rename_all = "UPPERCASE")]
pub enum NodeKind {
    File,
    Folder,
}

/// One record of an import batch. `type` arrives as a raw string so that an
/// unknown variant is reported per item id instead of failing payload
/// deserialization wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportItem {
    pub id: String,
    pub url: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub size: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub items: Vec<ImportItem>,
    #[serde(rename = "updateDate")]
    pub update_date: String,
}

/// Flat row as stored; folder `size` is always NULL here.
#[derive(Debug, Clone, FromRow)]
pub struct NodeRow {
    pub id: String,
    pub url: Option<String>,
    pub parent_id: Option<String>,
    pub kind: NodeKind,
    pub size: Option<i64>,
    pub date_updated: DateTime<Utc>,
}

/// Nested subtree view. `size` is computed for folders; `children` is an
/// array (possibly empty) for folders and JSON null for files.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub url: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub date: String,
    pub children: Option<Vec<NodeView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedNode {
    pub id: String,
    pub url: Option<String>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatesResponse {
    pub items: Vec<UpdatedNode>,
}
