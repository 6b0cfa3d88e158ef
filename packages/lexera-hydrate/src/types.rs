use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::BoardSettings;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Index path into a board: `[lane]` or `[lane, item]`.
pub type Path = Vec<usize>;

/// Rendered markdown, as produced by a `MarkdownRenderer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub html: String,
}

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Append rendered output after the existing content.
    pub fn append_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Visible text of the fragment: markup stripped, common entities decoded.
    pub fn text(&self) -> String {
        let stripped = TAG_RE.replace_all(&self.html, " ");
        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// The view a render is targeted at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContext {
    pub id: String,
    /// Path of the board file shown in this view.
    pub file_path: String,
}

/// A file in the host vault that a link resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub path: String,
    pub basename: String,
    pub extension: String,
}

impl FileHandle {
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let (basename, extension) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot + 1..]),
            _ => (name, ""),
        };
        Self {
            path: path.to_string(),
            basename: basename.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// A `[[link]]` or `![[embed]]` reference inside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAccessor {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_embed: bool,
}

/// Frontmatter value of a linked file, shown alongside the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    List(Vec<String>),
    Text(String),
    Other(serde_json::Value),
}

impl MetadataValue {
    pub fn to_search_text(&self) -> String {
        match self {
            MetadataValue::List(values) => values.join(" "),
            MetadataValue::Text(value) => value.clone(),
            MetadataValue::Other(serde_json::Value::String(value)) => value.clone(),
            MetadataValue::Other(serde_json::Value::Null) => String::new(),
            MetadataValue::Other(value) => value.to_string(),
        }
    }
}

pub type FileMetadata = BTreeMap<String, MetadataValue>;

/// Parsed `timeStr`. Without a `dateStr` only the time of day is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ItemTime {
    TimeOfDay(NaiveTime),
    DateTime(NaiveDateTime),
}

impl ItemTime {
    pub fn time(&self) -> NaiveTime {
        match self {
            ItemTime::TimeOfDay(time) => *time,
            ItemTime::DateTime(dt) => dt.time(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ItemTime::TimeOfDay(_) => None,
            ItemTime::DateTime(dt) => Some(dt.date()),
        }
    }

    /// Full date-time, placing a bare time of day on `fallback`.
    pub fn anchored(&self, fallback: NaiveDate) -> NaiveDateTime {
        match self {
            ItemTime::TimeOfDay(time) => fallback.and_time(*time),
            ItemTime::DateTime(dt) => *dt,
        }
    }

    /// Anchored to the current local date.
    pub fn anchored_today(&self) -> NaiveDateTime {
        self.anchored(chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_str: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_metadata: Option<FileMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_accessor: Option<FileAccessor>,
    /// Embedded query source, `<br>` separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_result_str: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ItemTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileHandle>,
    /// Placeholder or failure message shown instead of query output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_raw: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    #[serde(default)]
    pub metadata: ItemMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<Fragment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_search: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<Fragment>,
}

impl Lane {
    pub fn new(id: impl Into<String>, title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items,
            dom: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub lanes: Vec<Lane>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BoardSettings>,
}

/// What a `Path` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Lane,
    Item,
}

impl Board {
    pub fn new(id: impl Into<String>, lanes: Vec<Lane>) -> Self {
        Self {
            id: id.into(),
            lanes,
            settings: None,
        }
    }

    /// Kind of entity a path addresses, `None` if it addresses neither.
    pub fn entity_kind(&self, path: &[usize]) -> Option<EntityKind> {
        match *path {
            [lane] => self.lanes.get(lane).map(|_| EntityKind::Lane),
            [lane, item] => self
                .lanes
                .get(lane)
                .and_then(|l| l.items.get(item))
                .map(|_| EntityKind::Item),
            _ => None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.items.len()).sum()
    }
}
