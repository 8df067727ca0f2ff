//! Layout blob format and shape-tolerant parser.
//!
//! Two historical shapes exist in storage:
//!
//! ```json
//! [{ "i": "win-rate", "x": 0, "y": 0, "w": 3, "h": 2 }]
//! { "layout": [{ "i": "win-rate", "x": 0, "y": 0, "w": 3, "h": 2 }] }
//! ```
//!
//! Both are accepted on read. Writes always use the object form, stamped
//! with `savedAt`. Any other shape is [`PersistenceError::UnrecognizedShape`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::normalize::normalize;
use crate::layout::{Layout, WidgetInstance};
use crate::persistence::PersistenceError;
use crate::widgets::WidgetCatalog;

/// One persisted widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobItem {
    /// Widget id.
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(rename = "minW", default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(rename = "maxW", default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(rename = "maxH", default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
}

impl From<&WidgetInstance> for BlobItem {
    fn from(instance: &WidgetInstance) -> Self {
        Self {
            i: instance.id.clone(),
            x: instance.x,
            y: instance.y,
            w: instance.w,
            h: instance.h,
            min_w: instance.min_w,
            min_h: instance.min_h,
            max_w: instance.max_w,
            max_h: instance.max_h,
        }
    }
}

impl From<BlobItem> for WidgetInstance {
    fn from(item: BlobItem) -> Self {
        Self {
            id: item.i,
            x: item.x,
            y: item.y,
            w: item.w,
            h: item.h,
            min_w: item.min_w,
            min_h: item.min_h,
            max_w: item.max_w,
            max_h: item.max_h,
        }
    }
}

/// The object form written by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBlob {
    /// Instances in layout order.
    pub layout: Vec<BlobItem>,
    /// When the snapshot was taken. Ignored on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl LayoutBlob {
    /// Converts a layout without a timestamp.
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            layout: layout.iter().map(BlobItem::from).collect(),
            saved_at: None,
        }
    }

    /// Stamps the blob with the current time.
    pub fn stamped(mut self) -> Self {
        self.saved_at = Some(Utc::now());
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Encode)
    }
}

/// Detects the blob shape and returns the raw item array.
pub fn detect_items(value: &Value) -> Result<&[Value], PersistenceError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(map) => match map.get("layout") {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(PersistenceError::UnrecognizedShape {
                found: format!("object whose `layout` is {}", describe(other)),
            }),
            None => Err(PersistenceError::UnrecognizedShape {
                found: "object without a `layout` field".to_string(),
            }),
        },
        other => Err(PersistenceError::UnrecognizedShape {
            found: describe(other).to_string(),
        }),
    }
}

/// Parses a stored blob into a layout that satisfies every invariant.
///
/// Items that fail to deserialize are skipped; the remaining instances are
/// normalized against the catalog (see [`normalize`]).
///
/// # Errors
///
/// [`PersistenceError::UnrecognizedShape`] when the blob is neither shape.
pub fn parse_layout(value: &Value, catalog: &WidgetCatalog) -> Result<Layout, PersistenceError> {
    let items = detect_items(value)?;
    let instances = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match BlobItem::deserialize(item) {
            Ok(item) => Some(WidgetInstance::from(item)),
            Err(e) => {
                tracing::warn!("Skipping malformed layout item {}: {}", index, e);
                None
            }
        })
        .collect();
    Ok(normalize(instances, catalog))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
