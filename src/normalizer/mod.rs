use serde_json::Value;

use crate::app::{MindsyncError, Result};
use crate::domain::Item;

/// Turns feed and detail responses into [`Item`]s.
///
/// Missing or mistyped optional fields leave the matching [`Item`] field at
/// its default. Only a missing `entities` list or a missing id is an error.
#[derive(Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Number of entries in the document's `entities` list.
    pub fn entity_count(&self, doc: &Value) -> Result<usize> {
        Ok(entities(doc)?.len())
    }

    /// Maps entry `index` of a feed page. Content is read from the nested
    /// `entity` object when the entry has one, else from the entry itself.
    pub fn map_feed_entry(&self, doc: &Value, index: usize) -> Result<Item> {
        let list = entities(doc)?;
        let entry = list.get(index).ok_or_else(|| {
            MindsyncError::RemoteFormat(format!(
                "entity {} requested from a list of {}",
                index,
                list.len()
            ))
        })?;

        let mut item = Item::new(entity_id(entry)?);
        let content = entry.get("entity").filter(|c| c.is_object()).unwrap_or(entry);
        fill_content(&mut item, content);
        Ok(item)
    }

    /// Maps the single entry of a detail response. The id is whatever the
    /// detail endpoint reports, which for a remind is the original mind.
    pub fn map_detail_entry(&self, doc: &Value, url: &str) -> Result<Item> {
        let entry = entities(doc)?
            .first()
            .ok_or_else(|| MindsyncError::EmptyDetail {
                url: url.to_string(),
            })?;

        let mut item = Item::new(entity_id(entry)?);
        fill_content(&mut item, entry);
        Ok(item)
    }

    /// Pagination cursor from `load-next`. An empty cursor counts as none.
    pub fn feed_cursor(&self, doc: &Value) -> Option<String> {
        doc.get("load-next")
            .and_then(scalar_text)
            .filter(|c| !c.is_empty())
    }
}

fn entities(doc: &Value) -> Result<&Vec<Value>> {
    doc.get("entities")
        .and_then(Value::as_array)
        .ok_or_else(|| MindsyncError::RemoteFormat("missing `entities` array".into()))
}

/// Guids can exceed what a float holds, so numbers keep their source digits.
fn entity_id(entry: &Value) -> Result<String> {
    entry
        .get("guid")
        .or_else(|| entry.get("id"))
        .and_then(scalar_text)
        .ok_or_else(|| MindsyncError::RemoteFormat("entity without guid".into()))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(content: &Value, key: &str) -> Option<String> {
    content.get(key).and_then(Value::as_str).map(String::from)
}

fn fill_content(item: &mut Item, content: &Value) {
    item.message = string_field(content, "message");
    item.pinned = content.get("pinned").and_then(Value::as_bool) == Some(true);
    item.time_created = string_field(content, "time_created");
    item.time_updated = string_field(content, "time_updated");
    item.remind_of = content
        .get("remind_object")
        .filter(|r| r.is_object())
        .and_then(|r| string_field(r, "guid"));
}
