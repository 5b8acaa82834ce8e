use formdom::{Document, DomError, Element};
use serde::{Deserialize, Serialize};

/// One entry of an option endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    pub name: String,
    pub hash_string: String,
}

impl OptionItem {
    pub fn new(name: impl Into<String>, hash_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash_string: hash_string.into(),
        }
    }
}

/// Replaces every option of `select_id` but the first with `items`.
///
/// Labels are the item names and values the item hashes.
pub fn populate_select(doc: &mut Document, select_id: &str, items: &[OptionItem]) -> Result<(), DomError> {
    doc.truncate_children(select_id, 1)?;
    for item in items {
        doc.append_child(select_id, Element::option(item.hash_string.as_str(), item.name.as_str()))?;
    }
    Ok(())
}
