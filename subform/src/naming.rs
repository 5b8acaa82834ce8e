//! Hidden-field naming contract shared with the server.
//!
//! Live records submit `{prefix}[N].{field}` inputs. Server-supplied records
//! removed or replaced during the session submit their hashes as
//! `{deleted}[N]` and `{updated}[N]`.

use std::collections::BTreeMap;

use regex::Regex;

use crate::record::FieldMap;

/// Builds the hidden input name of one record field.
pub fn field_name(prefix: &str, index: usize, field: &str) -> String {
    format!("{prefix}[{index}].{field}")
}

/// Builds the hidden input name of one pending-delete or pending-update entry.
pub fn pending_name(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

/// Matches `{prefix}[N].{field}` names for one prefix.
#[derive(Debug, Clone)]
pub struct GroupPattern {
    prefix: String,
    regex: Regex,
}

impl GroupPattern {
    pub fn new(prefix: impl Into<String>) -> Result<Self, regex::Error> {
        let prefix = prefix.into();
        let regex = Regex::new(&format!(r"^{}\[(\d+)\]\.(.+)$", regex::escape(&prefix)))?;
        Ok(Self { prefix, regex })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn field_name(&self, index: usize, field: &str) -> String {
        field_name(&self.prefix, index, field)
    }

    /// Splits a matching name into its group index and field name.
    pub fn parse<'a>(&self, name: &'a str) -> Option<(usize, &'a str)> {
        let caps = self.regex.captures(name)?;
        let index = caps.get(1)?.as_str().parse().ok()?;
        Some((index, caps.get(2)?.as_str()))
    }
}

/// Monotonic index source. Indices are never handed out twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexCounter {
    next: usize,
}

impl IndexCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next free index.
    pub fn next_index(&mut self) -> usize {
        let index = self.next;
        self.next = self.next.saturating_add(1);
        index
    }

    /// Marks `index` as taken so later indices land past it.
    pub fn observe(&mut self, index: usize) {
        self.next = self.next.max(index.saturating_add(1));
    }
}

/// Server-side view of a submitted form: record groups plus pending arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmittedRecords {
    /// Record groups keyed by their index.
    pub records: BTreeMap<usize, FieldMap>,
    /// Hashes of server-supplied records deleted this session.
    pub deleted: Vec<String>,
    /// Hashes of server-supplied records replaced this session.
    pub updated: Vec<String>,
}

impl SubmittedRecords {
    /// Reconstructs record groups and pending arrays from submitted pairs.
    ///
    /// Pairs that match none of the three names are ignored.
    pub fn from_pairs(
        prefix: &str,
        deleted_name: &str,
        updated_name: &str,
        pairs: &[(String, String)],
    ) -> Result<Self, regex::Error> {
        let groups = GroupPattern::new(prefix)?;
        let deleted = Regex::new(&format!(r"^{}\[(\d+)\]$", regex::escape(deleted_name)))?;
        let updated = Regex::new(&format!(r"^{}\[(\d+)\]$", regex::escape(updated_name)))?;

        let mut out = Self::default();
        let mut deleted_by_index = BTreeMap::new();
        let mut updated_by_index = BTreeMap::new();

        for (name, value) in pairs {
            if let Some((index, field)) = groups.parse(name) {
                out.records
                    .entry(index)
                    .or_default()
                    .insert(field.to_string(), value.clone());
            } else if let Some(index) = capture_index(&deleted, name) {
                deleted_by_index.insert(index, value.clone());
            } else if let Some(index) = capture_index(&updated, name) {
                updated_by_index.insert(index, value.clone());
            }
        }

        out.deleted = deleted_by_index.into_values().collect();
        out.updated = updated_by_index.into_values().collect();
        Ok(out)
    }

    /// Hashes the server must drop before applying the submitted groups.
    pub fn retired_hashes(&self) -> impl Iterator<Item = &str> {
        self.deleted.iter().chain(&self.updated).map(String::as_str)
    }
}

fn capture_index(regex: &Regex, name: &str) -> Option<usize> {
    regex.captures(name)?.get(1)?.as_str().parse().ok()
}
