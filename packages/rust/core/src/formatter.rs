//! Field maps → normalized entries → versioned Tavo document → JSON text.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, instrument};

use worldbook_shared::{
    DEFAULT_NAME, DEFAULT_UNKNOWN, FieldMap, NormalizedEntry, Result, Statistics,
    TAVO_FORMAT_VERSION, TAVO_GENERATOR, TavoDocument, WorldBookError,
};

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Output attribute a source field is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Name,
    Position,
    Type,
    ScanDepth,
    Sticky,
    Cooldown,
    Delay,
    Keywords,
    NegativeKeywords,
    MainContent,
    Annotation,
    Development,
}

impl Slot {
    fn target(self, entry: &mut NormalizedEntry) -> &mut String {
        match self {
            Self::Name => &mut entry.metadata.name,
            Self::Position => &mut entry.metadata.position,
            Self::Type => &mut entry.metadata.entry_type,
            Self::ScanDepth => &mut entry.metadata.scan_depth,
            Self::Sticky => &mut entry.metadata.sticky,
            Self::Cooldown => &mut entry.metadata.cooldown,
            Self::Delay => &mut entry.metadata.delay,
            Self::Keywords => &mut entry.content.keywords,
            Self::NegativeKeywords => &mut entry.content.negative_keywords,
            Self::MainContent => &mut entry.content.main_content,
            Self::Annotation => &mut entry.content.annotation,
            Self::Development => &mut entry.content.development,
        }
    }
}

/// One row of the source field → output attribute mapping.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Tag name in the pseudo-XML (case-sensitive).
    pub source: &'static str,
    pub slot: Slot,
    /// Used only when the tag is absent; an empty tag keeps its empty value.
    pub default: &'static str,
}

const fn rule(source: &'static str, slot: Slot, default: &'static str) -> FieldRule {
    FieldRule {
        source,
        slot,
        default,
    }
}

/// Every recognized field, in output order. Tags not listed here are ignored.
pub const FIELD_TABLE: &[FieldRule] = &[
    rule("comment", Slot::Name, DEFAULT_NAME),
    rule("position", Slot::Position, DEFAULT_UNKNOWN),
    rule("constant", Slot::Type, DEFAULT_UNKNOWN),
    rule("scanDep", Slot::ScanDepth, ""),
    rule("sticky", Slot::Sticky, ""),
    rule("cooldown", Slot::Cooldown, ""),
    rule("delay", Slot::Delay, ""),
    rule("keyPositif", Slot::Keywords, ""),
    rule("keyAdverse", Slot::NegativeKeywords, ""),
    rule("content", Slot::MainContent, ""),
    rule("CN_annotation", Slot::Annotation, ""),
    rule("development", Slot::Development, ""),
];

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Normalize one field map into an entry with the given id.
pub fn normalize_entry(id: usize, fields: &FieldMap) -> NormalizedEntry {
    let mut entry = NormalizedEntry {
        id,
        metadata: Default::default(),
        content: Default::default(),
    };

    for rule in FIELD_TABLE {
        let value = fields.get(rule.source).map_or(rule.default, String::as_str);
        *rule.slot.target(&mut entry) = value.to_string();
    }

    entry
}

/// Normalize field maps in order, numbering them from 1.
pub fn to_normalized_entries(field_maps: &[FieldMap]) -> Vec<NormalizedEntry> {
    field_maps
        .iter()
        .enumerate()
        .map(|(i, fields)| normalize_entry(i + 1, fields))
        .collect()
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Count entries per `metadata.type`, compared as exact strings.
pub fn count_entry_types(entries: &[NormalizedEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.metadata.entry_type.clone()).or_insert(0) += 1;
    }
    counts
}

static LAST_TIMESTAMP: Mutex<Option<DateTime<Local>>> = Mutex::new(None);

/// Current local time, never earlier than a timestamp previously returned
/// in this process.
pub fn document_timestamp() -> DateTime<Local> {
    let now = Local::now();
    let mut last = LAST_TIMESTAMP.lock().unwrap_or_else(PoisonError::into_inner);
    let stamp = match *last {
        Some(prev) if prev > now => prev,
        _ => now,
    };
    *last = Some(stamp);
    stamp
}

/// Wrap entries in a versioned document with statistics.
#[instrument(skip_all, fields(entries = entries.len()))]
pub fn build_document(entries: Vec<NormalizedEntry>) -> TavoDocument {
    let statistics = Statistics {
        total_entries: entries.len(),
        entry_types: count_entry_types(&entries),
    };
    debug!(types = statistics.entry_types.len(), "built statistics");

    TavoDocument {
        version: TAVO_FORMAT_VERSION.to_string(),
        generator: TAVO_GENERATOR.to_string(),
        timestamp: document_timestamp(),
        statistics,
        entries,
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    tavo_format: &'a TavoDocument,
}

/// Serialize a document as indented JSON inside the `tavo_format` envelope.
///
/// Non-ASCII text is written as-is, not `\u`-escaped.
pub fn render_json(document: &TavoDocument, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    EnvelopeRef {
        tavo_format: document,
    }
    .serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| WorldBookError::unexpected(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_fields_take_defaults() {
        let entry = normalize_entry(1, &FieldMap::new());
        assert_eq!(entry.metadata.name, "未命名");
        assert_eq!(entry.metadata.position, "未知");
        assert_eq!(entry.metadata.entry_type, "未知");
        assert_eq!(entry.metadata.scan_depth, "");
        assert_eq!(entry.metadata.delay, "");
        assert_eq!(entry.content, worldbook_shared::EntryContent::default());
    }

    #[test]
    fn present_empty_field_overrides_default() {
        let entry = normalize_entry(1, &fields(&[("comment", ""), ("constant", "")]));
        assert_eq!(entry.metadata.name, "");
        assert_eq!(entry.metadata.entry_type, "");
    }

    #[test]
    fn every_table_row_is_applied() {
        let all: Vec<(&str, &str)> = FIELD_TABLE.iter().map(|r| (r.source, r.source)).collect();
        let entry = normalize_entry(7, &fields(&all));
        assert_eq!(entry.id, 7);
        assert_eq!(entry.metadata.name, "comment");
        assert_eq!(entry.metadata.position, "position");
        assert_eq!(entry.metadata.entry_type, "constant");
        assert_eq!(entry.metadata.scan_depth, "scanDep");
        assert_eq!(entry.metadata.sticky, "sticky");
        assert_eq!(entry.metadata.cooldown, "cooldown");
        assert_eq!(entry.metadata.delay, "delay");
        assert_eq!(entry.content.keywords, "keyPositif");
        assert_eq!(entry.content.negative_keywords, "keyAdverse");
        assert_eq!(entry.content.main_content, "content");
        assert_eq!(entry.content.annotation, "CN_annotation");
        assert_eq!(entry.content.development, "development");
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let entry = normalize_entry(1, &fields(&[("Comment", "A"), ("scandep", "3")]));
        assert_eq!(entry.metadata.name, "未命名");
        assert_eq!(entry.metadata.scan_depth, "");
    }

    #[test]
    fn ids_are_dense_and_ordered() {
        let maps = vec![FieldMap::new(); 4];
        let ids: Vec<_> = to_normalized_entries(&maps).iter().map(|e| e.id).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn statistics_group_types_literally() {
        let maps = vec![
            fields(&[("constant", "常驻")]),
            fields(&[("constant", "常驻")]),
            fields(&[("constant", "常驻 ")]),
            FieldMap::new(),
        ];
        let doc = build_document(to_normalized_entries(&maps));
        assert_eq!(doc.statistics.total_entries, 4);
        assert_eq!(doc.statistics.entry_types["常驻"], 2);
        assert_eq!(doc.statistics.entry_types["常驻 "], 1);
        assert_eq!(doc.statistics.entry_types["未知"], 1);
        assert_eq!(doc.statistics.entry_types.values().sum::<usize>(), 4);
    }

    #[test]
    fn empty_document_is_consistent() {
        let doc = build_document(Vec::new());
        assert_eq!(doc.statistics.total_entries, 0);
        assert!(doc.statistics.entry_types.is_empty());
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.generator, "长天快速世界书");
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let stamps: Vec<_> = (0..50).map(|_| document_timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn json_shape_and_unicode() {
        let doc = build_document(to_normalized_entries(&[fields(&[
            ("comment", "世界观"),
            ("position", "Char↑"),
        ])]));
        let json = render_json(&doc, 2).expect("render");

        assert!(json.contains("\"name\": \"世界观\""));
        assert!(json.contains("Char↑"));
        assert!(json.starts_with("{\n  \"tavo_format\": {\n    \"version\""));

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        let body = &value["tavo_format"];
        assert_eq!(body["generator"], "长天快速世界书");
        assert_eq!(body["statistics"]["total_entries"], 1);
        assert_eq!(body["entries"][0]["metadata"]["type"], "未知");
        assert!(body["timestamp"].as_str().is_some_and(|t| t.contains('T')));
    }

    #[test]
    fn json_respects_indent() {
        let doc = build_document(Vec::new());
        let json = render_json(&doc, 4).expect("render");
        assert!(json.starts_with("{\n    \"tavo_format\""));
    }
}
