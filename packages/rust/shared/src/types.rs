//! Core domain types for world book conversion.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format version written into every Tavo envelope.
pub const TAVO_FORMAT_VERSION: &str = "1.0";

/// Generator identifier written into every Tavo envelope.
pub const TAVO_GENERATOR: &str = "长天快速世界书";

/// Default entry name when the `comment` field is absent.
pub const DEFAULT_NAME: &str = "未命名";

/// Default for `position` and `type` when their source fields are absent.
pub const DEFAULT_UNKNOWN: &str = "未知";

/// Field name → raw value, extracted from one `<startl>…<endl>` block.
pub type FieldMap = HashMap<String, String>;

// ---------------------------------------------------------------------------
// NormalizedEntry
// ---------------------------------------------------------------------------

/// One world book rule, normalized into metadata and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// 1-based position among the entries of one conversion.
    pub id: usize,
    pub metadata: EntryMetadata,
    pub content: EntryContent,
}

/// Descriptive and activation attributes of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub name: String,
    pub position: String,
    /// Entry type (e.g. `常驻`). Grouped literally in the statistics.
    #[serde(rename = "type")]
    pub entry_type: String,
    pub scan_depth: String,
    pub sticky: String,
    pub cooldown: String,
    pub delay: String,
}

/// Text payload of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContent {
    pub keywords: String,
    pub negative_keywords: String,
    pub main_content: String,
    pub annotation: String,
    pub development: String,
}

// ---------------------------------------------------------------------------
// TavoDocument
// ---------------------------------------------------------------------------

/// Aggregate counts over the entries of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_entries: usize,
    /// Entry type → number of entries with that exact type string.
    pub entry_types: BTreeMap<String, usize>,
}

/// The versioned Tavo document body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavoDocument {
    pub version: String,
    pub generator: String,
    /// Captured when the document was built, not when the input was parsed.
    pub timestamp: DateTime<Local>,
    pub statistics: Statistics,
    pub entries: Vec<NormalizedEntry>,
}

/// Top-level JSON wrapper: `{ "tavo_format": { … } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavoEnvelope {
    pub tavo_format: TavoDocument,
}

// ---------------------------------------------------------------------------
// ConversionOutput
// ---------------------------------------------------------------------------

/// Successful result of one conversion, handed off as a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    /// Serialized Tavo JSON text.
    pub json: String,
    /// Number of entries in the document.
    pub entry_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(id: usize, entry_type: &str) -> NormalizedEntry {
        NormalizedEntry {
            id,
            metadata: EntryMetadata {
                name: "Rule".into(),
                position: "Char↑".into(),
                entry_type: entry_type.into(),
                ..Default::default()
            },
            content: EntryContent::default(),
        }
    }

    #[test]
    fn metadata_type_uses_wire_name() {
        let entry = sample_entry(1, "常驻");
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["metadata"]["type"], "常驻");
        assert!(value["metadata"].get("entry_type").is_none());
        assert_eq!(value["metadata"]["scan_depth"], "");
    }

    #[test]
    fn envelope_serialization() {
        let mut entry_types = BTreeMap::new();
        entry_types.insert("常驻".to_string(), 1);
        let envelope = TavoEnvelope {
            tavo_format: TavoDocument {
                version: TAVO_FORMAT_VERSION.into(),
                generator: TAVO_GENERATOR.into(),
                timestamp: Local::now(),
                statistics: Statistics {
                    total_entries: 1,
                    entry_types,
                },
                entries: vec![sample_entry(1, "常驻")],
            },
        };

        let json = serde_json::to_string_pretty(&envelope).expect("serialize");
        let parsed: TavoEnvelope = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.tavo_format.version, "1.0");
        assert_eq!(parsed.tavo_format.statistics.total_entries, 1);
        assert_eq!(parsed.tavo_format.entries[0].metadata.entry_type, "常驻");
    }

    #[test]
    fn envelope_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/tavo.fixture.json")
            .expect("read fixture");
        let parsed: TavoEnvelope =
            serde_json::from_str(&fixture).expect("deserialize fixture envelope");
        let doc = parsed.tavo_format;
        assert_eq!(doc.generator, TAVO_GENERATOR);
        assert_eq!(doc.statistics.total_entries, doc.entries.len());
        assert_eq!(doc.statistics.entry_types.values().sum::<usize>(), 2);
        assert_eq!(doc.entries[1].content.annotation, "维度：总纲");
    }
}
