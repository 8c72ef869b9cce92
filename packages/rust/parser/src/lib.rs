//! Pseudo-XML parser for world book entries.
//!
//! The markup is informal and never validated against a grammar:
//! - Entries: `<startl> … <endl>`, shortest span, may cross lines
//! - Fields inside an entry: `<name>value</name>` with `name` made of letters,
//!   digits and `_`
//!
//! Anything outside an entry block is ignored. Unknown field names are kept
//! in the [`FieldMap`]; deciding which ones matter is the formatter's job.

mod fields;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use worldbook_shared::FieldMap;

pub use fields::parse_block;

/// Entry start marker.
pub const START_MARKER: &str = "<startl>";

/// Entry end marker.
pub const END_MARKER: &str = "<endl>";

/// Matches one entry block, non-greedy, `.` also matching newlines.
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<startl>(.*?)<endl>").expect("block regex")
});

/// Iterate over the raw text of each entry block, in source order.
pub fn blocks(raw: &str) -> impl Iterator<Item = &str> {
    BLOCK_RE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Parse raw pseudo-XML into one [`FieldMap`] per entry block.
///
/// Blocks without any recognizable field still produce an empty map, so the
/// output length always equals the number of `<startl>…<endl>` pairs.
#[instrument(skip_all, fields(input_len = raw.len()))]
pub fn parse(raw: &str) -> Vec<FieldMap> {
    let entries: Vec<FieldMap> = blocks(raw).map(parse_block).collect();
    debug!(entries = entries.len(), "parsed pseudo-XML input");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_multi_entry_fixture() {
        let content = std::fs::read_to_string("../../../fixtures/worldbook/multi-entry.txt")
            .expect("read fixture");
        let entries = parse(&content);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["comment"], "世界观");
        assert_eq!(entries[0]["content"], "The continent drifts\non an endless sea.");
        assert_eq!(entries[0]["keyAdverse"], "");
        assert_eq!(entries[1]["comment"], "王城");
        assert_eq!(entries[1]["CN_annotation"], "地点");
        // Duplicate tag in the third block: last one wins
        assert_eq!(entries[2]["comment"], "守夜人");
        assert!(!entries[2].contains_key("position"));
    }

    #[test]
    fn parse_fixture_without_blocks() {
        let content = std::fs::read_to_string("../../../fixtures/worldbook/no-blocks.txt")
            .expect("read fixture");
        assert!(parse(&content).is_empty());
        assert_eq!(blocks(&content).count(), 0);
    }

    #[test]
    fn block_count_matches_markers() {
        let raw = "<startl><a>1</a><endl><startl><endl>\n<startl><b>2</b><endl>";
        assert_eq!(blocks(raw).count(), 3);
        assert_eq!(parse(raw).len(), 3);
    }

    #[test]
    fn empty_block_yields_empty_map() {
        let entries = parse("<startl><endl>");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_empty());
    }

    #[test]
    fn blocks_are_non_greedy() {
        let raw = "<startl><comment>A</comment><endl>junk<startl><comment>B</comment><endl>";
        let entries = parse(raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["comment"], "A");
        assert_eq!(entries[1]["comment"], "B");
    }

    #[test]
    fn blocks_span_newlines() {
        let raw = "<startl>\n<comment>A</comment>\n\n<constant>常驻</constant>\n<endl>";
        let entries = parse(raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["constant"], "常驻");
    }

    #[test]
    fn order_is_independent_of_field_order() {
        let raw = "<startl><constant>x</constant><comment>first</comment><endl>\
                   <startl><comment>second</comment><constant>y</constant><endl>";
        let names: Vec<_> = parse(raw).into_iter().map(|f| f["comment"].clone()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn unterminated_block_is_dropped() {
        let raw = "<startl><comment>A</comment><endl><startl><comment>B</comment>";
        let entries = parse(raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["comment"], "A");
    }

    #[test]
    fn end_marker_before_start_is_ignored() {
        let raw = "<endl><startl><comment>A</comment><endl>";
        assert_eq!(parse(raw).len(), 1);
    }
}
