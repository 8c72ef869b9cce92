//! Field extraction within a single entry block.
//!
//! `regex` has no backreferences, so `<name>…</name>` pairs are matched in
//! two steps: find the next opening tag, then search for the first closing
//! tag carrying the same name.

use std::sync::LazyLock;

use regex::Regex;

use worldbook_shared::FieldMap;

/// Matches an opening tag such as `<comment>` or `<CN_annotation>`.
///
/// Names are Unicode letters, digits and `_`. `\w` is avoided because it
/// also admits combining marks and connector punctuation such as `‿`.
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[\p{L}\p{N}_]+>").expect("open tag regex")
});

/// Extract every `<name>value</name>` pair from one block.
///
/// Values are taken verbatim (no trimming) up to the nearest matching close
/// tag, newlines included. A repeated name overwrites the earlier value. An
/// opening tag without a matching close is skipped and scanning resumes
/// right after it.
pub fn parse_block(block: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut cursor = 0;

    while let Some(open) = OPEN_TAG_RE.find_at(block, cursor) {
        let tag = open.as_str();
        let name = &tag[1..tag.len() - 1];
        let close = format!("</{name}>");
        let rest = &block[open.end()..];

        match rest.find(&close) {
            Some(offset) => {
                fields.insert(name.to_string(), rest[..offset].to_string());
                cursor = open.end() + offset + close.len();
            }
            None => cursor = open.end(),
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_known_and_unknown_fields() {
        let fields = parse_block("<comment>Rule1</comment><whatever>x</whatever>");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["comment"], "Rule1");
        assert_eq!(fields["whatever"], "x");
    }

    #[test]
    fn last_duplicate_wins() {
        let fields = parse_block("<comment>A</comment><comment>B</comment>");
        assert_eq!(fields["comment"], "B");
    }

    #[test]
    fn value_is_non_greedy_and_spans_lines() {
        let fields = parse_block("<content>line one\nline two</content> <content>x</content>");
        // Second occurrence overwrites; the first must not swallow it.
        assert_eq!(fields["content"], "x");

        let fields = parse_block("<content>line one\nline two</content>");
        assert_eq!(fields["content"], "line one\nline two");
    }

    #[test]
    fn empty_value_is_kept() {
        let fields = parse_block("<keyPositif></keyPositif>");
        assert_eq!(fields.get("keyPositif").map(String::as_str), Some(""));
    }

    #[test]
    fn mismatched_close_is_not_a_field() {
        let fields = parse_block("<comment>A</position>");
        assert!(fields.is_empty());
    }

    #[test]
    fn unclosed_tag_lets_inner_tags_through() {
        let fields = parse_block("<note>dangling <comment>inner</comment>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["comment"], "inner");
    }

    #[test]
    fn inner_tags_stay_in_value() {
        let fields = parse_block("<content>a <b>bold</b> c</content>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["content"], "a <b>bold</b> c");
    }

    #[test]
    fn unicode_word_tag_names() {
        let fields = parse_block("<名前>値</名前>");
        assert_eq!(fields["名前"], "値");
    }

    #[test]
    fn connector_punctuation_is_not_a_tag_name() {
        let fields = parse_block("<a‿b>c</a‿b><a_b>d</a_b>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["a_b"], "d");

        let fields = parse_block("<x\u{301}>e</x\u{301}>");
        assert!(fields.is_empty());
    }

    #[test]
    fn numeric_tag_names() {
        let fields = parse_block("<k2>v</k2><²>sq</²>");
        assert_eq!(fields["k2"], "v");
        assert_eq!(fields["²"], "sq");
    }

    #[test]
    fn whitespace_in_tag_is_not_a_tag() {
        let fields = parse_block("<com ment>A</com ment>");
        assert!(fields.is_empty());
    }
}
