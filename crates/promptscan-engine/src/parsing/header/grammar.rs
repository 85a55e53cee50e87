use std::fmt;

use serde::Serialize;

use crate::parsing::{
    cursor::Cursor,
    rope::{LineRef, SourceRange, Span},
};

/// An unvalidated header value.
///
/// Bare and quoted strings stay distinct so the validator can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum RawValue {
    String(String),
    QuotedString(String),
    Boolean(bool),
    Array(Vec<RawItem>),
}

impl RawValue {
    /// The JSON-ish type name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::String(_) | RawValue::QuotedString(_) => "string",
            RawValue::Boolean(_) => "boolean",
            RawValue::Array(_) => "array",
        }
    }

    /// The text of a bare or quoted string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) | RawValue::QuotedString(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::String(s) | RawValue::QuotedString(s) => f.write_str(s),
            RawValue::Boolean(b) => write!(f, "{b}"),
            RawValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One element of an array value, with its own range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawItem {
    pub value: RawValue,
    pub range: SourceRange,
}

/// A `name: value` line of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHeaderRecord {
    pub name: String,
    pub name_range: SourceRange,
    pub value: RawValue,
    pub value_range: SourceRange,
}

impl RawHeaderRecord {
    /// Range covering the name through the end of the value.
    pub fn range(&self) -> SourceRange {
        self.name_range.cover(self.value_range)
    }
}

const QUOTES: [char; 2] = ['"', '\''];
const ARRAY_OPEN: char = '[';
const ARRAY_CLOSE: char = ']';
const SEPARATOR: char = ':';
const ITEM_SEPARATOR: char = ',';

/// Parses header content lines into records, in line order.
///
/// Lines that are blank, lack a `:`, have an empty name, or carry an
/// unterminated array are skipped without a diagnostic.
pub fn parse_records<'a>(lines: impl IntoIterator<Item = &'a LineRef>) -> Vec<RawHeaderRecord> {
    lines.into_iter().filter_map(parse_record).collect()
}

/// Parses a single header line.
pub fn parse_record(line: &LineRef) -> Option<RawHeaderRecord> {
    let mut cur = Cursor::new(&line.text, line.span.start);
    cur.bump_while(char::is_whitespace);
    if cur.eof() {
        return None;
    }

    let (name, name_span) = parse_name(&mut cur)?;
    cur.bump_while(char::is_whitespace);
    if cur.bump() != Some(SEPARATOR) {
        return None;
    }
    cur.bump_while(char::is_whitespace);

    let value_text = cur.rest().trim_end();
    let value_span = Span::new(cur.pos(), cur.pos() + value_text.len());
    let value = classify_value(line, value_text, value_span.start)?;

    Some(RawHeaderRecord {
        name,
        name_range: SourceRange::on_line(line, name_span),
        value,
        value_range: SourceRange::on_line(line, value_span),
    })
}

/// Reads a bare or quoted record name. The span of a quoted name includes its quotes.
fn parse_name(cur: &mut Cursor<'_>) -> Option<(String, Span)> {
    let start = cur.pos();
    let (name, end) = match cur.peek() {
        Some(q) if QUOTES.contains(&q) => {
            cur.bump();
            let inner = cur.rest();
            let len = cur.bump_while(|c| c != q);
            if cur.bump() != Some(q) {
                return None;
            }
            (&inner[..len], cur.pos())
        }
        _ => {
            let rest = cur.rest();
            let len = cur.bump_while(|c| c != SEPARATOR);
            let name = rest[..len].trim_end();
            (name, start + name.len())
        }
    };

    if name.trim().is_empty() {
        return None;
    }
    Some((name.to_string(), Span::new(start, end)))
}

/// Classifies a trimmed value token. `start` is its absolute byte offset.
fn classify_value(line: &LineRef, text: &str, start: usize) -> Option<RawValue> {
    if let Some(after_open) = text.strip_prefix(ARRAY_OPEN) {
        let inner = after_open.strip_suffix(ARRAY_CLOSE)?;
        let inner_start = start + ARRAY_OPEN.len_utf8();
        return Some(RawValue::Array(parse_items(line, inner, inner_start)));
    }
    Some(classify_scalar(text))
}

/// Classifies a token that is not an array: boolean, quoted or bare string.
fn classify_scalar(text: &str) -> RawValue {
    match text {
        "true" => return RawValue::Boolean(true),
        "false" => return RawValue::Boolean(false),
        _ => {}
    }
    for q in QUOTES {
        if text.len() >= 2 && text.starts_with(q) && text.ends_with(q) {
            return RawValue::QuotedString(text[1..text.len() - 1].to_string());
        }
    }
    RawValue::String(text.to_string())
}

/// Splits array content on commas outside quotes, keeping empty elements.
fn parse_items(line: &LineRef, inner: &str, inner_start: usize) -> Vec<RawItem> {
    if inner.trim().is_empty() {
        return vec![];
    }

    let mut segments = vec![];
    let mut quote: Option<char> = None;
    let mut seg_start = 0;
    // Quotes only open at the start of an element; `it's` stays bare.
    let mut at_element_start = true;
    for (i, c) in inner.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == ITEM_SEPARATOR => {
                segments.push((seg_start, i));
                seg_start = i + c.len_utf8();
                at_element_start = true;
            }
            None if c.is_whitespace() => {}
            None if at_element_start && QUOTES.contains(&c) => {
                quote = Some(c);
                at_element_start = false;
            }
            None => at_element_start = false,
        }
    }
    segments.push((seg_start, inner.len()));

    segments
        .into_iter()
        .map(|(from, to)| {
            let segment = &inner[from..to];
            let leading = segment.len() - segment.trim_start().len();
            let text = segment.trim();
            let start = inner_start + from + leading;
            RawItem {
                value: classify_scalar(text),
                range: SourceRange::on_line(line, Span::new(start, start + text.len())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::lines_with_spans;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xi_rope::Rope;

    fn record(text: &str) -> Option<RawHeaderRecord> {
        let line = lines_with_spans(&Rope::from(text)).next()?;
        parse_record(&line)
    }

    fn value(text: &str) -> RawValue {
        record(text).expect("record").value
    }

    fn s(text: &str) -> RawValue {
        RawValue::String(text.to_string())
    }

    fn q(text: &str) -> RawValue {
        RawValue::QuotedString(text.to_string())
    }

    #[rstest]
    #[case("description: hello world", s("hello world"))]
    #[case("description: 'single'", q("single"))]
    #[case("description: \"double\"", q("double"))]
    #[case("description: \"it's\"", q("it's"))]
    #[case("description: 'mismatched\"", s("'mismatched\""))]
    #[case("description: '", s("'"))]
    #[case("flag: true", RawValue::Boolean(true))]
    #[case("flag: false", RawValue::Boolean(false))]
    #[case("flag: True", s("True"))]
    #[case("flag: true story", s("true story"))]
    #[case("flag: 'true'", q("true"))]
    #[case("description:", s(""))]
    #[case("description:   padded   ", s("padded"))]
    fn scalar_values(#[case] line: &str, #[case] expected: RawValue) {
        assert_eq!(value(line), expected);
    }

    #[test]
    fn array_items_are_classified_independently() {
        let RawValue::Array(items) = value("tools: [tool1, 'tool2', \"tool3\", tool-4, false]") else {
            panic!("expected array");
        };
        let values: Vec<_> = items.into_iter().map(|i| i.value).collect();
        assert_eq!(
            values,
            vec![s("tool1"), q("tool2"), q("tool3"), s("tool-4"), RawValue::Boolean(false)]
        );
    }

    #[test]
    fn array_item_ranges() {
        let RawValue::Array(items) = value("tools: [a,  bb , 'c,d']") else {
            panic!("expected array");
        };
        let ranges: Vec<_> = items.iter().map(|i| i.range).collect();
        assert_eq!(
            ranges,
            vec![
                SourceRange::new(1, 9, 1, 10),
                SourceRange::new(1, 13, 1, 15),
                SourceRange::new(1, 18, 1, 23),
            ]
        );
        assert_eq!(items[2].value, q("c,d"));
    }

    #[test]
    fn apostrophe_inside_bare_element_does_not_quote() {
        let RawValue::Array(items) = value("tools: [it's, b, ' c']") else {
            panic!("expected array");
        };
        let values: Vec<_> = items.into_iter().map(|i| i.value).collect();
        assert_eq!(values, vec![s("it's"), s("b"), q(" c")]);
    }

    #[test]
    fn empty_elements_are_preserved() {
        let RawValue::Array(items) = value("tools: [a, , b,]") else {
            panic!("expected array");
        };
        let values: Vec<_> = items.iter().map(|i| i.value.clone()).collect();
        assert_eq!(values, vec![s("a"), s(""), s("b"), s("")]);
        assert!(items[1].range.is_empty());
    }

    #[test]
    fn empty_array_has_no_items() {
        assert_eq!(value("tools: []"), RawValue::Array(vec![]));
        assert_eq!(value("tools: [   ]"), RawValue::Array(vec![]));
    }

    #[test]
    fn name_and_value_ranges() {
        let rec = record("  mode:   agent  ").unwrap();
        assert_eq!(rec.name, "mode");
        assert_eq!(rec.name_range, SourceRange::new(1, 3, 1, 7));
        assert_eq!(rec.value_range, SourceRange::new(1, 11, 1, 16));
        assert_eq!(rec.range(), SourceRange::new(1, 3, 1, 16));
    }

    #[test]
    fn quoted_names_keep_quotes_in_range() {
        let rec = record("\"applyTo\": '**/*.ts'").unwrap();
        assert_eq!(rec.name, "applyTo");
        assert_eq!(rec.name_range, SourceRange::new(1, 1, 1, 10));
        assert_eq!(rec.value, q("**/*.ts"));
    }

    #[rstest]
    #[case::blank("   ")]
    #[case::no_separator("just some words")]
    #[case::empty_name(": value")]
    #[case::blank_name("   : value")]
    #[case::unclosed_quoted_name("'mode: ask")]
    #[case::unterminated_array("tools: [a, b")]
    fn lines_without_records(#[case] line: &str) {
        assert_eq!(record(line), None);
    }

    #[test]
    fn value_keeps_later_colons() {
        assert_eq!(value("description: a: b"), s("a: b"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(s("x").kind_name(), "string");
        assert_eq!(q("x").kind_name(), "string");
        assert_eq!(RawValue::Boolean(true).kind_name(), "boolean");
        assert_eq!(RawValue::Array(vec![]).kind_name(), "array");
    }
}
