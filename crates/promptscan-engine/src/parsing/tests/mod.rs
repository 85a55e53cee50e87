//! Pipeline tests for the parsing module.
//!
//! Whole documents go through [`parse_prompt`]; the result is checked
//! against the invariants and, where useful, an inline snapshot of the
//! rendered `Snap`.

use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::{
    glob::GlobPatternValidator,
    metadata::{ChatMode, PromptType},
    parsing::{ParseResult, parse_prompt, snapshot},
    uri::ResourceUri,
};

fn parse_at(path: &str, prompt_type: PromptType, text: &str) -> ParseResult {
    let rope = Rope::from(text);
    let result = parse_prompt(
        &rope,
        &ResourceUri::file(path),
        prompt_type,
        &GlobPatternValidator,
    );
    snapshot::invariants(&rope, &result);
    result
}

fn parse(prompt_type: PromptType, text: &str) -> ParseResult {
    parse_at("/foo/bar.md", prompt_type, text)
}

const FULL_DOCUMENT: &str = "---
description: 'Test prompt'
mode: edit
tools: [search, , search]
unknown: 1
---
Read #file:./docs/guide.md first.
Then see [notes](../shared/notes.md) and #file:/abs/path.md
";

#[test]
fn full_document_snapshot() {
    let result = parse_at("/repo/prompts/test.prompt.md", PromptType::Prompt, FULL_DOCUMENT);
    insta::assert_snapshot!(snapshot::normalize(&result).to_string(), @r"
    header 1:1-6:4
      2:1-2:12 description = 2:14-2:27 Test prompt (string)
      3:1-3:5 mode = 3:7-3:11 edit (string)
      4:1-4:6 tools = 4:8-4:26 [search, , search] (array)
      5:1-5:8 unknown = 5:10-5:11 1 (string)
    metadata prompt
      description: Test prompt
      mode: agent
      tools: [search]
    warning 3:1-3:11 Record 'mode' is implied to have the 'agent' value if 'tools' record is present so the specified value will be ignored.
    warning 4:17-4:17 Tool name cannot be empty.
    warning 4:19-4:25 Duplicate tool name 'search'.
    warning 5:1-5:8 Unknown metadata 'unknown' will be ignored.
    ref 7:6-7:27 #file:./docs/guide.md (7:12-7:27) -> file:///repo/prompts/docs/guide.md
    ref 8:10-8:37 [notes](../shared/notes.md) (8:18-8:36) -> file:///repo/shared/notes.md
    ref 8:42-8:60 #file:/abs/path.md (8:48-8:60) -> file:///abs/path.md
    ");
}

#[rstest]
#[case::prompt(PromptType::Prompt)]
#[case::instructions(PromptType::Instructions)]
#[case::mode(PromptType::Mode)]
fn crlf_and_lf_parse_identically(#[case] prompt_type: PromptType) {
    let crlf = FULL_DOCUMENT.replace('\n', "\r\n");
    let lf = parse(prompt_type, FULL_DOCUMENT);
    let windows = parse(prompt_type, &crlf);

    assert_eq!(lf.references, windows.references);
    assert_eq!(lf.diagnostics(), windows.diagnostics());
    assert_eq!(lf.metadata, windows.metadata);
    assert_eq!(
        lf.header.as_ref().map(|h| (&h.raw_text, h.range, &h.records)),
        windows.header.as_ref().map(|h| (&h.raw_text, h.range, &h.records)),
    );
}

#[test]
fn without_header_the_whole_text_is_body() {
    let result = parse(
        PromptType::Prompt,
        "description: not a header\n#file:./a.md\n---\n[b](b.md)\n",
    );
    assert!(result.header.is_none());
    assert!(result.metadata.is_none());
    assert!(result.diagnostics().is_empty());
    let lines: Vec<_> = result.references.iter().map(|r| r.range.start_line).collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn unclosed_header_is_treated_as_body() {
    let result = parse(PromptType::Prompt, "---\ndescription: x\n#file:./a.md\n");
    assert!(result.header.is_none());
    assert!(result.metadata.is_none());
    assert_eq!(result.references.len(), 1);
}

#[test]
fn references_inside_the_header_are_not_scanned() {
    let result = parse(
        PromptType::Prompt,
        "---\ndescription: see #file:./in-header.md\n---\n#file:./in-body.md\n",
    );
    assert_eq!(result.references.len(), 1);
    assert_eq!(result.references[0].raw_path, "./in-body.md");
    assert_eq!(
        result.metadata.as_ref().and_then(|m| m.description()),
        Some("see #file:./in-header.md")
    );
}

#[test]
fn binary_file_reference_from_running_text() {
    let result = parse(
        PromptType::Prompt,
        "Critical #file:./folder/binary.file thinking...",
    );
    assert_eq!(result.references.len(), 1);
    assert_eq!(result.references[0].raw_path, "./folder/binary.file");
    assert_eq!(
        result.references[0].resolved_uri.to_string(),
        "file:///foo/folder/binary.file"
    );
}

#[test]
fn empty_header_yields_empty_metadata() {
    let result = parse(PromptType::Instructions, "---\n---\nbody");
    let header = result.header.expect("header");
    assert!(header.records.is_empty());
    assert!(header.diagnostics.is_empty());
    let metadata = result.metadata.expect("metadata");
    assert_eq!(metadata.prompt_type(), PromptType::Instructions);
    assert_eq!(metadata.description(), None);
    assert_eq!(metadata.apply_to(), None);
}

#[test]
fn instructions_header() {
    let result = parse(
        PromptType::Instructions,
        "---\ndescription: Style rules\napplyTo: '**/*.rs'\nmode: \"my-mode\"\n---\n",
    );
    let metadata = result.metadata.as_ref().expect("metadata");
    assert_eq!(metadata.description(), Some("Style rules"));
    assert_eq!(metadata.apply_to(), Some("**/*.rs"));
    assert_eq!(metadata.mode(), None);
    let messages: Vec<_> = result.diagnostics().iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec!["warning 4:1-4:5 Unknown metadata 'mode' will be ignored."]
    );
}

#[test]
fn blank_and_malformed_header_lines_are_skipped() {
    let result = parse(
        PromptType::Prompt,
        "---\n\nnot a record\n: nameless\nmode: ask\n---\n",
    );
    let header = result.header.expect("header");
    assert_eq!(header.records.len(), 1);
    assert!(header.diagnostics.is_empty());
    assert_eq!(
        result.metadata.and_then(|m| m.mode()),
        Some(ChatMode::Ask)
    );
}

#[test]
fn empty_document() {
    let result = parse(PromptType::Mode, "");
    assert_eq!(result, ParseResult::default());
}
