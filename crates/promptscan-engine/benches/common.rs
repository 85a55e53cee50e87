// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_prompt_document(body_paragraphs: usize) -> String {
    let mut content = String::from(
        "---\ndescription: 'Generated benchmark prompt'\nmode: edit\ntools: [search, codebase, , search, true]\nunknown: value\n---\n",
    );
    for i in 0..body_paragraphs {
        content.push_str(&format!(
            "Paragraph {i} reads #file:./docs/section-{i}.md and [notes {i}](../notes/{i}.md).\n\
             Plain text without any references, just words to scan past.\n\n"
        ));
    }
    content
}

#[allow(dead_code)]
pub fn generate_header(records: usize) -> String {
    let mut content = String::from("---\n");
    for i in 0..records {
        content.push_str(&format!("record{i}: \"value {i}\"\n"));
    }
    content.push_str("tools: [a, 'b', \"c\", d]\n---\n");
    content
}
