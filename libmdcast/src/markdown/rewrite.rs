//! Byte-range edits over markdown source text
//!
//! pulldown-cmark is a pull parser with no serializer, so instead of
//! rebuilding documents from an AST the pipeline walks the offset
//! iterator, records range/replacement pairs for the nodes it wants to
//! change, and splices them back into the original text. Everything the
//! walker does not touch survives byte-for-byte.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// A single splice: replace `source[range]` with `text`
#[derive(Debug, Clone)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

/// Apply non-overlapping edits to `source`
///
/// Edits may be collected in any order; overlapping ranges would be a
/// collector bug, and the later one is dropped.
pub(crate) fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.range.start, e.range.end));
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            continue;
        }
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// A link or image occurrence: the span of the whole element plus its
/// destination as written
#[derive(Debug, Clone)]
pub(crate) struct UrlRef {
    pub span: Range<usize>,
    pub dest: String,
}

/// A fenced code block: the span of the whole block plus its info
/// string (language and any trailing metadata)
#[derive(Debug, Clone)]
pub(crate) struct FencedBlock {
    pub span: Range<usize>,
    pub info: String,
}

pub(crate) fn collect_images(source: &str) -> Vec<UrlRef> {
    let mut refs = Vec::new();
    for (event, span) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            refs.push(UrlRef {
                span,
                dest: dest_url.to_string(),
            });
        }
    }
    refs
}

pub(crate) fn collect_links(source: &str) -> Vec<UrlRef> {
    let mut refs = Vec::new();
    for (event, span) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        if let Event::Start(Tag::Link { dest_url, .. }) = event {
            refs.push(UrlRef {
                span,
                dest: dest_url.to_string(),
            });
        }
    }
    refs
}

pub(crate) fn collect_fenced_blocks(source: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    for (event, span) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = event {
            blocks.push(FencedBlock {
                span,
                info: info.to_string(),
            });
        }
    }
    blocks
}

pub(crate) fn collect_tables(source: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    for (event, span) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        if let Event::Start(Tag::Table(_)) = event {
            spans.push(span);
        }
    }
    spans
}

/// Build an edit replacing an element's destination URL in place
///
/// The destination is located by searching the element's span for the
/// written URL; in `[text](url)` and `![alt](url)` the destination is
/// the last such occurrence. Reference-style links keep their
/// destination elsewhere in the document and yield `None`.
pub(crate) fn dest_edit(
    source: &str,
    url_ref: &UrlRef,
    new_dest: &str,
) -> Option<Edit> {
    if url_ref.dest.is_empty() {
        return None;
    }
    let text = &source[url_ref.span.clone()];
    let pos = text.rfind(&url_ref.dest)?;
    let start = url_ref.span.start + pos;
    Some(Edit {
        range: start..start + url_ref.dest.len(),
        text: new_dest.to_string(),
    })
}

/// Build an edit replacing a fenced block's info string
///
/// Only the opening fence line is touched; the code content is left
/// alone.
pub(crate) fn fence_info_edit(source: &str, block: &FencedBlock, new_info: &str) -> Edit {
    let text = &source[block.span.clone()];
    let line_end = text.find('\n').unwrap_or(text.len());
    let first_line = &text[..line_end];
    let indent = first_line.len() - first_line.trim_start().len();
    let fence_len = first_line[indent..]
        .chars()
        .take_while(|&c| c == '`' || c == '~')
        .count();
    let info_start = block.span.start + indent + fence_len;
    Edit {
        range: info_start..block.span.start + line_end,
        text: new_info.to_string(),
    }
}

/// True when the target needs no rewriting: a scheme, a `www` address,
/// or an in-page anchor
pub fn is_external(url: &str) -> bool {
    url.starts_with("http") || url.starts_with("www") || url.starts_with('#')
}

/// Normalize a non-external target to an absolute path with a leading
/// slash
pub fn normalize_path(url: &str) -> String {
    if url.starts_with('/') || is_external(url) {
        url.to_string()
    } else {
        format!("/{url}")
    }
}

/// Strip the file extension from the final path segment, if any
pub fn strip_extension(path: &str) -> &str {
    let last_slash = path.rfind('/').map_or(0, |pos| pos + 1);
    match path[last_slash..].rfind('.') {
        Some(dot) if dot > 0 => &path[..last_slash + dot],
        _ => path,
    }
}
