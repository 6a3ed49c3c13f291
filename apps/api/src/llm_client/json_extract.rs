//! Pulls a JSON payload out of free-form model output.
//!
//! Models often wrap the requested JSON in prose or markdown fences. The scanner finds the
//! first balanced `[...]` or `{...}` run, skipping brackets that appear inside string
//! literals, and hands that slice to serde.

use serde::de::DeserializeOwned;

/// Which JSON shape the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }
}

/// Returns the first balanced block of the given shape, or `None` if the text has none.
pub fn extract_json_block(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, _) = shape.delimiters();
    text.char_indices()
        .filter(|&(_, c)| c == open)
        .find_map(|(start, _)| balanced_end(&text[start..], shape).map(|end| &text[start..start + end]))
}

/// Extracts the first block of `shape` and deserializes it. `None` when no block exists or
/// the block is not valid JSON for `T`.
pub fn parse_json_block<T: DeserializeOwned>(text: &str, shape: JsonShape) -> Option<T> {
    let block = extract_json_block(text, shape)?;
    serde_json::from_str(block).ok()
}

/// Byte length of the balanced block starting at `candidate[0]`.
fn balanced_end(candidate: &str, shape: JsonShape) -> Option<usize> {
    let (open, close) = shape.delimiters();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in candidate.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
