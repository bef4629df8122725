//! Paragraph splitting — the one text-shaping primitive shared by every
//! textual help field.

/// Split text into paragraphs on `\n` or `\r\n`, trimming each line.
///
/// Empty lines are preserved as empty paragraph entries, so splitting is
/// idempotent: re-splitting the join of a previous result reproduces it.
/// The empty string yields a single empty paragraph.
pub fn to_paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}
