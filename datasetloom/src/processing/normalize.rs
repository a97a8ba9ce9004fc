/// Strip blank lines, trim every remaining line and rejoin with `\n`.
///
/// Idempotent: normalizing normalized content returns it unchanged.
pub fn normalize_content(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Character length as stored in `Chunk::size`.
pub fn content_size(content: &str) -> i64 {
    content.chars().count() as i64
}
