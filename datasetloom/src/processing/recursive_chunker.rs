use std::collections::VecDeque;

use super::{ChunkContext, ChunkParams, ContentChunker, TextChunk};

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` on `separator`. The empty separator splits into characters.
fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    }
}

/// Greedy packing of splits into windows of at most `chunk_size` characters,
/// carrying up to `chunk_overlap` characters of trailing splits forward.
fn merge_splits(splits: &[&str], separator: &str, params: &ChunkParams) -> Vec<String> {
    let sep_len = char_len(separator);
    let mut docs = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &split in splits {
        let len = char_len(split);
        let joined = if window.is_empty() { 0 } else { sep_len };

        if total + len + joined > params.chunk_size && !window.is_empty() {
            let doc = window.iter().copied().collect::<Vec<_>>().join(separator);
            let doc = doc.trim();
            if !doc.is_empty() {
                docs.push(doc.to_string());
            }

            while let Some(front) = window.front() {
                let joined = if window.is_empty() { 0 } else { sep_len };
                let over_overlap = total > params.chunk_overlap;
                let still_too_big = total + len + joined > params.chunk_size && total > 0;
                if !(over_overlap || still_too_big) {
                    break;
                }
                let removed = char_len(front) + if window.len() > 1 { sep_len } else { 0 };
                total = total.saturating_sub(removed);
                window.pop_front();
            }
        }

        let joined = if window.is_empty() { 0 } else { sep_len };
        total += len + joined;
        window.push_back(split);
    }

    let doc = window.iter().copied().collect::<Vec<_>>().join(separator);
    let doc = doc.trim();
    if !doc.is_empty() {
        docs.push(doc.to_string());
    }

    docs
}

/// Recursive character splitting: try each separator in turn and descend
/// into pieces that are still larger than `chunk_size`.
pub struct RecursiveChunker {
    params: ChunkParams,
}

impl RecursiveChunker {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    fn split_text(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];

        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                remaining = &[];
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut result = Vec::new();
        let mut good: Vec<&str> = Vec::new();

        for split in split_on(text, separator) {
            if char_len(split) < self.params.chunk_size {
                good.push(split);
                continue;
            }

            if !good.is_empty() {
                result.extend(merge_splits(&good, separator, &self.params));
                good.clear();
            }

            if remaining.is_empty() {
                result.push(split.to_string());
            } else {
                result.extend(self.split_text(split, remaining));
            }
        }

        if !good.is_empty() {
            result.extend(merge_splits(&good, separator, &self.params));
        }

        result
    }
}

impl ContentChunker for RecursiveChunker {
    fn chunk(&self, text: &str, _context: Option<&ChunkContext>) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_text(text, &self.params.separators)
            .into_iter()
            .map(TextChunk::new)
            .collect()
    }
}

/// Single-level splitting on the first configured separator, then packing.
pub struct CharacterChunker {
    params: ChunkParams,
}

impl CharacterChunker {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    fn separator(&self) -> &str {
        self.params
            .separators
            .first()
            .map(String::as_str)
            .unwrap_or("\n\n")
    }
}

impl ContentChunker for CharacterChunker {
    fn chunk(&self, text: &str, _context: Option<&ChunkContext>) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let separator = self.separator();
        let splits = split_on(text, separator);
        merge_splits(&splits, separator, &self.params)
            .into_iter()
            .map(TextChunk::new)
            .collect()
    }
}
