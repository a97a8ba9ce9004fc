use unicode_segmentation::UnicodeSegmentation;

use crate::config::default_separators;
use crate::models::ChunkGenerationConfig;

/// Sizing shared by every strategy. Sizes are measured in characters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

impl ChunkParams {
    /// Parameters for one request. An empty separator list falls back to the
    /// recursive defaults.
    pub fn from_request(config: &ChunkGenerationConfig) -> Self {
        let separators = if config.separators.is_empty() {
            default_separators()
        } else {
            config.separators.clone()
        };
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separators,
        }
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            separators: default_separators(),
        }
    }
}

/// Context passed to chunkers for source file information
#[derive(Debug, Clone, Default)]
pub struct ChunkContext {
    pub source_path: Option<String>,
}

/// Trait for content chunking implementations
pub trait ContentChunker: Send + Sync {
    /// Chunk text content with optional context
    fn chunk(&self, text: &str, context: Option<&ChunkContext>) -> Vec<TextChunk>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub content: String,
    pub char_count: usize,
}

impl TextChunk {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let char_count = content.chars().count();
        Self {
            content,
            char_count,
        }
    }
}

const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "vs.", "etc.", "i.e.", "e.g.", "Inc.",
    "Ltd.", "Corp.", "Co.", "No.", "Vol.", "Ch.", "Fig.", "Eq.", "Sec.",
];

/// Groups whole sentences into chunks. Backs the `sentence` strategy and is
/// the fallback for the splitter-based strategies.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size.max(1),
            chunk_overlap: params.chunk_overlap,
        }
    }

    fn chunk_internal(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let sentences = self.split_into_sentences(text);
        self.merge_sentences_into_chunks(sentences)
    }

    fn split_into_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();

        for grapheme in text.graphemes(true) {
            current.push_str(grapheme);

            if Self::is_sentence_boundary(&current) {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }

        if !current.trim().is_empty() {
            sentences.push(current.trim().to_string());
        }

        sentences
    }

    fn is_sentence_boundary(text: &str) -> bool {
        // A trailing newline always ends a sentence.
        if text.ends_with('\n') {
            return true;
        }

        let trimmed = text.trim_end();
        let Some(last_char) = trimmed.chars().last() else {
            return false;
        };

        if !matches!(last_char, '.' | '!' | '?' | '。' | '！' | '？') {
            return false;
        }

        match trimmed.split_whitespace().last() {
            Some(last_word) => !ABBREVIATIONS.contains(&last_word),
            None => true,
        }
    }

    fn merge_sentences_into_chunks(&self, sentences: Vec<String>) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut current_len = 0usize;
        let mut current_sentences: Vec<String> = Vec::new();

        for sentence in sentences {
            let sentence_len = sentence.chars().count();
            let potential_length = if current_sentences.is_empty() {
                sentence_len
            } else {
                current_len + 1 + sentence_len
            };

            if potential_length > self.chunk_size && !current_sentences.is_empty() {
                chunks.push(TextChunk::new(current_sentences.join(" ")));

                current_sentences = self.overlap_tail(&current_sentences);
                current_len = Self::joined_len(&current_sentences);
            }

            current_len = if current_sentences.is_empty() {
                sentence_len
            } else {
                current_len + 1 + sentence_len
            };
            current_sentences.push(sentence);
        }

        if !current_sentences.is_empty() {
            chunks.push(TextChunk::new(current_sentences.join(" ")));
        }

        chunks
    }

    /// Trailing sentences of the previous chunk that fit in the overlap budget.
    fn overlap_tail(&self, sentences: &[String]) -> Vec<String> {
        if self.chunk_overlap == 0 {
            return Vec::new();
        }

        let mut overlap_len = 0;
        let mut tail = Vec::new();

        for sentence in sentences.iter().rev() {
            let len = sentence.chars().count();
            if overlap_len + len > self.chunk_overlap {
                break;
            }
            overlap_len += len + 1;
            tail.push(sentence.clone());
        }

        tail.reverse();
        tail
    }

    fn joined_len(sentences: &[String]) -> usize {
        let chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
        chars + sentences.len().saturating_sub(1)
    }
}

impl ContentChunker for TextChunker {
    fn chunk(&self, text: &str, _context: Option<&ChunkContext>) -> Vec<TextChunk> {
        self.chunk_internal(text)
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(&ChunkParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(&ChunkParams {
            chunk_size: size,
            chunk_overlap: overlap,
            separators: vec![],
        })
    }

    #[test]
    fn test_text_chunker_basic() {
        let chunker = TextChunker::default();
        let text = "First sentence. Second sentence. Third sentence.";

        let chunks = chunker.chunk(text, None);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
    }

    #[test]
    fn test_text_chunker_empty_input() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("", None).is_empty());
    }

    #[test]
    fn test_text_chunker_respects_size() {
        let chunker = chunker(20, 0);
        let text = "One two three. Four five six. Seven eight nine.";

        let chunks = chunker.chunk(text, None);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "One two three.");
        assert_eq!(chunks[1].content, "Four five six.");
        assert!(chunks.iter().all(|c| c.char_count <= 20));
    }

    #[test]
    fn test_text_chunker_overlap_repeats_tail_sentence() {
        let chunker = chunker(30, 20);
        let text = "Aa bb cc dd ee ff. Gg hh. Ii jj kk ll mm nn oo.";

        let chunks = chunker.chunk(text, None);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Aa bb cc dd ee ff. Gg hh.");
        assert_eq!(chunks[1].content, "Gg hh. Ii jj kk ll mm nn oo.");
    }

    #[test]
    fn test_text_chunker_keeps_abbreviations_together() {
        let chunker = chunker(20, 0);
        let chunks = chunker.chunk("Dr. Smith arrived. He sat.", None);

        assert_eq!(chunks[0].content, "Dr. Smith arrived.");
    }

    #[test]
    fn test_text_chunker_ignores_context() {
        let chunker = TextChunker::default();
        let text = "Simple text.";

        let with_context = chunker.chunk(
            text,
            Some(&ChunkContext {
                source_path: Some("test.txt".into()),
            }),
        );
        let without_context = chunker.chunk(text, None);

        assert_eq!(with_context, without_context);
    }

    #[test]
    fn test_params_from_request_defaults_separators() {
        let request = ChunkGenerationConfig {
            file_ids: vec![],
            strategy: "recursive".into(),
            separators: vec![],
            chunk_size: 10,
            chunk_overlap: 2,
        };
        let params = ChunkParams::from_request(&request);
        assert_eq!(params.separators, default_separators());
        assert_eq!(params.chunk_size, 10);
    }

    #[test]
    fn test_text_chunk_counts_chars() {
        assert_eq!(TextChunk::new("héllo").char_count, 5);
    }
}
