use text_splitter::{ChunkConfig, TextSplitter};

use super::{ChunkContext, ChunkParams, ContentChunker, TextChunk, TextChunker};

/// Splits on the largest unicode semantic level (paragraph, sentence, word,
/// grapheme) that still fits in `chunk_size` characters.
pub struct SemanticChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    fallback_chunker: TextChunker,
}

impl SemanticChunker {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size,
            chunk_overlap: params.chunk_overlap,
            fallback_chunker: TextChunker::new(params),
        }
    }
}

impl ContentChunker for SemanticChunker {
    fn chunk(&self, text: &str, context: Option<&ChunkContext>) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let Ok(chunk_config) = ChunkConfig::new(self.chunk_size).with_overlap(self.chunk_overlap)
        else {
            return self.fallback_chunker.chunk(text, context);
        };

        TextSplitter::new(chunk_config)
            .chunks(text)
            .map(TextChunk::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> SemanticChunker {
        SemanticChunker::new(&ChunkParams {
            chunk_size: size,
            chunk_overlap: overlap,
            separators: vec![],
        })
    }

    #[test]
    fn test_semantic_chunker_fits_small_text_in_one_chunk() {
        let chunks = chunker(100, 0).chunk("A short paragraph. Two sentences.", None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "A short paragraph. Two sentences.");
    }

    #[test]
    fn test_semantic_chunker_respects_capacity() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(30);
        let chunks = chunker(80, 10).chunk(&text, None);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.char_count <= 80));
    }

    #[test]
    fn test_semantic_chunker_blank_input() {
        assert!(chunker(10, 0).chunk("   ", None).is_empty());
    }
}
