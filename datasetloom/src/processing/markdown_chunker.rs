use text_splitter::{ChunkConfig, MarkdownSplitter};

use super::{ChunkContext, ChunkParams, ContentChunker, TextChunk, TextChunker};

pub struct MarkdownChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    fallback_chunker: TextChunker,
}

impl MarkdownChunker {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size,
            chunk_overlap: params.chunk_overlap,
            fallback_chunker: TextChunker::new(params),
        }
    }
}

impl ContentChunker for MarkdownChunker {
    fn chunk(&self, text: &str, context: Option<&ChunkContext>) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chunk_config = match ChunkConfig::new(self.chunk_size).with_overlap(self.chunk_overlap)
        {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::debug!(error = %e, "Invalid markdown splitter config, using sentence chunker");
                return self.fallback_chunker.chunk(text, context);
            }
        };

        let splitter = MarkdownSplitter::new(chunk_config);
        let chunks: Vec<TextChunk> = splitter.chunks(text).map(TextChunk::new).collect();

        if chunks.is_empty() {
            return self.fallback_chunker.chunk(text, context);
        }

        chunks
    }
}

impl Default for MarkdownChunker {
    fn default() -> Self {
        Self::new(&ChunkParams::default())
    }
}
