mod chunker;
mod chunker_registry;
pub mod config_hash;
mod markdown_chunker;
pub mod normalize;
mod pipeline;
mod recursive_chunker;
mod semantic_chunker;

pub use chunker::{ChunkContext, ChunkParams, ContentChunker, TextChunk, TextChunker};
pub use chunker_registry::{ChunkStrategy, ChunkerRegistry};
pub use config_hash::config_hash;
pub use markdown_chunker::MarkdownChunker;
pub use normalize::{content_size, normalize_content};
pub use pipeline::ChunkPipeline;
pub use recursive_chunker::{CharacterChunker, RecursiveChunker};
pub use semantic_chunker::SemanticChunker;
