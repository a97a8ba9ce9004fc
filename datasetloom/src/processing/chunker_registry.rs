use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoomError;

use super::{
    CharacterChunker, ChunkParams, ContentChunker, MarkdownChunker, RecursiveChunker,
    SemanticChunker, TextChunker,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    #[default]
    Recursive,
    Character,
    Markdown,
    Semantic,
    Sentence,
}

impl ChunkStrategy {
    pub const ALL: [ChunkStrategy; 5] = [
        ChunkStrategy::Recursive,
        ChunkStrategy::Character,
        ChunkStrategy::Markdown,
        ChunkStrategy::Semantic,
        ChunkStrategy::Sentence,
    ];
}

impl fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recursive => write!(f, "recursive"),
            Self::Character => write!(f, "character"),
            Self::Markdown => write!(f, "markdown"),
            Self::Semantic => write!(f, "semantic"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

impl FromStr for ChunkStrategy {
    type Err = LoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recursive" => Ok(Self::Recursive),
            "character" | "text" => Ok(Self::Character),
            "markdown" => Ok(Self::Markdown),
            "semantic" => Ok(Self::Semantic),
            "sentence" => Ok(Self::Sentence),
            _ => Err(LoomError::Validation(format!("Unknown chunk strategy: {s}"))),
        }
    }
}

/// Owns one chunker per strategy, all sized from the same parameters.
/// Built per request since sizing comes from the request.
pub struct ChunkerRegistry {
    recursive: RecursiveChunker,
    character: CharacterChunker,
    markdown: MarkdownChunker,
    semantic: SemanticChunker,
    sentence: TextChunker,
}

impl ChunkerRegistry {
    pub fn new(params: &ChunkParams) -> Self {
        Self {
            recursive: RecursiveChunker::new(params),
            character: CharacterChunker::new(params),
            markdown: MarkdownChunker::new(params),
            semantic: SemanticChunker::new(params),
            sentence: TextChunker::new(params),
        }
    }

    pub fn get_chunker(&self, strategy: &ChunkStrategy) -> &dyn ContentChunker {
        match strategy {
            ChunkStrategy::Recursive => &self.recursive,
            ChunkStrategy::Character => &self.character,
            ChunkStrategy::Markdown => &self.markdown,
            ChunkStrategy::Semantic => &self.semantic,
            ChunkStrategy::Sentence => &self.sentence,
        }
    }
}

impl Default for ChunkerRegistry {
    fn default() -> Self {
        Self::new(&ChunkParams::default())
    }
}
