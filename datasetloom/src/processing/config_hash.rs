use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::ChunkGenerationConfig;

/// Canonical form fed to the digest. Field order here is the serialized order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalConfig<'a> {
    file_ids: Vec<&'a str>,
    strategy: &'a str,
    separators: Vec<&'a str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

/// Digest of a chunk generation config, hex encoded.
///
/// `file_ids` and `separators` are sorted before hashing so input order does
/// not matter. Duplicates are kept.
pub fn config_hash(config: &ChunkGenerationConfig) -> Result<String> {
    let mut file_ids: Vec<&str> = config.file_ids.iter().map(String::as_str).collect();
    file_ids.sort_unstable();

    let mut separators: Vec<&str> = config.separators.iter().map(String::as_str).collect();
    separators.sort_unstable();

    let canonical = CanonicalConfig {
        file_ids,
        strategy: &config.strategy,
        separators,
        chunk_size: config.chunk_size,
        chunk_overlap: config.chunk_overlap,
    };

    let bytes = serde_json::to_vec(&canonical)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ChunkGenerationConfig {
        ChunkGenerationConfig {
            file_ids: vec!["doc-b".into(), "doc-a".into(), "doc-c".into()],
            strategy: "recursive".into(),
            separators: vec!["\n\n".into(), "\n".into(), " ".into()],
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = config_hash(&base()).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_list_order() {
        let a = base();
        let mut b = base();
        b.file_ids.reverse();
        b.separators.rotate_left(1);

        assert_eq!(config_hash(&a).unwrap(), config_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_changes_with_every_field() {
        let reference = config_hash(&base()).unwrap();

        let mut changed = base();
        changed.file_ids.push("doc-d".into());
        assert_ne!(config_hash(&changed).unwrap(), reference);

        let mut changed = base();
        changed.strategy = "markdown".into();
        assert_ne!(config_hash(&changed).unwrap(), reference);

        let mut changed = base();
        changed.separators = vec!["\n".into()];
        assert_ne!(config_hash(&changed).unwrap(), reference);

        let mut changed = base();
        changed.chunk_size = 1001;
        assert_ne!(config_hash(&changed).unwrap(), reference);

        let mut changed = base();
        changed.chunk_overlap = 101;
        assert_ne!(config_hash(&changed).unwrap(), reference);
    }

    #[test]
    fn test_hash_keeps_duplicate_separators() {
        let mut doubled = base();
        doubled.separators.push("\n".into());
        assert_ne!(config_hash(&doubled).unwrap(), config_hash(&base()).unwrap());
    }

    #[test]
    fn test_hash_empty_file_list() {
        let mut empty = base();
        empty.file_ids.clear();
        let hash = config_hash(&empty).unwrap();
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_hash_is_case_sensitive_on_strategy() {
        let mut upper = base();
        upper.strategy = "Recursive".into();
        assert_ne!(config_hash(&upper).unwrap(), config_hash(&base()).unwrap());
    }
}
