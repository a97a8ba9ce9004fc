use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse `CHUNK_SEPARATORS`.
/// Format: comma-separated list where `\n` and `\t` escapes are expanded, e.g. `\n\n,\n, `
fn parse_separators() -> Vec<String> {
    match env::var("CHUNK_SEPARATORS") {
        Ok(val) if !val.is_empty() => val
            .split(',')
            .map(|s| s.replace("\\n", "\n").replace("\\t", "\t"))
            .collect(),
        _ => default_separators(),
    }
}

pub fn default_separators() -> Vec<String> {
    vec![
        "\n\n".to_string(),
        "\n".to_string(),
        " ".to_string(),
        String::new(),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub chunking: ChunkingConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl DatabaseConfig {
    /// Local file (or `:memory:`) database with default pragmas.
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

/// Defaults applied when a chunking request leaves a field out, plus the
/// preview cache sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    pub default_strategy: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
    pub preview_ttl_secs: u64,
    pub preview_cache_capacity: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_strategy: "recursive".to_string(),
            chunk_size: 1500,
            chunk_overlap: 200,
            separators: default_separators(),
            preview_ttl_secs: 300,
            preview_cache_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl PaginationConfig {
    pub fn clamp(&self, limit: Option<u32>) -> u32 {
        limit.unwrap_or(self.default_limit).clamp(1, self.max_limit.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        let chunking_defaults = ChunkingConfig::default();
        let pagination_defaults = PaginationConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("LOOM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("LOOM_PORT", 3000),
                api_keys: env::var("LOOM_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:datasetloom.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            chunking: ChunkingConfig {
                default_strategy: env::var("CHUNK_STRATEGY")
                    .unwrap_or(chunking_defaults.default_strategy),
                chunk_size: parse_env_or("CHUNK_SIZE", chunking_defaults.chunk_size),
                chunk_overlap: parse_env_or("CHUNK_OVERLAP", chunking_defaults.chunk_overlap),
                separators: parse_separators(),
                preview_ttl_secs: parse_env_or(
                    "PREVIEW_CACHE_TTL_SECS",
                    chunking_defaults.preview_ttl_secs,
                ),
                preview_cache_capacity: parse_env_or(
                    "PREVIEW_CACHE_CAPACITY",
                    chunking_defaults.preview_cache_capacity,
                ),
            },
            pagination: PaginationConfig {
                default_limit: parse_env_or(
                    "PAGINATION_DEFAULT_LIMIT",
                    pagination_defaults.default_limit,
                ),
                max_limit: parse_env_or("PAGINATION_MAX_LIMIT", pagination_defaults.max_limit),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const CHUNK_VARS: &[&str] = &[
        "CHUNK_STRATEGY",
        "CHUNK_SIZE",
        "CHUNK_OVERLAP",
        "CHUNK_SEPARATORS",
        "PREVIEW_CACHE_TTL_SECS",
        "PREVIEW_CACHE_CAPACITY",
    ];

    fn clear_chunk_vars() {
        for var in CHUNK_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_chunking_config_defaults() {
        clear_chunk_vars();

        let config = Config::default();
        assert_eq!(config.chunking.default_strategy, "recursive");
        assert_eq!(config.chunking.chunk_size, 1500);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.chunking.preview_ttl_secs, 300);
        assert_eq!(config.chunking.separators, default_separators());
    }

    #[test]
    #[serial]
    fn test_chunking_config_from_env() {
        clear_chunk_vars();
        std::env::set_var("CHUNK_SIZE", "800");
        std::env::set_var("CHUNK_OVERLAP", "80");
        std::env::set_var("PREVIEW_CACHE_TTL_SECS", "60");
        std::env::set_var("CHUNK_SEPARATORS", "\\n\\n,\\n");

        let config = Config::default();
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.chunking.chunk_overlap, 80);
        assert_eq!(config.chunking.preview_ttl_secs, 60);
        assert_eq!(
            config.chunking.separators,
            vec!["\n\n".to_string(), "\n".to_string()]
        );

        clear_chunk_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_falls_back_to_default() {
        clear_chunk_vars();
        std::env::set_var("CHUNK_SIZE", "not-a-number");

        let config = Config::default();
        assert_eq!(config.chunking.chunk_size, 1500);

        clear_chunk_vars();
    }

    #[test]
    fn test_pagination_clamp() {
        let pagination = PaginationConfig::default();
        assert_eq!(pagination.clamp(None), 20);
        assert_eq!(pagination.clamp(Some(0)), 1);
        assert_eq!(pagination.clamp(Some(500)), 100);
        assert_eq!(pagination.clamp(Some(15)), 15);
    }
}
