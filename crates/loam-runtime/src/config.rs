use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeConfigError {
    #[error("failed to read streaming config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse streaming config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid streaming config: {0}")]
    Invalid(String),
}

/// Streaming and scheduling knobs, read from the `[streaming]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StreamConfig {
    /// Half-width of the square view window, in chunks.
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
    /// Chunks taken from the creation queue per `tick`.
    #[serde(default = "default_chunks_per_tick")]
    pub chunks_per_tick: usize,
    /// Evict inactive chunks beyond this many. `None` keeps everything.
    #[serde(default)]
    pub max_retained_chunks: Option<usize>,
    /// Populate the initial window on the rayon pool.
    #[serde(default = "default_parallel_initial")]
    pub parallel_initial: bool,
    /// Rings beyond the initial window that structure spill may create on demand.
    #[serde(default = "default_spill_rings")]
    pub spill_rings: i32,
}

fn default_view_distance() -> i32 {
    10
}
fn default_chunks_per_tick() -> usize {
    1
}
fn default_parallel_initial() -> bool {
    true
}
fn default_spill_rings() -> i32 {
    1
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            view_distance: default_view_distance(),
            chunks_per_tick: default_chunks_per_tick(),
            max_retained_chunks: None,
            parallel_initial: default_parallel_initial(),
            spill_rings: default_spill_rings(),
        }
    }
}

#[derive(Deserialize, Default)]
struct StreamingFile {
    #[serde(default)]
    streaming: StreamConfig,
}

impl StreamConfig {
    /// Reads the `[streaming]` table; other tables in the file are ignored.
    pub fn from_toml_str(text: &str) -> Result<Self, RuntimeConfigError> {
        let file: StreamingFile = toml::from_str(text)?;
        file.streaming.validate()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RuntimeConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(self) -> Result<Self, RuntimeConfigError> {
        if self.view_distance < 1 {
            return Err(RuntimeConfigError::Invalid(format!(
                "view_distance must be at least 1, got {}",
                self.view_distance
            )));
        }
        if self.chunks_per_tick == 0 {
            return Err(RuntimeConfigError::Invalid(
                "chunks_per_tick must be at least 1".into(),
            ));
        }
        if self.spill_rings < 0 {
            return Err(RuntimeConfigError::Invalid(format!(
                "spill_rings must not be negative, got {}",
                self.spill_rings
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_streaming_table_and_ignores_the_rest() {
        let cfg = StreamConfig::from_toml_str(
            r#"
            [world]
            seed = 3

            [streaming]
            view_distance = 4
            max_retained_chunks = 200
        "#,
        )
        .unwrap();
        assert_eq!(cfg.view_distance, 4);
        assert_eq!(cfg.chunks_per_tick, 1);
        assert_eq!(cfg.max_retained_chunks, Some(200));
        assert!(cfg.parallel_initial);
    }

    #[test]
    fn missing_table_gives_defaults() {
        assert_eq!(StreamConfig::from_toml_str("").unwrap(), StreamConfig::default());
    }

    #[test]
    fn shipped_asset_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/worldgen.toml");
        let cfg = StreamConfig::load_from_path(path).unwrap();
        assert_eq!(cfg.view_distance, 10);
        assert_eq!(cfg.max_retained_chunks, None);
    }

    #[test]
    fn rejects_zero_throughput() {
        assert!(matches!(
            StreamConfig::from_toml_str("[streaming]\nchunks_per_tick = 0"),
            Err(RuntimeConfigError::Invalid(_))
        ));
    }
}
