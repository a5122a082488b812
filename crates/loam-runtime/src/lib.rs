//! Chunk lifecycle, streaming around an observer, and deferred edit routing.
#![forbid(unsafe_code)]

mod chunk;
mod config;
mod manager;
mod render;

pub use chunk::Chunk;
pub use config::{RuntimeConfigError, StreamConfig};
pub use manager::{ChunkManager, InitialReport, StreamDelta, TickReport};
pub use render::RenderUpdate;
