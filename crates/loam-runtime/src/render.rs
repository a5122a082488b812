use loam_world::ChunkCoord;

/// Notifications for the external renderer.
///
/// `Upload` means the chunk's mesh changed; read it through
/// [`ChunkManager::chunk`](crate::ChunkManager::chunk).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderUpdate {
    Upload(ChunkCoord),
    Show(ChunkCoord),
    Hide(ChunkCoord),
    Evict(ChunkCoord),
}
