//! Persistent deferred edits keyed by chunk.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use loam_blocks::{BlockId, Face};
use loam_geom::IVec3;
use loam_world::{ChunkCoord, VoxelEdit};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
}

/// Chunk-aware edit mailbox.
///
/// Holds the latest block written to each position, grouped by owning chunk.
/// Entries survive whether or not the target chunk exists, so a chunk created
/// (or regenerated) later replays everything addressed to it.
pub struct EditStore {
    chunk_width: i32,
    inner: HashMap<ChunkCoord, HashMap<IVec3, BlockId>>,
}

impl EditStore {
    pub fn new(chunk_width: usize) -> Self {
        Self {
            chunk_width: chunk_width as i32,
            inner: HashMap::new(),
        }
    }

    pub fn stats(&self) -> EditStoreStats {
        EditStoreStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
        }
    }

    #[inline]
    pub fn chunk_key(&self, p: IVec3) -> ChunkCoord {
        ChunkCoord::new(
            p.x.div_euclid(self.chunk_width),
            p.z.div_euclid(self.chunk_width),
        )
    }

    pub fn get(&self, p: IVec3) -> Option<BlockId> {
        self.inner
            .get(&self.chunk_key(p))
            .and_then(|m| m.get(&p).copied())
    }

    /// Records `edit`, replacing any earlier edit at the same position.
    /// Returns the owning chunk.
    pub fn record(&mut self, edit: VoxelEdit) -> ChunkCoord {
        let k = self.chunk_key(edit.position);
        self.inner
            .entry(k)
            .or_default()
            .insert(edit.position, edit.block);
        k
    }

    /// All edits addressed to `coord`, ordered by position.
    pub fn snapshot_for_chunk(&self, coord: ChunkCoord) -> Vec<VoxelEdit> {
        let Some(m) = self.inner.get(&coord) else {
            return Vec::new();
        };
        let mut out: Vec<VoxelEdit> = m.iter().map(|(p, b)| VoxelEdit::new(*p, *b)).collect();
        out.sort_by_key(|e| (e.position.y, e.position.z, e.position.x));
        out
    }

    pub fn chunks_with_edits(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.inner
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(k, _)| *k)
    }

    /// Chunks whose geometry depends on the voxel at `p`: its owner first, then
    /// any chunk holding one of its six face neighbors.
    pub fn get_affected_chunks(&self, p: IVec3) -> Vec<ChunkCoord> {
        let own = self.chunk_key(p);
        let mut affected = vec![own];
        for face in Face::ALL {
            let k = self.chunk_key(face.neighbor_of(p));
            if !affected.contains(&k) {
                affected.push(k);
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> EditStore {
        EditStore::new(16)
    }

    #[test]
    fn border_edits_mark_face_neighbors_only() {
        let store = make_store();
        let (cx, cz) = (4, -2);
        let base_x = cx * 16;
        let base_z = cz * 16;

        let mut west = store.get_affected_chunks(IVec3::new(base_x, 70, base_z + 5));
        west.sort();
        assert_eq!(west, vec![ChunkCoord::new(cx - 1, cz), ChunkCoord::new(cx, cz)]);

        // Corner voxel touches two neighbors but not the diagonal one.
        let mut corner = store.get_affected_chunks(IVec3::new(base_x + 15, 3, base_z + 15));
        corner.sort();
        assert_eq!(
            corner,
            vec![
                ChunkCoord::new(cx, cz),
                ChunkCoord::new(cx, cz + 1),
                ChunkCoord::new(cx + 1, cz),
            ]
        );

        let interior = store.get_affected_chunks(IVec3::new(base_x + 7, 0, base_z + 7));
        assert_eq!(interior, vec![ChunkCoord::new(cx, cz)]);
    }

    #[test]
    fn later_edits_win_and_survive_without_a_chunk() {
        let mut store = make_store();
        let p = IVec3::new(-1, 90, 33);
        let k = store.record(VoxelEdit::new(p, 7));
        assert_eq!(k, ChunkCoord::new(-1, 2));
        store.record(VoxelEdit::new(p, 3));
        assert_eq!(store.get(p), Some(3));
        assert_eq!(store.snapshot_for_chunk(k), vec![VoxelEdit::new(p, 3)]);
        assert!(store.snapshot_for_chunk(ChunkCoord::new(0, 0)).is_empty());
        assert_eq!(
            store.stats(),
            EditStoreStats {
                chunk_entries: 1,
                block_edits: 1
            }
        );
    }
}
