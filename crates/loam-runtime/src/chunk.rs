use std::collections::VecDeque;

use loam_blocks::{BlockId, BlockRegistry};
use loam_chunk::{ChunkBuf, generate_chunk_buffer};
use loam_geom::IVec3;
use loam_mesh_cpu::{ChunkMesh, NeighborLookup, TextureAtlas, build_chunk_mesh};
use loam_world::{ChunkCoord, EditSink, VoxelEdit, World};

/// One chunk column: voxel grid, derived mesh, and queued edits.
///
/// Lifecycle: created empty, populated exactly once, then rebuilt whenever its
/// grid changes. Toggling `active` never touches the grid or the mesh.
pub struct Chunk {
    buf: ChunkBuf,
    mesh: ChunkMesh,
    pending: VecDeque<VoxelEdit>,
    populated: bool,
    active: bool,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, world: &World) -> Self {
        Self {
            buf: ChunkBuf::empty(coord, world.chunk_width, world.chunk_height, world.chunk_width),
            mesh: ChunkMesh::new(coord),
            pending: VecDeque::new(),
            populated: false,
            active: false,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.buf.coord
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if the flag changed.
    #[inline]
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    #[inline]
    pub fn buf(&self) -> &ChunkBuf {
        &self.buf
    }

    #[inline]
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Fills the grid from the terrain generator; structure edits go to `sink`.
    ///
    /// # Panics
    /// If the chunk was already populated.
    pub fn populate(&mut self, world: &World, sink: &mut dyn EditSink) {
        let coord = self.coord();
        self.install(generate_chunk_buffer(world, coord, sink));
    }

    /// Adopts a grid populated elsewhere (e.g. on a worker thread).
    ///
    /// # Panics
    /// If the chunk was already populated or the grid belongs to another chunk.
    pub fn install(&mut self, buf: ChunkBuf) {
        assert!(!self.populated, "chunk {:?} populated twice", self.coord());
        assert_eq!(buf.coord, self.coord(), "grid for {:?} installed into {:?}", buf.coord, self.coord());
        self.buf = buf;
        self.populated = true;
    }

    /// Grid value at world position `p`, if `p` lies inside this chunk.
    #[inline]
    pub fn voxel(&self, p: IVec3) -> Option<BlockId> {
        self.buf.get_world(p)
    }

    #[inline]
    pub fn queue_edit(&mut self, edit: VoxelEdit) {
        self.pending.push_back(edit);
    }

    pub fn queue_edits(&mut self, edits: impl IntoIterator<Item = VoxelEdit>) {
        self.pending.extend(edits);
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drains the queue into the grid in FIFO order. Edits that fall outside the
    /// grid are dropped. Returns how many were written.
    pub fn apply_pending_edits(&mut self) -> usize {
        let mut applied = 0;
        while let Some(e) = self.pending.pop_front() {
            if self.buf.set_world(e.position, e.block) {
                applied += 1;
            } else {
                log::debug!(
                    target: "stream",
                    "chunk ({}, {}) dropped edit outside grid at {:?}",
                    self.buf.coord.cx,
                    self.buf.coord.cz,
                    e.position
                );
            }
        }
        applied
    }

    /// Applies queued edits, then regenerates the mesh from scratch.
    pub fn rebuild_mesh(
        &mut self,
        neighbors: &dyn NeighborLookup,
        reg: &BlockRegistry,
        atlas: &TextureAtlas,
    ) {
        self.apply_pending_edits();
        build_chunk_mesh(&self.buf, neighbors, reg, atlas, &mut self.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_world::{DiscardEdits, WorldGenConfig, WorldGenParams};

    fn tiny_world(reg: &BlockRegistry) -> World {
        let cfg = WorldGenConfig::from_toml_str(
            "[world]\nchunk_width = 4\nchunk_height = 16\n[terrain]\nground_height = 4\n",
        )
        .unwrap();
        World::new(WorldGenParams::from_config(&cfg).unwrap(), reg)
    }

    #[test]
    #[should_panic(expected = "populated twice")]
    fn populating_twice_is_a_contract_violation() {
        let reg = BlockRegistry::builtin().unwrap();
        let world = tiny_world(&reg);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &world);
        chunk.populate(&world, &mut DiscardEdits);
        chunk.populate(&world, &mut DiscardEdits);
    }

    #[test]
    fn pending_edits_apply_in_order_and_drop_out_of_grid() {
        let reg = BlockRegistry::builtin().unwrap();
        let world = tiny_world(&reg);
        let mut chunk = Chunk::new(ChunkCoord::new(1, 0), &world);
        chunk.populate(&world, &mut DiscardEdits);
        let p = IVec3::new(5, 3, 2);
        chunk.queue_edits([
            VoxelEdit::new(p, 2),
            VoxelEdit::new(p, 9),
            VoxelEdit::new(IVec3::new(5, 16, 2), 2),
            VoxelEdit::new(IVec3::new(0, 3, 2), 2),
        ]);
        assert_eq!(chunk.apply_pending_edits(), 2);
        assert_eq!(chunk.pending_len(), 0);
        assert_eq!(chunk.voxel(p), Some(9));
    }

    #[test]
    fn toggling_active_keeps_mesh() {
        let reg = BlockRegistry::builtin().unwrap();
        let world = tiny_world(&reg);
        let atlas = TextureAtlas::new(4);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &world);
        chunk.populate(&world, &mut DiscardEdits);
        chunk.rebuild_mesh(&|_: IVec3| true, &reg, &atlas);
        let quads = chunk.mesh().quad_count();
        assert!(quads > 0);
        assert!(chunk.set_active(true));
        assert!(!chunk.set_active(true));
        assert!(chunk.set_active(false));
        assert_eq!(chunk.mesh().quad_count(), quads);
        assert!(chunk.is_populated());
    }
}
