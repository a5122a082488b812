//! Chunk voxel grid and terrain population.
#![forbid(unsafe_code)]

use loam_blocks::{AIR, BlockId};
use loam_geom::IVec3;
use loam_world::{ChunkCoord, EditSink, World};

/// Dense `sx * sy * sz` grid of block ids for one chunk column.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<BlockId>,
}

impl ChunkBuf {
    /// All-air grid.
    pub fn empty(coord: ChunkCoord, sx: usize, sy: usize, sz: usize) -> Self {
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: vec![AIR; sx * sy * sz],
        }
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<BlockId>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let i = self.idx(x, y, z);
        self.blocks[i] = id;
    }

    #[inline]
    pub fn origin(&self) -> IVec3 {
        IVec3::new(
            self.coord.cx * self.sx as i32,
            0,
            self.coord.cz * self.sz as i32,
        )
    }

    /// Local coordinates of world position `p` if it lies inside this grid.
    #[inline]
    pub fn local_of(&self, p: IVec3) -> Option<(usize, usize, usize)> {
        let o = self.origin();
        let (lx, ly, lz) = (p.x - o.x, p.y - o.y, p.z - o.z);
        if lx < 0 || ly < 0 || lz < 0 {
            return None;
        }
        let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
        if lx >= self.sx || ly >= self.sy || lz >= self.sz {
            return None;
        }
        Some((lx, ly, lz))
    }

    #[inline]
    pub fn contains_world(&self, p: IVec3) -> bool {
        self.local_of(p).is_some()
    }

    #[inline]
    pub fn get_world(&self, p: IVec3) -> Option<BlockId> {
        self.local_of(p).map(|(x, y, z)| self.get_local(x, y, z))
    }

    /// Writes `id` at world position `p`. Returns false if `p` is outside the grid.
    #[inline]
    pub fn set_world(&mut self, p: IVec3, id: BlockId) -> bool {
        match self.local_of(p) {
            Some((x, y, z)) => {
                self.set_local(x, y, z, id);
                true
            }
            None => false,
        }
    }
}

/// Classifies every voxel of `coord`, forwarding structure edits to `sink`.
pub fn generate_chunk_buffer(world: &World, coord: ChunkCoord, sink: &mut dyn EditSink) -> ChunkBuf {
    let sx = world.chunk_width;
    let sy = world.chunk_height;
    let sz = world.chunk_width;
    let mut buf = ChunkBuf::empty(coord, sx, sy, sz);
    let base = buf.origin();
    for z in 0..sz {
        for x in 0..sx {
            let wx = base.x + x as i32;
            let wz = base.z + z as i32;
            let column = world.column_at(wx, wz);
            for y in 0..sy {
                let id = world.classify_in_column(IVec3::new(wx, y as i32, wz), &column, sink);
                buf.blocks[(y * sz + z) * sx + x] = id;
            }
        }
    }
    buf
}
