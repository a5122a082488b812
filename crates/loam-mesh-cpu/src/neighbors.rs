use loam_blocks::BlockRegistry;
use loam_geom::IVec3;
use loam_world::World;

/// Transparency queries for voxels outside the chunk being meshed.
pub trait NeighborLookup {
    fn is_transparent_at(&self, p: IVec3) -> bool;
}

impl<F> NeighborLookup for F
where
    F: Fn(IVec3) -> bool,
{
    #[inline]
    fn is_transparent_at(&self, p: IVec3) -> bool {
        self(p)
    }
}

/// Fixed answers at the vertical world edges: below the floor is treated as
/// opaque, at or above the ceiling as open air. `None` inside the world.
#[inline]
pub fn edge_transparency(y: i32, height: usize) -> Option<bool> {
    if y < 0 {
        Some(false)
    } else if y as usize >= height {
        Some(true)
    } else {
        None
    }
}

/// Neighbor lookup that consults only the terrain generator.
pub struct TerrainNeighbors<'a> {
    pub world: &'a World,
    pub reg: &'a BlockRegistry,
}

impl NeighborLookup for TerrainNeighbors<'_> {
    fn is_transparent_at(&self, p: IVec3) -> bool {
        if let Some(t) = edge_transparency(p.y, self.world.chunk_height) {
            return t;
        }
        self.reg.is_transparent(self.world.classify(p))
    }
}
