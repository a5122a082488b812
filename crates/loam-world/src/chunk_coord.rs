use loam_geom::IVec3;
use serde::{Deserialize, Serialize};

/// Chunk position on the horizontal chunk plane. Chunks span the full world height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing the world voxel `p` (floor division).
    #[inline]
    pub fn containing(p: IVec3, chunk_width: usize) -> Self {
        let w = chunk_width as i32;
        Self {
            cx: p.x.div_euclid(w),
            cz: p.z.div_euclid(w),
        }
    }

    /// World position of local voxel (0,0,0).
    #[inline]
    pub fn origin(self, chunk_width: usize) -> IVec3 {
        let w = chunk_width as i32;
        IVec3::new(self.cx * w, 0, self.cz * w)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
