use loam_blocks::Face;
use loam_world::ChunkCoord;

use crate::atlas::TextureAtlas;
use crate::face::{QUAD_TRIANGLES, face_corners};

/// Renderable geometry of one chunk.
///
/// Positions are chunk-local; add the chunk origin to place them in the world.
/// Both index lists share the same vertex and UV buffers.
#[derive(Default, Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub pos: Vec<f32>,
    pub uv: Vec<f32>,
    pub opaque: Vec<u32>,
    pub transparent: Vec<u32>,
}

impl ChunkMesh {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            ..Default::default()
        }
    }

    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.uv.clear();
        self.opaque.clear();
        self.transparent.clear();
    }

    /// Appends one cube face of the voxel at local `(x,y,z)`.
    pub fn add_face(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        face: Face,
        texture: u16,
        atlas: &TextureAtlas,
        transparent: bool,
    ) {
        let base = self.vertex_count() as u32;
        let (fx, fy, fz) = (x as f32, y as f32, z as f32);
        for c in face_corners(face) {
            self.pos
                .extend_from_slice(&[fx + c[0], fy + c[1], fz + c[2]]);
        }
        for (u, v) in atlas.quad_uvs(texture) {
            self.uv.extend_from_slice(&[u, v]);
        }
        let list = if transparent {
            &mut self.transparent
        } else {
            &mut self.opaque
        };
        list.extend(QUAD_TRIANGLES.iter().map(|i| base + i));
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn opaque_quads(&self) -> usize {
        self.opaque.len() / 6
    }

    #[inline]
    pub fn transparent_quads(&self) -> usize {
        self.transparent.len() / 6
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.opaque_quads() + self.transparent_quads()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    /// Returns a slice of interleaved texture coordinates (u,v per vertex).
    pub fn uvs(&self) -> &[f32] {
        &self.uv
    }
}
