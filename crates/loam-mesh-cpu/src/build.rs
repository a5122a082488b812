use std::time::Instant;

use loam_blocks::{BlockRegistry, Face};
use loam_chunk::ChunkBuf;

use crate::atlas::TextureAtlas;
use crate::mesh_build::ChunkMesh;
use crate::neighbors::NeighborLookup;

/// Rebuilds `out` from scratch for `buf`.
///
/// Every solid voxel emits a quad for each face whose neighbor is transparent.
/// Neighbors inside the grid are read directly; others go through `neighbors`.
/// The quad lands in the transparent list when the *source* block is transparent.
pub fn build_chunk_mesh(
    buf: &ChunkBuf,
    neighbors: &dyn NeighborLookup,
    reg: &BlockRegistry,
    atlas: &TextureAtlas,
    out: &mut ChunkMesh,
) {
    let t0 = Instant::now();
    out.clear_keep_capacity();
    out.coord = buf.coord;
    let origin = buf.origin();
    let (sx, sy, sz) = (buf.sx as i32, buf.sy as i32, buf.sz as i32);

    for y in 0..buf.sy {
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let id = buf.get_local(x, y, z);
                let Some(ty) = reg.get(id).filter(|t| t.solid) else {
                    continue;
                };
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    let inside = nx >= 0 && ny >= 0 && nz >= 0 && nx < sx && ny < sy && nz < sz;
                    let open = if inside {
                        reg.is_transparent(buf.get_local(nx as usize, ny as usize, nz as usize))
                    } else {
                        neighbors.is_transparent_at(origin.offset(nx, ny, nz))
                    };
                    if open {
                        out.add_face(x, y, z, face, ty.texture_for(face), atlas, ty.transparent);
                    }
                }
            }
        }
    }

    log::debug!(
        target: "mesh",
        "chunk ({}, {}) opaque_quads={} transparent_quads={} us={}",
        buf.coord.cx,
        buf.coord.cz,
        out.opaque_quads(),
        out.transparent_quads(),
        t0.elapsed().as_micros()
    );
}
