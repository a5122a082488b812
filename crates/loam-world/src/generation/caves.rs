use loam_blocks::BlockId;
use loam_geom::IVec3;

use crate::world::World;

/// Carves air where 3D noise, weighted by the height density curve, exceeds the
/// threshold. Water is never carved.
pub(super) fn apply_caves(world: &World, p: IVec3, block: &mut BlockId) {
    let params = &world.params;
    if !params.caves_enable || *block == world.blocks.water {
        return;
    }
    let weight = params
        .cave_density
        .evaluate(p.y as f32 / world.chunk_height as f32);
    if weight <= 0.0 && params.cave_threshold >= 0.0 {
        return;
    }
    let density = world.noise().sample3d(
        p.x as f32,
        p.y as f32,
        p.z as f32,
        params.cave_noise.scale,
        params.cave_noise.offset,
    ) * weight;
    if density > params.cave_threshold {
        *block = world.blocks.air;
    }
}
