use loam_blocks::BlockId;
use loam_geom::IVec3;

use super::ColumnSample;
use crate::edit::EditSink;
use crate::structure;
use crate::world::World;

/// Tree anchors: dry grass at the surface that passes the zone and placement gates.
pub(super) fn apply_decoration(
    world: &World,
    p: IVec3,
    column: &ColumnSample,
    block: &mut BlockId,
    sink: &mut dyn EditSink,
) {
    let params = &world.params;
    if !params.trees_enable
        || p.y != column.terrain_height
        || p.y <= params.water_level
        || *block != world.blocks.grass
    {
        return;
    }
    let (x, z) = (p.x as f32, p.z as f32);
    let zone = params.tree_zone;
    if world.noise().sample2d(x, z, zone.scale, zone.offset) <= zone.threshold {
        return;
    }
    let placement = params.tree_placement;
    if world
        .noise()
        .sample2d(x, z, placement.scale, placement.offset)
        <= placement.threshold
    {
        return;
    }
    *block = world.blocks.dirt;
    log::trace!(target: "worldgen", "tree anchor at {:?}", p);
    structure::emit_tree(world, p, sink);
}
