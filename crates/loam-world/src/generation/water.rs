use loam_blocks::BlockId;

use crate::world::TerrainBlocks;
use crate::worldgen::WorldGenParams;

pub(super) fn apply_water_fill(
    blocks: &TerrainBlocks,
    params: &WorldGenParams,
    y: i32,
    block: &mut BlockId,
) {
    if *block == blocks.air && y <= params.water_level {
        *block = blocks.water;
    }
}
