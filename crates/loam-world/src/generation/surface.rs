use loam_blocks::BlockId;

use super::ColumnSample;
use crate::world::TerrainBlocks;

pub(super) fn select_surface_block(blocks: &TerrainBlocks, y: i32, column: &ColumnSample) -> BlockId {
    let h = column.terrain_height;
    let mut block = blocks.air;
    if y < h {
        block = blocks.stone;
    }
    if y == h {
        block = blocks.grass;
    } else if y > h - column.dirt_depth && block == blocks.stone {
        block = blocks.dirt;
    }
    block
}
