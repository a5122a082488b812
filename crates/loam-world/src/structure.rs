//! Tree structures expressed as deferred edits.
//!
//! Edits carry absolute positions and are never clipped to the anchor's chunk;
//! routing them to the owning chunks is the caller's concern.

use loam_geom::IVec3;

use crate::edit::{EditSink, VoxelEdit};
use crate::world::World;

/// Dimensions of one tree, derived from noise at the anchor column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeShape {
    pub trunk_height: i32,
    pub leaves_start: i32,
    pub base_radius: i32,
}

impl TreeShape {
    pub fn at(world: &World, anchor: IVec3) -> Self {
        let p = &world.params;
        let n = world.noise();
        let (x, z) = (anchor.x as f32, anchor.z as f32);
        Self {
            trunk_height: p.trunk.pick(n.sample2d(x, z, p.trunk.scale, p.trunk.offset)),
            leaves_start: p
                .leaves_start
                .pick(n.sample2d(x, z, p.leaves_start.scale, p.leaves_start.offset)),
            base_radius: p
                .leaf_radius
                .pick(n.sample2d(x, z, p.leaf_radius.scale, p.leaf_radius.offset)),
        }
    }

    /// Number of log voxels above the anchor.
    #[inline]
    pub fn log_count(&self) -> i32 {
        (self.trunk_height - 4).max(0)
    }

    /// Leaf disc radius for layer `i` above the anchor. Negative means no disc.
    #[inline]
    pub fn layer_radius(&self, i: i32) -> i32 {
        ((1.0 - i as f32 / self.trunk_height as f32) * self.base_radius as f32).floor() as i32
    }

    /// Layers above the anchor that carry leaves.
    #[inline]
    pub fn leaf_layers(&self) -> core::ops::Range<i32> {
        (self.leaves_start + 1)..(self.trunk_height + 3)
    }
}

pub fn emit_tree(world: &World, anchor: IVec3, sink: &mut dyn EditSink) {
    let shape = TreeShape::at(world, anchor);
    let log = world.blocks.log;
    let leaves = world.blocks.leaves;
    let trunk_top = shape.trunk_height - 3;

    for i in 1..trunk_top {
        sink.push_edit(VoxelEdit::new(anchor.offset(0, i, 0), log));
    }

    for i in shape.leaf_layers() {
        let r = shape.layer_radius(i);
        for dx in -r..=r {
            for dz in -r..=r {
                if dx == 0 && dz == 0 && i < trunk_top {
                    continue;
                }
                let dist = ((dx * dx + dz * dz) as f32).sqrt();
                if dist <= r as f32 {
                    sink.push_edit(VoxelEdit::new(anchor.offset(dx, i, dz), leaves));
                }
            }
        }
    }
}

/// Collects the edits of one tree rooted at `anchor`.
pub fn generate_tree(world: &World, anchor: IVec3) -> Vec<VoxelEdit> {
    let mut out = Vec::new();
    emit_tree(world, anchor, &mut out);
    out
}
