//! Per-voxel terrain classification.
//!
//! Passes run in a fixed order and later passes may overwrite earlier ones:
//! substrate, height field, water, caves, decoration.

mod caves;
mod decoration;
mod surface;
mod water;

use loam_blocks::BlockId;
use loam_geom::IVec3;

use crate::edit::{DiscardEdits, EditSink};
use crate::world::World;

/// Column-invariant terrain values for one `(x, z)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSample {
    pub terrain_height: i32,
    pub dirt_depth: i32,
}

impl World {
    /// Pure classification. Decorations are evaluated but their edits dropped.
    pub fn classify(&self, p: IVec3) -> BlockId {
        self.classify_with(p, &mut DiscardEdits)
    }

    /// Classification that forwards structure edits to `sink`.
    pub fn classify_with(&self, p: IVec3, sink: &mut dyn EditSink) -> BlockId {
        if !self.in_vertical_bounds(p.y) {
            return self.blocks.air;
        }
        let column = self.column_at(p.x, p.z);
        self.classify_in_column(p, &column, sink)
    }

    /// Classification with a precomputed column sample for `(p.x, p.z)`.
    pub fn classify_in_column(
        &self,
        p: IVec3,
        column: &ColumnSample,
        sink: &mut dyn EditSink,
    ) -> BlockId {
        if !self.in_vertical_bounds(p.y) {
            return self.blocks.air;
        }
        if p.y == 0 {
            return self.blocks.bedrock;
        }
        let mut block = surface::select_surface_block(&self.blocks, p.y, column);
        water::apply_water_fill(&self.blocks, &self.params, p.y, &mut block);
        caves::apply_caves(self, p, &mut block);
        decoration::apply_decoration(self, p, column, &mut block, sink);
        block
    }

    pub fn column_at(&self, x: i32, z: i32) -> ColumnSample {
        ColumnSample {
            terrain_height: self.terrain_height(x, z),
            dirt_depth: self.dirt_depth(x, z),
        }
    }

    /// Surface height: ground plus the averaged, curve-shaped height-field passes.
    pub fn terrain_height(&self, x: i32, z: i32) -> i32 {
        let p = &self.params;
        let n = self.noise();
        let (fx, fz) = (x as f32, z as f32);
        let continental = p.continentalness_curve.evaluate(n.sample2d(
            fx,
            fz,
            p.continentalness.scale,
            p.continentalness.offset,
        ));
        let peaks = p.peaks_valleys_curve.evaluate(n.sample2d(
            fx,
            fz,
            p.peaks_valleys.scale,
            p.peaks_valleys.offset,
        ));
        let erosion =
            p.erosion_curve
                .evaluate(n.sample2d(fx, fz, p.erosion.scale, p.erosion.offset));
        let avg = (continental + peaks + erosion) / 3.0;
        let span = (self.chunk_height as i32 - p.ground_height) as f32;
        p.ground_height + (span * avg).floor() as i32
    }

    pub fn dirt_depth(&self, x: i32, z: i32) -> i32 {
        let p = &self.params;
        let s = self
            .noise()
            .sample2d(x as f32, z as f32, p.dirt.scale, p.dirt.offset);
        (s * p.dirt_max_depth as f32).floor() as i32
    }
}
