use std::sync::Arc;

use loam_blocks::{BlockId, BlockRegistry, RegistryError};
use loam_geom::IVec3;

use crate::chunk_coord::ChunkCoord;
use crate::noise::NoiseField;
use crate::worldgen::WorldGenParams;

/// Block ids the generators place, resolved once from the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainBlocks {
    pub air: BlockId,
    pub bedrock: BlockId,
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub water: BlockId,
    pub log: BlockId,
    pub leaves: BlockId,
}

impl TerrainBlocks {
    /// Missing identifiers are logged and resolve to air.
    pub fn resolve(params: &WorldGenParams, reg: &BlockRegistry) -> Self {
        let p = &params.palette;
        Self {
            air: reg.resolve_or_air(&p.air),
            bedrock: reg.resolve_or_air(&p.bedrock),
            stone: reg.resolve_or_air(&p.stone),
            dirt: reg.resolve_or_air(&p.dirt),
            grass: reg.resolve_or_air(&p.grass),
            water: reg.resolve_or_air(&p.water),
            log: reg.resolve_or_air(&p.log),
            leaves: reg.resolve_or_air(&p.leaves),
        }
    }
}

pub struct World {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub seed: i32,
    pub params: Arc<WorldGenParams>,
    pub blocks: TerrainBlocks,
    noise: NoiseField,
}

impl World {
    pub fn new(params: WorldGenParams, reg: &BlockRegistry) -> Self {
        let blocks = TerrainBlocks::resolve(&params, reg);
        Self::with_blocks(params, blocks)
    }

    /// Like [`World::new`] but fails if any palette identifier is missing.
    pub fn validated(params: WorldGenParams, reg: &BlockRegistry) -> Result<Self, RegistryError> {
        reg.validate_identifiers(params.palette.identifiers())?;
        Ok(Self::new(params, reg))
    }

    fn with_blocks(params: WorldGenParams, blocks: TerrainBlocks) -> Self {
        log::info!(
            target: "worldgen",
            "world seed={} chunk={}x{} ground={} water={}",
            params.seed,
            params.chunk_width,
            params.chunk_height,
            params.ground_height,
            params.water_level
        );
        Self {
            chunk_width: params.chunk_width,
            chunk_height: params.chunk_height,
            seed: params.seed,
            noise: NoiseField::new(params.seed, params.chunk_width),
            blocks,
            params: Arc::new(params),
        }
    }

    #[inline]
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    #[inline]
    pub fn chunk_coord_of(&self, p: IVec3) -> ChunkCoord {
        ChunkCoord::containing(p, self.chunk_width)
    }

    #[inline]
    pub fn chunk_origin(&self, coord: ChunkCoord) -> IVec3 {
        coord.origin(self.chunk_width)
    }

    /// The world is unbounded horizontally and spans `0..chunk_height` vertically.
    #[inline]
    pub fn in_vertical_bounds(&self, y: i32) -> bool {
        y >= 0 && (y as usize) < self.chunk_height
    }

    #[inline]
    pub fn voxels_per_chunk(&self) -> usize {
        self.chunk_width * self.chunk_width * self.chunk_height
    }
}
