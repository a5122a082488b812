use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::curve::ResponseCurve;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read worldgen config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid worldgen config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub dirt: Dirt,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default)]
    pub trees: Trees,
}

/// Offset and scale for one noise pass.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NoiseLayer {
    pub offset: f32,
    pub scale: f32,
}

impl NoiseLayer {
    pub const fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }
}

/// A noise pass compared against a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NoiseGate {
    pub offset: f32,
    pub scale: f32,
    pub threshold: f32,
}

impl NoiseGate {
    #[inline]
    pub fn layer(self) -> NoiseLayer {
        NoiseLayer::new(self.offset, self.scale)
    }
}

/// A noise pass mapped to `max(min, trunc(max * noise))`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NoiseRange {
    pub offset: f32,
    pub scale: f32,
    pub min: i32,
    pub max: i32,
}

impl NoiseRange {
    #[inline]
    pub fn pick(self, sample: f32) -> i32 {
        ((self.max as f32 * sample) as i32).max(self.min)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_chunk_width")]
    pub chunk_width: usize,
    #[serde(default = "default_chunk_height")]
    pub chunk_height: usize,
    #[serde(default = "default_atlas_cells")]
    pub atlas_cells: u32,
}
fn default_seed() -> i32 {
    0
}
fn default_chunk_width() -> usize {
    16
}
fn default_chunk_height() -> usize {
    128
}
fn default_atlas_cells() -> u32 {
    4
}
impl Default for WorldSection {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunk_width: default_chunk_width(),
            chunk_height: default_chunk_height(),
            atlas_cells: default_atlas_cells(),
        }
    }
}

/// Block identifiers the generators place.
#[derive(Clone, Debug, Deserialize)]
pub struct Palette {
    #[serde(default = "default_air")]
    pub air: String,
    #[serde(default = "default_bedrock")]
    pub bedrock: String,
    #[serde(default = "default_stone")]
    pub stone: String,
    #[serde(default = "default_dirt")]
    pub dirt: String,
    #[serde(default = "default_grass")]
    pub grass: String,
    #[serde(default = "default_water")]
    pub water: String,
    #[serde(default = "default_log")]
    pub log: String,
    #[serde(default = "default_leaves")]
    pub leaves: String,
}
fn default_air() -> String {
    "minecraft:air".into()
}
fn default_bedrock() -> String {
    "minecraft:bedrock".into()
}
fn default_stone() -> String {
    "minecraft:stone".into()
}
fn default_dirt() -> String {
    "minecraft:dirt".into()
}
fn default_grass() -> String {
    "minecraft:grass".into()
}
fn default_water() -> String {
    "minecraft:water".into()
}
fn default_log() -> String {
    "minecraft:oak_log".into()
}
fn default_leaves() -> String {
    "minecraft:oak_leaves".into()
}
impl Default for Palette {
    fn default() -> Self {
        Self {
            air: default_air(),
            bedrock: default_bedrock(),
            stone: default_stone(),
            dirt: default_dirt(),
            grass: default_grass(),
            water: default_water(),
            log: default_log(),
            leaves: default_leaves(),
        }
    }
}

impl Palette {
    pub fn identifiers(&self) -> [&str; 8] {
        [
            &self.air,
            &self.bedrock,
            &self.stone,
            &self.dirt,
            &self.grass,
            &self.water,
            &self.log,
            &self.leaves,
        ]
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_ground_height")]
    pub ground_height: i32,
    #[serde(default = "default_erosion_scale")]
    pub erosion_scale: f32,
    #[serde(default = "default_continentalness_layer")]
    pub continentalness: NoiseLayer,
    #[serde(default = "default_peaks_valleys_offset")]
    pub peaks_valleys_offset: f32,
    #[serde(default = "default_erosion_layer")]
    pub erosion: NoiseLayer,
    #[serde(default = "default_continentalness_curve")]
    pub continentalness_curve: ResponseCurve,
    #[serde(default = "default_peaks_valleys_curve")]
    pub peaks_valleys_curve: ResponseCurve,
    #[serde(default = "default_erosion_curve")]
    pub erosion_curve: ResponseCurve,
}
fn default_ground_height() -> i32 {
    60
}
fn default_erosion_scale() -> f32 {
    0.9
}
fn default_continentalness_layer() -> NoiseLayer {
    NoiseLayer::new(0.0, 0.25)
}
fn default_peaks_valleys_offset() -> f32 {
    10_000.0
}
fn default_erosion_layer() -> NoiseLayer {
    NoiseLayer::new(50_000.0, 0.5)
}
fn default_continentalness_curve() -> ResponseCurve {
    ResponseCurve::new(vec![
        [0.0, 0.0],
        [0.3, 0.1],
        [0.45, 0.2],
        [0.55, 0.35],
        [0.7, 0.5],
        [1.0, 0.8],
    ])
}
fn default_peaks_valleys_curve() -> ResponseCurve {
    ResponseCurve::new(vec![[0.0, 0.4], [0.4, 0.25], [0.5, 0.2], [0.6, 0.3], [1.0, 0.7]])
}
fn default_erosion_curve() -> ResponseCurve {
    ResponseCurve::new(vec![[0.0, 0.6], [0.5, 0.3], [1.0, 0.05]])
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            ground_height: default_ground_height(),
            erosion_scale: default_erosion_scale(),
            continentalness: default_continentalness_layer(),
            peaks_valleys_offset: default_peaks_valleys_offset(),
            erosion: default_erosion_layer(),
            continentalness_curve: default_continentalness_curve(),
            peaks_valleys_curve: default_peaks_valleys_curve(),
            erosion_curve: default_erosion_curve(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_water_level")]
    pub level: i32,
}
fn default_water_level() -> i32 {
    76
}
impl Default for Water {
    fn default() -> Self {
        Self {
            level: default_water_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dirt {
    #[serde(default = "default_dirt_layer")]
    pub noise: NoiseLayer,
    #[serde(default = "default_dirt_depth")]
    pub max_depth: i32,
}
fn default_dirt_layer() -> NoiseLayer {
    NoiseLayer::new(5939.0, 2.0)
}
fn default_dirt_depth() -> i32 {
    5
}
impl Default for Dirt {
    fn default() -> Self {
        Self {
            noise: default_dirt_layer(),
            max_depth: default_dirt_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Caves {
    #[serde(default = "default_caves_enable")]
    pub enable: bool,
    #[serde(default = "default_cave_layer")]
    pub noise: NoiseLayer,
    #[serde(default = "default_cave_threshold")]
    pub threshold: f32,
    /// Density multiplier by normalised height `y / chunk_height`.
    #[serde(default = "default_cave_density")]
    pub density: ResponseCurve,
}
fn default_caves_enable() -> bool {
    true
}
fn default_cave_layer() -> NoiseLayer {
    NoiseLayer::new(25_000.0, 0.07)
}
fn default_cave_threshold() -> f32 {
    0.55
}
fn default_cave_density() -> ResponseCurve {
    ResponseCurve::new(vec![
        [0.0, 0.0],
        [0.05, 0.0],
        [0.25, 0.8],
        [0.45, 0.75],
        [0.55, 0.3],
        [1.0, 0.0],
    ])
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            enable: default_caves_enable(),
            noise: default_cave_layer(),
            threshold: default_cave_threshold(),
            density: default_cave_density(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_trees_enable")]
    pub enable: bool,
    #[serde(default = "default_tree_zone")]
    pub zone: NoiseGate,
    #[serde(default = "default_tree_placement")]
    pub placement: NoiseGate,
    #[serde(default = "default_trunk")]
    pub trunk: NoiseRange,
    #[serde(default = "default_leaves_start")]
    pub leaves_start: NoiseRange,
    #[serde(default = "default_leaf_radius")]
    pub leaf_radius: NoiseRange,
}
fn default_trees_enable() -> bool {
    true
}
fn default_tree_zone() -> NoiseGate {
    NoiseGate {
        offset: 40_302.0,
        scale: 1.3,
        threshold: 0.6,
    }
}
fn default_tree_placement() -> NoiseGate {
    NoiseGate {
        offset: 98_342.0,
        scale: 15.0,
        threshold: 0.75,
    }
}
fn default_trunk() -> NoiseRange {
    NoiseRange {
        offset: 250.0,
        scale: 3.0,
        min: 14,
        max: 28,
    }
}
fn default_leaves_start() -> NoiseRange {
    NoiseRange {
        offset: 280.0,
        scale: 3.0,
        min: 3,
        max: 5,
    }
}
fn default_leaf_radius() -> NoiseRange {
    NoiseRange {
        offset: 340.0,
        scale: 3.0,
        min: 4,
        max: 6,
    }
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            enable: default_trees_enable(),
            zone: default_tree_zone(),
            placement: default_tree_placement(),
            trunk: default_trunk(),
            leaves_start: default_leaves_start(),
            leaf_radius: default_leaf_radius(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Flattened generation parameters read on the per-voxel path.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub seed: i32,
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub atlas_cells: u32,
    pub palette: Palette,
    pub ground_height: i32,
    pub continentalness: NoiseLayer,
    pub peaks_valleys: NoiseLayer,
    pub erosion: NoiseLayer,
    pub continentalness_curve: ResponseCurve,
    pub peaks_valleys_curve: ResponseCurve,
    pub erosion_curve: ResponseCurve,
    pub water_level: i32,
    pub dirt: NoiseLayer,
    pub dirt_max_depth: i32,
    pub caves_enable: bool,
    pub cave_noise: NoiseLayer,
    pub cave_threshold: f32,
    pub cave_density: ResponseCurve,
    pub trees_enable: bool,
    pub tree_zone: NoiseGate,
    pub tree_placement: NoiseGate,
    pub trunk: NoiseRange,
    pub leaves_start: NoiseRange,
    pub leaf_radius: NoiseRange,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        // Defaults always validate.
        match Self::from_config(&WorldGenConfig::default()) {
            Ok(p) => p,
            Err(e) => unreachable!("default worldgen config rejected: {e}"),
        }
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Result<Self, ConfigError> {
        let w = &cfg.world;
        if w.chunk_width == 0 || w.chunk_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk dimensions must be non-zero, got {}x{}",
                w.chunk_width, w.chunk_height
            )));
        }
        if w.atlas_cells == 0 {
            return Err(ConfigError::Invalid("atlas_cells must be non-zero".into()));
        }
        let t = &cfg.terrain;
        if t.ground_height < 0 || t.ground_height >= w.chunk_height as i32 {
            return Err(ConfigError::Invalid(format!(
                "ground_height {} outside 0..{}",
                t.ground_height, w.chunk_height
            )));
        }
        let tr = &cfg.trees;
        if tr.trunk.min < 1 {
            return Err(ConfigError::Invalid(format!(
                "trunk min {} must be at least 1",
                tr.trunk.min
            )));
        }
        Ok(Self {
            seed: w.seed,
            chunk_width: w.chunk_width,
            chunk_height: w.chunk_height,
            atlas_cells: w.atlas_cells,
            palette: cfg.palette.clone(),
            ground_height: t.ground_height,
            continentalness: t.continentalness,
            peaks_valleys: NoiseLayer::new(t.peaks_valleys_offset, 1.0 - t.erosion_scale),
            erosion: t.erosion,
            continentalness_curve: t.continentalness_curve.clone(),
            peaks_valleys_curve: t.peaks_valleys_curve.clone(),
            erosion_curve: t.erosion_curve.clone(),
            water_level: cfg.water.level,
            dirt: cfg.dirt.noise,
            dirt_max_depth: cfg.dirt.max_depth,
            caves_enable: cfg.caves.enable,
            cave_noise: cfg.caves.noise,
            cave_threshold: cfg.caves.threshold,
            cave_density: cfg.caves.density.clone(),
            trees_enable: tr.enable,
            tree_zone: tr.zone,
            tree_placement: tr.placement,
            trunk: tr.trunk,
            leaves_start: tr.leaves_start,
            leaf_radius: tr.leaf_radius,
        })
    }
}

pub fn load_params_from_path(path: impl AsRef<Path>) -> Result<WorldGenParams, ConfigError> {
    let text = fs::read_to_string(path)?;
    let cfg = WorldGenConfig::from_toml_str(&text)?;
    WorldGenParams::from_config(&cfg)
}
