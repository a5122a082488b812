use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Seeded coherent noise remapped to `[0,1]`.
///
/// Every generation pass samples the same field at its own offset so passes stay
/// decorrelated. 2D coordinates are normalised by the chunk width before scaling.
pub struct NoiseField {
    seed: i32,
    reference_width: f32,
    perlin: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32, reference_width: usize) -> Self {
        let mut perlin = FastNoiseLite::with_seed(seed);
        perlin.set_noise_type(Some(NoiseType::Perlin));
        perlin.set_frequency(Some(1.0));
        Self {
            seed,
            reference_width: reference_width.max(1) as f32,
            perlin,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn sample2d(&self, x: f32, z: f32, scale: f32, offset: f32) -> f32 {
        let nx = (x + 0.1) / self.reference_width * scale + offset;
        let nz = (z + 0.1) / self.reference_width * scale + offset;
        remap(self.perlin.get_noise_2d(nx, nz))
    }

    #[inline]
    pub fn sample3d(&self, x: f32, y: f32, z: f32, scale: f32, offset: f32) -> f32 {
        let nx = (x + offset + 0.1) * scale;
        let ny = (y + offset + 0.1) * scale;
        let nz = (z + offset + 0.1) * scale;
        remap(self.perlin.get_noise_3d(nx, ny, nz))
    }
}

#[inline]
fn remap(n: f32) -> f32 {
    (n * 0.5 + 0.5).clamp(0.0, 1.0)
}
