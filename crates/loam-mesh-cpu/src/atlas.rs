/// Square texture atlas of `cells x cells` equally sized tiles.
///
/// Tile indices count left to right starting at the top row; UV space has its
/// origin at the bottom-left, so rows are flipped when mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureAtlas {
    pub cells: u32,
}

impl TextureAtlas {
    pub const fn new(cells: u32) -> Self {
        Self { cells }
    }

    /// Normalised size of one tile.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        1.0 / self.cells.max(1) as f32
    }

    /// Bottom-left UV of tile `index`.
    #[inline]
    pub fn tile_origin(&self, index: u16) -> (f32, f32) {
        let cells = self.cells.max(1);
        let index = u32::from(index);
        let row = index / cells;
        let col = index - row * cells;
        let n = self.tile_size();
        let x = col as f32 * n;
        let y = 1.0 - row as f32 * n - n;
        (x, y)
    }

    /// UVs matching the four quad vertices of a face, in table order.
    #[inline]
    pub fn quad_uvs(&self, index: u16) -> [(f32, f32); 4] {
        let (x, y) = self.tile_origin(index);
        let n = self.tile_size();
        [(x, y), (x, y + n), (x + n, y), (x + n, y + n)]
    }
}
