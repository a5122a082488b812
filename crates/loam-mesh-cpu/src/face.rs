use loam_blocks::Face;

/// Unit cube corners, indexed by the face tables below.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Corner indices per face, in `Face` order. Triangles are `(0,1,2)` and `(2,1,3)`
/// and wind so that `(v1 - v0) x (v2 - v0)` points out of the face.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 3, 1, 2],
    [5, 6, 4, 7],
    [3, 7, 2, 6],
    [1, 5, 0, 4],
    [4, 7, 0, 3],
    [1, 2, 5, 6],
];

/// Per-quad triangle list relative to the quad's first vertex.
pub const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 2, 1, 3];

#[inline]
pub fn face_corners(face: Face) -> [[f32; 3]; 4] {
    let c = FACE_CORNERS[face.index()];
    [
        CUBE_CORNERS[c[0]],
        CUBE_CORNERS[c[1]],
        CUBE_CORNERS[c[2]],
        CUBE_CORNERS[c[3]],
    ]
}
