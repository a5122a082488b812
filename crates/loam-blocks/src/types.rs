use loam_geom::IVec3;
use serde::{Deserialize, Serialize};

/// Dense registry index stored per voxel.
pub type BlockId = u16;

/// Id 0 is always air.
pub const AIR: BlockId = 0;

/// The six axis-aligned cube faces.
///
/// Discriminants double as the texture slot order used by [`FaceTextures`]
/// and by the mesher's vertex tables.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Back = 0,
    Front = 1,
    Top = 2,
    Bottom = 3,
    Left = 4,
    Right = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Back,
        Face::Front,
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face`.
    ///
    /// # Panics
    /// On any index outside `0..6`.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::Back,
            1 => Face::Front,
            2 => Face::Top,
            3 => Face::Bottom,
            4 => Face::Left,
            5 => Face::Right,
            _ => panic!("face index {i} out of range 0..6"),
        }
    }

    /// Grid step `(dx,dy,dz)` out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Back => (0, 0, -1),
            Face::Front => (0, 0, 1),
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
        }
    }

    #[inline]
    pub fn neighbor_of(self, p: IVec3) -> IVec3 {
        let (dx, dy, dz) = self.delta();
        p.offset(dx, dy, dz)
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Back => Face::Front,
            Face::Front => Face::Back,
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
        }
    }
}

/// Atlas cell index per face, in `Face` order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTextures {
    pub back: u16,
    pub front: u16,
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

impl FaceTextures {
    #[inline]
    pub fn for_face(&self, face: Face) -> u16 {
        match face {
            Face::Back => self.back,
            Face::Front => self.front,
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }
}
