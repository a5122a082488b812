use loam_blocks::BlockId;
use loam_geom::IVec3;

/// A deferred block write at an absolute world position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelEdit {
    pub position: IVec3,
    pub block: BlockId,
}

impl VoxelEdit {
    #[inline]
    pub const fn new(position: IVec3, block: BlockId) -> Self {
        Self { position, block }
    }
}

/// Receives edits produced while classifying or generating structures.
pub trait EditSink {
    fn push_edit(&mut self, edit: VoxelEdit);
}

impl EditSink for Vec<VoxelEdit> {
    #[inline]
    fn push_edit(&mut self, edit: VoxelEdit) {
        self.push(edit);
    }
}

/// Sink for pure queries: drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardEdits;

impl EditSink for DiscardEdits {
    #[inline]
    fn push_edit(&mut self, _edit: VoxelEdit) {}
}
