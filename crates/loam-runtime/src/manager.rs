use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use loam_blocks::{BlockId, BlockRegistry};
use loam_chunk::{ChunkBuf, generate_chunk_buffer};
use loam_edit::{EditStore, EditStoreStats};
use loam_geom::{IVec3, Vec3};
use loam_mesh_cpu::{NeighborLookup, TextureAtlas, edge_transparency};
use loam_world::{ChunkCoord, DiscardEdits, VoxelEdit, World};

use crate::chunk::Chunk;
use crate::config::StreamConfig;
use crate::render::RenderUpdate;

#[derive(Clone, Debug, Default)]
pub struct InitialReport {
    /// Chunks populated inside the view window.
    pub window: Vec<ChunkCoord>,
    /// Chunks outside the window created only to receive structure edits.
    pub spilled: Vec<ChunkCoord>,
    pub structure_edits: usize,
}

/// What one observer move changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamDelta {
    pub queued: Vec<ChunkCoord>,
    pub activated: Vec<ChunkCoord>,
    pub deactivated: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

impl StreamDelta {
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
            && self.activated.is_empty()
            && self.deactivated.is_empty()
            && self.evicted.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks taken from the creation queue, in queue order.
    pub built: Vec<ChunkCoord>,
    /// Already-populated chunks rebuilt because structure edits reached them.
    pub rebuilt: Vec<ChunkCoord>,
}

/// Owns every chunk and keeps the set around the observer populated, meshed,
/// and visible.
///
/// Chunk creation outside [`ChunkManager::generate_initial`] is throttled
/// through a FIFO queue drained by [`ChunkManager::tick`]. Structure edits
/// and player edits pass through one persistent [`EditStore`].
pub struct ChunkManager {
    world: Arc<World>,
    reg: Arc<BlockRegistry>,
    atlas: TextureAtlas,
    cfg: StreamConfig,
    chunks: HashMap<ChunkCoord, Chunk>,
    active: HashSet<ChunkCoord>,
    create_queue: VecDeque<ChunkCoord>,
    queued: HashSet<ChunkCoord>,
    // Chunks whose structure edits are already in the store.
    decorated: HashSet<ChunkCoord>,
    observer: Option<ChunkCoord>,
    edits: EditStore,
    render_tx: Sender<RenderUpdate>,
    render_rx: Receiver<RenderUpdate>,
}

impl ChunkManager {
    pub fn new(world: Arc<World>, reg: Arc<BlockRegistry>, cfg: StreamConfig) -> Self {
        let (render_tx, render_rx) = unbounded();
        Self {
            atlas: TextureAtlas::new(world.params.atlas_cells),
            edits: EditStore::new(world.chunk_width),
            world,
            reg,
            cfg,
            chunks: HashMap::new(),
            active: HashSet::new(),
            create_queue: VecDeque::new(),
            queued: HashSet::new(),
            decorated: HashSet::new(),
            observer: None,
            render_tx,
            render_rx,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    #[inline]
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.cfg
    }

    /// Chunk the observer stood in at the last streaming update.
    #[inline]
    pub fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.observer
    }

    #[inline]
    pub fn chunk_coord_of(&self, p: Vec3) -> ChunkCoord {
        self.world.chunk_coord_of(p.floor_to_voxel())
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_at(&self, p: IVec3) -> Option<&Chunk> {
        self.chunks.get(&self.world.chunk_coord_of(p))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    pub fn active_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active.iter().copied()
    }

    /// Creation queue, front first.
    pub fn queued_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.create_queue.iter().copied()
    }

    pub fn pending_creations(&self) -> usize {
        self.create_queue.len()
    }

    pub fn edit_stats(&self) -> EditStoreStats {
        self.edits.stats()
    }

    /// Latest deferred edit recorded at `p`, if any.
    pub fn recorded_edit(&self, p: IVec3) -> Option<BlockId> {
        self.edits.get(p)
    }

    pub fn drain_render_updates(&self) -> Vec<RenderUpdate> {
        self.render_rx.try_iter().collect()
    }

    /// Block at `p`. Populated chunks answer from their grid; anywhere else
    /// the recorded edit wins, then the terrain generator.
    pub fn voxel_at(&self, p: IVec3) -> BlockId {
        if !self.world.in_vertical_bounds(p.y) {
            return self.world.blocks.air;
        }
        if let Some(id) = self
            .chunk_at(p)
            .filter(|c| c.is_populated())
            .and_then(|c| c.voxel(p))
        {
            return id;
        }
        self.edits.get(p).unwrap_or_else(|| self.world.classify(p))
    }

    /// Whether the block at `p` is solid. Positions above or below the world
    /// follow the same floor and ceiling rule as mesh culling.
    pub fn is_solid_at(&self, p: IVec3) -> bool {
        if let Some(open) = edge_transparency(p.y, self.world.chunk_height) {
            return !open;
        }
        self.reg.is_solid(self.voxel_at(p))
    }

    /// Coordinates in the window `[c - r, c + r)` on both axes, x-major.
    pub fn window(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.cfg.view_distance;
        let mut out = Vec::with_capacity((2 * r * 2 * r) as usize);
        for cx in center.cx - r..center.cx + r {
            for cz in center.cz - r..center.cz + r {
                out.push(ChunkCoord::new(cx, cz));
            }
        }
        out
    }

    /// Populates and meshes the whole window around `observer` at once.
    ///
    /// Population runs on the rayon pool when `parallel_initial` is set;
    /// structure edits are merged in window order afterwards, so the result
    /// does not depend on scheduling. Chunks up to `spill_rings` beyond the
    /// window are created if structures reach into them.
    pub fn generate_initial(&mut self, observer: Vec3) -> InitialReport {
        let t0 = Instant::now();
        let center = self.chunk_coord_of(observer);
        self.observer = Some(center);

        let todo: Vec<ChunkCoord> = self
            .window(center)
            .into_iter()
            .filter(|c| !self.chunks.contains_key(c))
            .collect();
        let world = Arc::clone(&self.world);
        let populate = |coord: &ChunkCoord| {
            let mut spill = Vec::new();
            let buf = generate_chunk_buffer(&world, *coord, &mut spill);
            (*coord, buf, spill)
        };
        let populated: Vec<(ChunkCoord, ChunkBuf, Vec<VoxelEdit>)> = if self.cfg.parallel_initial {
            todo.par_iter().map(populate).collect()
        } else {
            todo.iter().map(populate).collect()
        };

        let mut report = InitialReport::default();
        let mut spill_edits = Vec::new();
        for (coord, buf, spill) in populated {
            let mut chunk = Chunk::new(coord, &self.world);
            chunk.install(buf);
            self.chunks.insert(coord, chunk);
            self.decorated.insert(coord);
            report.window.push(coord);
            spill_edits.extend(spill);
        }

        let reach = self.cfg.view_distance + self.cfg.spill_rings;
        let mut touched_outside = Vec::new();
        loop {
            report.structure_edits += spill_edits.len();
            let created: HashSet<ChunkCoord> = report
                .window
                .iter()
                .chain(report.spilled.iter())
                .copied()
                .collect();
            let touched = self.route_edits(std::mem::take(&mut spill_edits), |c| {
                created.contains(&c)
            });
            for coord in touched {
                if !touched_outside.contains(&coord) {
                    touched_outside.push(coord);
                }
            }

            let mut missing: Vec<ChunkCoord> = self
                .edits
                .chunks_with_edits()
                .filter(|c| !self.chunks.contains_key(c) && within(center, *c, reach))
                .collect();
            if missing.is_empty() {
                break;
            }
            missing.sort();
            for coord in missing {
                let mut chunk = Chunk::new(coord, &self.world);
                chunk.populate(&self.world, &mut spill_edits);
                self.chunks.insert(coord, chunk);
                self.decorated.insert(coord);
                report.spilled.push(coord);
            }
        }

        for coord in report.window.iter().chain(report.spilled.iter()) {
            let snapshot = self.edits.snapshot_for_chunk(*coord);
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.queue_edits(snapshot);
            }
        }
        let mut created: Vec<ChunkCoord> = report
            .window
            .iter()
            .chain(report.spilled.iter())
            .copied()
            .collect();
        for coord in touched_outside {
            if !created.contains(&coord) {
                created.push(coord);
            }
        }
        // Every grid must be final before any mesh reads across a chunk edge.
        self.apply_pending(&created);
        for coord in created {
            self.rebuild(coord);
        }
        for coord in report.window.clone() {
            self.activate(coord);
        }

        log::info!(
            target: "stream",
            "initial world around ({}, {}): {} chunks, {} spilled, {} structure edits in {:?}",
            center.cx,
            center.cz,
            report.window.len(),
            report.spilled.len(),
            report.structure_edits,
            t0.elapsed()
        );
        report
    }

    /// Re-centres the window on `observer`. Does nothing unless the observer
    /// crossed into another chunk.
    ///
    /// Populated chunks entering the window are shown again without any
    /// regeneration; chunks never seen before are queued for creation.
    pub fn update_streaming(&mut self, observer: Vec3) -> StreamDelta {
        let center = self.chunk_coord_of(observer);
        if self.observer == Some(center) {
            return StreamDelta::default();
        }
        self.observer = Some(center);

        let mut delta = StreamDelta::default();
        let window = self.window(center);
        for &coord in &window {
            match self.chunks.get(&coord) {
                None => {
                    self.chunks.insert(coord, Chunk::new(coord, &self.world));
                    self.enqueue(coord);
                    delta.queued.push(coord);
                }
                Some(chunk) if chunk.is_populated() => {
                    if self.activate(coord) {
                        delta.activated.push(coord);
                    }
                }
                Some(_) => {}
            }
        }

        let inside: HashSet<ChunkCoord> = window.into_iter().collect();
        let mut leaving: Vec<ChunkCoord> = self
            .active
            .iter()
            .filter(|c| !inside.contains(*c))
            .copied()
            .collect();
        leaving.sort();
        for coord in leaving {
            if self.deactivate(coord) {
                delta.deactivated.push(coord);
            }
        }

        delta.evicted = self.enforce_retention();
        log::info!(
            target: "stream",
            "observer now in ({}, {}): +{} queued, {} shown, {} hidden, {} evicted",
            center.cx,
            center.cz,
            delta.queued.len(),
            delta.activated.len(),
            delta.deactivated.len(),
            delta.evicted.len()
        );
        delta
    }

    /// Creates up to `chunks_per_tick` chunks from the front of the queue.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for _ in 0..self.cfg.chunks_per_tick {
            let Some(coord) = self.create_queue.pop_front() else {
                break;
            };
            self.queued.remove(&coord);
            let touched = self.build_queued(coord);
            report.built.push(coord);
            for t in touched {
                if !report.rebuilt.contains(&t) {
                    report.rebuilt.push(t);
                }
            }
        }
        report
    }

    /// Writes `block` at `p` and rebuilds every loaded chunk whose mesh can
    /// see the change. Edits to chunks that do not exist yet are kept and
    /// applied when they are created. Returns the rebuilt chunks, owner first.
    pub fn edit_voxel(&mut self, p: IVec3, block: BlockId) -> Vec<ChunkCoord> {
        if !self.world.in_vertical_bounds(p.y) {
            log::warn!(target: "stream", "ignoring edit outside world height at {:?}", p);
            return Vec::new();
        }
        let edit = VoxelEdit::new(p, block);
        let owner = self.edits.record(edit);
        if let Some(chunk) = self.chunks.get_mut(&owner).filter(|c| c.is_populated()) {
            chunk.queue_edit(edit);
        }
        let mut rebuilt = Vec::new();
        for coord in self.edits.get_affected_chunks(p) {
            if self.rebuild(coord) {
                rebuilt.push(coord);
            }
        }
        log::debug!(target: "stream", "edit {:?} -> {} rebuilt {:?}", p, block, rebuilt);
        rebuilt
    }

    fn build_queued(&mut self, coord: ChunkCoord) -> Vec<ChunkCoord> {
        let t0 = Instant::now();
        let mut chunk = self
            .chunks
            .remove(&coord)
            .unwrap_or_else(|| Chunk::new(coord, &self.world));
        if chunk.is_populated() {
            self.chunks.insert(coord, chunk);
            return Vec::new();
        }

        let mut spill = Vec::new();
        if self.decorated.insert(coord) {
            chunk.populate(&self.world, &mut spill);
        } else {
            // Regenerated after eviction; its structures are already recorded.
            chunk.populate(&self.world, &mut DiscardEdits);
        }
        self.chunks.insert(coord, chunk);

        let touched = self.route_edits(spill, |c| c == coord);
        let snapshot = self.edits.snapshot_for_chunk(coord);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.queue_edits(snapshot);
        }
        self.apply_pending(&touched);
        self.rebuild(coord);
        // Activated even if the observer has moved on; the next streaming
        // update hides it.
        self.activate(coord);
        for &t in &touched {
            self.rebuild(t);
        }
        log::debug!(
            target: "stream",
            "built chunk ({}, {}) in {:?}, {} neighbours rebuilt",
            coord.cx,
            coord.cz,
            t0.elapsed(),
            touched.len()
        );
        touched
    }

    /// Records `edits` and queues them on populated owners not matched by
    /// `skip`. Returns the populated chunks (outside `skip`) whose mesh can
    /// see any of the edited voxels.
    fn route_edits(
        &mut self,
        edits: Vec<VoxelEdit>,
        skip: impl Fn(ChunkCoord) -> bool,
    ) -> Vec<ChunkCoord> {
        let mut touched = Vec::new();
        for e in edits {
            let owner = self.edits.record(e);
            if !skip(owner) {
                if let Some(chunk) = self.chunks.get_mut(&owner).filter(|c| c.is_populated()) {
                    chunk.queue_edit(e);
                }
            }
            for coord in self.edits.get_affected_chunks(e.position) {
                if skip(coord) || touched.contains(&coord) {
                    continue;
                }
                if self.chunks.get(&coord).is_some_and(|c| c.is_populated()) {
                    touched.push(coord);
                }
            }
        }
        touched
    }

    /// Applies pending edits and remeshes `coord`. The chunk is taken out of
    /// the map while it builds so the manager itself can answer neighbour
    /// queries. Returns false for missing or unpopulated chunks.
    fn rebuild(&mut self, coord: ChunkCoord) -> bool {
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        let built = chunk.is_populated();
        if built {
            chunk.rebuild_mesh(&*self, &self.reg, &self.atlas);
        }
        self.chunks.insert(coord, chunk);
        if built {
            self.publish(RenderUpdate::Upload(coord));
        }
        built
    }

    /// Writes queued edits into the grids of `coords` without remeshing.
    fn apply_pending(&mut self, coords: &[ChunkCoord]) {
        for coord in coords {
            if let Some(chunk) = self.chunks.get_mut(coord).filter(|c| c.is_populated()) {
                chunk.apply_pending_edits();
            }
        }
    }

    fn activate(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        debug_assert!(chunk.is_populated());
        if !chunk.set_active(true) {
            return false;
        }
        self.active.insert(coord);
        self.publish(RenderUpdate::Show(coord));
        true
    }

    fn deactivate(&mut self, coord: ChunkCoord) -> bool {
        self.active.remove(&coord);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if !chunk.set_active(false) {
            return false;
        }
        self.publish(RenderUpdate::Hide(coord));
        true
    }

    fn enqueue(&mut self, coord: ChunkCoord) {
        if self.queued.insert(coord) {
            self.create_queue.push_back(coord);
        }
    }

    /// Drops the inactive populated chunks farthest from the observer until
    /// at most `max_retained_chunks` remain. Queued chunks are never dropped.
    fn enforce_retention(&mut self) -> Vec<ChunkCoord> {
        let Some(max) = self.cfg.max_retained_chunks else {
            return Vec::new();
        };
        if self.chunks.len() <= max {
            return Vec::new();
        }
        let center = self.observer.unwrap_or_default();
        let mut candidates: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(c, ch)| ch.is_populated() && !ch.is_active() && !self.queued.contains(*c))
            .map(|(c, _)| *c)
            .collect();
        candidates.sort_by_key(|c| (std::cmp::Reverse(c.distance_sq(center)), *c));
        candidates.truncate(self.chunks.len() - max);
        for coord in &candidates {
            self.chunks.remove(coord);
            self.publish(RenderUpdate::Evict(*coord));
        }
        if !candidates.is_empty() {
            log::debug!(target: "stream", "evicted {} chunks", candidates.len());
        }
        candidates
    }

    fn publish(&self, update: RenderUpdate) {
        // The manager holds a receiver, so the channel never disconnects.
        let _ = self.render_tx.send(update);
    }
}

fn within(center: ChunkCoord, c: ChunkCoord, r: i32) -> bool {
    c.cx >= center.cx - r && c.cx < center.cx + r && c.cz >= center.cz - r && c.cz < center.cz + r
}

impl NeighborLookup for ChunkManager {
    fn is_transparent_at(&self, p: IVec3) -> bool {
        if let Some(open) = edge_transparency(p.y, self.world.chunk_height) {
            return open;
        }
        self.reg.is_transparent(self.voxel_at(p))
    }
}
