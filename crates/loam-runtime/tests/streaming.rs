use std::collections::BTreeSet;
use std::sync::Arc;

use loam_blocks::BlockRegistry;
use loam_geom::{IVec3, Vec3};
use loam_runtime::{ChunkManager, RenderUpdate, StreamConfig};
use loam_world::{ChunkCoord, World, WorldGenConfig, WorldGenParams};
use proptest::prelude::*;

// Surface at 16 + floor(32 * 0.3) = 25 in every column.
const FLAT: &str = r#"
[world]
seed = 99
chunk_width = 8
chunk_height = 48

[terrain]
ground_height = 16
continentalness_curve = [[0.0, 0.3]]
peaks_valleys_curve = [[0.0, 0.3]]
erosion_curve = [[0.0, 0.3]]

[water]
level = 20

[caves]
enable = false

[trees]
enable = false
"#;

// Same surface, with trees on roughly half the columns.
const FOREST: &str = r#"
[world]
seed = 7
chunk_width = 8
chunk_height = 48

[terrain]
ground_height = 16
continentalness_curve = [[0.0, 0.3]]
peaks_valleys_curve = [[0.0, 0.3]]
erosion_curve = [[0.0, 0.3]]

[water]
level = 20

[caves]
enable = false

[trees.zone]
offset = 40302.0
scale = 1.3
threshold = 0.0

[trees.placement]
offset = 98342.0
scale = 15.0
threshold = 0.5

[trees.trunk]
offset = 250.0
scale = 3.0
min = 8
max = 12
"#;

const SURFACE: i32 = 25;

fn stream(view_distance: i32) -> StreamConfig {
    StreamConfig {
        view_distance,
        ..StreamConfig::default()
    }
}

fn manager(toml: &str, cfg: StreamConfig) -> ChunkManager {
    let reg = Arc::new(BlockRegistry::builtin().expect("builtin registry"));
    let wg = WorldGenConfig::from_toml_str(toml).expect("config");
    let params = WorldGenParams::from_config(&wg).expect("params");
    let world = Arc::new(World::validated(params, &reg).expect("palette"));
    ChunkManager::new(world, reg, cfg)
}

fn at_chunk(cx: i32, cz: i32) -> Vec3 {
    Vec3::new(cx as f32 * 8.0 + 4.0, 30.0, cz as f32 * 8.0 + 4.0)
}

fn c(cx: i32, cz: i32) -> ChunkCoord {
    ChunkCoord::new(cx, cz)
}

fn assert_active_populated(m: &ChunkManager) {
    for coord in m.active_chunks() {
        let chunk = m.chunk(coord).expect("active chunk exists");
        assert!(chunk.is_populated(), "active chunk {:?} not populated", coord);
        assert!(chunk.is_active());
    }
}

fn drain_queue(m: &mut ChunkManager) -> Vec<ChunkCoord> {
    let mut built = Vec::new();
    while m.pending_creations() > 0 {
        built.extend(m.tick().built);
        assert_active_populated(m);
    }
    built
}

/// Every populated voxel equals the generator output overlaid with the
/// recorded edits.
fn assert_grids_match_generator(m: &ChunkManager) {
    let world = m.world();
    let coords: Vec<ChunkCoord> = m.active_chunks().collect();
    for coord in coords {
        let chunk = m.chunk(coord).unwrap();
        let origin = chunk.buf().origin();
        for y in 0..world.chunk_height as i32 {
            for z in 0..world.chunk_width as i32 {
                for x in 0..world.chunk_width as i32 {
                    let p = IVec3::new(origin.x + x, y, origin.z + z);
                    let expected = m.recorded_edit(p).unwrap_or_else(|| world.classify(p));
                    assert_eq!(chunk.voxel(p), Some(expected), "mismatch at {:?}", p);
                }
            }
        }
    }
}

#[test]
fn initial_window_is_populated_meshed_and_active() {
    let mut m = manager(FLAT, stream(2));
    let report = m.generate_initial(at_chunk(0, 0));
    assert_eq!(report.window.len(), 16);
    assert!(report.spilled.is_empty());
    assert_eq!(report.structure_edits, 0);
    assert_eq!(m.active_count(), 16);
    assert_eq!(m.pending_creations(), 0);
    for cx in -2..2 {
        for cz in -2..2 {
            let chunk = m.chunk(c(cx, cz)).expect("window chunk");
            assert!(chunk.is_populated() && chunk.is_active());
            assert!(!chunk.mesh().is_empty());
        }
    }
    assert!(m.chunk(c(2, 0)).is_none());
    let updates = m.drain_render_updates();
    assert!(updates.contains(&RenderUpdate::Upload(c(-2, -2))));
    assert!(updates.contains(&RenderUpdate::Show(c(1, 1))));
    assert_eq!(
        updates.iter().filter(|u| matches!(u, RenderUpdate::Show(_))).count(),
        16
    );
}

#[test]
fn edit_on_west_edge_rebuilds_west_neighbour() {
    let mut m = manager(FLAT, stream(2));
    m.generate_initial(at_chunk(0, 0));
    m.drain_render_updates();
    let air = m.world().blocks.air;
    let west_before = m.chunk(c(-1, 0)).unwrap().mesh().quad_count();

    let p = IVec3::new(0, SURFACE, 3);
    let rebuilt = m.edit_voxel(p, air);

    assert_eq!(rebuilt, vec![c(0, 0), c(-1, 0)]);
    assert_eq!(m.voxel_at(p), air);
    // The grass at x = -1 now shows its east face.
    assert_eq!(m.chunk(c(-1, 0)).unwrap().mesh().quad_count(), west_before + 1);
    let updates = m.drain_render_updates();
    assert_eq!(
        updates,
        vec![RenderUpdate::Upload(c(0, 0)), RenderUpdate::Upload(c(-1, 0))]
    );
}

#[test]
fn interior_edit_rebuilds_only_its_owner() {
    let mut m = manager(FLAT, stream(2));
    m.generate_initial(at_chunk(0, 0));
    let glass = m.registry().id_by_identifier("minecraft:glass").unwrap();
    let rebuilt = m.edit_voxel(IVec3::new(3, SURFACE + 1, 4), glass);
    assert_eq!(rebuilt, vec![c(0, 0)]);
    assert_eq!(m.voxel_at(IVec3::new(3, SURFACE + 1, 4)), glass);
}

#[test]
fn edit_outside_world_height_is_ignored() {
    let mut m = manager(FLAT, stream(1));
    m.generate_initial(at_chunk(0, 0));
    assert!(m.edit_voxel(IVec3::new(1, 48, 1), 2).is_empty());
    assert!(m.edit_voxel(IVec3::new(1, -1, 1), 2).is_empty());
    assert_eq!(m.edit_stats().block_edits, 0);
}

#[test]
fn edit_for_missing_chunk_is_delivered_on_creation() {
    let mut m = manager(FLAT, stream(1));
    m.generate_initial(at_chunk(0, 0));
    let glass = m.registry().id_by_identifier("minecraft:glass").unwrap();
    let p = IVec3::new(8 * 10 + 2, SURFACE + 3, 3);

    assert!(m.edit_voxel(p, glass).is_empty());
    assert!(m.chunk(c(10, 0)).is_none());
    assert_eq!(m.recorded_edit(p), Some(glass));
    assert_eq!(m.voxel_at(p), glass);

    let delta = m.update_streaming(at_chunk(10, 0));
    assert!(delta.queued.contains(&c(10, 0)));
    drain_queue(&mut m);
    let chunk = m.chunk(c(10, 0)).unwrap();
    assert!(chunk.is_populated() && chunk.is_active());
    assert_eq!(chunk.voxel(p), Some(glass));
}

#[test]
fn creation_queue_is_fifo_and_throttled() {
    let mut m = manager(FLAT, stream(1));
    m.generate_initial(at_chunk(0, 0));
    m.drain_render_updates();

    let delta = m.update_streaming(at_chunk(1, 0));
    assert_eq!(delta.queued, vec![c(1, -1), c(1, 0)]);
    assert_eq!(delta.deactivated, vec![c(-1, -1), c(-1, 0)]);
    assert!(delta.activated.is_empty());
    assert_eq!(m.queued_chunks().collect::<Vec<_>>(), delta.queued);
    assert!(!m.chunk(c(1, 0)).unwrap().is_populated());
    assert_active_populated(&m);

    let first = m.tick();
    assert_eq!(first.built, vec![c(1, -1)]);
    assert!(!m.chunk(c(1, 0)).unwrap().is_populated());
    assert!(!m.is_active(c(1, 0)));
    assert_active_populated(&m);

    assert_eq!(m.tick().built, vec![c(1, 0)]);
    assert!(m.tick().built.is_empty());
    assert_eq!(m.active_count(), 4);
    assert_active_populated(&m);

    let updates = m.drain_render_updates();
    assert!(updates.contains(&RenderUpdate::Hide(c(-1, 0))));
    assert!(updates.contains(&RenderUpdate::Upload(c(1, 0))));
    assert!(updates.contains(&RenderUpdate::Show(c(1, 0))));
}

#[test]
fn staying_in_the_same_chunk_changes_nothing() {
    let mut m = manager(FLAT, stream(1));
    m.generate_initial(at_chunk(0, 0));
    let delta = m.update_streaming(Vec3::new(7.9, 100.0, 0.1));
    assert!(delta.is_empty());
    assert_eq!(m.pending_creations(), 0);
}

#[test]
fn returning_reactivates_without_regenerating() {
    let mut m = manager(FLAT, stream(2));
    m.generate_initial(at_chunk(0, 0));
    let home: BTreeSet<ChunkCoord> = m.active_chunks().collect();
    let glass = m.registry().id_by_identifier("minecraft:glass").unwrap();
    let p = IVec3::new(-5, SURFACE + 1, 2);
    m.edit_voxel(p, glass);
    let quads = m.chunk(c(-1, 0)).unwrap().mesh().quad_count();

    let away = m.update_streaming(at_chunk(20, 0));
    assert_eq!(away.queued.len(), 16);
    assert_eq!(away.deactivated.len(), 16);
    drain_queue(&mut m);
    for coord in &home {
        let chunk = m.chunk(*coord).unwrap();
        assert!(chunk.is_populated() && !chunk.is_active());
    }

    let back = m.update_streaming(at_chunk(0, 0));
    assert!(back.queued.is_empty());
    assert_eq!(back.activated.iter().copied().collect::<BTreeSet<_>>(), home);
    assert_eq!(back.deactivated.len(), 16);
    assert_eq!(m.active_chunks().collect::<BTreeSet<_>>(), home);
    assert_eq!(m.voxel_at(p), glass);
    assert_eq!(m.chunk(c(-1, 0)).unwrap().mesh().quad_count(), quads);
    assert_active_populated(&m);
}

#[test]
fn evicted_chunk_replays_its_edits() {
    let cfg = StreamConfig {
        view_distance: 1,
        max_retained_chunks: Some(6),
        ..StreamConfig::default()
    };
    let mut m = manager(FLAT, cfg);
    m.generate_initial(at_chunk(0, 0));
    let glass = m.registry().id_by_identifier("minecraft:glass").unwrap();
    let p = IVec3::new(2, SURFACE + 2, 2);
    m.edit_voxel(p, glass);

    let first = m.update_streaming(at_chunk(5, 0));
    assert_eq!(first.evicted, vec![c(-1, -1), c(-1, 0)]);
    drain_queue(&mut m);

    let second = m.update_streaming(at_chunk(10, 0));
    assert_eq!(second.evicted, vec![c(0, -1), c(0, 0), c(4, -1), c(4, 0)]);
    assert!(m.chunk(c(0, 0)).is_none());
    assert_eq!(m.voxel_at(p), glass);
    drain_queue(&mut m);
    assert!(m.chunk_count() <= 6 + m.pending_creations());

    m.update_streaming(at_chunk(0, 0));
    drain_queue(&mut m);
    let chunk = m.chunk(c(0, 0)).unwrap();
    assert!(chunk.is_populated() && chunk.is_active());
    assert_eq!(chunk.voxel(p), Some(glass));
    let updates = m.drain_render_updates();
    assert!(updates.contains(&RenderUpdate::Evict(c(0, 0))));
}

#[test]
fn structures_reach_every_chunk_they_touch() {
    let mut m = manager(FOREST, stream(2));
    let report = m.generate_initial(at_chunk(0, 0));
    assert!(report.structure_edits > 0);
    for coord in &report.spilled {
        let chunk = m.chunk(*coord).unwrap();
        assert!(chunk.is_populated() && !chunk.is_active());
    }
    assert_grids_match_generator(&m);

    m.update_streaming(at_chunk(1, 1));
    drain_queue(&mut m);
    assert_grids_match_generator(&m);
}

type MeshArrays = (Vec<u32>, Vec<u32>, Vec<f32>, Vec<f32>);

fn mesh_of(m: &ChunkManager, coord: ChunkCoord) -> MeshArrays {
    let mesh = m.chunk(coord).expect("chunk").mesh();
    (
        mesh.opaque.clone(),
        mesh.transparent.clone(),
        mesh.positions().to_vec(),
        mesh.uvs().to_vec(),
    )
}

/// Rebuilds only `coord` by rewriting an interior bedrock voxel with itself.
fn remesh(m: &mut ChunkManager, coord: ChunkCoord) {
    let origin = m.chunk(coord).unwrap().buf().origin();
    let p = IVec3::new(origin.x + 3, 0, origin.z + 3);
    let same = m.voxel_at(p);
    assert_eq!(m.edit_voxel(p, same), vec![coord]);
}

fn assert_meshes_are_current(m: &mut ChunkManager, coords: &[ChunkCoord]) {
    for &coord in coords {
        let before = mesh_of(m, coord);
        remesh(m, coord);
        assert!(mesh_of(m, coord) == before, "chunk {:?} mesh was stale", coord);
    }
}

#[test]
fn initial_meshes_see_final_neighbour_grids() {
    let cfg = StreamConfig {
        parallel_initial: false,
        ..stream(2)
    };
    let mut m = manager(FOREST, cfg);
    let report = m.generate_initial(at_chunk(0, 0));
    assert!(report.structure_edits > 0);
    let coords: Vec<ChunkCoord> = report.window.iter().chain(report.spilled.iter()).copied().collect();
    assert_meshes_are_current(&mut m, &coords);
}

#[test]
fn tick_built_meshes_see_final_neighbour_grids() {
    let cfg = StreamConfig {
        parallel_initial: false,
        ..stream(2)
    };
    let mut m = manager(FOREST, cfg);
    m.generate_initial(at_chunk(0, 0));
    m.update_streaming(at_chunk(3, 0));
    assert!(!drain_queue(&mut m).is_empty());
    let mut coords: Vec<ChunkCoord> = m.active_chunks().collect();
    coords.sort();
    assert_meshes_are_current(&mut m, &coords);
}

#[test]
fn repeating_an_edit_leaves_geometry_unchanged() {
    let mut m = manager(FOREST, stream(2));
    m.generate_initial(at_chunk(0, 0));
    let glass = m.registry().id_by_identifier("minecraft:glass").unwrap();
    let p = IVec3::new(0, SURFACE + 1, 3);

    assert_eq!(m.edit_voxel(p, glass), vec![c(0, 0), c(-1, 0)]);
    let owner = mesh_of(&m, c(0, 0));
    let west = mesh_of(&m, c(-1, 0));

    assert_eq!(m.edit_voxel(p, glass), vec![c(0, 0), c(-1, 0)]);
    assert!(mesh_of(&m, c(0, 0)) == owner);
    assert!(mesh_of(&m, c(-1, 0)) == west);
}

#[test]
fn solidity_follows_grid_and_world_bounds() {
    let mut m = manager(FLAT, stream(1));
    m.generate_initial(at_chunk(0, 0));
    assert!(m.is_solid_at(IVec3::new(2, SURFACE, 2)));
    assert!(!m.is_solid_at(IVec3::new(2, SURFACE + 1, 2)));
    assert!(m.is_solid_at(IVec3::new(2, -1, 2)));
    assert!(!m.is_solid_at(IVec3::new(2, 48, 2)));
    // Unloaded chunks answer from the generator.
    assert!(m.is_solid_at(IVec3::new(500, SURFACE, 500)));

    let air = m.world().blocks.air;
    m.edit_voxel(IVec3::new(2, SURFACE, 2), air);
    assert!(!m.is_solid_at(IVec3::new(2, SURFACE, 2)));
}

#[test]
fn parallel_and_serial_initial_generation_agree() {
    let mut par = manager(FOREST, stream(2));
    let mut seq = manager(
        FOREST,
        StreamConfig {
            parallel_initial: false,
            ..stream(2)
        },
    );
    let a = par.generate_initial(at_chunk(0, 0));
    let b = seq.generate_initial(at_chunk(0, 0));
    assert_eq!(a.window, b.window);
    assert_eq!(a.spilled, b.spilled);
    assert_eq!(a.structure_edits, b.structure_edits);
    for coord in a.window.iter().chain(a.spilled.iter()) {
        let (x, y) = (par.chunk(*coord).unwrap(), seq.chunk(*coord).unwrap());
        assert_eq!(x.buf().blocks, y.buf().blocks);
        assert_eq!(x.mesh().positions(), y.mesh().positions());
        assert_eq!(x.mesh().opaque, y.mesh().opaque);
        assert_eq!(x.mesh().transparent, y.mesh().transparent);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn window_is_square_and_half_open(cx in -1000i32..1000, cz in -1000i32..1000, r in 1i32..6) {
        let m = manager(FLAT, stream(r));
        let center = c(cx, cz);
        let window = m.window(center);
        prop_assert_eq!(window.len() as i32, 4 * r * r);
        let unique: BTreeSet<ChunkCoord> = window.iter().copied().collect();
        prop_assert_eq!(unique.len(), window.len());
        for w in &window {
            prop_assert!(w.cx >= cx - r && w.cx < cx + r);
            prop_assert!(w.cz >= cz - r && w.cz < cz + r);
        }
        prop_assert!(unique.contains(&center));
    }
}
