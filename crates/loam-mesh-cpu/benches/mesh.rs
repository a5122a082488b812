use criterion::{Criterion, black_box, criterion_group, criterion_main};

use loam_blocks::BlockRegistry;
use loam_chunk::generate_chunk_buffer;
use loam_mesh_cpu::{ChunkMesh, TerrainNeighbors, TextureAtlas, build_chunk_mesh};
use loam_world::{ChunkCoord, DiscardEdits, World, WorldGenParams};

fn bench_generate_and_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_16x128x16");
    let reg = BlockRegistry::builtin().unwrap();
    let world = World::new(WorldGenParams::default(), &reg);
    let atlas = TextureAtlas::new(world.params.atlas_cells);
    let coord = ChunkCoord::new(0, 0);

    group.bench_function("generate", |b| {
        b.iter(|| black_box(generate_chunk_buffer(&world, coord, &mut DiscardEdits)))
    });

    let buf = generate_chunk_buffer(&world, coord, &mut DiscardEdits);
    let neighbors = TerrainNeighbors {
        world: &world,
        reg: &reg,
    };
    let mut mesh = ChunkMesh::new(coord);
    group.bench_function("mesh", |b| {
        b.iter(|| {
            build_chunk_mesh(&buf, &neighbors, &reg, &atlas, &mut mesh);
            black_box(mesh.quad_count());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_generate_and_mesh);
criterion_main!(benches);
