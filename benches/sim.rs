use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_starfire::core::{Collider, CollisionManager, Config, ObjectId, State};
use tui_starfire::term::{compose_frame, Viewport};
use tui_starfire::types::{Point, TICK_MS};

fn bench_tick(c: &mut Criterion) {
    let mut state = State::new(12345, Config::default());
    state.start();
    // Warm up until the field has enemies and charges in flight.
    for _ in 0..200 {
        state.tick(TICK_MS);
    }

    c.bench_function("state_tick_16ms", |b| {
        b.iter(|| {
            state.tick(black_box(TICK_MS));
        })
    });
}

fn bench_collision_sweep(c: &mut Criterion) {
    let mut manager = CollisionManager::new();
    manager.add_handler("charge", "enemy");
    for i in 0..24u32 {
        let owner = ObjectId::for_tests(i);
        let collider =
            Collider::new("enemy", &["\\o/"], Point::new(i as i32 * 3, 10), owner).unwrap();
        manager.insert(collider);
    }
    for i in 0..16u32 {
        let owner = ObjectId::for_tests(100 + i);
        let collider =
            Collider::new("charge", &["|"], Point::new(i as i32 * 4 + 1, 10), owner).unwrap();
        manager.insert(collider);
    }

    c.bench_function("collision_sweep_40_colliders", |b| {
        b.iter(|| {
            black_box(manager.update());
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let mut state = State::new(12345, Config::default());
    state.start();
    for _ in 0..200 {
        state.tick(TICK_MS);
    }
    let viewport = Viewport::new(100, 30);

    c.bench_function("compose_frame_100x30", |b| {
        b.iter(|| {
            black_box(compose_frame(&state, viewport));
        })
    });
}

criterion_group!(benches, bench_tick, bench_collision_sweep, bench_compose);
criterion_main!(benches);
