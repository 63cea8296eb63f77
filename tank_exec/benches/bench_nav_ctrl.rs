//! # Navigation Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use tank_lib::nav_ctrl::{DirectPlanner, NavCtrl, Params};

fn nav_ctrl_benchmark(c: &mut Criterion) {
    let params = Params::default();
    let planner = DirectPlanner::new(params.waypoint_spacing_m);
    let mut nav_ctrl = NavCtrl::with_rng(params, Box::new(planner), StdRng::seed_from_u64(0));

    nav_ctrl.update_position("0,0,0").unwrap();

    // A single tick along a long route. The destination is reset whenever it
    // is reached so every iteration does the full computation.
    c.bench_function("nav_ctrl_get_move", |b| {
        b.iter(|| {
            if nav_ctrl.is_completed() || nav_ctrl.waypoints().is_empty() {
                nav_ctrl.update_position("0,0,0").unwrap();
                nav_ctrl.set_destination("300,0,300").unwrap();
            }
            black_box(nav_ctrl.get_move())
        })
    });

    // Pose report followed by a tick, as in the main loop
    c.bench_function("nav_ctrl_update_and_move", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let x = (i % 3000) as f64 * 0.1;
            nav_ctrl.update_position(&format!("{},0,{}", x, x)).unwrap();
            black_box(nav_ctrl.get_move())
        })
    });
}

criterion_group!(benches, nav_ctrl_benchmark);
criterion_main!(benches);
