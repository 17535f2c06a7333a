use fulgur_core::{EngineConfig, LightningEngine};
use fulgur_platform::{Extent, FixedLayout, RecordingSurface, RenderSurface};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn engine(seed: u64) -> LightningEngine<StdRng> {
    LightningEngine::with_rng(EngineConfig::default(), StdRng::seed_from_u64(seed))
        .expect("default config is valid")
}

#[test]
fn two_hundred_ticks_stay_bounded() {
    for seed in 0..16 {
        let mut engine = engine(seed);
        let mut surface = RecordingSurface::new();
        engine
            .initialize(&FixedLayout::new(400.0, 300.0), &mut surface)
            .unwrap();

        let mut peak_bolts = 0;
        let mut peak_particles = 0;
        let mut spawned = 0;
        for _ in 0..200 {
            let stats = engine.tick(&mut surface).unwrap();
            peak_bolts = peak_bolts.max(stats.bolts);
            peak_particles = peak_particles.max(stats.particles);
            spawned += stats.spawned;
            surface.take_commands();
        }

        assert!(spawned >= 2, "seed {seed}: only {spawned} bolts in 200 frames");
        // Spawns are at least 25 frames apart and a bolt lives about 30 frames.
        assert!(peak_bolts <= 8, "seed {seed}: {peak_bolts} bolts alive at once");
        assert!(peak_particles <= 60, "seed {seed}: {peak_particles} particles");
        assert_eq!(engine.frame(), 200);
    }
}

#[test]
fn resize_regenerates_nodes_wholesale() {
    let mut engine = engine(21);
    let mut surface = RecordingSurface::new();
    engine
        .initialize(&FixedLayout::new(400.0, 300.0), &mut surface)
        .unwrap();
    assert_eq!(engine.nodes().len(), 6);
    let before = engine.nodes().to_vec();

    engine
        .resize(&FixedLayout::new(800.0, 300.0), &mut surface)
        .unwrap();

    assert_eq!(engine.nodes().len(), 9);
    assert_eq!(surface.size(), Extent::new(800.0, 300.0));
    assert_eq!(engine.extent(), Extent::new(800.0, 300.0));
    assert!(engine.nodes().iter().all(|node| !before.contains(node)));
    assert!(engine.is_active());
}

#[test]
fn shrinking_keeps_nodes_on_the_new_surface() {
    let mut engine = engine(22);
    let mut surface = RecordingSurface::new();
    engine
        .initialize(&FixedLayout::new(1200.0, 800.0), &mut surface)
        .unwrap();
    for _ in 0..50 {
        engine.tick(&mut surface);
    }
    engine
        .resize(&FixedLayout::new(200.0, 100.0), &mut surface)
        .unwrap();
    let extent = engine.extent();
    for _ in 0..2000 {
        engine.tick(&mut surface);
        surface.take_commands();
        assert!(engine.nodes().iter().all(|node| extent.contains(node.pos)));
    }
}

#[test]
fn nothing_is_drawn_with_negative_or_excess_opacity() {
    let mut engine = engine(23);
    let mut surface = RecordingSurface::new();
    engine
        .initialize(&FixedLayout::new(640.0, 480.0), &mut surface)
        .unwrap();
    for _ in 0..600 {
        engine.tick(&mut surface);
        for (_, _, style) in surface.fills() {
            assert!(style.alpha > 0.0 || style.alpha.abs() < 1e-6);
            assert!(style.alpha <= 1.0);
        }
        for (_, style) in surface.strokes() {
            assert!(style.alpha >= 0.0 && style.alpha <= 1.0);
        }
        for bolt in engine.bolts() {
            assert!(bolt.opacity() >= 0.0 && bolt.opacity() <= bolt.params().max_opacity);
        }
        assert!(engine.particles().iter().all(|p| p.opacity > 0.0));
        surface.take_commands();
    }
}

#[test]
fn reinitialize_restarts_the_schedule() {
    let mut engine = engine(24);
    let mut surface = RecordingSurface::new();
    let layout = FixedLayout::new(400.0, 300.0);
    engine.initialize(&layout, &mut surface).unwrap();
    for _ in 0..120 {
        engine.tick(&mut surface);
    }
    engine.initialize(&layout, &mut surface).unwrap();
    assert_eq!(engine.frame(), 0);
    assert!(engine.bolts().is_empty());
    assert!(engine.particles().is_empty());
    let stats = engine.tick(&mut surface).unwrap();
    assert_eq!(stats.frame, 1);
    assert_eq!(stats.spawned, 0);
}
