//! Integration tests for boid-evolution

use boid_evolution::grid::SpatialIndex;
use boid_evolution::kinematics::{self, speed_cap};
use boid_evolution::{
    Boid, Config, Genome, PredatorGenome, PreyGenome, SimulationError, World, WorldConfig,
};
use glam::DVec2;

fn small_config() -> Config {
    let mut config = Config::default();
    config.prey.population = 80;
    config.predator.population = 5;
    config.predator.genome.catch_radius = 6.0;
    config.logging.stats_interval = 25;
    config
}

#[test]
fn test_full_simulation_cycle() {
    let mut world = World::new_with_seed(small_config(), 12345).unwrap();
    let initial_prey = world.prey_population();

    world.run(500).unwrap();

    assert_eq!(world.tick, 500);
    assert_eq!(world.prey_population(), initial_prey);

    let bounds = *world.bounds();
    for boid in world.prey.iter().chain(world.predators.iter()) {
        assert!(boid.position().is_finite());
        assert!(boid.speed() <= speed_cap(boid, &bounds) + 1e-9);
    }
}

#[test]
fn test_catch_replaces_prey() {
    // One predator at the origin, one prey 3 units away, catch radius 5
    let config = Config::default();
    let predator = Boid::new(
        0,
        DVec2::ZERO,
        DVec2::ZERO,
        Genome::Predator(PredatorGenome {
            catch_radius: 5.0,
            speed_pref: 0.0,
            ..PredatorGenome::default()
        }),
    );
    let prey = Boid::new(
        1,
        DVec2::new(3.0, 0.0),
        DVec2::ZERO,
        Genome::Prey(PreyGenome {
            predator_turn_factor: 0.0,
            propulsion: 0.0,
            bias_val: 0.0,
            ..PreyGenome::default()
        }),
    );

    let mut world = World::from_populations(config, vec![prey], vec![predator], 7).unwrap();
    let report = world.step().unwrap();

    assert_eq!(report.catches.len(), 1);
    assert_eq!(report.births, 1);
    assert_eq!(world.prey_population(), 1);
    assert_ne!(world.prey[0].id, 1);
    assert_eq!(world.prey[0].age, 0);
    // Offspring inherits the parent's velocity
    assert_eq!(world.prey[0].velocity(), DVec2::ZERO);
}

#[test]
fn test_isolated_prey_ignores_far_boids() {
    let world = WorldConfig::default();
    let genome = PreyGenome::default();

    let me = Boid::new(0, DVec2::new(-140.0, -140.0), DVec2::new(1.0, 2.0), Genome::Prey(genome));
    let far_prey = Boid::new(1, DVec2::new(100.0, 100.0), DVec2::new(-2.0, 0.0), Genome::Prey(genome));
    let far_pred = Boid::new(
        2,
        DVec2::new(120.0, -140.0),
        DVec2::ZERO,
        Genome::Predator(PredatorGenome::default()),
    );

    let alone = kinematics::prey_motion(&me, &genome, &[], &[], &world);
    let with_others = kinematics::prey_motion(&me, &genome, &[&far_prey], &[&far_pred], &world);

    assert_eq!(alone, with_others);
}

#[test]
fn test_index_finds_every_true_neighbour() {
    let mut world = World::new_with_seed(small_config(), 2718).unwrap();
    world.run(20).unwrap();

    let bounds = *world.bounds();
    let mut index = SpatialIndex::new(bounds.cell_size, bounds.min).unwrap();
    index.build(&world.prey);

    for boid in &world.prey {
        let candidates = index.query_boid(boid);
        for (j, other) in world.prey.iter().enumerate() {
            if boid.position().distance(other.position()) < boid.genome.visual_range() {
                assert!(candidates.contains(&j));
            }
        }
    }
}

#[test]
fn test_evolution_happens() {
    let mut config = small_config();
    config.predator.population = 10;
    config.predator.genome.catch_radius = 12.0;
    config.evolution.mutation_rate = 1.0;

    let mut world = World::new_with_seed(config, 11111).unwrap();
    let founders: Vec<Genome> = world.prey.iter().map(|b| b.genome).collect();
    let first_offspring_id = world.prey.len() as u64 + world.predators.len() as u64;

    let mut births = 0;
    let mut mutations = 0;
    world
        .run_with_callback(300, |_, report| {
            births += report.births;
            mutations += report.mutations;
        })
        .unwrap();

    assert!(world.stats.total_catches > 0);
    assert_eq!(births as u64, world.stats.total_catches);
    // every offspring mutates at rate 1.0
    assert_eq!(mutations, births);

    let offspring: Vec<&Boid> = world.prey.iter().filter(|b| b.id >= first_offspring_id).collect();
    assert!(!offspring.is_empty());
    for child in offspring {
        assert!(!founders.contains(&child.genome), "offspring {} copies a founder", child.id);
    }
}

#[test]
fn test_exhausted_population_surfaces_error() {
    let config = Config::default();
    let mut world = World::from_populations(config, vec![], vec![], 1).unwrap();

    let err = world.run(10).unwrap_err();
    assert_eq!(err, SimulationError::PopulationExhausted { tick: 0 });
}

#[test]
fn test_snapshot_is_detached() {
    let mut world = World::new_with_seed(small_config(), 99).unwrap();
    world.run(10).unwrap();

    let mut snap = world.snapshot();
    assert_eq!(snap.tick, 10);
    assert_eq!(snap.prey.len(), world.prey_population());

    snap.prey.clear();
    assert_eq!(world.prey_population(), 80);
}

#[test]
fn test_config_file_roundtrip() {
    let path = std::env::temp_dir().join("boid_evolution_config_test.yaml");
    let mut config = small_config();
    config.evolution.mutation_rate = 0.2;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.evolution.mutation_rate, 0.2);
    assert_eq!(loaded.prey.population, 80);
}
