//! End-to-end build generation tests
//!
//! These go through `run_model`, so they set the global config once with the
//! predictor disabled and every result comes from the heuristic.

use artifact_optimizer::core::config::{set_config, OptimizerConfig};
use artifact_optimizer::core::types::{BuildGoal, ResistanceKind, Resistances};
use artifact_optimizer::gear::{Armor, ArmorConfig, Artifact, ArtifactStats, StatKey};
use artifact_optimizer::optimizer::{run_model, Optimizer, RadiationVerdict};
use artifact_optimizer::predictor::global_predictor;
use artifact_optimizer::resistance::ResistanceBars;
use artifact_optimizer::scoring::ScoringConfig;
use artifact_optimizer::selection::{ScoreSource, SelectionStrategy};

fn init() {
    let mut cfg = OptimizerConfig::default();
    cfg.predictor.enabled = false;
    // every test sets the same value, so losing the race is fine
    let _ = set_config(cfg);
}

fn flat_armor(value: i32) -> Armor {
    Armor::new("Flat Suit", Resistances::from_fn(|_| value))
        .with_slots(1, 5)
        .with_lead_containers(0, 3)
}

fn pure_thermal() -> Artifact {
    Artifact::new("A", ArtifactStats::new().with(StatKey::ThermalProtection, 5))
}

fn emitter() -> Artifact {
    Artifact::new(
        "B",
        ArtifactStats::new().with(StatKey::Radiation, 5).with(StatKey::RadioProtection, 1),
    )
}

fn mixed_pool() -> Vec<Artifact> {
    vec![
        Artifact::new("Flash", ArtifactStats::new().with(StatKey::ElectricalProtection, 3).with(StatKey::Radiation, 2)),
        Artifact::new("Jellyfish", ArtifactStats::new().with(StatKey::RadioProtection, 3)),
        Artifact::new("Stone Blood", ArtifactStats::new().with(StatKey::BleedingResistance, 4)),
        Artifact::new("Kolobok", ArtifactStats::new().with(StatKey::Endurance, 5).with(StatKey::Radiation, 3)),
        Artifact::new("Battery", ArtifactStats::new().with(StatKey::Weight, 2).with(StatKey::IncreasedDurability, 2)),
        Artifact::new("Fireball", ArtifactStats::new().with(StatKey::ThermalProtection, 4).with(StatKey::Radiation, 1)),
    ]
}

#[test]
fn test_single_slot_anomaly_build() {
    init();
    let config = ArmorConfig::new(flat_armor(40), 1, 0);
    let result = run_model(&config, &[pure_thermal(), emitter()], "Anomaly Protections");

    assert_eq!(result.build_goal, BuildGoal::AnomalyProtections);
    assert_eq!(result.chosen.len(), 1);
    assert_eq!(result.chosen[0].artifact.name, "A");
    assert_eq!(result.chosen[0].source, ScoreSource::Heuristic);
    assert_eq!(result.final_resistances[ResistanceKind::Thermal], 80);
    assert_eq!(result.final_resistances[ResistanceKind::Physical], 40);
    assert_eq!(result.radiation_balance, 0);
    assert_eq!(result.verdict, RadiationVerdict::Safe);
}

#[test]
fn test_two_slots_one_container_shields_emitter() {
    init();
    let config = ArmorConfig::new(flat_armor(40), 2, 1);
    let result = run_model(&config, &[pure_thermal(), emitter()], "Anomaly Protections");

    assert_eq!(result.chosen.len(), 2);
    let shielded: Vec<_> = result.shielded().map(|c| c.artifact.name.as_str()).collect();
    assert_eq!(shielded, ["B"]);
    assert_eq!(result.radiation_balance, 0);
    assert!(result.is_safe());
}

#[test]
fn test_all_zero_stats_are_safe() {
    init();
    let items: Vec<Artifact> = (0..4)
        .map(|i| Artifact::new(format!("Dud {}", i), ArtifactStats::new()))
        .collect();
    let result = run_model(&ArmorConfig::new(flat_armor(10), 3, 0), &items, "Balanced");
    assert_eq!(result.chosen.len(), 3);
    assert_eq!(result.radiation_balance, 0);
    assert_eq!(result.verdict, RadiationVerdict::Safe);
    // nothing protects, so bars match the bare armor
    assert_eq!(result.final_bars[ResistanceKind::Psi], ResistanceBars::from_value(10));
}

#[test]
fn test_repeated_runs_are_identical() {
    init();
    let config = ArmorConfig::new(flat_armor(35), 4, 2);
    let pool = mixed_pool();
    for goal in BuildGoal::ALL {
        let first = run_model(&config, &pool, goal.label());
        let second = run_model(&config, &pool, goal.label());
        assert_eq!(first, second, "goal {}", goal);
    }
}

#[test]
fn test_cardinality_bounds() {
    init();
    let pool = mixed_pool();
    for slots in -1..=8i64 {
        for containers in -1..=8i64 {
            let result = run_model(&ArmorConfig::new(flat_armor(20), slots, containers), &pool, "Endurance");
            let max_chosen = slots.clamp(0, pool.len() as i64) as usize;
            assert_eq!(result.chosen.len(), max_chosen);
            let max_shielded = containers.clamp(0, result.chosen.len() as i64) as usize;
            assert_eq!(result.shielded().count(), max_shielded);
        }
    }
}

#[test]
fn test_goal_labels_are_normalised() {
    init();
    let config = ArmorConfig::new(flat_armor(40), 1, 0);
    let pool = mixed_pool();
    let canonical = run_model(&config, &pool, "Bleed Resistance");
    let sloppy = run_model(&config, &pool, "  bleed resistance ");
    assert_eq!(canonical.build_goal, BuildGoal::BleedResistance);
    assert_eq!(canonical, sloppy);
    assert_eq!(canonical.chosen[0].artifact.name, "Stone Blood");

    assert_eq!(run_model(&config, &pool, "").build_goal, BuildGoal::Balanced);
}

#[test]
fn test_disabled_predictor_is_never_loaded() {
    init();
    let config = ArmorConfig::new(flat_armor(40), 2, 0);
    let result = run_model(&config, &mixed_pool(), "Balanced");
    assert!(result.chosen.iter().all(|c| c.source == ScoreSource::Heuristic));
    assert!(global_predictor().is_disabled());
}

#[test]
fn test_one_shot_stacks_where_iterative_spreads() {
    let mut res = Resistances::from_fn(|_| 100);
    res[ResistanceKind::Thermal] = 0;
    res[ResistanceKind::Electrical] = 0;
    let armor = Armor::new("Gap Suit", res).with_slots(2, 2);
    let pool = vec![
        Artifact::new("Flame 1", ArtifactStats::new().with(StatKey::ThermalProtection, 5)),
        Artifact::new("Flame 2", ArtifactStats::new().with(StatKey::ThermalProtection, 5)),
        Artifact::new("Spark", ArtifactStats::new().with(StatKey::ElectricalProtection, 5)),
    ];
    let config = ArmorConfig::new(armor, 2, 0);

    let iterative = Optimizer::new(ScoringConfig::default()).run_goal(&config, &pool, BuildGoal::AnomalyProtections);
    let one_shot = Optimizer::new(ScoringConfig::default())
        .with_strategy(SelectionStrategy::OneShot)
        .run_goal(&config, &pool, BuildGoal::AnomalyProtections);

    assert_eq!(iterative.final_resistances[ResistanceKind::Thermal], 40);
    assert_eq!(iterative.final_resistances[ResistanceKind::Electrical], 40);
    assert_eq!(one_shot.final_resistances[ResistanceKind::Thermal], 80);
    assert_eq!(one_shot.final_resistances[ResistanceKind::Electrical], 0);
}
