//! Property tests for the resistance model and selection bounds

use artifact_optimizer::core::types::{BuildGoal, ResistanceKind, Resistances};
use artifact_optimizer::gear::{bonus_for_level, Armor, ArmorConfig, Artifact, ArtifactStats, StatKey};
use artifact_optimizer::optimizer::Optimizer;
use artifact_optimizer::resistance::{apply_artifacts, value_to_bars, ResistanceBars, BAR_MAX};
use artifact_optimizer::scoring::ScoringConfig;
use proptest::prelude::*;

fn stat_key() -> impl Strategy<Value = StatKey> {
    (0..StatKey::ALL.len()).prop_map(|i| StatKey::ALL[i])
}

fn artifact() -> impl Strategy<Value = Artifact> {
    prop::collection::vec((stat_key(), -2i64..8), 0..4).prop_map(|levels| {
        let mut stats = ArtifactStats::new();
        for (key, level) in levels {
            stats.set(key, level);
        }
        Artifact::new("generated", stats)
    })
}

fn resistances() -> impl Strategy<Value = Resistances> {
    prop::array::uniform6(-20i32..160).prop_map(|values| {
        let mut res = Resistances::default();
        for (kind, value) in ResistanceKind::ALL.into_iter().zip(values) {
            res[kind] = value;
        }
        res
    })
}

proptest! {
    #[test]
    fn bonus_is_zero_outside_table(level in prop_oneof![i64::MIN..1, 6..i64::MAX]) {
        prop_assert_eq!(bonus_for_level(level), 0);
    }

    #[test]
    fn value_to_bars_stays_in_range(value in any::<i32>()) {
        let bars = value_to_bars(value);
        prop_assert!(bars <= BAR_MAX);
        if (0..=100).contains(&value) {
            prop_assert_eq!(i32::from(bars), value / 20);
        }
    }

    #[test]
    fn bar_split_never_goes_negative(value in -50i32..400) {
        let bars = ResistanceBars::from_value(value);
        prop_assert!(bars.half <= 1);
        if (0..=100).contains(&value) {
            prop_assert_eq!(bars.full + bars.half + bars.empty, 5);
        }
    }

    #[test]
    fn apply_order_does_not_matter(base in resistances(), a in artifact(), b in artifact()) {
        let ab = apply_artifacts(&base, [&a, &b]);
        let ba = apply_artifacts(&base, [&b, &a]);
        prop_assert_eq!(ab, ba);
        // applying one at a time is the same as applying both
        prop_assert_eq!(apply_artifacts(&apply_artifacts(&base, [&a]), [&b]), ab);
    }

    #[test]
    fn selection_respects_budgets(
        base in resistances(),
        pool in prop::collection::vec(artifact(), 0..8),
        slots in -2i64..10,
        containers in -2i64..10,
        goal in (0..BuildGoal::ALL.len()).prop_map(|i| BuildGoal::ALL[i]),
    ) {
        let config = ArmorConfig::new(Armor::new("Prop", base), slots, containers);
        let result = Optimizer::new(ScoringConfig::default()).run_goal(&config, &pool, goal);

        let max_chosen = slots.clamp(0, pool.len() as i64) as usize;
        prop_assert_eq!(result.chosen.len(), max_chosen);
        let max_shielded = containers.clamp(0, result.chosen.len() as i64) as usize;
        prop_assert_eq!(result.shielded().count(), max_shielded);
        prop_assert_eq!(result.is_safe(), result.radiation_balance >= 0);
    }
}
