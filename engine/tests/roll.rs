use loresheet::{resolve, ConditionKind, DieSource, ScriptedDice, StateFlags, FEAT_DIE, SKILL_DIE};
use proptest::prelude::*;

fn weary() -> StateFlags {
    StateFlags::new().with(ConditionKind::Weary)
}

fn miserable() -> StateFlags {
    StateFlags::new().with(ConditionKind::Miserable)
}

#[test]
fn favoured_draws_two_feat_dice() {
    let mut dice = ScriptedDice::new([5, 6, 1, 1]);
    resolve(&mut dice, 2, true, &StateFlags::new(), 0);
    assert_eq!(dice.draws_of(FEAT_DIE), 2);
    assert_eq!(dice.draws_of(SKILL_DIE), 2);
    assert_eq!(dice.requests(), &[12, 12, 6, 6]);
}

#[test]
fn unfavoured_draws_one_feat_die() {
    let mut dice = ScriptedDice::new([5, 1, 1]);
    resolve(&mut dice, 2, false, &StateFlags::new(), 0);
    assert_eq!(dice.draws_of(FEAT_DIE), 1);
    assert_eq!(dice.remaining(), 0);
}

#[test]
fn gandalf_rune_counts_ten() {
    let mut dice = ScriptedDice::new([12]);
    let res = resolve(&mut dice, 0, false, &StateFlags::new(), 0);
    assert_eq!(res.feat.kept, 12);
    assert_eq!(res.feat.total, 10);
    assert_eq!(res.total, 10);
}

#[test]
fn eye_counts_zero_when_miserable() {
    let mut dice = ScriptedDice::new([11]);
    let res = resolve(&mut dice, 0, false, &miserable(), 0);
    assert_eq!(res.feat.total, 0);
}

#[test]
fn eye_counts_minus_one_otherwise() {
    let mut dice = ScriptedDice::new([11]);
    let res = resolve(&mut dice, 0, false, &weary(), 0);
    assert_eq!(res.feat.total, -1);
}

#[test]
fn plain_feat_face_counts_face_value() {
    let mut dice = ScriptedDice::new([7]);
    let res = resolve(&mut dice, 0, false, &miserable(), 0);
    assert_eq!(res.feat.total, 7);
}

#[test]
fn weary_zeroes_low_faces_but_reports_them() {
    let mut dice = ScriptedDice::new([1, 1, 2, 3, 4, 5, 6]);
    let res = resolve(&mut dice, 6, false, &weary(), 0);
    assert_eq!(res.skill.kept, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(res.skill.total, 15);
    assert_eq!(res.kept_dice, vec![1, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn without_weary_all_faces_count() {
    let mut dice = ScriptedDice::new([1, 1, 2, 3, 4, 5, 6]);
    let res = resolve(&mut dice, 6, false, &StateFlags::new(), 0);
    assert_eq!(res.skill.total, 21);
}

#[test]
fn wounded_alone_changes_nothing() {
    let flags = StateFlags::new().with(ConditionKind::Wounded);
    let mut dice = ScriptedDice::new([11, 1, 2]);
    let res = resolve(&mut dice, 2, false, &flags, 0);
    assert_eq!(res.feat.total, -1);
    assert_eq!(res.skill.total, 3);
}

#[test]
fn favoured_weary_scenario() {
    let mut dice = ScriptedDice::new([11, 4, 2, 5, 6]);
    let res = resolve(&mut dice, 3, true, &weary(), 0);
    assert_eq!(res.feat.kept, 11);
    assert_eq!(res.feat.total, -1);
    assert_eq!(res.skill.kept, vec![2, 5, 6]);
    assert_eq!(res.skill.total, 11);
    assert_eq!(res.total, 10);
    assert_eq!(res.kept_dice, vec![11, 2, 5, 6]);
}

#[test]
fn advantage_adds_dice_and_disadvantage_removes_them() {
    let mut dice = ScriptedDice::new([1, 6, 6, 6]);
    let res = resolve(&mut dice, 2, false, &StateFlags::new(), 1);
    assert_eq!(res.skill.kept.len(), 3);

    let mut dice = ScriptedDice::new([1, 6, 6, 6]);
    let res = resolve(&mut dice, 2, false, &StateFlags::new(), -1);
    assert_eq!(res.skill.kept.len(), 1);
}

#[test]
fn closures_work_as_die_sources() {
    let mut sixes = |_sides: u8| 6u8;
    let res = resolve(&mut sixes, 3, false, &StateFlags::new(), 0);
    assert_eq!(res.total, 6 + 18);
    assert_eq!(sixes.roll(6), 6);
}

#[test]
fn same_script_same_result() {
    let script = [9, 3, 4, 1, 6];
    let a = resolve(&mut ScriptedDice::new(script), 3, true, &weary(), 0);
    let b = resolve(&mut ScriptedDice::new(script), 3, true, &weary(), 0);
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn result_serializes_with_camel_case_detail_keys() {
    let res = resolve(&mut ScriptedDice::new([12, 4]), 1, false, &StateFlags::new(), 0);
    let v = serde_json::to_value(&res).unwrap();
    assert_eq!(v["keptDice"], serde_json::json!([12, 4]));
    assert_eq!(v["featDetail"]["total"], 10);
    assert_eq!(v["skillDetail"]["kept"], serde_json::json!([4]));
    assert_eq!(v["total"], 14);
}

#[test]
fn huge_pools_are_capped_and_never_overflow() {
    for (rating, advantage) in [(400_000_000, 0), (i32::MAX, i32::MAX), (1, i32::MAX)] {
        let res = resolve(&mut |_sides: u8| 6u8, rating, true, &StateFlags::new(), advantage);
        assert_eq!(res.skill.kept.len(), loresheet::roll::MAX_POOL);
        assert_eq!(res.skill.total, 6 * loresheet::roll::MAX_POOL as i32);
        assert_eq!(res.total, 6 + res.skill.total);

        let res = resolve(&mut |_sides: u8| 2u8, rating, false, &weary(), advantage);
        assert_eq!(res.skill.total, 0);
        assert_eq!(res.total, 2);
    }
}

proptest! {
    #[test]
    fn empty_pool_when_rating_plus_advantage_not_positive(
        rating in -20i32..=20,
        advantage in -20i32..=20,
        seed in any::<u64>(),
    ) {
        prop_assume!(rating + advantage <= 0);
        let mut dice = loresheet::Dice::from_seed(seed);
        let res = resolve(&mut dice, rating, false, &StateFlags::new(), advantage);
        prop_assert!(res.skill.kept.is_empty());
        prop_assert_eq!(res.skill.total, 0);
        prop_assert_eq!(res.kept_dice.len(), 1);
    }

    #[test]
    fn seeded_dice_stay_in_range_and_totals_add_up(
        rating in 0i32..=8,
        favoured in any::<bool>(),
        is_weary in any::<bool>(),
        is_miserable in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut flags = StateFlags::new();
        if is_weary { flags.insert(ConditionKind::Weary); }
        if is_miserable { flags.insert(ConditionKind::Miserable); }
        let mut dice = loresheet::Dice::from_seed(seed);
        let res = resolve(&mut dice, rating, favoured, &flags, 0);

        prop_assert_eq!(res.feat.rolled.len(), if favoured { 2 } else { 1 });
        prop_assert!(res.feat.rolled.iter().all(|f| (1..=12).contains(f)));
        prop_assert_eq!(Some(&res.feat.kept), res.feat.rolled.iter().max());
        prop_assert!(res.skill.kept.iter().all(|f| (1..=6).contains(f)));
        prop_assert_eq!(res.skill.kept.len(), rating as usize);
        prop_assert_eq!(res.total, res.feat.total + res.skill.total);
        prop_assert!((-1..=10).contains(&res.feat.total));
    }

    #[test]
    fn same_seed_same_roll(seed in any::<u64>(), rating in 0i32..=6) {
        let a = resolve(&mut loresheet::Dice::from_seed(seed), rating, true, &StateFlags::new(), 0);
        let b = resolve(&mut loresheet::Dice::from_seed(seed), rating, true, &StateFlags::new(), 0);
        prop_assert_eq!(a, b);
    }
}
