use beatmap_pp::{
    any::{HitResultPriority, PerformanceAttributes},
    Beatmap, Difficulty, GameMode, Performance,
};
use proptest::prelude::*;

use self::common::*;

mod common;

fn map(content: &str) -> Beatmap {
    content.parse().unwrap()
}

fn fixture(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Osu => OSU,
        GameMode::Taiko => TAIKO,
        GameMode::Catch => CATCH,
        GameMode::Mania => MANIA,
    }
}

const MODES: [GameMode; 4] = [GameMode::Osu, GameMode::Taiko, GameMode::Catch, GameMode::Mania];

#[track_caller]
fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn single_circle_scenario() {
    let map = map(SINGLE_CIRCLE);

    let best = Performance::new(&map).calculate().unwrap();

    assert!(best.stars() > 0.0);
    assert!(best.pp().is_finite());
    assert!(best.pp() >= 0.0);

    let worst = Performance::new(&map)
        .accuracy(0.0)
        .combo(0)
        .calculate()
        .unwrap();

    assert!(worst.pp() < best.pp(), "{} >= {}", worst.pp(), best.pp());
}

#[test]
fn empty_map_is_worth_nothing() {
    let map = map(EMPTY);

    for mode in MODES {
        let attrs = Difficulty::new().calculate_mode(&map, mode).unwrap();
        let perf = attrs.performance().calculate().unwrap();

        assert_eq_float(perf.pp(), 0.0);
    }
}

#[test]
fn defaults_are_a_perfect_play() {
    for mode in MODES {
        let map = map(fixture(mode));
        let attrs = Difficulty::new().calculate(&map).unwrap();
        let max_combo = attrs.max_combo();

        let default = attrs.clone().performance().calculate().unwrap();

        let explicit = attrs
            .performance()
            .accuracy(100.0)
            .combo(max_combo)
            .misses(0)
            .calculate()
            .unwrap();

        assert_close(default.pp(), explicit.pp());
    }
}

#[test]
fn combo_beyond_max_is_clamped() {
    for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch] {
        let map = map(fixture(mode));
        let attrs = Difficulty::new().calculate(&map).unwrap();

        let full = attrs.clone().performance().calculate().unwrap();
        let over = attrs.performance().combo(100_000).calculate().unwrap();

        assert_close(full.pp(), over.pp());
    }
}

#[test]
fn misses_cost_pp() {
    for mode in MODES {
        let map = map(fixture(mode));
        let attrs = Difficulty::new().calculate(&map).unwrap();

        let fc = attrs.clone().performance().calculate().unwrap();
        let missed = attrs.performance().misses(2).calculate().unwrap();

        assert!(missed.pp() < fc.pp(), "{mode}");
    }
}

#[test]
fn no_fail_reduces_pp() {
    let map = map(OSU);

    let nm = Performance::new(&map).calculate().unwrap();
    let nf = Performance::new(&map).mods(NF).calculate().unwrap();

    assert!(nf.pp() < nm.pp());
}

#[test]
fn hidden_rewards_osu() {
    let map = map(OSU);

    let nm = Performance::new(&map).calculate().unwrap();
    let hd = Performance::new(&map).mods(HD).calculate().unwrap();

    assert!(hd.pp() > nm.pp());
}

#[test]
fn partial_plays() {
    for mode in MODES {
        let map = map(fixture(mode));

        let full = Performance::new(&map).calculate().unwrap();
        let partial = Performance::new(&map).passed_objects(4).calculate().unwrap();

        assert!(partial.pp() <= full.pp(), "{mode}");
        assert!(partial.max_combo() < full.max_combo(), "{mode}");
    }
}

#[test]
fn worst_case_priority() {
    let map = map(OSU);

    let best = Performance::new(&map).accuracy(90.0).calculate().unwrap();
    let worst = Performance::new(&map)
        .accuracy(90.0)
        .hitresult_priority(HitResultPriority::WorstCase)
        .calculate()
        .unwrap();

    assert!(worst.pp() <= best.pp());
}

#[test]
fn generated_state_matches_accuracy() {
    let map = map(OSU);

    let mut perf = Performance::new(&map).accuracy(95.0).misses(1);
    let state = perf.generate_state().unwrap();

    let n_objects = map.hit_objects.len() as u32;

    assert_eq!(state.misses, 1);
    assert_eq!(state.n300 + state.n100 + state.n50 + state.misses, n_objects);
}

#[test]
fn re_using_attributes() {
    let map = map(TAIKO);

    let from_map = Performance::new(&map).misses(1).calculate().unwrap();

    let attrs = Difficulty::new().calculate(&map).unwrap();
    let from_attrs = Performance::new(attrs).misses(1).calculate().unwrap();

    assert_eq!(from_map, from_attrs);
    assert!(matches!(from_attrs, PerformanceAttributes::Taiko(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn accuracy_is_monotonic(
        mode_idx in 0..4_usize,
        a in 0.0..=100.0_f64,
        b in 0.0..=100.0_f64,
    ) {
        let mode = MODES[mode_idx];
        let map = map(fixture(mode));
        let attrs = Difficulty::new().calculate(&map).unwrap();

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let pp_lo = attrs.clone().performance().accuracy(lo).calculate().unwrap().pp();
        let pp_hi = attrs.performance().accuracy(hi).calculate().unwrap().pp();

        prop_assert!(pp_lo <= pp_hi + 1e-9, "{}: {} > {}", mode, pp_lo, pp_hi);
    }
}
