use std::thread;

use beatmap_pp::{
    any::ScoreParametersError, CalculateError, CalculateResult, Calculator, DifficultyCache,
    Difficulty, GameMode, ScoreParameters,
};

use self::common::*;

mod common;

fn calculator(content: &str) -> Calculator {
    Calculator::from_bytes(content.as_bytes()).unwrap()
}

#[test]
fn native_modes() {
    for (content, mode) in [
        (OSU, GameMode::Osu),
        (TAIKO, GameMode::Taiko),
        (CATCH, GameMode::Catch),
        (MANIA, GameMode::Mania),
    ] {
        let result = calculator(content)
            .calculate(&ScoreParameters::new(mode))
            .unwrap();

        assert_eq!(result.mode, mode);
        assert!(result.stars > 0.0);
        assert!(result.pp > 0.0);
        assert!(result.bpm > 0.0);
        assert_eq_float(result.clock_rate, 1.0);
    }
}

#[test]
fn mode_specific_fields() {
    let osu = calculator(OSU)
        .calculate(&ScoreParameters::new(GameMode::Osu))
        .unwrap();

    assert!(osu.pp_aim.is_some());
    assert!(osu.slider_factor.is_some());
    assert_eq!(osu.n_sliders, Some(3));
    assert_eq!(osu.n_fruits, None);

    let taiko = calculator(TAIKO)
        .calculate(&ScoreParameters::new(GameMode::Taiko))
        .unwrap();

    assert!(taiko.pp_difficulty.is_some());
    assert!(taiko.pp_aim.is_none());

    let catch = calculator(CATCH)
        .calculate(&ScoreParameters::new(GameMode::Catch))
        .unwrap();

    assert!(catch.n_fruits.is_some());
    assert!(catch.preempt.is_some());
    assert!(catch.great_hit_window.is_none());

    let mania = calculator(MANIA)
        .calculate(&ScoreParameters::new(GameMode::Mania))
        .unwrap();

    assert_eq!(mania.n_objects, Some(12));
    assert_eq!(mania.n_sliders, Some(2));
    assert!(mania.pp_difficulty.is_some());
}

#[test]
fn converts() {
    let calculator = calculator(OSU);

    for mode in [GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
        let result = calculator.calculate(&ScoreParameters::new(mode)).unwrap();

        assert_eq!(result.mode, mode);
        assert!(result.pp > 0.0, "{mode}");
    }

    let err = self::calculator(MANIA)
        .calculate(&ScoreParameters::new(GameMode::Osu))
        .unwrap_err();

    assert!(matches!(err, CalculateError::UnsupportedMode(_)));
}

#[test]
fn custom_clock_rate() {
    let calculator = calculator(OSU);

    let nm = calculator
        .calculate(&ScoreParameters::new(GameMode::Osu))
        .unwrap();
    let fast = calculator
        .calculate(&ScoreParameters::new(GameMode::Osu).clock_rate(1.2))
        .unwrap();

    assert_eq_float(fast.clock_rate, 1.2);
    assert!((fast.bpm - nm.bpm * 1.2).abs() < 1e-9);
    assert!(fast.stars > nm.stars);
    assert_eq!(fast.n_objects, nm.n_objects);
    assert_eq!(fast.max_combo, nm.max_combo);
}

#[test]
fn rejected_parameters() {
    let calculator = calculator(OSU);

    let err = calculator
        .calculate(&ScoreParameters::new(GameMode::Osu).clock_rate(f64::INFINITY))
        .unwrap_err();

    assert!(matches!(
        err,
        CalculateError::InvalidScoreParameters(ScoreParametersError::NonFiniteClockRate(_))
    ));

    let err = calculator
        .calculate(&ScoreParameters::new(GameMode::Osu).passed_objects(500))
        .unwrap_err();

    assert!(matches!(
        err,
        CalculateError::InvalidScoreParameters(
            ScoreParametersError::PassedObjectsExceedObjects { .. }
        )
    ));

    let err = calculator
        .calculate(&ScoreParameters::new(GameMode::Osu).accuracy(-0.1))
        .unwrap_err();

    assert!(matches!(err, CalculateError::InvalidScoreParameters(_)));
}

#[test]
fn passed_objects_of_converts() {
    let calculator = calculator(OSU);

    for mode in [GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
        let n_objects = Difficulty::new()
            .calculate_mode(calculator.map(), mode)
            .unwrap()
            .n_objects();

        let params = ScoreParameters::new(mode).passed_objects(n_objects);
        assert!(calculator.calculate(&params).is_ok(), "{mode}");

        let err = calculator
            .calculate(&params.passed_objects(n_objects + 1))
            .unwrap_err();

        assert!(
            matches!(
                err,
                CalculateError::InvalidScoreParameters(
                    ScoreParametersError::PassedObjectsExceedObjects { .. }
                )
            ),
            "{mode}"
        );
    }
}

#[test]
fn overflowing_hit_counts() {
    let err = calculator(OSU)
        .calculate(
            &ScoreParameters::new(GameMode::Osu)
                .n300(u32::MAX)
                .misses(1),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CalculateError::InvalidScoreParameters(ScoreParametersError::HitCountsExceedObjects { .. })
    ));
}

#[test]
fn shared_cache_across_threads() {
    let calculator = calculator(OSU);
    let cache = DifficultyCache::new();

    let params = [
        ScoreParameters::new(GameMode::Osu),
        ScoreParameters::new(GameMode::Osu).accuracy(0.97),
        ScoreParameters::new(GameMode::Osu).misses(2),
        ScoreParameters::new(GameMode::Osu).mods(DT),
        ScoreParameters::new(GameMode::Taiko),
    ];

    let results: Vec<Vec<CalculateResult>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    params
                        .iter()
                        .map(|params| calculator.calculate_cached(params, &cache).unwrap())
                        .collect()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // NM osu, DT osu, and NM taiko
    assert_eq!(cache.len(), 3);

    let uncached: Vec<_> = params
        .iter()
        .map(|params| calculator.calculate(params).unwrap())
        .collect();

    for thread_results in results {
        assert_eq!(thread_results, uncached);
    }
}

#[test]
fn hash_identifies_content() {
    let a = calculator(OSU);
    let b = calculator(OSU);
    let c = calculator(TAIKO);

    assert_eq!(a.hash(), b.hash());
    assert_ne!(a.hash(), c.hash());
    assert_eq!(a.map(), b.map());
}
