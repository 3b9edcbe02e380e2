use beatmap_pp::{
    any::DifficultyAttributes,
    catch::Catch,
    mania::{Mania, ManiaDifficultyAttributes},
    osu::{Osu, OsuDifficultyAttributes},
    taiko::Taiko,
    Beatmap, CalculateError, Difficulty, GameMode,
};

use self::common::*;

mod common;

fn map(content: &str) -> Beatmap {
    content.parse().unwrap()
}

#[test]
fn empty_map_is_all_zero() {
    let map = map(EMPTY);

    for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
        let attrs = Difficulty::new().calculate_mode(&map, mode).unwrap();

        assert_eq!(attrs.mode(), mode);
        assert_eq_float(attrs.stars(), 0.0);
        assert_eq!(attrs.max_combo(), 0);
    }

    let osu = Difficulty::new().calculate_for_mode::<Osu>(&map).unwrap();
    assert_eq_float(osu.aim, 0.0);
    assert_eq_float(osu.speed, 0.0);
    assert_eq_float(osu.flashlight, 0.0);
}

#[test]
fn single_circle_has_stars() {
    let map = map(SINGLE_CIRCLE);
    let attrs = Difficulty::new().calculate(&map).unwrap();

    assert!(attrs.stars() > 0.0);
    assert!(attrs.stars().is_finite());
    assert_eq!(attrs.max_combo(), 1);
}

#[test]
fn osu_counts() {
    let attrs = Difficulty::new()
        .calculate_for_mode::<Osu>(&map(OSU))
        .unwrap();

    let OsuDifficultyAttributes {
        n_circles,
        n_sliders,
        n_spinners,
        max_combo,
        stars,
        ..
    } = attrs;

    assert_eq!((n_circles, n_sliders, n_spinners), (8, 3, 1));
    assert!(max_combo > n_circles + n_sliders + n_spinners);
    assert!(stars > 0.0);
}

#[test]
fn every_mode_on_native_maps() {
    for (content, mode) in [
        (OSU, GameMode::Osu),
        (TAIKO, GameMode::Taiko),
        (CATCH, GameMode::Catch),
        (MANIA, GameMode::Mania),
    ] {
        let attrs = Difficulty::new().calculate(&map(content)).unwrap();

        assert_eq!(attrs.mode(), mode);
        assert!(attrs.stars() > 0.0, "{mode}: {}", attrs.stars());
        assert!(attrs.max_combo() > 0);
    }
}

#[test]
fn converts_flag_themselves() {
    let map = map(OSU);

    let taiko = Difficulty::new().calculate_for_mode::<Taiko>(&map).unwrap();
    let catch = Difficulty::new().calculate_for_mode::<Catch>(&map).unwrap();
    let mania = Difficulty::new().calculate_for_mode::<Mania>(&map).unwrap();

    assert!(taiko.is_convert);
    assert!(catch.is_convert);
    assert!(mania.is_convert);
}

#[test]
fn unsupported_conversions() {
    let mania = map(MANIA);

    for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch] {
        let err = Difficulty::new().calculate_mode(&mania, mode).unwrap_err();
        assert!(matches!(err, CalculateError::UnsupportedMode(_)), "{mode}");
    }

    let taiko = map(TAIKO);
    let err = Difficulty::new().calculate_for_mode::<Osu>(&taiko).unwrap_err();
    assert!(matches!(err, CalculateError::UnsupportedMode(_)));
}

#[test]
fn conflicting_mods() {
    let err = Difficulty::new()
        .mods(HR | EZ)
        .calculate(&map(OSU))
        .unwrap_err();

    assert!(matches!(err, CalculateError::InvalidModCombination(_)));
}

#[test]
fn clock_rate_keeps_objects() {
    let map = map(MANIA);

    let nm = Difficulty::new().calculate_for_mode::<Mania>(&map).unwrap();
    let dt = Difficulty::new()
        .mods(DT)
        .calculate_for_mode::<Mania>(&map)
        .unwrap();
    let custom = Difficulty::new()
        .clock_rate(1.5)
        .calculate_for_mode::<Mania>(&map)
        .unwrap();

    assert_eq!(nm.n_objects, dt.n_objects);
    assert_eq!(nm.n_hold_notes, dt.n_hold_notes);
    assert_eq!(nm.max_combo, dt.max_combo);
    assert!(dt.stars > nm.stars);
    assert_eq!(dt, custom);
}

#[test]
fn half_time_is_easier() {
    for content in [OSU, TAIKO, CATCH, MANIA] {
        let map = map(content);

        let nm = Difficulty::new().calculate(&map).unwrap();
        let ht = Difficulty::new().mods(HT).calculate(&map).unwrap();

        assert!(ht.stars() < nm.stars(), "{content}");
    }
}

#[test]
fn clock_rate_is_clamped() {
    let map = map(OSU);

    let low = Difficulty::new().clock_rate(0.0).calculate(&map).unwrap();
    let min = Difficulty::new().clock_rate(0.01).calculate(&map).unwrap();
    let nan = Difficulty::new().clock_rate(f64::NAN).calculate(&map).unwrap();
    let nm = Difficulty::new().calculate(&map).unwrap();

    assert_eq!(low.stars().to_bits(), min.stars().to_bits());
    assert_eq!(nan, nm);
}

#[test]
fn passed_objects_limit_the_calculation() {
    let map = map(MANIA);

    let partial = Difficulty::new()
        .passed_objects(4)
        .calculate_for_mode::<Mania>(&map)
        .unwrap();

    let ManiaDifficultyAttributes {
        n_objects,
        n_hold_notes,
        max_combo,
        ..
    } = partial;

    assert_eq!((n_objects, n_hold_notes, max_combo), (4, 0, 4));

    let full = Difficulty::new().calculate_for_mode::<Mania>(&map).unwrap();
    assert!(partial.stars <= full.stars);

    let osu = Difficulty::new().passed_objects(2).calculate(&self::map(OSU)).unwrap();
    assert!(matches!(osu, DifficultyAttributes::Osu(ref attrs) if attrs.n_circles == 2));
}

#[test]
fn hard_rock_tightens_windows() {
    let map = map(OSU);

    let nm = Difficulty::new().calculate_for_mode::<Osu>(&map).unwrap();
    let hr = Difficulty::new().mods(HR).calculate_for_mode::<Osu>(&map).unwrap();
    let ez = Difficulty::new().mods(EZ).calculate_for_mode::<Osu>(&map).unwrap();

    assert!(hr.great_hit_window < nm.great_hit_window);
    assert!(ez.great_hit_window > nm.great_hit_window);
    assert_eq_float(hr.ar, 10.0);
    assert!(hr.od > nm.od);
}

#[test]
fn flashlight_only_with_mod() {
    let map = map(OSU);

    let nm = Difficulty::new().calculate_for_mode::<Osu>(&map).unwrap();
    let fl = Difficulty::new().mods(FL).calculate_for_mode::<Osu>(&map).unwrap();

    assert!(fl.flashlight > 0.0);
    assert!(fl.stars >= nm.stars);
}

#[test]
fn key_mods_on_converts() {
    let map = map(OSU);

    let k4 = Difficulty::new().mods(K4).calculate_for_mode::<Mania>(&map).unwrap();
    let k7 = Difficulty::new().mods(K7).calculate_for_mode::<Mania>(&map).unwrap();

    assert!(k4.is_convert && k7.is_convert);
    assert!(k4.n_objects > 0 && k7.n_objects > 0);
}
