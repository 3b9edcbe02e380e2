use beatmap_pp::{Beatmap, GameMode};

use self::common::*;

mod common;

fn map(content: &str) -> Beatmap {
    content.parse().unwrap()
}

#[test]
fn conversion_is_deterministic() {
    let map = map(OSU);

    for mode in [GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
        let a = map.convert_ref(mode, NM).unwrap();
        let b = map.convert_ref(mode, NM).unwrap();

        assert_eq!(a, b, "{mode}");
        assert_eq!(a.mode, mode);
        assert!(a.is_convert);
    }
}

#[test]
fn converting_to_the_same_mode_is_a_noop() {
    for (content, mode) in [
        (OSU, GameMode::Osu),
        (TAIKO, GameMode::Taiko),
        (CATCH, GameMode::Catch),
        (MANIA, GameMode::Mania),
    ] {
        let map = map(content);
        let converted = map.convert_ref(mode, NM).unwrap();

        assert_eq!(converted.hit_objects, map.hit_objects, "{mode}");
    }

    let osu = map(OSU);
    let mania = osu.convert_ref(GameMode::Mania, K4).unwrap().into_owned();
    let again = mania.convert_ref(GameMode::Mania, K7).unwrap();

    assert_eq!(again.hit_objects, mania.hit_objects);
    assert_eq_float(again.cs, 4.0);
}

#[test]
fn taiko_keeps_objects() {
    let osu = map(OSU);
    let taiko = osu.convert_ref(GameMode::Taiko, NM).unwrap();

    for pair in taiko.hit_objects.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }

    assert!(taiko.hit_objects.len() >= osu.hit_objects.len() - 3);
}

#[test]
fn non_osu_maps_cannot_be_converted() {
    let taiko = map(TAIKO);

    for mode in [GameMode::Osu, GameMode::Catch, GameMode::Mania] {
        assert!(taiko.convert_ref(mode, NM).is_err(), "{mode}");
    }
}
