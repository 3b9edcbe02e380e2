use crate::{
    any::difficulty::{object::IDifficultyObject, skills::StrainSkill, Difficulty},
    mania::{attributes::ManiaDifficultyAttributes, object::ManiaObject},
    model::beatmap::Beatmap,
    util::log_trace,
};

use self::strain::Strain;

mod strain;

const DIFFICULTY_MULTIPLIER: f64 = 0.018;

/// Calculate the difficulty attributes of an osu!mania map.
pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> ManiaDifficultyAttributes {
    let take = difficulty.get_passed_objects();
    let total_columns = map.cs.round_ties_even().max(1.0);

    let map_attrs = map.attributes().difficulty(difficulty).build();
    let clock_rate = map_attrs.clock_rate;

    let mania_objects: Vec<_> = map
        .hit_objects
        .iter()
        .take(take)
        .map(|h| ManiaObject::new(h, total_columns, map))
        .collect();

    let mut attrs = ManiaDifficultyAttributes {
        great_hit_window: map_attrs.hit_windows.od,
        n_objects: mania_objects.len() as u32,
        n_hold_notes: mania_objects.iter().filter(|h| h.is_hold).count() as u32,
        max_combo: mania_objects.iter().map(ManiaObject::max_combo).sum(),
        is_convert: map.is_convert,
        ..Default::default()
    };

    let diff_objects = difficulty_objects(&mania_objects, clock_rate);

    let mut strain = Strain::new(total_columns as usize);

    for curr in diff_objects.iter() {
        strain.process(curr, &diff_objects);
    }

    attrs.stars = strain.difficulty_value() * DIFFICULTY_MULTIPLIER;

    log_trace!(
        "mania difficulty: {:.4} stars, {} columns, {} objects, {} hold notes",
        attrs.stars,
        total_columns,
        attrs.n_objects,
        attrs.n_hold_notes
    );

    attrs
}

/// A note in gameplay time, i.e. with times divided by the clock rate.
#[derive(Clone, Debug)]
pub(crate) struct ManiaDifficultyObject {
    idx: usize,
    column: usize,
    start_time: f64,
    end_time: f64,
    /// Since the previous note in any column.
    delta_time: f64,
}

impl IDifficultyObject for ManiaDifficultyObject {
    fn idx(&self) -> usize {
        self.idx
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }
}

/// The first object only serves as previous object of the second.
fn difficulty_objects(mania_objects: &[ManiaObject], clock_rate: f64) -> Vec<ManiaDifficultyObject> {
    mania_objects
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| ManiaDifficultyObject {
            idx,
            column: pair[1].column,
            start_time: pair[1].start_time / clock_rate,
            end_time: pair[1].end_time / clock_rate,
            delta_time: (pair[1].start_time - pair[0].start_time) / clock_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::model::{mode::GameMode, mods::GameMods};

    use super::*;

    const KEYS: &str = "osu file format v14

[General]
Mode: 3

[Difficulty]
HPDrainRate:8
CircleSize:4
OverallDifficulty:8
ApproachRate:5
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,300,4,2,0,100,1,0

[HitObjects]
64,192,1000,1,0,0:0:0:0:
192,192,1150,1,0,0:0:0:0:
320,192,1300,1,0,0:0:0:0:
448,192,1450,1,0,0:0:0:0:
64,192,1600,128,0,2200:0:0:0:0:
192,192,1600,1,0,0:0:0:0:
320,192,1750,1,0,0:0:0:0:
448,192,1900,1,0,0:0:0:0:
192,192,2050,1,0,0:0:0:0:
320,192,2200,1,0,0:0:0:0:
448,192,2350,1,0,0:0:0:0:
64,192,2500,1,0,0:0:0:0:
";

    fn map() -> Beatmap {
        let map: Beatmap = KEYS.parse().unwrap();
        assert_eq!(map.mode, GameMode::Mania);

        map
    }

    #[test]
    fn empty_map_is_zero() {
        let map = Beatmap {
            mode: GameMode::Mania,
            cs: 4.0,
            ..Default::default()
        };

        let attrs = difficulty(&Difficulty::new(), &map);

        assert_eq!(attrs, ManiaDifficultyAttributes {
            great_hit_window: attrs.great_hit_window,
            ..Default::default()
        });
    }

    #[test]
    fn counts_and_stars() {
        let attrs = difficulty(&Difficulty::new(), &map());

        assert_eq!(attrs.n_objects, 12);
        assert_eq!(attrs.n_hold_notes, 1);
        // 600ms hold gives 7 combo
        assert_eq!(attrs.max_combo, 18);
        assert!(attrs.stars > 0.0 && attrs.stars.is_finite());
        assert!(!attrs.is_convert);
    }

    #[test]
    fn passed_objects_cut_the_map() {
        let map = map();
        let full = difficulty(&Difficulty::new(), &map);
        let partial = difficulty(&Difficulty::new().passed_objects(4), &map);

        assert_eq!(partial.n_objects, 4);
        assert_eq!(partial.max_combo, 4);
        assert!(partial.stars <= full.stars);
    }

    /// 400 notes of a rolling 4K pattern with a hold every 16th note.
    fn long_map() -> Beatmap {
        const COLUMNS: [u32; 8] = [64, 320, 192, 448, 64, 192, 320, 448];

        let mut content = String::from(
            "osu file format v14\n\n[General]\nMode: 3\n\n\
            [Difficulty]\nCircleSize:4\nOverallDifficulty:8\n\n[HitObjects]\n",
        );

        for i in 0..400 {
            let x = COLUMNS[i % COLUMNS.len()];
            let time = 1000 + i * 100;

            let line = if i % 16 == 15 {
                format!("{x},192,{time},128,0,{}:0:0:0:0:\n", time + 300)
            } else {
                format!("{x},192,{time},1,0,0:0:0:0:\n")
            };

            content.push_str(&line);
        }

        content.parse().unwrap()
    }

    #[test]
    fn clock_rate_scales_difficulty() {
        let map = long_map();
        let nm = difficulty(&Difficulty::new(), &map);
        let dt = difficulty(&Difficulty::new().mods(GameMods::DT), &map);
        let ht = difficulty(&Difficulty::new().mods(GameMods::HT), &map);

        assert_eq!(nm.n_objects, 400);
        assert!(dt.stars > nm.stars, "{} <= {}", dt.stars, nm.stars);
        assert!(ht.stars < nm.stars, "{} >= {}", ht.stars, nm.stars);
    }

    #[test]
    fn hard_rock_narrows_hit_window() {
        let map = map();
        let nm = difficulty(&Difficulty::new(), &map);
        let hr = difficulty(&Difficulty::new().mods(GameMods::HR), &map);

        assert!(hr.great_hit_window < nm.great_hit_window);
        assert!((hr.stars - nm.stars).abs() < 1e-12);
    }
}
