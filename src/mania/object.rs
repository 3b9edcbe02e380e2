use crate::model::{
    beatmap::Beatmap,
    control_point::{DifficultyPoint, TimingPoint},
    hit_object::{HitObject, HitObjectKind, HoldNote, Spinner},
};

use super::PLAYFIELD_WIDTH;

const BASE_SCORING_DIST: f64 = 100.0;

/// A note or hold note placed in a column.
#[derive(Clone, Debug, PartialEq)]
pub struct ManiaObject {
    pub start_time: f64,
    pub end_time: f64,
    pub column: usize,
    pub is_hold: bool,
}

impl ManiaObject {
    pub fn new(h: &HitObject, total_columns: f32, map: &Beatmap) -> Self {
        let column = Self::column(h.pos.x, total_columns);

        let duration = match h.kind {
            HitObjectKind::Circle => None,
            HitObjectKind::Slider(ref slider) => {
                let beat_len = map
                    .timing_point_at(h.start_time)
                    .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

                let slider_velocity = map
                    .difficulty_point_at(h.start_time)
                    .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                        point.slider_velocity
                    });

                let scoring_dist = BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
                let velocity = scoring_dist / beat_len;

                Some(slider.span_count() as f64 * slider.curve().dist() / velocity)
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => Some(duration),
        };

        Self {
            start_time: h.start_time,
            end_time: h.start_time + duration.unwrap_or(0.0),
            column,
            is_hold: duration.is_some(),
        }
    }

    /// The column of an x-coordinate for the given amount of columns.
    pub fn column(x: f32, total_columns: f32) -> usize {
        let x_divisor = PLAYFIELD_WIDTH / total_columns;

        (x / x_divisor).floor().clamp(0.0, total_columns - 1.0) as usize
    }

    /// Hold notes give an additional combo every 100ms.
    pub fn max_combo(&self) -> u32 {
        if self.is_hold {
            1 + ((self.end_time - self.start_time) / 100.0) as u32
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_split_the_playfield() {
        assert_eq!(ManiaObject::column(0.0, 4.0), 0);
        assert_eq!(ManiaObject::column(127.0, 4.0), 0);
        assert_eq!(ManiaObject::column(128.0, 4.0), 1);
        assert_eq!(ManiaObject::column(511.0, 4.0), 3);
        assert_eq!(ManiaObject::column(600.0, 4.0), 3);
        assert_eq!(ManiaObject::column(-5.0, 4.0), 0);
    }

    #[test]
    fn hold_combo() {
        let map = Beatmap::default();

        let hold = HitObject {
            pos: Default::default(),
            start_time: 1000.0,
            kind: HitObjectKind::Hold(HoldNote { duration: 450.0 }),
        };

        let obj = ManiaObject::new(&hold, 4.0, &map);

        assert!(obj.is_hold);
        assert!((obj.end_time - 1450.0).abs() < f64::EPSILON);
        assert_eq!(obj.max_combo(), 5);
    }
}
