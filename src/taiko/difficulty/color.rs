//! Colour patterns of a map, encoded in three levels.
//!
//! - A [`MonoStreak`] is a run of hits of the same hit type.
//! - An [`AlternatingMonoPattern`] groups consecutive streaks of equal
//!   length, e.g. `kkdd kkdd`.
//! - A [`RepeatingHitPatterns`] groups alternating patterns that repeat,
//!   e.g. `kd kkd kd kkd`.
//!
//! Each level refers to its children through index ranges into the next
//! lower level and every child knows its parent and its position in it.

use std::ops::Range;

use crate::taiko::object::HitType;

use super::object::TaikoDifficultyObject;

const MAX_REPETITION_INTERVAL: usize = 16;

/// The encodings that start at an object.
///
/// Only the first hit of an encoding refers to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorData {
    pub mono_streak: Option<usize>,
    pub alternating_mono_pattern: Option<usize>,
    pub repeating_hit_patterns: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct MonoStreak {
    /// Indices of the difficulty objects.
    pub hit_objects: Vec<usize>,
    pub hit_type: HitType,
    pub parent: usize,
    pub idx: usize,
}

impl MonoStreak {
    pub fn run_len(&self) -> usize {
        self.hit_objects.len()
    }
}

#[derive(Clone, Debug)]
pub struct AlternatingMonoPattern {
    pub mono_streaks: Range<usize>,
    pub parent: usize,
    pub idx: usize,
}

#[derive(Clone, Debug)]
pub struct RepeatingHitPatterns {
    pub alternating_mono_patterns: Range<usize>,
    /// Amount of patterns since the last repetition of this one, capped at
    /// `MAX_REPETITION_INTERVAL + 1`.
    pub repetition_interval: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ColorEncodings {
    pub mono_streaks: Vec<MonoStreak>,
    pub alternating_mono_patterns: Vec<AlternatingMonoPattern>,
    pub repeating_hit_patterns: Vec<RepeatingHitPatterns>,
}

impl ColorEncodings {
    /// Encode the hits and assign the encodings to their first objects.
    pub fn new(objects: &mut [TaikoDifficultyObject], notes: &[usize]) -> Self {
        let mut this = Self::default();

        this.encode_mono_streaks(objects, notes);
        this.encode_alternating_mono_patterns();
        this.encode_repeating_hit_patterns();
        this.assign(objects);

        this
    }

    fn encode_mono_streaks(&mut self, objects: &[TaikoDifficultyObject], notes: &[usize]) {
        let mut prev_hit_type = None;

        for &idx in notes {
            let hit_type = objects[idx].hit_type;

            match self.mono_streaks.last_mut() {
                Some(streak) if prev_hit_type == Some(hit_type) => streak.hit_objects.push(idx),
                _ => self.mono_streaks.push(MonoStreak {
                    hit_objects: vec![idx],
                    hit_type,
                    parent: 0,
                    idx: 0,
                }),
            }

            prev_hit_type = Some(hit_type);
        }
    }

    fn encode_alternating_mono_patterns(&mut self) {
        let mut start = 0;

        for i in 1..=self.mono_streaks.len() {
            let is_end = self
                .mono_streaks
                .get(i)
                .is_none_or(|streak| streak.run_len() != self.mono_streaks[i - 1].run_len());

            if is_end {
                self.alternating_mono_patterns.push(AlternatingMonoPattern {
                    mono_streaks: start..i,
                    parent: 0,
                    idx: 0,
                });

                start = i;
            }
        }
    }

    fn encode_repeating_hit_patterns(&mut self) {
        let len = self.alternating_mono_patterns.len();
        let is_coupled = |i: usize| i + 2 < len && self.alternating_is_repetition(i, i + 2);

        let mut patterns = Vec::new();
        let mut i = 0;

        while i < len {
            let start = i;

            if is_coupled(i) {
                while is_coupled(i) {
                    i += 1;
                }

                // the two patterns the last coupling looked at
                i += 2;
            } else {
                i += 1;
            }

            patterns.push(RepeatingHitPatterns {
                alternating_mono_patterns: start..i.min(len),
                repetition_interval: 0,
            });
        }

        let intervals: Vec<_> = (0..patterns.len())
            .map(|i| self.repetition_interval(&patterns, i))
            .collect();

        for (pattern, interval) in patterns.iter_mut().zip(intervals) {
            pattern.repetition_interval = interval;
        }

        self.repeating_hit_patterns = patterns;
    }

    fn repetition_interval(&self, patterns: &[RepeatingHitPatterns], idx: usize) -> usize {
        let curr = &patterns[idx];

        for interval in 1..MAX_REPETITION_INTERVAL {
            let Some(other) = idx.checked_sub(interval).map(|i| &patterns[i]) else {
                break;
            };

            if self.repeating_is_repetition(curr, other) {
                return interval;
            }
        }

        MAX_REPETITION_INTERVAL + 1
    }

    fn assign(&mut self, objects: &mut [TaikoDifficultyObject]) {
        for (repeating_idx, repeating) in self.repeating_hit_patterns.iter().enumerate() {
            for (i, alternating_idx) in repeating.alternating_mono_patterns.clone().enumerate() {
                let alternating = &mut self.alternating_mono_patterns[alternating_idx];
                alternating.parent = repeating_idx;
                alternating.idx = i;

                for (j, streak_idx) in alternating.mono_streaks.clone().enumerate() {
                    let streak = &mut self.mono_streaks[streak_idx];
                    streak.parent = alternating_idx;
                    streak.idx = j;

                    let Some(&first) = streak.hit_objects.first() else {
                        continue;
                    };

                    let color = &mut objects[first].color;
                    color.mono_streak = Some(streak_idx);

                    if j == 0 {
                        color.alternating_mono_pattern = Some(alternating_idx);

                        if i == 0 {
                            color.repeating_hit_patterns = Some(repeating_idx);
                        }
                    }
                }
            }
        }
    }

    fn first_streak(&self, alternating_idx: usize) -> Option<&MonoStreak> {
        let alternating = &self.alternating_mono_patterns[alternating_idx];

        self.mono_streaks.get(alternating.mono_streaks.start)
    }

    fn has_identical_mono_len(&self, a: usize, b: usize) -> bool {
        self.first_streak(a).map(MonoStreak::run_len)
            == self.first_streak(b).map(MonoStreak::run_len)
    }

    fn alternating_is_repetition(&self, a: usize, b: usize) -> bool {
        self.has_identical_mono_len(a, b)
            && self.alternating_mono_patterns[a].mono_streaks.len()
                == self.alternating_mono_patterns[b].mono_streaks.len()
            && self.first_streak(a).map(|streak| streak.hit_type)
                == self.first_streak(b).map(|streak| streak.hit_type)
    }

    fn repeating_is_repetition(&self, a: &RepeatingHitPatterns, b: &RepeatingHitPatterns) -> bool {
        a.alternating_mono_patterns.len() == b.alternating_mono_patterns.len()
            && a.alternating_mono_patterns
                .clone()
                .zip(b.alternating_mono_patterns.clone())
                .take(2)
                .all(|(a, b)| self.has_identical_mono_len(a, b))
    }
}

#[cfg(test)]
mod tests {
    use crate::taiko::{difficulty::object::TaikoDifficultyObjects, object::TaikoObject};

    use super::*;

    fn encode(pattern: &str) -> TaikoDifficultyObjects {
        // two leading objects without difficulty object
        let taiko_objects: Vec<_> = "dd"
            .chars()
            .chain(pattern.chars())
            .enumerate()
            .map(|(i, c)| TaikoObject {
                start_time: i as f64 * 100.0,
                hit_type: if c == 'k' { HitType::Rim } else { HitType::Center },
            })
            .collect();

        TaikoDifficultyObjects::new(&taiko_objects, 1.0)
    }

    #[test]
    fn mono_streaks() {
        let diff = encode("dddkkdk");
        let lens: Vec<_> = diff.colors.mono_streaks.iter().map(MonoStreak::run_len).collect();

        assert_eq!(lens, [3, 2, 1, 1]);
        assert_eq!(diff.colors.alternating_mono_patterns.len(), 3);
    }

    #[test]
    fn repeating_patterns() {
        let diff = encode("kdkkdkdkkdkdkkd");
        let colors = &diff.colors;

        assert!(colors.repeating_hit_patterns.len() < colors.alternating_mono_patterns.len());

        let mut intervals = colors
            .repeating_hit_patterns
            .iter()
            .map(|pattern| pattern.repetition_interval);

        assert_eq!(intervals.next(), Some(MAX_REPETITION_INTERVAL + 1));
    }

    #[test]
    fn first_objects_carry_encodings() {
        let diff = encode("ddkk");

        let first = &diff.objects[0].color;
        assert_eq!(first.mono_streak, Some(0));
        assert_eq!(first.alternating_mono_pattern, Some(0));
        assert_eq!(first.repeating_hit_patterns, Some(0));

        assert_eq!(diff.objects[1].color, ColorData::default());
        assert_eq!(diff.objects[2].color.mono_streak, Some(1));

        let streak = &diff.colors.mono_streaks[1];
        assert_eq!((streak.parent, streak.idx), (0, 1));
    }
}
