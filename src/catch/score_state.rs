/// Catches, misses and combo of an osu!catch play.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchScoreState {
    /// Highest combo the player reached.
    ///
    /// Only fruits and droplets count towards combo.
    pub max_combo: u32,
    /// Caught fruits.
    pub fruits: u32,
    /// Caught droplets.
    pub droplets: u32,
    /// Caught tiny droplets.
    pub tiny_droplets: u32,
    /// Missed tiny droplets.
    pub tiny_droplet_misses: u32,
    /// Missed fruits and droplets.
    pub misses: u32,
}

impl CatchScoreState {
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            fruits: 0,
            droplets: 0,
            tiny_droplets: 0,
            tiny_droplet_misses: 0,
            misses: 0,
        }
    }

    pub const fn total_hits(&self) -> u32 {
        self.fruits + self.droplets + self.tiny_droplets + self.tiny_droplet_misses + self.misses
    }

    /// Accuracy between `0.0` and `1.0`.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let caught = self.fruits + self.droplets + self.tiny_droplets;

        f64::from(caught) / f64::from(total_hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_everything_caught() {
        let state = CatchScoreState {
            max_combo: 10,
            fruits: 6,
            droplets: 2,
            tiny_droplets: 10,
            tiny_droplet_misses: 1,
            misses: 1,
        };

        assert_eq!(state.total_hits(), 20);
        assert!((state.accuracy() - 0.9).abs() < 1e-12);
        assert!(CatchScoreState::new().accuracy().abs() < f64::EPSILON);
    }
}
