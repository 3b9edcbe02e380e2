/// A hit object prepared for skill evaluation.
///
/// Difficulty objects are stored in a slice where each object knows its own
/// index so that neighbours can be looked up cheaply.
pub trait IDifficultyObject: Sized {
    fn idx(&self) -> usize;

    /// Start time after applying the clock rate.
    fn start_time(&self) -> f64;

    fn previous<'a>(&self, backwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        self.idx()
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    fn next<'a>(&self, forwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        diff_objects.get(self.idx() + (forwards_idx + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::IDifficultyObject;

    struct Object(usize);

    impl IDifficultyObject for Object {
        fn idx(&self) -> usize {
            self.0
        }

        fn start_time(&self) -> f64 {
            self.0 as f64 * 100.0
        }
    }

    #[test]
    fn neighbours() {
        let objects: Vec<_> = (0..4).map(Object).collect();

        assert_eq!(objects[2].previous(0, &objects).map(|o| o.0), Some(1));
        assert_eq!(objects[2].previous(1, &objects).map(|o| o.0), Some(0));
        assert!(objects[2].previous(2, &objects).is_none());
        assert_eq!(objects[2].next(0, &objects).map(|o| o.0), Some(3));
        assert!(objects[3].next(0, &objects).is_none());
    }
}
