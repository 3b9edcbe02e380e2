use std::ops::Index;

/// Ring buffer with a fixed capacity `N` that overwrites its oldest element
/// once full.
///
/// Indexing starts at the oldest element.
#[derive(Clone, Debug)]
pub struct LimitedQueue<T, const N: usize> {
    queue: [T; N],
    /// Index of the most recently pushed element, meaningless while empty.
    end: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> Default for LimitedQueue<T, N> {
    fn default() -> Self {
        Self {
            queue: [T::default(); N],
            end: N - 1,
            len: 0,
        }
    }
}

impl<T: Copy + Default, const N: usize> LimitedQueue<T, N> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, const N: usize> LimitedQueue<T, N> {
    pub fn push(&mut self, elem: T) {
        self.end = (self.end + 1) % N;
        self.queue[self.end] = elem;
        self.len += usize::from(self.len < N);
    }

    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    /// The oldest elements are in the first slice.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        if self.is_full() {
            (&self.queue[self.end + 1..N], &self.queue[0..=self.end])
        } else {
            (&[], &self.queue[0..self.len])
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (head, tail) = self.as_slices();

        head.iter().chain(tail)
    }
}

impl<T, const N: usize> Index<usize> for LimitedQueue<T, N> {
    type Output = T;

    fn index(&self, idx: usize) -> &Self::Output {
        let idx = (idx + usize::from(self.len == N) * (self.end + 1)) % N;

        &self.queue[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::LimitedQueue;

    #[test]
    fn empty() {
        let queue = LimitedQueue::<u8, 4>::new();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn wraps_around_when_full() {
        let mut queue = LimitedQueue::<u8, 4>::new();

        for i in 1..=6 {
            queue.push(i);
        }

        assert!(queue.is_full());
        assert_eq!(queue.len(), 4);
        assert_eq!(queue[0], 3);
        assert_eq!(queue[3], 6);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 6]);
    }

    #[test]
    fn partially_filled() {
        let mut queue = LimitedQueue::<f64, 3>::new();
        queue.push(5.0);
        queue.push(2.0);

        assert!(!queue.is_full());
        assert_eq!(queue[1], 2.0);
        assert_eq!(queue.as_slices(), ([].as_slice(), [5.0, 2.0].as_slice()));
    }
}
