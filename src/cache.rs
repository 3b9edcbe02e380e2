use std::{
    collections::HashMap,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use twox_hash::XxHash3_64;

use crate::{
    any::{difficulty::Difficulty, DifficultyAttributes},
    model::{beatmap::Beatmap, mode::GameMode},
    util::log_trace,
    CalculateError,
};

/// XXH3-64 hash of a beatmap's source bytes.
pub fn content_hash(bytes: &[u8]) -> u64 {
    XxHash3_64::oneshot(bytes)
}

/// Everything that a difficulty calculation depends on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// See [`content_hash`].
    pub hash: u64,
    pub mode: GameMode,
    pub mods: u32,
    pub clock_rate_bits: u64,
    pub passed_objects: Option<u32>,
}

impl CacheKey {
    pub fn new(hash: u64, mode: GameMode, difficulty: &Difficulty) -> Self {
        let passed_objects = u32::try_from(difficulty.get_passed_objects()).ok();

        Self {
            hash,
            mode,
            mods: difficulty.get_mods().bits(),
            clock_rate_bits: difficulty.get_clock_rate().to_bits(),
            passed_objects,
        }
    }
}

type Slot = Arc<OnceLock<Result<DifficultyAttributes, CalculateError>>>;

/// Memoized difficulty attributes that can be shared between threads.
///
/// Each key is calculated at most once. Concurrent requests for a key that
/// is still being calculated wait for that calculation and share its result.
///
/// ```
/// use beatmap_pp::{cache::{content_hash, DifficultyCache}, Beatmap, Difficulty};
/// use beatmap_pp::model::mode::GameMode;
///
/// let bytes = b"osu file format v14\n\n[HitObjects]\n256,192,0,1,0\n100,100,400,1,0";
/// let map = Beatmap::from_bytes(bytes).unwrap();
/// let hash = content_hash(bytes);
///
/// let cache = DifficultyCache::new();
/// let difficulty = Difficulty::new();
///
/// let a = cache.calculate(hash, &map, GameMode::Osu, &difficulty).unwrap();
/// let b = cache.calculate(hash, &map, GameMode::Osu, &difficulty).unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Default)]
pub struct DifficultyCache {
    entries: RwLock<HashMap<CacheKey, Slot>>,
}

impl DifficultyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The amount of cached keys, including those still being calculated.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// The cached result of a finished calculation.
    pub fn get(&self, key: &CacheKey) -> Option<Result<DifficultyAttributes, CalculateError>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        entries.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Calculate the attributes of `map` for `mode` unless they're cached
    /// already.
    ///
    /// `hash` must identify the map, see [`content_hash`].
    pub fn calculate(
        &self,
        hash: u64,
        map: &Beatmap,
        mode: GameMode,
        difficulty: &Difficulty,
    ) -> Result<DifficultyAttributes, CalculateError> {
        let key = CacheKey::new(hash, mode, difficulty);

        self.get_or_calculate(key, || difficulty.calculate_mode(map, mode))
    }

    /// Return the cached result of `key` or store the result of `calculate`.
    pub fn get_or_calculate<F>(
        &self,
        key: CacheKey,
        calculate: F,
    ) -> Result<DifficultyAttributes, CalculateError>
    where
        F: FnOnce() -> Result<DifficultyAttributes, CalculateError>,
    {
        let slot = self.slot(key);

        if let Some(res) = slot.get() {
            log_trace!("difficulty cache hit for {key:?}");

            return res.clone();
        }

        // Only the thread that initializes the cell calculates, the others
        // wait until it's done
        slot.get_or_init(|| {
            log_trace!("difficulty cache miss for {key:?}");

            calculate()
        })
        .clone()
    }

    fn slot(&self, key: CacheKey) -> Slot {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(slot) = entries.get(&key) {
            return Arc::clone(slot);
        }

        drop(entries);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(entries.entry(key).or_default())
    }
}

impl Debug for DifficultyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DifficultyCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use crate::model::mods::GameMods;

    use super::*;

    const MAP: &[u8] = b"osu file format v14

[Difficulty]
CircleSize:4
OverallDifficulty:8
ApproachRate:9

[HitObjects]
256,192,0,1,0
100,100,300,1,0
400,300,600,1,0
";

    fn map() -> Beatmap {
        Beatmap::from_bytes(MAP).unwrap()
    }

    #[test]
    fn hash_depends_on_content() {
        assert_eq!(content_hash(MAP), content_hash(MAP));
        assert_ne!(content_hash(MAP), content_hash(b"osu file format v14\n"));
    }

    #[test]
    fn keys_differ_per_setting() {
        let hash = content_hash(MAP);
        let nm = CacheKey::new(hash, GameMode::Osu, &Difficulty::new());
        let dt = CacheKey::new(hash, GameMode::Osu, &Difficulty::new().mods(GameMods::DT));
        let rate = CacheKey::new(hash, GameMode::Osu, &Difficulty::new().clock_rate(1.5));
        let taiko = CacheKey::new(hash, GameMode::Taiko, &Difficulty::new());
        let passed = CacheKey::new(hash, GameMode::Osu, &Difficulty::new().passed_objects(2));

        assert_ne!(nm, dt);
        assert_ne!(dt, rate);
        assert_ne!(nm, taiko);
        assert_ne!(nm, passed);
        assert_eq!(nm.passed_objects, None);
    }

    #[test]
    fn calculates_once_per_key() {
        let cache = DifficultyCache::new();
        let map = map();
        let key = CacheKey::new(content_hash(MAP), GameMode::Osu, &Difficulty::new());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let res = cache.get_or_calculate(key, || {
                calls.fetch_add(1, Ordering::SeqCst);

                Difficulty::new().calculate(&map)
            });

            assert!(res.is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).is_some());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn single_flight_across_threads() {
        let cache = DifficultyCache::new();
        let map = map();
        let hash = content_hash(MAP);
        let calls = AtomicUsize::new(0);

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let key = CacheKey::new(hash, GameMode::Catch, &Difficulty::new());

                        cache.get_or_calculate(key, || {
                            calls.fetch_add(1, Ordering::SeqCst);

                            Difficulty::new().calculate_mode(&map, GameMode::Catch)
                        })
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn errors_are_cached_too() {
        let cache = DifficultyCache::new();
        let map = Beatmap {
            mode: GameMode::Mania,
            ..map()
        };

        let difficulty = Difficulty::new();
        let res = cache.calculate(0, &map, GameMode::Taiko, &difficulty);

        assert!(matches!(res, Err(CalculateError::UnsupportedMode(_))));
        assert!(matches!(
            cache.get(&CacheKey::new(0, GameMode::Taiko, &difficulty)),
            Some(Err(_))
        ));
    }
}
