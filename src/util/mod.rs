pub mod difficulty;
pub mod float_ext;
pub mod limited_queue;
pub mod random;

pub(crate) mod hint;
pub(crate) mod map_or_attrs;

mod log;

pub(crate) use self::log::{log_debug, log_trace, log_warn};

/// Stable sort by start time, keeping the relative order of items that share
/// the same timestamp.
pub fn sort_by_start_time<T>(items: &mut [T], start_time: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| start_time(a).total_cmp(&start_time(b)));
}
