/// Amount of bananas in a banana shower between both timestamps.
///
/// Timestamps are truncated to integers, as osu!stable does.
pub fn n_bananas(start_time: f64, end_time: f64) -> usize {
    let start_time = start_time as i32;
    let end_time = end_time as i32;
    let mut spacing = (end_time - start_time) as f32;

    while spacing > 100.0 {
        spacing /= 2.0;
    }

    if spacing <= 0.0 {
        return 0;
    }

    let end_time = end_time as f32;
    let mut time = start_time as f32;
    let mut count = 0;

    while time <= end_time {
        time += spacing;
        count += 1;
    }

    count
}
