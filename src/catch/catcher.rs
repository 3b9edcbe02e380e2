const AREA_CATCHER_SIZE: f32 = 106.75;

pub const BASE_SPEED: f64 = 1.0;
pub const ALLOWED_CATCH_RANGE: f32 = 0.8;

/// Width of the area in which the catcher catches objects.
pub fn catch_width(cs: f32) -> f32 {
    AREA_CATCHER_SIZE * scale(cs).abs() * ALLOWED_CATCH_RANGE
}

fn scale(cs: f32) -> f32 {
    (1.0 - 0.7 * ((f64::from(cs) - 5.0) / 5.0)) as f32
}
