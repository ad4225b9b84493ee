pub const MARGIN: f64 = 1.0;
pub const DISCOUNT_MARGIN: f64 = -0.8;
pub const DISCOUNT_FACTOR: f64 = 0.9;
pub const BATCH_NORM_FACTOR: f64 = 10.0;
