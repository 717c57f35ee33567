pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod serde;

pub const EPSILON: f64 = 1e-6;
