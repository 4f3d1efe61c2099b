pub mod beading;
pub mod error;
pub mod math;
pub mod operations;

pub use error::{Result, WallpathError};
