pub mod path_offset;

pub use path_offset::{EndType, JoinType, OffsetOptions, PathMerger, PathOffset2D, DEFAULT_ARC_TOLERANCE};
