//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx3d, PointMm, TimePoint, TimeStep};

pub use crate::data::{FrameGeometry, SharedFrame, TimeBounds};

pub use crate::timeline::{AppendError, TimeGeometry};

pub use crate::consts::{INITIAL_LOWER, INITIAL_UPPER, SENTINEL_TIME_POINT};
