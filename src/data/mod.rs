use std::sync::Arc;

mod bounds;
mod frame;

pub use bounds::TimeBounds;
pub use frame::FrameGeometry;

/// 在索引与调用方之间共享的帧几何句柄.
///
/// `Arc` 内的帧是不可变的. 需要独立副本时, 克隆内部值并重新包装
/// (见 `TimeGeometry::geometry_clone_for_time_step` 与深拷贝 `Clone`).
pub type SharedFrame = Arc<FrameGeometry>;
