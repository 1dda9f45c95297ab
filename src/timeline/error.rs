//! 运行时错误.

use crate::TimePoint;

/// 追加时间步的运行时错误.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppendError {
    /// 待追加的帧几何为空 (`None`).
    MissingGeometry,

    /// 追加会破坏下界非递减的时间顺序.
    ///
    /// 第一个参数是当前末帧的下界, 第二个参数是待追加帧的下界.
    /// 下界相等是允许的, 严格更小才会触发此错误.
    NonMonotonic(TimePoint, TimePoint),
}
