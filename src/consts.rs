//! 共享常量.

use crate::TimePoint;

/// `initialize()` 产生的单个默认时间步的下界.
pub const INITIAL_LOWER: TimePoint = 0.0;

/// `initialize()` 产生的单个默认时间步的上界.
pub const INITIAL_UPPER: TimePoint = 1.0;

/// 越界查询的哨兵返回值. 注意它与合法的 `0` 不可区分,
/// 调用方应先做有效性校验.
pub const SENTINEL_TIME_POINT: TimePoint = 0.0;

/// 时间点绝对值上限. 超出该范围的输入视为无意义.
pub const TIME_POINT_LIMIT: TimePoint = 1e12;

/// 体素间距 (毫米) 上限. 医学影像中不会出现比这更大的合理间距.
pub const SPACING_LIMIT_MM: f64 = 1e5;
