//! 时间界限. 表示单个时间步的有效期.

use crate::consts::TIME_POINT_LIMIT;
use crate::TimePoint;
use ordered_float::NotNan;

/// 半开时间区间 `[lower, upper)`, 表示一个时间步几何的有效期.
///
/// 该区间是只读的. 若要修改界限, 你应该创建新的实例并整体替换.
/// 内部以 [`NotNan`] 保存, 因此界限之间总是全序可比.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBounds {
    lower: NotNan<TimePoint>,
    upper: NotNan<TimePoint>,
}

impl TimeBounds {
    /// 构建时间界限.
    ///
    /// `lower` 和 `upper` 必须有限, 在合理范围内且 `lower <= upper`,
    /// 否则返回 `None`.
    pub fn new(lower: TimePoint, upper: TimePoint) -> Option<TimeBounds> {
        if !(lower.is_finite() && upper.is_finite()) {
            return None;
        }
        if lower.abs() > TIME_POINT_LIMIT || upper.abs() > TIME_POINT_LIMIT || lower > upper {
            return None;
        }
        // 上面已排除 NaN.
        Some(Self {
            lower: NotNan::new(lower).ok()?,
            upper: NotNan::new(upper).ok()?,
        })
    }

    /// `initialize()` 使用的默认有效期 `[0, 1)`.
    #[inline]
    pub fn initial() -> TimeBounds {
        // 字面量有限且有序, new 必然成功.
        Self::new(crate::consts::INITIAL_LOWER, crate::consts::INITIAL_UPPER).unwrap()
    }

    /// 区间下界.
    #[inline]
    pub fn lower(&self) -> TimePoint {
        self.lower.into_inner()
    }

    /// 区间上界. 注意上界本身不属于区间.
    #[inline]
    pub fn upper(&self) -> TimePoint {
        self.upper.into_inner()
    }

    /// 判断时间点 `t` 是否落在 `[lower, upper)` 内.
    #[inline]
    pub fn contains(&self, t: TimePoint) -> bool {
        self.lower() <= t && t < self.upper()
    }

    /// 区间长度. 塌缩区间 (如 `Default` 产生的 `[0, 0)`) 长度为 0.
    #[inline]
    pub fn length(&self) -> TimePoint {
        self.upper() - self.lower()
    }
}

impl Default for TimeBounds {
    /// 塌缩区间 `[0, 0)`. 不包含任何时间点, 用作 `expand()` 填充帧的占位界限.
    fn default() -> Self {
        // 字面量有限且有序, new 必然成功.
        Self::new(0.0, 0.0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::TimeBounds;

    /// 测试基本构建与非法输入拒绝.
    #[test]
    fn test_bounds_new() {
        assert!(TimeBounds::new(0.0, 1.0).is_some());
        assert!(TimeBounds::new(2.5, 2.5).is_some());
        assert!(TimeBounds::new(-3.0, -1.0).is_some());

        // lower > upper.
        assert!(TimeBounds::new(1.0, 0.0).is_none());
        assert!(TimeBounds::new(f64::NAN, 1.0).is_none());
        assert!(TimeBounds::new(0.0, f64::INFINITY).is_none());
        assert!(TimeBounds::new(-1e13, 0.0).is_none());
    }

    /// 测试半开区间语义: 下界属于区间, 上界不属于.
    #[test]
    fn test_bounds_contains_half_open() {
        let b = TimeBounds::new(1.0, 1.9).unwrap();
        assert!(b.contains(1.0));
        assert!(b.contains(1.5));
        assert!(b.contains(1.8999));
        assert!(!b.contains(1.9));
        assert!(!b.contains(0.9999));

        // 塌缩区间不包含任何点.
        let z = TimeBounds::default();
        assert!(!z.contains(0.0));
        assert_eq!(z.length(), 0.0);
    }

    /// 测试 `initial()` 常量构造.
    #[test]
    fn test_bounds_initial() {
        let b = TimeBounds::initial();
        assert_eq!(b.lower(), 0.0);
        assert_eq!(b.upper(), 1.0);
        assert!(b.contains(0.0));
        assert!(!b.contains(1.0));
    }
}
