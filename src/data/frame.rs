//! 帧几何. 单个时间步的空间描述.

use super::TimeBounds;
use crate::consts::SPACING_LIMIT_MM;
use crate::{Idx3d, PointMm};
use ndarray::{array, Array2};

/// 单个时间步的空间帧几何, 包括世界坐标原点 (毫米), 体素间距 (毫米),
/// 体素规模, 以及该帧的时间有效期 [`TimeBounds`].
///
/// 本结构对索引方 ([`crate::TimeGeometry`]) 而言是不透明的:
/// 索引只读取/替换其时间界限, 不解释空间内容.
///
/// 帧内容一经构建即只读. 需要变更时构建新实例整体替换.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameGeometry {
    origin: PointMm,
    spacing: [f64; 3],
    extent: Idx3d,
    bounds: TimeBounds,
}

impl FrameGeometry {
    /// 构建帧几何, 时间界限为塌缩区间 `[0, 0)`.
    ///
    /// `origin` 各分量必须有限; `spacing` 各分量必须为有限正数且不超过
    /// 合理上限, 否则返回 `None`.
    pub fn new(origin: PointMm, spacing: [f64; 3], extent: Idx3d) -> Option<FrameGeometry> {
        if !origin.iter().all(|v| v.is_finite()) {
            return None;
        }
        if !spacing
            .iter()
            .all(|v| v.is_finite() && 0.0 < *v && *v <= SPACING_LIMIT_MM)
        {
            return None;
        }
        Some(Self {
            origin,
            spacing,
            extent,
            bounds: TimeBounds::default(),
        })
    }

    /// 替换时间界限, 返回新实例.
    #[inline]
    pub fn with_time_bounds(mut self, bounds: TimeBounds) -> FrameGeometry {
        self.bounds = bounds;
        self
    }

    /// 以 `self` 的空间部分为模板, 搭配给定时间界限构建独立新帧.
    #[inline]
    pub fn retimed(&self, bounds: TimeBounds) -> FrameGeometry {
        self.clone().with_time_bounds(bounds)
    }

    /// 时间有效期.
    #[inline]
    pub fn time_bounds(&self) -> TimeBounds {
        self.bounds
    }

    /// 世界坐标原点, 以毫米为单位.
    #[inline]
    pub fn origin(&self) -> PointMm {
        self.origin
    }

    /// 体素间距, 以毫米为单位.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// 体素规模.
    #[inline]
    pub fn extent(&self) -> Idx3d {
        self.extent
    }

    /// 获取该帧的体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        let (z, h, w) = self.extent;
        z * h * w
    }

    /// 检查体素索引是否合法.
    #[inline]
    pub fn check(&self, (z0, h0, w0): &Idx3d) -> bool {
        let (z, h, w) = self.extent;
        *z0 < z && *h0 < h && *w0 < w
    }

    /// 构建 4x4 体素索引到世界坐标的仿射矩阵 (轴对齐, 无旋转).
    pub fn affine(&self) -> Array2<f64> {
        let [sz, sh, sw] = self.spacing;
        let [oz, oh, ow] = self.origin;
        array![
            [sz, 0.0, 0.0, oz],
            [0.0, sh, 0.0, oh],
            [0.0, 0.0, sw, ow],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// 体素索引 -> 世界坐标 (毫米). 不要求索引落在 `extent` 内.
    pub fn index_to_world(&self, (z, h, w): Idx3d) -> PointMm {
        let v = array![z as f64, h as f64, w as f64, 1.0];
        let p = self.affine().dot(&v);
        [p[0], p[1], p[2]]
    }

    /// 世界坐标 (毫米) -> 体素索引.
    ///
    /// 坐标落在帧外 (负方向或超出 `extent`) 时返回 `None`.
    pub fn world_to_index(&self, point: PointMm) -> Option<Idx3d> {
        let mut idx = [0usize; 3];
        for (slot, ((p, o), s)) in idx
            .iter_mut()
            .zip(point.iter().zip(self.origin.iter()).zip(self.spacing.iter()))
        {
            let v = (p - o) / s;
            if v < 0.0 || !v.is_finite() {
                return None;
            }
            *slot = v.floor() as usize;
        }
        let idx = (idx[0], idx[1], idx[2]);
        self.check(&idx).then_some(idx)
    }
}

impl Default for FrameGeometry {
    /// 单位间距, 零原点, 零规模, 塌缩时间界限. 用作 `expand()` 的填充帧.
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            spacing: [1.0; 3],
            extent: (0, 0, 0),
            bounds: TimeBounds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameGeometry, TimeBounds};

    /// 测试基本构建与非法输入拒绝.
    #[test]
    fn test_frame_new() {
        assert!(FrameGeometry::new([0.0; 3], [1.0, 0.7, 0.7], (48, 512, 512)).is_some());

        assert!(FrameGeometry::new([f64::NAN, 0.0, 0.0], [1.0; 3], (1, 1, 1)).is_none());
        assert!(FrameGeometry::new([0.0; 3], [0.0, 1.0, 1.0], (1, 1, 1)).is_none());
        assert!(FrameGeometry::new([0.0; 3], [-1.0, 1.0, 1.0], (1, 1, 1)).is_none());
        assert!(FrameGeometry::new([0.0; 3], [1e6, 1.0, 1.0], (1, 1, 1)).is_none());
    }

    /// 测试体素索引与世界坐标互转.
    #[test]
    fn test_frame_world_round_trip() {
        let f = FrameGeometry::new([10.0, -5.0, 0.0], [2.5, 0.5, 0.5], (4, 8, 8)).unwrap();

        assert_eq!(f.index_to_world((0, 0, 0)), [10.0, -5.0, 0.0]);
        assert_eq!(f.index_to_world((2, 4, 6)), [15.0, -3.0, 3.0]);

        assert_eq!(f.world_to_index([15.0, -3.0, 3.0]), Some((2, 4, 6)));
        // 体素内部任意点都映射回该体素.
        assert_eq!(f.world_to_index([15.2, -2.8, 3.1]), Some((2, 4, 6)));

        // 帧外.
        assert_eq!(f.world_to_index([9.0, 0.0, 0.0]), None);
        assert_eq!(f.world_to_index([1e4, 0.0, 0.0]), None);
    }

    /// 测试时间界限替换与模板复制.
    #[test]
    fn test_frame_time_bounds() {
        let b = TimeBounds::new(3.0, 3.9).unwrap();
        let f = FrameGeometry::new([0.0; 3], [1.0; 3], (2, 2, 2))
            .unwrap()
            .with_time_bounds(b);
        assert_eq!(f.time_bounds(), b);

        let b2 = TimeBounds::new(4.0, 4.9).unwrap();
        let g = f.retimed(b2);
        assert_eq!(g.time_bounds(), b2);
        assert_eq!(g.origin(), f.origin());
        // 原帧不受影响.
        assert_eq!(f.time_bounds(), b);
    }

    /// 测试默认帧与体素检查.
    #[test]
    fn test_frame_default_and_check() {
        let d = FrameGeometry::default();
        assert_eq!(d.size(), 0);
        assert!(!d.check(&(0, 0, 0)));
        assert_eq!(d.time_bounds(), TimeBounds::default());

        let f = FrameGeometry::new([0.0; 3], [1.0; 3], (2, 3, 4)).unwrap();
        assert_eq!(f.size(), 24);
        assert!(f.check(&(1, 2, 3)));
        assert!(!f.check(&(2, 0, 0)));
    }
}
