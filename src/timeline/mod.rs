//! 时间步索引核心. 维护离散时间步与连续时间点之间的有序映射.

use crate::consts::{SENTINEL_TIME_POINT, TIME_POINT_LIMIT};
use crate::data::{FrameGeometry, SharedFrame, TimeBounds};
use crate::{TimePoint, TimeStep};
use itertools::Itertools;
use log::debug;
use std::sync::Arc;

mod error;

pub use error::AppendError;

/// 时间分辨数据集的时间几何索引.
///
/// 持有按时间顺序排列的帧几何序列, 每帧带有半开有效期 `[lower, upper)`.
/// 序列应满足下界非递减; [`append_time_step`](Self::append_time_step)
/// 通过报错维持该不变式, [`set_time_step_geometry`](Self::set_time_step_geometry)
/// 通过剪除冲突帧自修复.
///
/// 缓存的全局界限在每次修改后重算: 最小时间点取首帧下界,
/// 最大时间点取末帧上界; 空索引时均为 0.
///
/// # 注意
///
/// 1. 本结构不是线程安全的. 并发修改需要调用方自行加锁.
/// 2. `Clone` 是深拷贝: 副本的每一帧都独立克隆, 与原索引不共享.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGeometry {
    steps: Vec<SharedFrame>,
    minimum: TimePoint,
    maximum: TimePoint,
}

impl TimeGeometry {
    /// 构建空索引. 空索引上的一切查询都有定义 (见各查询方法).
    #[inline]
    pub fn new() -> TimeGeometry {
        Self {
            steps: Vec::new(),
            minimum: SENTINEL_TIME_POINT,
            maximum: SENTINEL_TIME_POINT,
        }
    }

    /// 重置为单个默认时间步, 有效期 `[0, 1)`.
    pub fn initialize(&mut self) {
        self.steps.clear();
        self.steps
            .push(Arc::new(FrameGeometry::default().with_time_bounds(
                TimeBounds::initial(),
            )));
        self.refresh_bounds_cache();
    }

    /// 时间步个数.
    #[inline]
    pub fn count_time_steps(&self) -> usize {
        self.steps.len()
    }

    /// 索引是否有效, 即是否至少含有一个时间步.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.steps.is_empty()
    }

    /// 全局最小时间点, 即首帧下界. 空索引为 0.
    #[inline]
    pub fn minimum_time_point(&self) -> TimePoint {
        self.minimum
    }

    /// 全局最大时间点, 即末帧上界. 空索引为 0.
    #[inline]
    pub fn maximum_time_point(&self) -> TimePoint {
        self.maximum
    }

    /// 全局时间界限 `(min, max)`.
    #[inline]
    pub fn time_bounds(&self) -> (TimePoint, TimePoint) {
        (self.minimum, self.maximum)
    }

    /// 时间步 `step` 自身的有效期. 越界返回 `None`.
    #[inline]
    pub fn step_time_bounds(&self, step: TimeStep) -> Option<TimeBounds> {
        self.steps.get(step).map(|g| g.time_bounds())
    }

    /// 时间步 `step` 的有效期下界. 越界返回 0 哨兵值.
    #[inline]
    pub fn minimum_time_point_of_step(&self, step: TimeStep) -> TimePoint {
        self.step_time_bounds(step)
            .map_or(SENTINEL_TIME_POINT, |b| b.lower())
    }

    /// 时间步 `step` 的有效期上界. 越界返回 0 哨兵值.
    #[inline]
    pub fn maximum_time_point_of_step(&self, step: TimeStep) -> TimePoint {
        self.step_time_bounds(step)
            .map_or(SENTINEL_TIME_POINT, |b| b.upper())
    }

    /// 判断时间点 `t` 是否落在全局界限 `[min, max)` 内.
    ///
    /// 注意半开约定: `t == max` 不是有效时间点.
    #[inline]
    pub fn is_valid_time_point(&self, t: TimePoint) -> bool {
        self.minimum <= t && t < self.maximum
    }

    /// 判断时间步索引是否在界内.
    ///
    /// 索引为 `usize`, 不存在负值, 因此只需上界检查.
    #[inline]
    pub fn is_valid_time_step(&self, step: TimeStep) -> bool {
        step < self.steps.len()
    }

    /// 时间步 -> 该步有效期下界. 越界返回 `None`.
    #[inline]
    pub fn find_time_point(&self, step: TimeStep) -> Option<TimePoint> {
        self.step_time_bounds(step).map(|b| b.lower())
    }

    /// 时间步 -> 该步有效期下界, 越界返回 0 哨兵值.
    ///
    /// 哨兵值与合法的 `0` 不可区分, 调用方应先用
    /// [`is_valid_time_step`](Self::is_valid_time_step) 校验,
    /// 或改用 [`find_time_point`](Self::find_time_point).
    #[inline]
    pub fn time_step_to_time_point(&self, step: TimeStep) -> TimePoint {
        self.find_time_point(step).unwrap_or(SENTINEL_TIME_POINT)
    }

    /// 时间点 -> 所属时间步. `t` 不在全局界限内时返回 `None`.
    ///
    /// 算法: 找到第一个下界严格大于 `t` 的帧, 其前一帧即为答案;
    /// 不存在这样的帧时 `t` 落在末帧, 答案为 `N - 1`.
    pub fn find_time_step(&self, t: TimePoint) -> Option<TimeStep> {
        if !self.is_valid_time_point(t) {
            return None;
        }
        let pos = self
            .steps
            .iter()
            .position(|g| g.time_bounds().lower() > t)
            .unwrap_or(self.steps.len());
        // t >= 首帧下界, 故 pos >= 1.
        Some(pos - 1)
    }

    /// 时间点 -> 所属时间步, `t` 越界返回 0 哨兵值.
    ///
    /// 与 [`time_step_to_time_point`](Self::time_step_to_time_point)
    /// 同样的哨兵约定; 显式版本见 [`find_time_step`](Self::find_time_step).
    #[inline]
    pub fn time_point_to_time_step(&self, t: TimePoint) -> TimeStep {
        self.find_time_step(t).unwrap_or(0)
    }

    /// 获取时间步 `step` 的帧几何句柄. 越界返回 `None`, 不会 panic.
    #[inline]
    pub fn geometry_for_time_step(&self, step: TimeStep) -> Option<&SharedFrame> {
        self.steps.get(step)
    }

    /// 获取时间点 `t` 所属时间步的帧几何句柄. `t` 越界返回 `None`.
    #[inline]
    pub fn geometry_for_time_point(&self, t: TimePoint) -> Option<&SharedFrame> {
        self.find_time_step(t)
            .and_then(|step| self.geometry_for_time_step(step))
    }

    /// 获取时间步 `step` 帧几何的独立深拷贝. 越界返回 `None`.
    #[inline]
    pub fn geometry_clone_for_time_step(&self, step: TimeStep) -> Option<FrameGeometry> {
        self.steps.get(step).map(|g| (**g).clone())
    }

    /// 清空所有时间步, 全局界限归零.
    pub fn clear_all_geometries(&mut self) {
        self.steps.clear();
        self.refresh_bounds_cache();
    }

    /// 容量提示: 保证序列至少能容纳 `n` 帧而不再分配. 无可观察行为变化.
    #[inline]
    pub fn reserve_space_for_geometries(&mut self, n: usize) {
        self.steps.reserve(n.saturating_sub(self.steps.len()));
    }

    /// 扩容到 `target` 个时间步, 新增位置以默认帧 (塌缩有效期 `[0, 0)`) 填充.
    ///
    /// 已有帧不受影响, 也不做有序性检查; 调用方随后应通过
    /// [`set_time_step_geometry`](Self::set_time_step_geometry) 逐步填入
    /// 真实几何. `target` 不大于当前规模时无任何效果.
    pub fn expand(&mut self, target: usize) {
        if target <= self.steps.len() {
            return;
        }
        while self.steps.len() < target {
            self.steps.push(Arc::new(FrameGeometry::default()));
        }
        self.refresh_bounds_cache();
    }

    /// 替换时间步 `step` 的帧几何, 并剪除由此产生的顺序冲突帧.
    ///
    /// 冲突判定 (均以下界比较):
    /// 位于 `step` 之后但下界严格小于新帧的, 和位于 `step` 之前但下界
    /// 严格大于新帧的, 都会被移除. 扫描从尾部反向进行到下标 1 为止,
    /// 首帧作为锚点从不参与剪除. 因此当冲突波及首帧时,
    /// 剪除后的序列可能仍不满足单调性 (可用
    /// [`is_monotonic`](Self::is_monotonic) 检查).
    ///
    /// # 注意
    ///
    /// 1. `step` 越界时本方法是静默空操作 (防御性保护, 不报错).
    /// 2. 本方法可能缩短序列, 调用方不应假设长度不变.
    pub fn set_time_step_geometry(&mut self, geometry: SharedFrame, step: TimeStep) {
        if step >= self.steps.len() {
            return;
        }
        let new_lower = geometry.time_bounds().lower();
        self.steps[step] = geometry;

        // 反向扫描, 移除尾部元素不影响尚未访问的下标.
        let mut pos = self.steps.len() - 1;
        while pos > 0 {
            let lower = self.steps[pos].time_bounds().lower();
            let conflicted = match pos {
                p if p > step => lower < new_lower,
                p if p < step => lower > new_lower,
                _ => false,
            };
            if conflicted {
                debug!("prune step {pos}: lower {lower} conflicts with new lower {new_lower}");
                self.steps.remove(pos);
            }
            pos -= 1;
        }
        self.refresh_bounds_cache();
    }

    /// 追加一个时间步. 句柄为 `None` 或追加会破坏时间顺序时报错,
    /// 报错时索引保持原状.
    ///
    /// 时间顺序要求新帧下界不小于当前末帧下界 (相等是允许的).
    /// 若需要乱序写入, 请改用
    /// [`set_time_step_geometry`](Self::set_time_step_geometry).
    pub fn append_time_step(&mut self, geometry: Option<SharedFrame>) -> Result<(), AppendError> {
        let geometry = geometry.ok_or(AppendError::MissingGeometry)?;
        let new_lower = geometry.time_bounds().lower();
        if let Some(last) = self.steps.last() {
            let last_lower = last.time_bounds().lower();
            if new_lower < last_lower {
                return Err(AppendError::NonMonotonic(last_lower, new_lower));
            }
        }
        self.steps.push(geometry);
        self.refresh_bounds_cache();
        Ok(())
    }

    /// 深拷贝 `geometry` 后追加. 错误条件同
    /// [`append_time_step`](Self::append_time_step).
    #[inline]
    pub fn append_time_step_clone(
        &mut self,
        geometry: Option<&FrameGeometry>,
    ) -> Result<(), AppendError> {
        self.append_time_step(geometry.map(|g| Arc::new(g.clone())))
    }

    /// 以 `template` 的空间部分为模板, 替换每个时间步的帧几何,
    /// 各步原有的时间有效期保持不变. 时间步个数不变, 空索引上为空操作.
    pub fn replace_time_step_geometries(&mut self, template: &FrameGeometry) {
        for slot in &mut self.steps {
            let bounds = slot.time_bounds();
            *slot = Arc::new(template.retimed(bounds));
        }
        self.refresh_bounds_cache();
    }

    /// 检查序列当前是否满足下界非递减.
    ///
    /// 正常使用下恒为真; 仅当
    /// [`set_time_step_geometry`](Self::set_time_step_geometry)
    /// 的冲突波及首帧锚点时可能为假.
    pub fn is_monotonic(&self) -> bool {
        self.steps
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.time_bounds().lower() <= b.time_bounds().lower())
    }

    /// 重算缓存的全局界限. 每次修改序列后都必须调用.
    fn refresh_bounds_cache(&mut self) {
        match (self.steps.first(), self.steps.last()) {
            (Some(front), Some(back)) => {
                self.minimum = front.time_bounds().lower();
                self.maximum = back.time_bounds().upper();
            }
            _ => {
                self.minimum = SENTINEL_TIME_POINT;
                self.maximum = SENTINEL_TIME_POINT;
            }
        }
        debug_assert!(self.minimum.abs() <= TIME_POINT_LIMIT);
        debug_assert!(self.maximum.abs() <= TIME_POINT_LIMIT);
    }
}

impl Default for TimeGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TimeGeometry {
    /// 深拷贝: 每一帧独立克隆进新的 `Arc`, 副本与原索引不共享任何帧.
    fn clone(&self) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .map(|g| Arc::new((**g).clone()))
                .collect(),
            minimum: self.minimum,
            maximum: self.maximum,
        }
    }
}
