#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 为时间分辨 (4D = 3D + t) 医学影像数据提供离散时间步与连续时间点
//! 之间的索引结构和有序性校验.
//!
//! 一个时间分辨数据集由若干空间帧几何 ([`FrameGeometry`]) 组成, 每帧带有
//! 一个半开时间区间 `[lower, upper)` ([`TimeBounds`]). [`TimeGeometry`]
//! 持有这些帧的有序序列, 负责:
//!
//! 1. 离散时间步索引与连续时间点的双向转换;
//! 2. 追加帧时的单调性校验 (下界非递减);
//! 3. 显式替换某个时间步几何后的有序性自修复 (剪除冲突邻居);
//! 4. 深拷贝语义 (克隆后的索引与原索引不共享任何帧).
//!
//! 该 crate 目前仅提供 `safe` 接口, 且所有操作均为同步原地修改.
//! 结构本身不保证线程安全, 并发访问需要调用方自行加锁.
//!
//! # 注意
//!
//! 1. `time_step_to_time_point` / `time_point_to_time_step` 对越界输入
//!   返回 `0` 哨兵值, 与合法的 `0` 不可区分. 调用方应先通过
//!   `is_valid_time_step` / `is_valid_time_point` 校验.
//!   如需显式区分, 请使用 `find_time_point` / `find_time_step`.
//! 2. 文件解析 (nii 等), 渲染和序列化落盘均不在本 crate 职责之内.
//!
//! # 开发计划
//!
//! ### 时间界限与帧几何数据结构 ✅
//!
//! 实现位于 `src/data`.
//!
//! ### 时间步索引核心 (追加, 替换, 扩容, 深拷贝) ✅
//!
//! 实现位于 `src/timeline`.
//!
//! ### 替换后有序性自修复 ✅
//!
//! 反向索引扫描剪除冲突帧. 注意首帧作为锚点不参与剪除,
//! 行为细节见 `set_time_step_geometry` 文档.
//!
//! ### 完善代码文档 ✅
//!
//! 给每个 public API 提供文档, 并视情况给 private API 提供文档.

/// 连续时间点, 通常以毫秒为单位. 具体量纲由数据源决定, 本 crate 不作解释.
pub type TimePoint = f64;

/// 离散时间步索引. 从 0 开始, 插入顺序即时间顺序.
pub type TimeStep = usize;

/// 三维体素索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 世界坐标系下的三维点, 以毫米为单位.
pub type PointMm = [f64; 3];

pub mod consts;

/// 时间界限与帧几何基础数据结构.
mod data;

pub use data::{FrameGeometry, SharedFrame, TimeBounds};

pub mod timeline;

pub use timeline::{AppendError, TimeGeometry};

pub mod prelude;
