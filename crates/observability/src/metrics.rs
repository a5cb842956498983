//! 会话指标收集模块
//!
//! 基于 `SampleOutcome` 和 `GestureSnapshot` 收集和统计手势会话的运行指标。

use contracts::{GestureSnapshot, Quadrant};
use metrics::gauge;
use spin_engine::{SampleOutcome, SessionStats, TransitionKind};

/// 从快照记录指标
///
/// 计时器驱动的速度变化不经过 `offer`，宿主程序每收到一个快照时调用此函数。
pub fn record_snapshot(snapshot: &GestureSnapshot) {
    gauge!("spin_current_speed").set(snapshot.speed);
    gauge!("spin_revolution_count").set(snapshot.revolution_count as f64);
}

/// 会话指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SessionMetricsAggregator {
    /// 通过采样门的样本数
    pub samples_accepted: u64,

    /// 被采样门丢弃的样本数
    pub samples_dropped: u64,

    /// 完成的圈数
    pub revolutions: u64,

    /// 因非顺时针移动而放弃的尝试
    pub aborted_attempts: u64,

    /// 无法判定象限的移动
    pub indeterminate_transitions: u64,

    /// 速度统计
    pub speed_stats: RunningStats,

    /// 各象限被判定次数（按 Q1..Q4）
    pub quadrant_counts: [u64; 4],
}

impl SessionMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 按单个采样结果更新
    pub fn update(&mut self, outcome: &SampleOutcome) {
        let SampleOutcome::Accepted {
            observation,
            snapshot,
        } = outcome
        else {
            self.samples_dropped += 1;
            return;
        };

        self.samples_accepted += 1;
        if let Some(quadrant) = observation.quadrant {
            self.quadrant_counts[quadrant.index()] += 1;
        }

        match observation.kind {
            TransitionKind::Completed => self.revolutions += u64::from(observation.revolution_delta),
            TransitionKind::Aborted => self.aborted_attempts += 1,
            TransitionKind::Indeterminate => self.indeterminate_transitions += 1,
            TransitionKind::Anchored | TransitionKind::Advanced => {}
        }

        self.speed_stats.push(snapshot.speed);
    }

    /// 记录一次速度观测（计时器更新）
    pub fn observe_speed(&mut self, speed: f64) {
        self.speed_stats.push(speed);
    }

    /// 以会话自身的计数为准覆盖计数器
    ///
    /// 异步会话只发布快照，最终计数在关闭时才拿到。
    pub fn absorb_session_stats(&mut self, stats: &SessionStats) {
        self.samples_accepted = stats.samples_accepted;
        self.samples_dropped = stats.samples_dropped;
        self.revolutions = stats.revolutions;
        self.aborted_attempts = stats.aborted_attempts;
        self.indeterminate_transitions = stats.indeterminate_transitions;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let offered = self.samples_accepted + self.samples_dropped;
        MetricsSummary {
            samples_accepted: self.samples_accepted,
            samples_dropped: self.samples_dropped,
            drop_rate: if offered > 0 {
                self.samples_dropped as f64 / offered as f64 * 100.0
            } else {
                0.0
            },
            revolutions: self.revolutions,
            aborted_attempts: self.aborted_attempts,
            indeterminate_transitions: self.indeterminate_transitions,
            speed: StatsSummary::from(&self.speed_stats),
            quadrant_counts: self.quadrant_counts,
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub samples_accepted: u64,
    pub samples_dropped: u64,
    pub drop_rate: f64,
    pub revolutions: u64,
    pub aborted_attempts: u64,
    pub indeterminate_transitions: u64,
    pub speed: StatsSummary,
    pub quadrant_counts: [u64; 4],
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Spin Session Summary ===")?;
        writeln!(f, "Revolutions: {}", self.revolutions)?;
        writeln!(f, "Samples accepted: {}", self.samples_accepted)?;
        writeln!(
            f,
            "Samples dropped: {} ({:.2}%)",
            self.samples_dropped, self.drop_rate
        )?;
        writeln!(f, "Aborted attempts: {}", self.aborted_attempts)?;
        writeln!(
            f,
            "Indeterminate transitions: {}",
            self.indeterminate_transitions
        )?;
        writeln!(f, "Speed (units/ms): {}", self.speed)?;

        if self.quadrant_counts.iter().any(|&n| n > 0) {
            writeln!(f, "Quadrant hits:")?;
            for quadrant in Quadrant::ALL {
                writeln!(f, "  {}: {}", quadrant, self.quadrant_counts[quadrant.index()])?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
