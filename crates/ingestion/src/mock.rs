//! Mock 指针源
//!
//! 用于无真实输入设备的测试与演示，沿预设路径按固定频率产生位置。

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{PointerCallback, PointerSource, Position};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;

/// 模拟路径
///
/// 坐标为页面坐标（y 轴向下），因此 `clockwise` 指屏幕上看到的顺时针。
#[derive(Debug, Clone, PartialEq)]
pub enum MockPath {
    /// 匀速圆周运动
    Circle {
        center: Position,
        radius: f64,
        clockwise: bool,
        /// 转一圈的时间
        period: Duration,
    },
    /// 每帧固定位移的直线运动
    Line { from: Position, step: (f64, f64) },
}

impl MockPath {
    /// 第 `frame` 帧（发生在 `elapsed` 时刻）的位置
    pub fn position_at(&self, frame: u64, elapsed: Duration) -> Position {
        match *self {
            MockPath::Circle {
                center,
                radius,
                clockwise,
                period,
            } => {
                let turns = if period.is_zero() {
                    0.0
                } else {
                    elapsed.as_secs_f64() / period.as_secs_f64()
                };
                let sign = if clockwise { 1.0 } else { -1.0 };
                let angle = sign * TAU * turns;
                Position::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            }
            MockPath::Line { from, step } => {
                let n = frame as f64;
                Position::new(from.x + step.0 * n, from.y + step.1 * n)
            }
        }
    }
}

/// Mock 指针源配置
#[derive(Debug, Clone)]
pub struct MockPointerConfig {
    /// 数据源 ID
    pub source_id: String,

    /// 运动路径
    pub path: MockPath,

    /// 发送频率 (Hz)
    pub rate_hz: f64,
}

impl Default for MockPointerConfig {
    fn default() -> Self {
        Self {
            source_id: "mock_pointer".to_string(),
            path: MockPath::Circle {
                center: Position::new(0.0, 0.0),
                radius: 100.0,
                clockwise: true,
                period: Duration::from_secs(1),
            },
            rate_hz: 60.0,
        }
    }
}

/// 位置的去向
enum Sink {
    Callback(PointerCallback),
    Channel(mpsc::Sender<Position>),
}

/// Mock 指针源
///
/// 在 tokio 任务中生成位置，既可以通过回调投递（[`PointerSource`]），
/// 也可以通过 [`start`](Self::start) 返回的通道接收。
pub struct MockPointerSource {
    config: MockPointerConfig,
    listening: Arc<AtomicBool>,
    metrics: Arc<IngestionMetrics>,
}

impl MockPointerSource {
    /// 创建新的 Mock 指针源
    pub fn new(config: MockPointerConfig) -> Self {
        Self {
            config,
            listening: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// 创建以原点为圆心的圆周运动源
    pub fn circle(
        source_id: &str,
        radius: f64,
        period: Duration,
        clockwise: bool,
        rate_hz: f64,
    ) -> Self {
        Self::new(MockPointerConfig {
            source_id: source_id.to_string(),
            path: MockPath::Circle {
                center: Position::new(0.0, 0.0),
                radius,
                clockwise,
                period,
            },
            rate_hz,
        })
    }

    /// 创建直线运动源
    pub fn line(source_id: &str, from: Position, step: (f64, f64), rate_hz: f64) -> Self {
        Self::new(MockPointerConfig {
            source_id: source_id.to_string(),
            path: MockPath::Line { from, step },
            rate_hz,
        })
    }

    pub fn config(&self) -> &MockPointerConfig {
        &self.config
    }

    /// 共享的计数器
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// 启动 Mock 源，返回位置流接收端
    ///
    /// # Errors
    /// 已在运行时返回 [`IngestionError::AlreadyListening`]。
    pub fn start(&self, channel_capacity: usize) -> Result<mpsc::Receiver<Position>> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(IngestionError::AlreadyListening {
                source_id: self.config.source_id.clone(),
            });
        }

        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        self.spawn_emitter(Sink::Channel(tx));
        Ok(rx)
    }

    fn frame_interval(&self) -> Duration {
        let rate_hz = if self.config.rate_hz.is_finite() {
            self.config.rate_hz.clamp(1.0, 1000.0)
        } else {
            60.0
        };
        Duration::from_secs_f64(1.0 / rate_hz)
    }

    fn spawn_emitter(&self, sink: Sink) {
        let source_id = self.config.source_id.clone();
        let path = self.config.path.clone();
        let listening = self.listening.clone();
        let metrics = self.metrics.clone();
        let interval = self.frame_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut frame: u64 = 0;

            debug!(
                source_id = %source_id,
                interval_ms = interval.as_secs_f64() * 1000.0,
                "mock pointer source started"
            );

            loop {
                ticker.tick().await;
                if !listening.load(Ordering::Relaxed) {
                    break;
                }

                let position = path.position_at(frame, interval.mul_f64(frame as f64));
                metrics.record_emitted();

                match &sink {
                    Sink::Callback(callback) => callback(position),
                    Sink::Channel(tx) => {
                        if tx.send(position).await.is_err() {
                            debug!(source_id = %source_id, "mock pointer channel closed");
                            listening.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                }

                trace!(source_id = %source_id, frame, x = position.x, y = position.y, "mock position sent");
                frame += 1;
            }

            debug!(source_id = %source_id, frames = frame, "mock pointer source stopped");
        });
    }
}

impl PointerSource for MockPointerSource {
    fn source_id(&self) -> &str {
        &self.config.source_id
    }

    fn listen(&self, callback: PointerCallback) {
        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }
        self.spawn_emitter(Sink::Callback(callback));
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
