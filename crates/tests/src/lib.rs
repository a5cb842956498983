//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 同步会话端到端测试（录制轨迹 → GestureSession）
//! - 异步会话端到端测试（MockPointerSource → SessionHandle）

#[cfg(test)]
mod contract_tests {
    use contracts::{Direction, GestureSnapshot, Locale, Quadrant, SpinConfig};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = GestureSnapshot {
            revolution_count: 2,
            speed: 0.5,
            direction: Direction::DownLeft,
            quadrant: Some(Quadrant::Q3),
            timestamp_ms: 120.0,
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert_eq!(value["revolution_count"], 2);
        assert_eq!(value["direction"], "down_left");
    }

    #[test]
    fn test_config_round_trip_through_loader() {
        let mut config = SpinConfig::default();
        config.output.locale = Locale::Zh;
        config.smoother.decay_delay_ms = 80;

        let toml = config_loader::ConfigLoader::to_toml(&config).unwrap();
        let back =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(back, config);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{Direction, PointerSample, Position, Quadrant, SpinConfig};
    use ingestion::{MockPointerSource, TraceReader};
    use observability::SessionMetricsAggregator;
    use session::SessionHandle;
    use spin_engine::{GestureSession, SampleOutcome, TransitionKind};
    use tokio::time::sleep;

    const SQUARE: [(f64, f64); 5] = [
        (0.0, 0.0),
        (10.0, 10.0),
        (0.0, 20.0),
        (-10.0, 10.0),
        (0.0, 0.0),
    ];

    fn square_samples() -> Vec<PointerSample> {
        SQUARE
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PointerSample::at_millis(i as u64 * 20, x, y))
            .collect()
    }

    /// End-to-end test: recorded square → GestureSession
    ///
    /// 验证：
    /// 1. 四次移动依次判定为 Q1、Q2、Q3、Q4
    /// 2. 第四次移动后 revolution_count = 1
    /// 3. 速度始终非零，最后一个样本 50ms 后衰减到期，最终归零
    #[test]
    fn test_e2e_square_sync_session() {
        let mut session = GestureSession::new(SpinConfig::default());
        let mut quadrants = Vec::new();

        for sample in square_samples() {
            let SampleOutcome::Accepted {
                observation,
                snapshot,
            } = session.offer(sample)
            else {
                panic!("sample at {:?} dropped", sample.timestamp);
            };
            if let Some(q) = observation.quadrant {
                quadrants.push(q);
                assert!(snapshot.speed > 0.0, "speed is zero at {:?}", sample.timestamp);
            }
        }

        assert_eq!(
            quadrants,
            vec![Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4]
        );
        assert_eq!(session.snapshot().revolution_count, 1);
        assert!(session.tracker().state().visited_quadrants().is_empty());

        // no decay before the delay expires
        session.advance(Duration::from_millis(129));
        assert!(session.snapshot().speed > 0.0);
        assert!(session.smoother().state().decay_timer_active());

        while let Some(deadline) = session.next_deadline() {
            session.advance(deadline);
        }
        assert_eq!(session.snapshot().speed, 0.0);
        assert_eq!(session.snapshot().revolution_count, 1);
    }

    /// 录制轨迹文件 → TraceReader → GestureSession → 指标聚合
    #[test]
    fn test_e2e_trace_file_replay() {
        let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        // one clockwise turn, then a turn that reverses halfway
        let path: Vec<(f64, f64)> = SQUARE
            .iter()
            .chain(&[(-10.0, 10.0), (0.0, 20.0)])
            .chain(&SQUARE[1..])
            .copied()
            .collect();
        for (i, (x, y)) in path.iter().enumerate() {
            writeln!(file, r#"{{"t_ms": {}, "x": {}, "y": {}}}"#, i * 25, x, y).unwrap();
        }

        let samples = TraceReader::new().read_path(file.path()).unwrap();
        assert_eq!(samples.len(), path.len());

        let mut session = GestureSession::new(SpinConfig::default());
        let mut metrics = SessionMetricsAggregator::new();
        let mut kinds = Vec::new();
        for sample in samples {
            let outcome = session.offer(sample);
            metrics.update(&outcome);
            if let SampleOutcome::Accepted { observation, .. } = outcome {
                kinds.push(observation.kind);
            }
        }

        assert!(kinds.contains(&TransitionKind::Aborted));
        assert_eq!(metrics.summary().revolutions, session.stats().revolutions);
        assert_eq!(session.stats().aborted_attempts, metrics.aborted_attempts);
        assert!(session.snapshot().revolution_count >= 1);
    }

    /// Async end-to-end: positions pushed through SessionHandle in real (paused) time
    #[tokio::test(start_paused = true)]
    async fn test_e2e_square_async_session() {
        let handle = SessionHandle::spawn(SpinConfig::default());
        let tx = handle.sender();
        let mut updates = handle.subscribe();

        for (x, y) in SQUARE {
            tx.send(Position::new(x, y)).await.unwrap();
            sleep(Duration::from_millis(20)).await;
        }

        let snapshot = *updates.borrow_and_update();
        assert_eq!(snapshot.revolution_count, 1);
        assert_eq!(snapshot.direction, Direction::Unknown);
        assert!(snapshot.speed > 0.0);

        // idle long enough for the decay to finish
        sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.snapshot().speed, 0.0);

        let last = handle.shutdown().await;
        assert_eq!(last.revolution_count, 1);
        assert_eq!(last.speed, 0.0);
    }

    /// MockPointerSource → SessionHandle: clockwise circles are counted
    #[tokio::test(start_paused = true)]
    async fn test_e2e_mock_source_pipeline() {
        let mut handle = SessionHandle::spawn(SpinConfig::default());
        handle.attach(Arc::new(MockPointerSource::circle(
            "cw",
            80.0,
            Duration::from_millis(500),
            true,
            60.0,
        )));

        let mut updates = handle.subscribe();
        let mut max_speed: f64 = 0.0;
        let deadline = tokio::time::Instant::now() + Duration::from_millis(3_000);
        while tokio::time::Instant::now() < deadline {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    max_speed = max_speed.max(updates.borrow_and_update().speed);
                }
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }

        let report = handle.shutdown_with_report().await;
        // 3 s at 500 ms per turn, allowing for the sample lost after each reset
        assert!(report.snapshot.revolution_count >= 4);
        assert_eq!(report.stats.aborted_attempts, 0);
        // circumference 2π·80 over 500 ms ≈ 1.0 units/ms
        assert!(max_speed > 0.8 && max_speed < 1.2, "max speed {max_speed}");
    }
}
