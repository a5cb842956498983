//! 录制轨迹读取
//!
//! 支持三种格式，每条记录包含 `t_ms`、`x`、`y`：
//! - `.json`  对象数组
//! - `.jsonl` 每行一个对象
//! - `.csv`   表头为 `t_ms,x,y`
//!
//! 时间戳必须单调不减。

use std::path::Path;
use std::time::Duration;

use contracts::{PointerSample, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;

/// 轨迹文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Json,
    Jsonl,
    Csv,
}

impl TraceFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// 单条轨迹记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 相对会话开始的毫秒数
    pub t_ms: f64,
    pub x: f64,
    pub y: f64,
}

impl TraceRecord {
    fn check(&self, line: usize) -> Result<()> {
        if !self.t_ms.is_finite() || self.t_ms < 0.0 {
            return Err(IngestionError::trace_parse(
                line,
                format!("t_ms must be a finite non-negative number, got {}", self.t_ms),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(IngestionError::trace_parse(line, "coordinates must be finite"));
        }
        Ok(())
    }

    /// 转换为带会话时钟的采样
    pub fn to_sample(&self) -> PointerSample {
        PointerSample::new(
            Position::new(self.x, self.y),
            Duration::from_nanos((self.t_ms * 1_000_000.0).round() as u64),
        )
    }
}

/// 轨迹读取器
#[derive(Debug, Default)]
pub struct TraceReader {
    metrics: Option<std::sync::Arc<IngestionMetrics>>,
}

impl TraceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析失败时计入 `metrics`
    pub fn with_metrics(metrics: std::sync::Arc<IngestionMetrics>) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    /// 从文件读取，按扩展名选择格式
    pub fn read_path(&self, path: &Path) -> Result<Vec<PointerSample>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = TraceFormat::from_extension(ext).ok_or_else(|| IngestionError::TraceFormat {
            extension: ext.to_string(),
        })?;

        let content = std::fs::read_to_string(path)?;
        let samples = self.read_str(&content, format)?;
        debug!(path = %path.display(), samples = samples.len(), "trace loaded");
        Ok(samples)
    }

    /// 从字符串读取
    pub fn read_str(&self, content: &str, format: TraceFormat) -> Result<Vec<PointerSample>> {
        let result = match format {
            TraceFormat::Json => parse_json(content),
            TraceFormat::Jsonl => parse_jsonl(content),
            TraceFormat::Csv => parse_csv(content),
        }
        .and_then(|records| into_samples(&records));

        if result.is_err() {
            if let Some(metrics) = &self.metrics {
                metrics.record_parse_error();
            }
        }
        result
    }
}

fn parse_json(content: &str) -> Result<Vec<(usize, TraceRecord)>> {
    let records: Vec<TraceRecord> = serde_json::from_str(content)
        .map_err(|e| IngestionError::trace_parse(e.line(), e.to_string()))?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| (i + 1, r))
        .collect())
}

fn parse_jsonl(content: &str) -> Result<Vec<(usize, TraceRecord)>> {
    let mut records = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(raw)
            .map_err(|e| IngestionError::trace_parse(line, e.to_string()))?;
        records.push((line, record));
    }
    Ok(records)
}

fn parse_csv(content: &str) -> Result<Vec<(usize, TraceRecord)>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, raw)| !raw.is_empty() && !raw.starts_with('#'));

    let Some((header_line, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<&str> = split_fields(header).collect();
    if columns != ["t_ms", "x", "y"] {
        return Err(IngestionError::trace_parse(
            header_line,
            format!("expected header 't_ms,x,y', got '{header}'"),
        ));
    }

    lines
        .map(|(line, raw)| {
            let fields: Vec<&str> = split_fields(raw).collect();
            let [t_ms, x, y] = fields[..] else {
                return Err(IngestionError::trace_parse(
                    line,
                    format!("expected 3 fields, got {}", fields.len()),
                ));
            };
            let parse = |name: &str, value: &str| {
                value.parse::<f64>().map_err(|e| {
                    IngestionError::trace_parse(line, format!("invalid {name} '{value}': {e}"))
                })
            };
            Ok((
                line,
                TraceRecord {
                    t_ms: parse("t_ms", t_ms)?,
                    x: parse("x", x)?,
                    y: parse("y", y)?,
                },
            ))
        })
        .collect()
}

/// Trace columns are plain numbers; spreadsheet exports may quote them.
fn split_fields(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(|field| {
        let field = field.trim();
        field
            .strip_prefix('"')
            .and_then(|f| f.strip_suffix('"'))
            .map_or(field, str::trim)
    })
}

fn into_samples(records: &[(usize, TraceRecord)]) -> Result<Vec<PointerSample>> {
    let mut last_t = f64::NEG_INFINITY;
    records
        .iter()
        .map(|(line, record)| {
            record.check(*line)?;
            if record.t_ms < last_t {
                return Err(IngestionError::trace_parse(
                    *line,
                    format!("timestamp {} ms goes back in time (previous {} ms)", record.t_ms, last_t),
                ));
            }
            last_t = record.t_ms;
            Ok(record.to_sample())
        })
        .collect()
}
