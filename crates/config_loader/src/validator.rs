//! 配置校验模块
//!
//! 校验规则：
//! - sampler.interval_ms > 0
//! - 0 < smoother.damping <= 1
//! - smoother.threshold > 0
//! - smoother.tick_ms > 0
//! - smoother.decay_delay_ms > 0
//!
//! 采样间隔与衰减延迟相互独立，不校验二者关系。

use contracts::{ContractError, SpinConfig};

/// 校验 SpinConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &SpinConfig) -> Result<(), ContractError> {
    validate_sampler(config)?;
    validate_smoother(config)?;
    Ok(())
}

/// 校验采样限速
fn validate_sampler(config: &SpinConfig) -> Result<(), ContractError> {
    if config.sampler.interval_ms == 0 {
        return Err(ContractError::config_validation(
            "sampler.interval_ms",
            "interval_ms must be > 0",
        ));
    }
    Ok(())
}

/// 校验速度平滑参数
fn validate_smoother(config: &SpinConfig) -> Result<(), ContractError> {
    let smoother = &config.smoother;

    if !(smoother.damping.is_finite() && smoother.damping > 0.0 && smoother.damping <= 1.0) {
        return Err(ContractError::config_validation(
            "smoother.damping",
            format!("damping must be in (0, 1], got {}", smoother.damping),
        ));
    }

    if !(smoother.threshold.is_finite() && smoother.threshold > 0.0) {
        return Err(ContractError::config_validation(
            "smoother.threshold",
            format!("threshold must be > 0, got {}", smoother.threshold),
        ));
    }

    if smoother.tick_ms == 0 {
        return Err(ContractError::config_validation(
            "smoother.tick_ms",
            "tick_ms must be > 0",
        ));
    }

    if smoother.decay_delay_ms == 0 {
        return Err(ContractError::config_validation(
            "smoother.decay_delay_ms",
            "decay_delay_ms must be > 0",
        ));
    }

    Ok(())
}
