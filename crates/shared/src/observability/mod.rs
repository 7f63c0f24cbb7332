//! 统一可观测性模块
//!
//! 所有入口通过单一函数初始化日志，确保一致的过滤规则与输出格式。

pub mod tracing;

use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use inbox_shared::config::AppConfig;
/// use inbox_shared::observability;
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("inbox-rules")?;
///     observability::init(&config.observability)?;
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;
    ::tracing::info!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );
    Ok(())
}
