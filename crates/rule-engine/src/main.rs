//! 收件箱通知规则评估工具
//!
//! 读取通知定义、数据快照和插件列表，输出规则全部通过的通知。

use anyhow::{Context, Result};
use inbox_shared::config::{AppConfig, OutputFormat};
use inbox_shared::observability;
use rule_engine::{RuleEvaluator, SpecStore, loader};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = AppConfig::load("inbox-rules").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    observability::init(&config.observability)?;

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "Starting inbox rule evaluation..."
    );

    let rules = &config.rules;

    let store = SpecStore::new();
    let loaded = loader::load_specs(&rules.specs_path, &store).with_context(|| {
        format!("failed to load notification specs from {}", rules.specs_path.display())
    })?;
    if loaded.is_empty() {
        warn!("No notification specs loaded");
    }

    let context = loader::load_context(&rules.data_path).with_context(|| {
        format!("failed to load data snapshot from {}", rules.data_path.display())
    })?;
    let plugins = loader::load_plugins(&rules.plugins_path).with_context(|| {
        format!("failed to load installed plugins from {}", rules.plugins_path.display())
    })?;

    let evaluator = RuleEvaluator::new(&context, &plugins);
    let matched = store.matching(&evaluator);

    match rules.output_format {
        OutputFormat::Text => {
            for slug in &matched {
                println!("{}", slug);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&matched)?),
    }

    info!(
        loaded = loaded.len(),
        matched = matched.len(),
        "Evaluation complete"
    );
    Ok(())
}
