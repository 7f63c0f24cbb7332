//! 输入加载
//!
//! 从磁盘读取通知定义、数据快照和已安装插件列表（均为 JSON）。

use crate::error::{Result, RuleError};
use crate::models::EvaluationContext;
use crate::plugins::StaticPluginsProvider;
use crate::store::SpecStore;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// 将通知定义文件加载进存储，返回成功加载的 slug
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_specs(path: &Path, store: &SpecStore) -> Result<Vec<String>> {
    let json = read_file(path)?;
    store.load_from_json(&json)
}

/// 读取数据快照
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_context(path: &Path) -> Result<EvaluationContext> {
    let context = EvaluationContext::from_json(&read_file(path)?)?;
    info!(fields = context.len(), "数据快照已加载");
    Ok(context)
}

/// 读取已安装插件列表
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_plugins(path: &Path) -> Result<StaticPluginsProvider> {
    let provider = StaticPluginsProvider::from_json(&read_file(path)?)?;
    info!(plugins = provider.len(), "插件列表已加载");
    Ok(provider)
}
