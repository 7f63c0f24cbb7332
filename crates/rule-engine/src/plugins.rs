//! 已安装插件信息
//!
//! 插件枚举由宿主环境负责，规则引擎只通过 [`PluginsProvider`] 读取。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 插件信息提供者
///
/// 实现方可能涉及 I/O，任何取不到的答案都应返回 `false` / `None`，不得阻塞求值。
#[cfg_attr(test, mockall::automock)]
pub trait PluginsProvider: Send + Sync {
    /// 插件是否已安装且处于启用状态
    fn is_active(&self, slug: &str) -> bool;

    /// 已启用插件的版本号
    fn get_version(&self, slug: &str) -> Option<String>;
}

/// 已安装插件记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    pub slug: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub version: Option<String>,
}

impl PluginRecord {
    pub fn active(slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            active: true,
            version: Some(version.into()),
        }
    }

    pub fn inactive(slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            active: false,
            version: Some(version.into()),
        }
    }
}

/// 基于内存记录的插件信息提供者
#[derive(Debug, Clone, Default)]
pub struct StaticPluginsProvider {
    plugins: HashMap<String, PluginRecord>,
}

impl StaticPluginsProvider {
    pub fn new(records: impl IntoIterator<Item = PluginRecord>) -> Self {
        Self {
            plugins: records
                .into_iter()
                .map(|record| (record.slug.clone(), record))
                .collect(),
        }
    }

    /// 从 JSON 数组创建
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PluginRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn get(&self, slug: &str) -> Option<&PluginRecord> {
        self.plugins.get(slug)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginsProvider for StaticPluginsProvider {
    fn is_active(&self, slug: &str) -> bool {
        self.plugins.get(slug).is_some_and(|record| record.active)
    }

    fn get_version(&self, slug: &str) -> Option<String> {
        self.plugins
            .get(slug)
            .filter(|record| record.active)
            .and_then(|record| record.version.clone())
    }
}
