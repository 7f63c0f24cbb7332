//! 通知存储管理
//!
//! 使用 DashMap 提供线程安全的通知缓存，支持通知的加载、删除和批量匹配。

use crate::error::{Result, RuleError};
use crate::evaluator::RuleEvaluator;
use crate::notification::NotificationSpec;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 通知存储
#[derive(Clone, Default)]
pub struct SpecStore {
    specs: Arc<DashMap<String, NotificationSpec>>,
}

impl SpecStore {
    /// 创建新的通知存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取当前存储的通知数量
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// 加载通知，同名通知会被替换
    #[instrument(skip(self, spec), fields(slug = %spec.slug))]
    pub fn load(&self, spec: NotificationSpec) -> Result<()> {
        if spec.slug.trim().is_empty() {
            return Err(RuleError::ParseError("通知 slug 不能为空".to_string()));
        }

        if spec.has_malformed_rules() {
            warn!("通知包含格式错误的规则，将始终不展示");
        }

        let slug = spec.slug.clone();
        if self.specs.insert(slug.clone(), spec).is_some() {
            info!("通知已替换: {}", slug);
        } else {
            info!("通知已加载: {}", slug);
        }
        Ok(())
    }

    /// 从 JSON 加载，支持单个对象或数组
    ///
    /// 数组中单条通知格式错误不影响其余通知，返回成功加载的 slug。
    #[instrument(skip(self, json))]
    pub fn load_from_json(&self, json: &str) -> Result<Vec<String>> {
        let value: Value = serde_json::from_str(json)?;

        let entries = match value {
            Value::Array(items) => items,
            single @ Value::Object(_) => vec![single],
            _ => {
                return Err(RuleError::ParseError(
                    "通知定义必须是对象或数组".to_string(),
                ));
            }
        };

        let mut loaded = Vec::with_capacity(entries.len());
        let mut failed = 0usize;

        for (i, entry) in entries.into_iter().enumerate() {
            let result = serde_json::from_value::<NotificationSpec>(entry)
                .map_err(RuleError::from)
                .and_then(|spec| {
                    let slug = spec.slug.clone();
                    self.load(spec).map(|()| slug)
                });

            match result {
                Ok(slug) => loaded.push(slug),
                Err(e) => {
                    failed += 1;
                    warn!(index = i, error = %e, "通知加载失败");
                }
            }
        }

        info!("批量加载完成: {} 成功, {} 失败", loaded.len(), failed);
        Ok(loaded)
    }

    /// 删除通知
    #[instrument(skip(self))]
    pub fn remove(&self, slug: &str) -> Result<()> {
        if self.specs.remove(slug).is_some() {
            info!("通知已删除: {}", slug);
            Ok(())
        } else {
            warn!("删除不存在的通知: {}", slug);
            Err(RuleError::SpecNotFound(slug.to_string()))
        }
    }

    /// 获取通知
    pub fn get(&self, slug: &str) -> Option<NotificationSpec> {
        self.specs.get(slug).map(|s| s.clone())
    }

    /// 检查通知是否存在
    pub fn contains(&self, slug: &str) -> bool {
        self.specs.contains_key(slug)
    }

    /// 获取所有通知 slug（已排序）
    pub fn list_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.specs.iter().map(|s| s.key().clone()).collect();
        slugs.sort();
        slugs
    }

    /// 清空所有通知
    #[instrument(skip(self))]
    pub fn clear(&self) {
        let count = self.specs.len();
        self.specs.clear();
        info!("已清空 {} 条通知", count);
    }

    /// 返回规则全部通过的通知 slug（已排序）
    #[instrument(skip(self, evaluator))]
    pub fn matching(&self, evaluator: &RuleEvaluator<'_>) -> Vec<String> {
        let mut matched: Vec<String> = self
            .specs
            .iter()
            .filter(|entry| entry.value().is_satisfied(evaluator))
            .map(|entry| entry.key().clone())
            .collect();
        matched.sort();

        info!(total = self.specs.len(), matched = matched.len(), "通知匹配完成");
        matched
    }
}
