//! 规则引擎领域模型

use crate::error::{Result, RuleError};
use crate::operators::ComparisonOperator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// 规则节点
///
/// 以 `type` 字段区分种类。未知种类解析为 `Unsupported`，求值结果恒为 `false`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Data(DataRule),
    PluginVersion(PluginVersionRule),
    PluginsActivated(PluginsActivatedRule),
    PublishAfterTime(PublishAfterTimeRule),
    PublishBeforeTime(PublishBeforeTimeRule),
    Pass,
    Fail,
    And(CompositeRule),
    Or(CompositeRule),
    Not(NotRule),
    #[serde(other)]
    Unsupported,
}

impl Rule {
    /// 从 JSON 字符串解析规则
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从已解析的 JSON 值构造规则
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn data(
        index: impl Into<String>,
        operation: impl Into<ComparisonOperator>,
        value: impl Into<FactValue>,
    ) -> Self {
        Self::Data(DataRule {
            index: index.into(),
            operation: operation.into(),
            value: value.into(),
        })
    }

    pub fn plugin_version(
        plugin: impl Into<String>,
        operator: impl Into<ComparisonOperator>,
        version: impl Into<String>,
    ) -> Self {
        Self::PluginVersion(PluginVersionRule {
            plugin: plugin.into(),
            version: version.into(),
            operator: operator.into(),
        })
    }

    pub fn plugins_activated<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::PluginsActivated(PluginsActivatedRule {
            plugins: plugins.into_iter().map(Into::into).collect(),
        })
    }

    pub fn and(operands: Vec<Rule>) -> Self {
        Self::And(CompositeRule { operands })
    }

    pub fn or(operands: Vec<Rule>) -> Self {
        Self::Or(CompositeRule { operands })
    }

    pub fn negate(operand: Rule) -> Self {
        Self::Not(NotRule {
            operand: Box::new(operand),
        })
    }

    /// 规则种类名称，与 JSON 中的 `type` 一致
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data(_) => "data",
            Self::PluginVersion(_) => "plugin_version",
            Self::PluginsActivated(_) => "plugins_activated",
            Self::PublishAfterTime(_) => "publish_after_time",
            Self::PublishBeforeTime(_) => "publish_before_time",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::Unsupported => "unsupported",
        }
    }

    /// 子树中是否不含未知种类和未知操作符
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::Data(rule) => rule.operation.is_supported(),
            Self::PluginVersion(rule) => rule.operator.is_supported(),
            Self::And(group) | Self::Or(group) => group.operands.iter().all(Rule::is_well_formed),
            Self::Not(rule) => rule.operand.is_well_formed(),
            Self::Unsupported => false,
            Self::PluginsActivated(_)
            | Self::PublishAfterTime(_)
            | Self::PublishBeforeTime(_)
            | Self::Pass
            | Self::Fail => true,
        }
    }
}

/// 数据规则：`context[index] <operation> value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRule {
    pub index: String,
    pub operation: ComparisonOperator,
    pub value: FactValue,
}

/// 插件版本规则：`installed_version(plugin) <operator> version`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginVersionRule {
    pub plugin: String,
    pub version: String,
    pub operator: ComparisonOperator,
}

/// 插件启用规则：列出的插件必须全部处于启用状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginsActivatedRule {
    pub plugins: Vec<String>,
}

/// 发布时间下限：当前时间不早于 `publish_after`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishAfterTimeRule {
    pub publish_after: String,
}

/// 发布时间上限：当前时间早于 `publish_before`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishBeforeTimeRule {
    pub publish_before: String,
}

/// 逻辑组（and / or）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub operands: Vec<Rule>,
}

/// 取反
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotRule {
    pub operand: Box<Rule>,
}

/// 标量事实值
///
/// 类型标签是相等比较的一部分：`Int(123)` 与 `Float(123.0)` 不相等。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FactValue {
    /// 获取值的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// 从任意 JSON 值转换，非标量返回 None
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// 评估上下文 - 本地状态快照
///
/// 构造后只读；`now` 为发布时间类规则使用的评估时钟。
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    data: HashMap<String, FactValue>,
    now: DateTime<Utc>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    pub fn from_map(data: HashMap<String, FactValue>) -> Self {
        Self {
            data,
            now: Utc::now(),
        }
    }

    /// 添加字段（构造阶段使用）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// 固定评估时钟
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// 从 JSON 对象字符串创建
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// 从 JSON 对象创建，非标量字段被跳过
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(RuleError::ParseError("数据快照必须是 JSON 对象".to_string()));
        };

        let mut data = HashMap::with_capacity(map.len());
        for (key, raw) in map {
            match FactValue::from_json(&raw) {
                Some(fact) => {
                    data.insert(key, fact);
                }
                None => warn!(field = %key, "跳过非标量字段"),
            }
        }

        Ok(Self::from_map(data))
    }

    /// 获取字段值
    pub fn get(&self, index: &str) -> Option<&FactValue> {
        self.data.get(index)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
