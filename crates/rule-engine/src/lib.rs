//! 收件箱通知规则引擎
//!
//! 根据本地安装状态决定是否展示服务端下发的通知：
//! - JSON 规则定义和解析
//! - 严格类型的标量比较与插件版本比较
//! - and / or / not 短路求值
//! - 任何格式错误或无法识别的规则都按不通过处理

pub mod comparator;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod models;
pub mod notification;
pub mod operators;
pub mod plugins;
pub mod processors;
pub mod store;
pub mod version;

pub use comparator::Comparator;
pub use error::{Result, RuleError};
pub use evaluator::RuleEvaluator;
pub use models::{
    CompositeRule, DataRule, EvaluationContext, FactValue, NotRule, PluginVersionRule,
    PluginsActivatedRule, PublishAfterTimeRule, PublishBeforeTimeRule, Rule,
};
pub use notification::{NotificationSpec, SpecRule};
pub use operators::ComparisonOperator;
pub use plugins::{PluginRecord, PluginsProvider, StaticPluginsProvider};
pub use processors::{
    DataRuleProcessor, PluginVersionRuleProcessor, PluginsActivatedRuleProcessor,
    PublishTimeRuleProcessor,
};
pub use store::SpecStore;
pub use version::Version;
