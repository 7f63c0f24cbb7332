//! 规则引擎集成测试
//!
//! 测试完整的通知加载、规则解析、求值工作流。

use chrono::{TimeZone, Utc};
use rule_engine::{
    EvaluationContext, NotificationSpec, PluginRecord, Rule, RuleEvaluator, SpecStore,
    StaticPluginsProvider,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

/// 创建测试上下文：一个已有商品的店铺快照
fn create_store_context() -> EvaluationContext {
    EvaluationContext::from_value(json!({
        "there_are_products": true,
        "product_count": 120,
        "revenue": 1234.5,
        "store_country": "US",
        "onboarding_complete": false
    }))
    .unwrap()
    .with_now(Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap())
}

fn create_plugins() -> StaticPluginsProvider {
    StaticPluginsProvider::new(vec![
        PluginRecord::active("jetpack", "1.2.4"),
        PluginRecord::active("woocommerce-payments", "6.1.0"),
        PluginRecord::inactive("mailpoet", "4.0.0"),
        PluginRecord {
            slug: "broken-plugin".to_string(),
            active: true,
            version: None,
        },
    ])
}

fn evaluate(rule: serde_json::Value) -> bool {
    let context = create_store_context();
    let plugins = create_plugins();
    RuleEvaluator::new(&context, &plugins).evaluate_json(&rule)
}

// ==================== 数据规则 ====================

#[test]
fn test_data_rule_against_empty_context() {
    let context = EvaluationContext::new();
    let plugins = create_plugins();
    let evaluator = RuleEvaluator::new(&context, &plugins);

    for operation in ["=", "!=", "<", "<=", ">", ">="] {
        let rule = Rule::data("there_are_products", operation, true);
        assert!(!evaluator.evaluate(&rule), "operation {}", operation);
    }
}

#[test]
fn test_data_rule_strict_types() {
    assert!(evaluate(json!({
        "type": "data", "index": "product_count", "operation": "=", "value": 120
    })));
    assert!(!evaluate(json!({
        "type": "data", "index": "product_count", "operation": "=", "value": 120.0
    })));
    assert!(evaluate(json!({
        "type": "data", "index": "product_count", "operation": "!=", "value": "120"
    })));
    assert!(evaluate(json!({
        "type": "data", "index": "store_country", "operation": "=", "value": "US"
    })));
}

#[test]
fn test_data_rule_unrecognized_operator() {
    assert!(!evaluate(json!({
        "type": "data", "index": "there_are_products", "operation": "@@@", "value": true
    })));
}

#[test]
fn test_data_rule_ordering() {
    assert!(evaluate(json!({
        "type": "data", "index": "revenue", "operation": ">", "value": 1000
    })));
    assert!(!evaluate(json!({
        "type": "data", "index": "product_count", "operation": "<", "value": 100
    })));
    assert!(!evaluate(json!({
        "type": "data", "index": "store_country", "operation": ">", "value": "CA"
    })));
}

// ==================== 插件规则 ====================

#[test]
fn test_plugin_version_rules() {
    let rule = |plugin: &str, operator: &str, version: &str| {
        json!({ "type": "plugin_version", "plugin": plugin, "version": version, "operator": operator })
    };

    assert!(!evaluate(rule("jetpack", "<", "1.2.3")));
    assert!(evaluate(rule("jetpack", ">", "1.2.3")));
    assert!(evaluate(rule("jetpack", "=", "1.2.4")));
    assert!(evaluate(rule("woocommerce-payments", ">=", "6.1")));
    assert!(!evaluate(rule("mailpoet", ">", "1.0")));
    assert!(!evaluate(rule("not-installed", "!=", "1.0")));
    assert!(!evaluate(rule("broken-plugin", "!=", "1.0")));
}

#[test]
fn test_plugins_activated_rule() {
    assert!(evaluate(json!({
        "type": "plugins_activated", "plugins": ["jetpack", "woocommerce-payments"]
    })));
    assert!(!evaluate(json!({
        "type": "plugins_activated", "plugins": ["jetpack", "mailpoet"]
    })));
}

// ==================== 组合规则 ====================

#[test]
fn test_composite_rules() {
    assert!(!evaluate(json!({ "type": "and", "operands": [{ "type": "pass" }, { "type": "fail" }] })));
    assert!(evaluate(json!({ "type": "and", "operands": [] })));
    assert!(evaluate(json!({ "type": "or", "operands": [{ "type": "fail" }, { "type": "pass" }] })));
    assert!(!evaluate(json!({ "type": "or", "operands": [] })));
    assert!(!evaluate(json!({ "type": "not", "operand": { "type": "pass" } })));
}

#[test]
fn test_unknown_rule_never_passes() {
    assert!(!evaluate(json!({ "type": "onboarding_profile", "index": "industry" })));
    assert!(!evaluate(json!({ "type": "not", "operand": { "type": "onboarding_profile" } })));
    assert!(!evaluate(json!({ "type": "not", "operand": {
        "type": "data", "index": "product_count", "operation": "===", "value": 1
    } })));
    assert!(!evaluate(json!(null)));
}

#[test]
fn test_not_never_inverts_unevaluable_rules() {
    let negate = |operand: serde_json::Value| json!({ "type": "not", "operand": operand });

    assert!(!evaluate(negate(json!({
        "type": "data", "index": "product_count", "operation": "<", "value": "abc"
    }))));
    assert!(!evaluate(negate(json!({
        "type": "plugin_version", "plugin": "jetpack", "version": "latest", "operator": "="
    }))));
    assert!(!evaluate(negate(json!({
        "type": "publish_after_time", "publish_after": "next tuesday"
    }))));

    // 条件不成立仍正常取反
    assert!(evaluate(negate(json!({
        "type": "data", "index": "unknown_field", "operation": "=", "value": 1
    }))));
    assert!(evaluate(negate(json!({
        "type": "plugin_version", "plugin": "mailpoet", "version": "1.0", "operator": ">"
    }))));
}

#[test]
fn test_prerelease_version_is_below_next_release() {
    let context = create_store_context();
    let plugins = StaticPluginsProvider::new(vec![PluginRecord::active("jetpack", "2.0.0-beta.1")]);
    let evaluator = RuleEvaluator::new(&context, &plugins);

    assert!(evaluator.evaluate(&Rule::plugin_version("jetpack", "<=", "2.0.0")));
    assert!(!evaluator.evaluate(&Rule::plugin_version("jetpack", ">", "2.0.0")));
}

#[test]
fn test_publish_window() {
    assert!(evaluate(json!({
        "type": "and",
        "operands": [
            { "type": "publish_after_time", "publish_after": "2024-06-01T00:00:00Z" },
            { "type": "publish_before_time", "publish_before": "2024-07-01" }
        ]
    })));
    assert!(!evaluate(json!({
        "type": "publish_after_time", "publish_after": "2024-06-15T09:30:01Z"
    })));
}

// ==================== 完整工作流测试 ====================

#[test]
fn test_full_workflow_with_store() {
    let store = SpecStore::new();

    let specs_json = r#"
    [
        {
            "slug": "add-first-product",
            "rules": [
                { "type": "data", "index": "there_are_products", "operation": "=", "value": false }
            ]
        },
        {
            "slug": "jetpack-upgrade",
            "rules": [
                { "type": "plugins_activated", "plugins": ["jetpack"] },
                { "type": "plugin_version", "plugin": "jetpack", "version": "2.0.0", "operator": "<" }
            ]
        },
        {
            "slug": "busy-store",
            "rules": [
                {
                    "type": "or",
                    "operands": [
                        { "type": "data", "index": "product_count", "operation": ">=", "value": 100 },
                        { "type": "data", "index": "revenue", "operation": ">", "value": 10000 }
                    ]
                },
                { "type": "not", "operand": { "type": "data", "index": "onboarding_complete", "operation": "=", "value": true } }
            ]
        },
        {
            "slug": "malformed",
            "rules": [
                { "type": "pass" },
                { "type": "plugin_version", "plugin": "jetpack" }
            ]
        },
        {
            "slug": "future-campaign",
            "rules": [
                { "type": "publish_after_time", "publish_after": "2030-01-01" }
            ]
        }
    ]
    "#;

    let loaded = store.load_from_json(specs_json).unwrap();
    assert_eq!(loaded.len(), 5);

    let context = create_store_context();
    let plugins = create_plugins();
    let evaluator = RuleEvaluator::new(&context, &plugins);

    assert_eq!(store.matching(&evaluator), vec!["busy-store", "jetpack-upgrade"]);
}

#[test]
fn test_repeated_evaluation_is_stable() {
    let store = SpecStore::new();
    store
        .load(NotificationSpec::new(
            "jetpack",
            vec![Rule::plugin_version("jetpack", ">", "1.2.3")],
        ))
        .unwrap();

    let context = create_store_context();
    let plugins = create_plugins();
    let evaluator = RuleEvaluator::new(&context, &plugins);

    let first = store.matching(&evaluator);
    let second = store.matching(&evaluator);
    assert_eq!(first, vec!["jetpack"]);
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_evaluation() {
    let context = Arc::new(create_store_context());
    let plugins = Arc::new(create_plugins());
    let rules = Arc::new(vec![
        Rule::data("product_count", ">", 100),
        Rule::plugin_version("jetpack", "<", "1.2.3"),
        Rule::or(vec![Rule::Fail, Rule::plugins_activated(["woocommerce-payments"])]),
        Rule::negate(Rule::Unsupported),
    ]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let context = Arc::clone(&context);
            let plugins = Arc::clone(&plugins);
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                let evaluator = RuleEvaluator::new(&context, plugins.as_ref());
                rules.iter().map(|r| evaluator.evaluate(r)).collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![true, false, true, false]);
    }
}
