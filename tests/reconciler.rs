//! Reconciler tests across several passes with a real annotation store.

use std::collections::HashMap;

use ingress_reconciler::annotations::{builtin_defaults, AnnotationStore};
use ingress_reconciler::haproxy::{Configuration, Directive, Section};
use ingress_reconciler::reconcile::{Action, Reconciler};

fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_first_pass_applies_defaults() {
    let store = AnnotationStore::with_defaults(builtin_defaults());
    let mut reconciler = Reconciler::new(Configuration::baseline(), store);

    let outcome = reconciler.sync();
    assert!(outcome.committed);
    assert_eq!(outcome.action(), Action::Reload);

    let config = reconciler.configuration();
    assert_eq!(
        config.get(Section::Defaults, "timeout tunnel"),
        Some(&Directive::Timeout("1h".into()))
    );
    assert_eq!(config.get_all(Section::Global, "log").len(), 1);
    assert_eq!(config.get(Section::Global, "daemon"), Some(&Directive::Enabled));

    let settled = reconciler.sync();
    assert_eq!(settled.action(), Action::NoOp);
    assert!(!settled.committed);
}

#[test]
fn test_switching_to_stdout_and_back() {
    let store = AnnotationStore::with_defaults(builtin_defaults());
    let mut reconciler = Reconciler::new(Configuration::baseline(), store);
    reconciler.sync();

    reconciler
        .store_mut()
        .update(data(&[("syslog-server", "address:stdout, format:raw, facility:daemon")]));
    let outcome = reconciler.sync();
    assert_eq!(outcome.action(), Action::Restart);
    assert!(reconciler.configuration().get(Section::Global, "daemon").is_none());

    // Dropping the override falls back to the network default.
    reconciler.store_mut().update(HashMap::new());
    let outcome = reconciler.sync();
    assert_eq!(outcome.action(), Action::Restart);
    assert!(reconciler.configuration().get(Section::Global, "daemon").is_some());
}

#[test]
fn test_removed_annotation_deletes_directive() {
    let mut reconciler = Reconciler::new(Configuration::baseline(), AnnotationStore::new());
    reconciler.store_mut().update(data(&[("maxconn", "800"), ("nbthread", "1")]));
    reconciler.sync();
    assert_eq!(
        reconciler.configuration().get(Section::Global, "nbthread"),
        Some(&Directive::Int(1))
    );

    reconciler.store_mut().update(data(&[("nbthread", "1")]));
    let outcome = reconciler.sync();
    assert_eq!(outcome.action(), Action::Reload);
    assert!(reconciler
        .configuration()
        .get(Section::Defaults, "maxconn")
        .is_none());
}

#[test]
fn test_write_config_renders_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("haproxy").join("haproxy.cfg");

    let mut reconciler = Reconciler::new(Configuration::baseline(), AnnotationStore::new());
    reconciler.store_mut().update(data(&[("maxconn", "800")]));
    reconciler.sync();
    reconciler.write_config(&path).unwrap();

    let rendered = std::fs::read_to_string(&path).unwrap();
    assert!(rendered.contains("global\n  daemon\n"));
    assert!(rendered.contains("  maxconn 800\n"));
}

#[test]
fn test_proxy_protocol_rule_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("haproxy.cfg");

    let mut reconciler = Reconciler::new(Configuration::baseline(), AnnotationStore::new());
    reconciler.store_mut().update(data(&[("proxy-protocol", "10.0.0.0/8, 192.168.1.5")]));
    let outcome = reconciler.sync();
    assert!(!outcome.committed);
    assert!(outcome.requires_write());
    assert_eq!(outcome.action(), Action::Reload);
    reconciler.write_config(&path).unwrap();

    let rendered = std::fs::read_to_string(&path).unwrap();
    assert!(rendered.contains(
        "frontend https\n  tcp-request connection expect-proxy layer4 if { src 10.0.0.0/8 192.168.1.5 }\n"
    ));

    // Unchanged value: nothing to write, the rule stays rendered.
    let settled = reconciler.sync();
    assert!(!settled.requires_write());
    assert!(reconciler.render().contains("expect-proxy layer4"));

    // Removal drops the rule from the output.
    reconciler.store_mut().update(HashMap::new());
    let removed = reconciler.sync();
    assert!(removed.requires_write());
    assert!(!reconciler.render().contains("tcp-request"));
}

#[test]
fn test_rejected_proxy_protocol_keeps_previous_rule() {
    let mut reconciler = Reconciler::new(Configuration::baseline(), AnnotationStore::new());
    let expected = "tcp-request connection expect-proxy layer4 if { src 10.0.0.0/8 }";

    reconciler.store_mut().update(data(&[("proxy-protocol", "10.0.0.0/8")]));
    let valid = reconciler.sync();
    assert!(valid.report.is_clean());
    assert_eq!(valid.frontend_rules.tcp_rules().len(), 1);

    reconciler
        .store_mut()
        .update(data(&[("proxy-protocol", "10.0.0.0/8, bogus")]));
    let rejected = reconciler.sync();
    assert_eq!(rejected.report.failed_annotations(), vec!["proxy-protocol"]);
    assert!(!rejected.requires_write());
    let rules: Vec<String> = rejected
        .frontend_rules
        .tcp_rules()
        .iter()
        .map(|r| r.to_string())
        .collect();
    assert_eq!(rules, vec![expected.to_string()]);

    // Still rejected on the next pass, and the rule is still the valid one.
    let repeated = reconciler.sync();
    assert_eq!(repeated.report.errors.len(), 1);
    assert_eq!(repeated.frontend_rules.tcp_rules().len(), 1);
    assert!(reconciler.render().contains(expected));

    // Going back to the applied value settles without a change.
    reconciler.store_mut().update(data(&[("proxy-protocol", "10.0.0.0/8")]));
    let restored = reconciler.sync();
    assert!(restored.report.is_clean());
    assert_eq!(restored.action(), Action::NoOp);
}
