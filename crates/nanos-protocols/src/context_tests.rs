use super::*;
use crate::error::StartError;
use async_trait::async_trait;
use std::any::Any;

struct Probe {
    label: &'static str,
}

#[async_trait]
impl Service for Probe {
    fn set_context(&mut self, _ctx: Context) {}

    async fn start(&mut self) -> Result<(), StartError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn probe(label: &'static str) -> Arc<dyn Service> {
    Arc::new(Probe { label })
}

#[test]
fn test_context_new_is_empty() {
    let ctx = Context::new();
    assert!(ctx.is_empty());
    assert!(ctx.parent().is_none());
    assert!(ctx.get("anything").is_none());
}

#[test]
fn test_put_get_value() {
    let ctx = Context::new();
    ctx.put_value("http.port", 8080u16).unwrap();
    assert_eq!(ctx.get_value::<u16>("http.port"), Some(8080));
    assert!(ctx.contains("http.port"));
}

#[test]
fn test_get_missing_returns_none() {
    let ctx = Context::new();
    let result: Option<String> = ctx.get_value("missing");
    assert!(result.is_none());
    assert!(!ctx.contains("missing"));
}

#[test]
fn test_put_overwrites_silently() {
    let ctx = Context::new();
    ctx.put_value("key", "first").unwrap();
    ctx.put_value("key", "second").unwrap();
    assert_eq!(ctx.get_value::<String>("key"), Some("second".to_string()));
    assert_eq!(ctx.len(), 1);
}

#[test]
fn test_child_falls_back_to_parent() {
    let root = Context::new();
    root.put_value("shared", "data").unwrap();
    let child = root.child();
    assert_eq!(child.get_value::<String>("shared"), Some("data".to_string()));
    assert!(child.contains("shared"));
    assert!(!child.contains_local("shared"));
}

#[test]
fn test_child_writes_do_not_reach_parent() {
    let root = Context::new();
    let child = root.child();
    child.put_value("local", 1).unwrap();
    assert!(child.contains("local"));
    assert!(!root.contains("local"));
}

#[test]
fn test_child_shadows_parent() {
    let root = Context::new();
    root.put_value("mode", "root").unwrap();
    let child = root.child();
    child.put_value("mode", "child").unwrap();
    assert_eq!(child.get_value::<String>("mode"), Some("child".to_string()));
    assert_eq!(root.get_value::<String>("mode"), Some("root".to_string()));
}

#[test]
fn test_child_sees_later_parent_writes() {
    let root = Context::new();
    let child = root.child();
    root.put_value("late", true).unwrap();
    assert_eq!(child.get_value::<bool>("late"), Some(true));
}

#[test]
fn test_grandchild_lookup() {
    let root = Context::new();
    root.put_value("depth", 0).unwrap();
    let grandchild = root.child().child();
    assert_eq!(grandchild.get_value::<i32>("depth"), Some(0));
}

#[test]
fn test_clone_shares_entries() {
    let ctx = Context::new();
    let handle = ctx.clone();
    handle.put_value("shared", 1).unwrap();
    assert_eq!(ctx.get_value::<i32>("shared"), Some(1));
}

#[test]
fn test_snapshot_is_detached() {
    let ctx = Context::new();
    ctx.put_value("before", 1).unwrap();
    let snap = ctx.snapshot();
    ctx.put_value("after", 2).unwrap();
    snap.put_value("only_snap", 3).unwrap();

    assert_eq!(snap.get_value::<i32>("before"), Some(1));
    assert!(snap.get("after").is_none());
    assert!(ctx.get("only_snap").is_none());
}

#[test]
fn test_snapshot_keeps_parent() {
    let root = Context::new();
    root.put_value("inherited", "yes").unwrap();
    let snap = root.child().snapshot();
    assert_eq!(snap.get_value::<String>("inherited"), Some("yes".to_string()));
}

#[test]
fn test_put_get_service() {
    let ctx = Context::new();
    let service = probe("a");
    ctx.put_service("a", service.clone());

    let found = ctx.get_service("a").unwrap();
    assert!(Arc::ptr_eq(&found, &service));
    assert!(ctx.get("a").unwrap().is_service());
}

#[test]
fn test_get_value_on_service_entry_is_none() {
    let ctx = Context::new();
    ctx.put_service("svc", probe("svc"));
    assert!(ctx.get_value::<String>("svc").is_none());
}

#[test]
fn test_get_service_on_value_entry_is_none() {
    let ctx = Context::new();
    ctx.put_value("cfg", 1).unwrap();
    assert!(ctx.get_service("cfg").is_none());
}

#[test]
fn test_with_service_downcast() {
    let ctx = Context::new();
    ctx.put_service("probe", probe("hello"));

    let label = ctx.with_service::<Probe, _>("probe", |p| p.label);
    assert_eq!(label, Some("hello"));

    let wrong = ctx.with_service::<String, _>("probe", |s| s.len());
    assert!(wrong.is_none());
}

#[test]
fn test_local_and_service_names() {
    let ctx = Context::new();
    ctx.put_value("b.cfg", 1).unwrap();
    ctx.put_service("c", probe("c"));
    ctx.put_service("a", probe("a"));

    assert_eq!(ctx.local_names(), vec!["a", "b.cfg", "c"]);
    assert_eq!(ctx.service_names(), vec!["a", "c"]);
}

#[test]
fn test_entry_debug() {
    let value = ContextEntry::Value(serde_json::json!(1));
    assert_eq!(format!("{:?}", value), "Value(Number(1))");
    let service = ContextEntry::Service(probe("x"));
    assert_eq!(format!("{:?}", service), "Service(..)");
}
