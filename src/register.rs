//! Built-in implementations, spec store and context seeding from config.

use nanos_config::Config;
use nanos_core::{Context, ContextEntry, MemorySpecStore, ServiceFactory};
use nanos_protocols::{FactoryError, Service, ServiceSpec};

use crate::services::{heartbeat, http, HeartbeatService, HttpService};

/// Name of the service booted when the config declares none.
pub(crate) const DEFAULT_SERVICE: &str = "http";

/// Factory populated with every built-in implementation.
pub(crate) fn builtin_factory() -> Result<ServiceFactory, FactoryError> {
    let factory = ServiceFactory::new();

    factory.register(http::IMPLEMENTATION, |spec| {
        HttpService::from_spec(spec).map(|s| Box::new(s) as Box<dyn Service>)
    })?;
    factory.register(heartbeat::IMPLEMENTATION, |spec| {
        HeartbeatService::from_spec(spec).map(|s| Box::new(s) as Box<dyn Service>)
    })?;

    Ok(factory)
}

/// Build the spec store from `[[services]]`, in declaration order.
///
/// Disabled entries are skipped. A config that declares no services at all
/// boots the default HTTP service.
pub(crate) fn spec_store(config: &Config) -> MemorySpecStore {
    let store: MemorySpecStore = config
        .enabled_services()
        .map(|e| {
            ServiceSpec::new(e.name.clone(), e.implementation.clone()).with_config(e.config.clone())
        })
        .collect();

    if config.services.is_empty() {
        store.put(ServiceSpec::new(DEFAULT_SERVICE, http::IMPLEMENTATION));
    }
    store
}

/// Copy `[context]` entries into the root context as configuration values.
pub(crate) fn seed_context(ctx: &Context, config: &Config) {
    for (name, value) in &config.context {
        ctx.put(name.clone(), ContextEntry::Value(value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanos_config::ConfigLoader;
    use nanos_core::SpecificationStore;

    #[test]
    fn test_builtin_factory() {
        let factory = builtin_factory().unwrap();
        assert_eq!(
            factory.implementations(),
            vec![heartbeat::IMPLEMENTATION, http::IMPLEMENTATION]
        );
    }

    #[test]
    fn test_default_store_when_nothing_declared() {
        let store = spec_store(&Config::default());
        let specs = store.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name(), DEFAULT_SERVICE);
        assert_eq!(specs[0].implementation(), http::IMPLEMENTATION);
    }

    #[test]
    fn test_store_follows_config_order_and_skips_disabled() {
        let config = ConfigLoader::load_str(
            r#"
            [[services]]
            name = "beat"
            implementation = "nanos.heartbeat.Heartbeat"
            [services.config]
            interval_secs = 5

            [[services]]
            name = "off"
            implementation = "nanos.http.HttpServer"
            enabled = false

            [[services]]
            name = "web"
            implementation = "nanos.http.HttpServer"
            "#,
        )
        .unwrap();

        let specs = spec_store(&config).specs();
        let names: Vec<_> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["beat", "web"]);
        assert_eq!(specs[0].get_config::<u64>("interval_secs"), Some(5));
    }

    #[test]
    fn test_all_disabled_boots_nothing() {
        let config = ConfigLoader::load_str(
            r#"
            [[services]]
            name = "off"
            implementation = "nanos.http.HttpServer"
            enabled = false
            "#,
        )
        .unwrap();
        assert!(spec_store(&config).is_empty());
    }

    #[test]
    fn test_seed_context() {
        let config = ConfigLoader::load_str(
            r#"
            [context]
            "http.port" = 9000
            "#,
        )
        .unwrap();
        let ctx = Context::new();
        seed_context(&ctx, &config);
        assert_eq!(ctx.get_value::<u16>("http.port"), Some(9000));
    }
}
