//! Process-wide logger registry
//!
//! Maps full hierarchical paths to loggers, materializes missing path
//! segments on demand, and offers glob-style bulk enable/disable. A
//! [`LoggerRegistry`] is an ordinary value so tests can run against a
//! private instance; [`registry()`] exposes the shared process-wide one,
//! and [`LoggerRegistry::reset`] is the re-initialization hook for hosts
//! that reload their world (and for test isolation).

use super::logger::{Logger, DEFAULT_BUFFER_CAPACITY};
use super::log_level::LevelFilter;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the implicit root logger every registry path hangs off.
pub const ROOT_LOGGER_NAME: &str = "Root";

/// Callback invoked when a logger is registered or unregistered.
pub type RegistryCallback = Arc<dyn Fn(&Arc<Logger>) + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    loggers: HashMap<String, Arc<Logger>>,
    root: Option<Arc<Logger>>,
}

#[derive(Default)]
pub struct LoggerRegistry {
    inner: RwLock<RegistryInner>,
    registered_subscribers: Mutex<Vec<RegistryCallback>>,
    unregistered_subscribers: Mutex<Vec<RegistryCallback>>,
}

static GLOBAL: Lazy<LoggerRegistry> = Lazy::new(LoggerRegistry::new);

/// The shared process-wide registry.
pub fn registry() -> &'static LoggerRegistry {
    &GLOBAL
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The singleton root logger, created and self-registered on first
    /// access.
    pub fn root(&self) -> Arc<Logger> {
        if let Some(root) = self.inner.read().root.clone() {
            return root;
        }
        let created = {
            let mut inner = self.inner.write();
            // Double-checked: another caller may have built it between the
            // read and write locks.
            if let Some(root) = inner.root.clone() {
                return root;
            }
            let root = Logger::new(ROOT_LOGGER_NAME, DEFAULT_BUFFER_CAPACITY);
            inner.loggers.insert(ROOT_LOGGER_NAME.to_string(), root.clone());
            inner.root = Some(root.clone());
            root
        };
        self.notify_registered(&created);
        created
    }

    /// Insert a logger keyed by its full path. Re-registering an existing
    /// path is a no-op, never an overwrite; the registered event fires
    /// once per actual insertion.
    pub fn register(&self, logger: &Arc<Logger>) {
        let inserted = {
            let mut inner = self.inner.write();
            if inner.loggers.contains_key(logger.full_path()) {
                false
            } else {
                inner
                    .loggers
                    .insert(logger.full_path().to_string(), logger.clone());
                true
            }
        };
        if inserted {
            self.notify_registered(logger);
        }
    }

    /// Remove a logger by its full path; fires the unregistered event only
    /// when the path was present.
    pub fn unregister(&self, logger: &Arc<Logger>) {
        let removed = self.inner.write().loggers.remove(logger.full_path());
        if let Some(removed) = removed {
            self.notify_unregistered(&removed);
        }
    }

    /// Exact lookup, retrying once with the root prefix when the path does
    /// not already start with it. Never materializes loggers.
    pub fn get(&self, path: &str) -> Option<Arc<Logger>> {
        let inner = self.inner.read();
        if let Some(found) = inner.loggers.get(path) {
            return Some(found.clone());
        }
        if !path.starts_with(ROOT_LOGGER_NAME) {
            return inner
                .loggers
                .get(&format!("{}/{}", ROOT_LOGGER_NAME, path))
                .cloned();
        }
        None
    }

    /// Resolve `path` against the root, materializing any missing segments
    /// as registry children. Empty segments from doubled separators are
    /// skipped. Intermediate segments are structural scaffolding and stay
    /// enabled by default; only the final segment's logger receives the
    /// caller-supplied `enabled` value. Idempotent: the fully-resolved
    /// root-prefixed path is the cache key, so `"Root/X"` and `"X"` name
    /// the same logger.
    pub fn get_or_create(&self, path: &str, enabled: bool) -> Arc<Logger> {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.first() == Some(&ROOT_LOGGER_NAME) {
            segments.remove(0);
        }

        let mut current = self.root();
        if segments.is_empty() {
            current.set_enabled(enabled);
            return current;
        }

        let mut resolved = String::from(ROOT_LOGGER_NAME);
        let mut created = Vec::new();
        {
            let mut inner = self.inner.write();
            for segment in segments {
                resolved.push('/');
                resolved.push_str(segment);
                current = match inner.loggers.get(&resolved) {
                    Some(existing) => existing.clone(),
                    None => {
                        let child = current.create_registry_child(segment);
                        inner.loggers.insert(resolved.clone(), child.clone());
                        created.push(child.clone());
                        child
                    }
                };
            }
        }
        for logger in &created {
            self.notify_registered(logger);
        }
        current.set_enabled(enabled);
        current
    }

    /// Enable every registered logger whose path matches `pattern`, also
    /// switching its console output.
    pub fn enable_pattern(&self, pattern: &str, console_output: bool) {
        for logger in self.matching(pattern) {
            logger.set_enabled(true);
            logger.set_console_output(console_output);
        }
    }

    /// Disable every registered logger whose path matches `pattern`.
    pub fn disable_pattern(&self, pattern: &str) {
        for logger in self.matching(pattern) {
            logger.set_enabled(false);
        }
    }

    fn matching(&self, pattern: &str) -> Vec<Arc<Logger>> {
        self.inner
            .read()
            .loggers
            .values()
            .filter(|logger| matches_pattern(pattern, logger.full_path()))
            .cloned()
            .collect()
    }

    /// Hierarchical text export of the whole tree, rooted at the root
    /// logger.
    pub fn extract_all(
        &self,
        filter: LevelFilter,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> String {
        self.root().extract_logs(0, filter, from, to)
    }

    /// Clear every registered logger's own buffer. The registry holds the
    /// whole tree flat, so no recursion is needed.
    pub fn clear_all(&self) {
        for logger in self.inner.read().loggers.values() {
            logger.clear();
        }
    }

    /// Drop every registration and the root reference; the next `root()`
    /// access rebuilds from scratch.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.loggers.clear();
        inner.root = None;
    }

    pub fn len(&self) -> usize {
        self.inner.read().loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to successful registrations.
    pub fn on_registered(&self, callback: RegistryCallback) {
        self.registered_subscribers.lock().push(callback);
    }

    /// Subscribe to successful unregistrations.
    pub fn on_unregistered(&self, callback: RegistryCallback) {
        self.unregistered_subscribers.lock().push(callback);
    }

    fn notify_registered(&self, logger: &Arc<Logger>) {
        let subscribers = self.registered_subscribers.lock().clone();
        for callback in subscribers {
            callback(logger);
        }
    }

    fn notify_unregistered(&self, logger: &Arc<Logger>) {
        let subscribers = self.unregistered_subscribers.lock().clone();
        for callback in subscribers {
            callback(logger);
        }
    }
}

/// Path pattern matching for bulk operations.
///
/// `*` or `**` alone match everything; `prefix/**` matches any path below
/// `prefix` at any depth; `prefix/*` matches exactly one level below;
/// anything else is an exact, case-insensitive comparison.
pub fn matches_pattern(pattern: &str, path: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty());
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'));
    }
    pattern.eq_ignore_ascii_case(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_root_is_lazily_created_and_registered() {
        let registry = LoggerRegistry::new();
        assert!(registry.is_empty());

        let root = registry.root();
        assert_eq!(root.full_path(), "Root");
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.root(), &root));
    }

    #[test]
    fn test_get_or_create_materializes_hierarchy() {
        let registry = LoggerRegistry::new();
        let leaf = registry.get_or_create("Net/Http/Client", false);

        assert_eq!(leaf.full_path(), "Root/Net/Http/Client");
        assert!(!leaf.enabled());
        assert!(!leaf.is_code_child(), "registry children stay group-eligible");

        // Intermediate scaffolding defaults to enabled.
        let net = registry.get("Net").unwrap();
        let http = registry.get("Root/Net/Http").unwrap();
        assert!(net.enabled());
        assert!(http.enabled());
    }

    #[test]
    fn test_get_or_create_is_idempotent_across_spellings() {
        let registry = LoggerRegistry::new();
        let a = registry.get_or_create("Sys/IO", false);
        let b = registry.get_or_create("Root/Sys/IO", false);
        let c = registry.get_or_create("Sys//IO", false);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 3, "Root, Root/Sys, Root/Sys/IO");
    }

    #[test]
    fn test_get_never_materializes() {
        let registry = LoggerRegistry::new();
        registry.root();
        assert!(registry.get("Missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_is_insert_if_absent() {
        let registry = LoggerRegistry::new();
        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = events.clone();
        registry.on_registered(Arc::new(move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let logger = Logger::new("Standalone", 8);
        registry.register(&logger);
        registry.register(&logger);
        assert_eq!(registry.len(), 1);
        assert_eq!(events.load(Ordering::SeqCst), 1);

        let other = Logger::new("Standalone", 8);
        registry.register(&other);
        assert!(
            Arc::ptr_eq(&registry.get("Standalone").unwrap(), &logger),
            "re-registering an occupied path must not overwrite"
        );
    }

    #[test]
    fn test_unregister_fires_once() {
        let registry = LoggerRegistry::new();
        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = events.clone();
        registry.on_unregistered(Arc::new(move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let logger = Logger::new("Standalone", 8);
        registry.register(&logger);
        registry.unregister(&logger);
        registry.unregister(&logger);
        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert!(registry.get("Standalone").is_none());
    }

    #[test]
    fn test_pattern_grammar() {
        assert!(matches_pattern("*", "Root/Anything"));
        assert!(matches_pattern("**", "Root"));

        assert!(matches_pattern("Root/Sys/**", "Root/Sys/X"));
        assert!(matches_pattern("Root/Sys/**", "Root/Sys/X/Deep"));
        assert!(!matches_pattern("Root/Sys/**", "Root/Other/Z"));
        assert!(!matches_pattern("Root/Sys/**", "Root/Sys"));

        assert!(matches_pattern("Root/Sys/*", "Root/Sys/X"));
        assert!(!matches_pattern("Root/Sys/*", "Root/Sys/X/Deep"));

        assert!(matches_pattern("root/sys/x", "Root/Sys/X"));
        assert!(!matches_pattern("Root/Sys", "Root/Sys/X"));
    }

    #[test]
    fn test_enable_and_disable_pattern() {
        let registry = LoggerRegistry::new();
        let x = registry.get_or_create("Sys/X", false);
        let y = registry.get_or_create("Sys/Y", false);
        let z = registry.get_or_create("Other/Z", false);

        registry.enable_pattern("Root/Sys/*", true);
        assert!(x.enabled() && x.console_output());
        assert!(y.enabled() && y.console_output());
        assert!(!z.enabled());

        registry.disable_pattern("Root/Sys/**");
        assert!(!x.enabled());
        assert!(!y.enabled());
    }

    #[test]
    fn test_extract_all_walks_from_root() {
        let registry = LoggerRegistry::new();
        let logger = registry.get_or_create("App", true);
        logger.log(LogLevel::Info, "hello");

        let text = registry.extract_all(LevelFilter::ALL, None, None);
        assert!(text.contains("=== Root ==="));
        assert!(text.contains("=== Root/App ==="));
        assert!(text.contains("hello"));
    }

    #[test]
    fn test_clear_all_is_flat() {
        let registry = LoggerRegistry::new();
        let a = registry.get_or_create("A", true);
        let b = registry.get_or_create("A/B", true);
        a.log(LogLevel::Info, "a");
        b.log(LogLevel::Info, "b");

        registry.clear_all();
        assert!(a.buffer().is_empty());
        assert!(b.buffer().is_empty());
    }

    #[test]
    fn test_reset_rebuilds_root() {
        let registry = LoggerRegistry::new();
        let old_root = registry.root();
        registry.get_or_create("App", true);

        registry.reset();
        assert!(registry.is_empty());

        let new_root = registry.root();
        assert!(!Arc::ptr_eq(&old_root, &new_root));
    }
}
