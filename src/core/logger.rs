//! Hierarchical logger nodes
//!
//! A [`Logger`] is a node in two overlapping trees: the structural tree
//! built by child creation, and the effective tree in which an optional
//! group parent overrides the structural link for state propagation. A
//! logger records into its own bounded ring buffer, and whether it records
//! at all is the conjunction of its own `enabled` flag with every effective
//! ancestor's flag. That conjunction is cached per node and invalidated
//! eagerly across the whole subtree whenever an ancestor changes, so the
//! hot-path check is a single cached read.

use super::{
    error::{LoggerError, Result},
    log_buffer::LogBuffer,
    log_entry::LogEntry,
    log_level::{LevelFilter, LogLevel},
};
use crate::sink;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Buffer capacity used when the caller does not specify one.
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Callback invoked with the logger and the new boolean value.
pub type StateCallback = Arc<dyn Fn(&Arc<Logger>, bool) + Send + Sync>;

/// Source location captured at a log call site.
#[derive(Debug, Clone, Copy)]
pub struct SourceLocation {
    pub file: &'static str,
    pub member: &'static str,
    pub line: u32,
}

/// Per-logger user-settable state, snapshot-able for preference
/// persistence by surrounding tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    pub enabled: bool,
    pub level_filter: LevelFilter,
    pub console_output: bool,
    pub include_source_info: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level_filter: LevelFilter::ALL,
            console_output: false,
            include_source_info: false,
        }
    }
}

struct LoggerState {
    enabled: bool,
    level_filter: LevelFilter,
    console_output: bool,
    include_source_info: bool,
    /// Cached conjunction of `enabled` over the effective ancestor chain.
    cached_effective: bool,
    /// When set, `cached_effective` may be stale and must be recomputed
    /// from the effective parent on the next read.
    dirty: bool,
}

pub struct Logger {
    name: String,
    full_path: String,
    /// True when created through child creation; such a node keeps its
    /// structural parent for life and can never join a group.
    is_code_child: bool,
    code_parent: RwLock<Weak<Logger>>,
    group_parent: RwLock<Option<Weak<Logger>>>,
    children: RwLock<Vec<Arc<Logger>>>,
    state: RwLock<LoggerState>,
    buffer: LogBuffer,
    enabled_subscribers: Mutex<Vec<StateCallback>>,
    effective_subscribers: Mutex<Vec<StateCallback>>,
}

impl Logger {
    /// Create a root logger with no parent.
    pub fn new(name: impl Into<String>, capacity: usize) -> Arc<Logger> {
        let name = name.into();
        let full_path = name.clone();
        Self::build(name, full_path, Weak::new(), false, capacity)
    }

    fn build(
        name: String,
        full_path: String,
        code_parent: Weak<Logger>,
        is_code_child: bool,
        capacity: usize,
    ) -> Arc<Logger> {
        Arc::new(Logger {
            name,
            full_path,
            is_code_child,
            code_parent: RwLock::new(code_parent),
            group_parent: RwLock::new(None),
            children: RwLock::new(Vec::new()),
            state: RwLock::new(LoggerState {
                enabled: true,
                level_filter: LevelFilter::ALL,
                console_output: false,
                include_source_info: false,
                cached_effective: true,
                dirty: true,
            }),
            buffer: LogBuffer::new(capacity),
            enabled_subscribers: Mutex::new(Vec::new()),
            effective_subscribers: Mutex::new(Vec::new()),
        })
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full hierarchical path, joined with `/`. Computed once at
    /// construction and immutable thereafter, even if the node is later
    /// adopted or regrouped.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn is_code_child(&self) -> bool {
        self.is_code_child
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn enabled(&self) -> bool {
        self.state.read().enabled
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.state.read().level_filter
    }

    pub fn set_level_filter(&self, filter: LevelFilter) {
        self.state.write().level_filter = filter;
    }

    pub fn console_output(&self) -> bool {
        self.state.read().console_output
    }

    pub fn set_console_output(&self, value: bool) {
        self.state.write().console_output = value;
    }

    pub fn include_source_info(&self) -> bool {
        self.state.read().include_source_info
    }

    pub fn set_include_source_info(&self, value: bool) {
        self.state.write().include_source_info = value;
    }

    /// Snapshot of the user-settable fields, for preference persistence.
    pub fn settings(&self) -> LoggerSettings {
        let st = self.state.read();
        LoggerSettings {
            enabled: st.enabled,
            level_filter: st.level_filter,
            console_output: st.console_output,
            include_source_info: st.include_source_info,
        }
    }

    /// Apply persisted settings. The enabled flag goes through
    /// [`Logger::set_enabled`] so change events and cache invalidation
    /// fire as usual.
    pub fn apply_settings(self: &Arc<Self>, settings: &LoggerSettings) {
        {
            let mut st = self.state.write();
            st.level_filter = settings.level_filter;
            st.console_output = settings.console_output;
            st.include_source_info = settings.include_source_info;
        }
        self.set_enabled(settings.enabled);
    }

    // ------------------------------------------------------------------
    // Enabled state & caching
    // ------------------------------------------------------------------

    /// Set this logger's own enabled flag. A write of the current value is
    /// a strict no-op: no events fire and no caches are invalidated.
    pub fn set_enabled(self: &Arc<Self>, value: bool) {
        {
            let mut st = self.state.write();
            if st.enabled == value {
                return;
            }
            st.enabled = value;
        }
        self.notify_enabled(value);
        self.refresh_effective();
    }

    /// Whether this logger will actually record, combining its own flag
    /// with every effective ancestor's. O(1) when the cache is clean;
    /// otherwise recomputed from the immediate effective parent, which the
    /// eager invalidation pass guarantees is sufficient.
    pub fn effective_enabled(&self) -> bool {
        {
            let st = self.state.read();
            if !st.dirty {
                return st.cached_effective;
            }
        }
        let parent_enabled = self.parent().is_none_or(|p| p.effective_enabled());
        let mut st = self.state.write();
        let value = st.enabled && parent_enabled;
        st.cached_effective = value;
        st.dirty = false;
        value
    }

    /// Enable this logger, and optionally every child, through the full
    /// change-event path.
    pub fn enable(self: &Arc<Self>, recursive: bool) {
        self.set_enabled(true);
        if recursive {
            let children = self.children.read().clone();
            for child in children {
                child.enable(true);
            }
        }
    }

    /// Disable this logger, and optionally every child.
    pub fn disable(self: &Arc<Self>, recursive: bool) {
        self.set_enabled(false);
        if recursive {
            let children = self.children.read().clone();
            for child in children {
                child.disable(true);
            }
        }
    }

    /// Subscribe to transitions of this logger's own enabled flag.
    pub fn on_enabled_changed(&self, callback: StateCallback) {
        self.enabled_subscribers.lock().push(callback);
    }

    /// Subscribe to effective-enabled changes. Fired on every node of a
    /// subtree whenever an ancestor's state or grouping changes, even when
    /// the node's own flag did not move.
    pub fn on_effective_enabled_changed(&self, callback: StateCallback) {
        self.effective_subscribers.lock().push(callback);
    }

    fn notify_enabled(self: &Arc<Self>, value: bool) {
        let subscribers = self.enabled_subscribers.lock().clone();
        for callback in subscribers {
            callback(self, value);
        }
    }

    /// Eager invalidation + notification pass over this node and every
    /// descendant. Top-down, so each recompute consults an already clean
    /// parent and never needs a full ancestor walk.
    fn refresh_effective(self: &Arc<Self>) {
        self.state.write().dirty = true;
        let value = self.effective_enabled();
        let subscribers = self.effective_subscribers.lock().clone();
        for callback in subscribers {
            callback(self, value);
        }
        let children = self.children.read().clone();
        for child in children {
            child.refresh_effective();
        }
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Effective parent: the group parent when assigned, else the
    /// structural one.
    pub fn parent(&self) -> Option<Arc<Logger>> {
        if let Some(group) = self.group_parent.read().as_ref() {
            if let Some(parent) = group.upgrade() {
                return Some(parent);
            }
        }
        self.code_parent.read().upgrade()
    }

    pub fn code_parent(&self) -> Option<Arc<Logger>> {
        self.code_parent.read().upgrade()
    }

    pub fn group_parent(&self) -> Option<Arc<Logger>> {
        self.group_parent.read().as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> Vec<Arc<Logger>> {
        self.children.read().clone()
    }

    /// Create a code child: its structural parent is fixed to this node
    /// for life and it can never be assigned to a group.
    pub fn create_child(self: &Arc<Self>, name: &str, capacity: usize) -> Arc<Logger> {
        let child = Logger::build(
            name.to_string(),
            format!("{}/{}", self.full_path, name),
            Arc::downgrade(self),
            true,
            capacity,
        );
        self.children.write().push(child.clone());
        child.refresh_effective();
        child
    }

    /// Internal constructor for registry path materialization: the
    /// structural parent is fixed like a code child's, but the node stays
    /// eligible for group assignment.
    pub(crate) fn create_registry_child(self: &Arc<Self>, name: &str) -> Arc<Logger> {
        let child = Logger::build(
            name.to_string(),
            format!("{}/{}", self.full_path, name),
            Arc::downgrade(self),
            false,
            DEFAULT_BUFFER_CAPACITY,
        );
        self.children.write().push(child.clone());
        child.refresh_effective();
        child
    }

    /// Adopt an existing parentless logger as a structural child. Refuses
    /// silently when the candidate already has a structural parent; this
    /// operation never re-parents.
    pub fn add_child(self: &Arc<Self>, child: &Arc<Logger>) {
        if child.code_parent.read().upgrade().is_some() {
            return;
        }
        *child.code_parent.write() = Arc::downgrade(self);
        self.children.write().push(child.clone());
        child.refresh_effective();
    }

    /// Remove a child from the list. The child's structural parent link is
    /// cleared only when it still points at this node; a child whose link
    /// has since moved elsewhere keeps it. Returns whether a removal
    /// happened.
    pub fn remove_child(self: &Arc<Self>, child: &Arc<Logger>) -> bool {
        let removed = {
            let mut children = self.children.write();
            let before = children.len();
            children.retain(|c| !Arc::ptr_eq(c, child));
            children.len() < before
        };
        if removed {
            let points_here = child
                .code_parent
                .read()
                .upgrade()
                .is_some_and(|p| Arc::ptr_eq(&p, self));
            if points_here {
                *child.code_parent.write() = Weak::new();
            }
            child.refresh_effective();
        }
        removed
    }

    /// Empty the child list. Non-code-children are unparented; code
    /// children keep their structural link even though they leave the
    /// list, an intentional asymmetry.
    pub fn clear_children(self: &Arc<Self>) {
        let children = std::mem::take(&mut *self.children.write());
        for child in children {
            if !child.is_code_child {
                *child.code_parent.write() = Weak::new();
            }
            child.refresh_effective();
        }
    }

    /// Attach this logger to a group parent that overrides the structural
    /// parent for propagation, or detach with `None`.
    ///
    /// # Errors
    ///
    /// [`LoggerError::CodeChildGrouping`] when called on a code child; the
    /// node's links are left untouched.
    pub fn assign_to_group(self: &Arc<Self>, group: Option<&Arc<Logger>>) -> Result<()> {
        if self.is_code_child {
            return Err(LoggerError::code_child_grouping(&self.full_path));
        }
        if let Some(current) = self.group_parent() {
            current
                .children
                .write()
                .retain(|c| !Arc::ptr_eq(c, self));
        }
        match group {
            Some(group) => {
                *self.group_parent.write() = Some(Arc::downgrade(group));
                group.children.write().push(self.clone());
            }
            None => {
                *self.group_parent.write() = None;
            }
        }
        self.refresh_effective();
        Ok(())
    }

    /// Detach from any group parent, restoring the structural link as the
    /// effective one. No-op when no group is set.
    pub fn remove_from_group(self: &Arc<Self>) {
        if self.group_parent.read().is_none() {
            return;
        }
        // Cannot fail: a code child never has a group parent to begin with.
        let _ = self.assign_to_group(None);
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    /// Cheap gate meant to run before any message formatting.
    #[inline]
    pub fn should_log(&self, level: LogLevel) -> bool {
        self.effective_enabled() && self.state.read().level_filter.contains(level)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.should_log(level) {
            return;
        }
        self.emit(level, message.into(), None);
    }

    pub fn log_with_source(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        source: SourceLocation,
    ) {
        if !self.should_log(level) {
            return;
        }
        self.emit(level, message.into(), Some(source));
    }

    /// Ungated emission: skips the enabled/level gate entirely. Used by
    /// the timed-scope primitive, whose logging decision is fixed at scope
    /// entry. Still honors `include_source_info` and `console_output`.
    pub fn log_direct(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        source: Option<SourceLocation>,
    ) {
        self.emit(level, message.into(), source);
    }

    fn emit(&self, level: LogLevel, message: String, source: Option<SourceLocation>) {
        let (include_source, console) = {
            let st = self.state.read();
            (st.include_source_info, st.console_output)
        };
        let mut entry = LogEntry::new(level, self.full_path.as_str(), message);
        if include_source {
            if let Some(src) = source {
                entry = entry.with_source(src.file, src.member, src.line);
            }
        }
        // Buffer first, sink after, so the buffer lock is never held
        // across the console write.
        let line = if console { Some(entry.format_line()) } else { None };
        self.buffer.add(entry);
        if let Some(line) = line {
            sink::console_sink().write(sink::channel_for(level), &line);
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    // ------------------------------------------------------------------
    // Extraction
    // ------------------------------------------------------------------

    /// Render this logger's filtered buffer contents and, recursively,
    /// every child's, as one indented text block. Each logger's section
    /// opens with a header line naming its full path; child sections are
    /// separated by a blank line and indented one level deeper.
    pub fn extract_logs(
        &self,
        indent: usize,
        filter: LevelFilter,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> String {
        let mut out = String::new();
        self.extract_into(&mut out, indent, filter, from, to);
        out
    }

    fn extract_into(
        &self,
        out: &mut String,
        indent: usize,
        filter: LevelFilter,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);
        out.push_str("=== ");
        out.push_str(&self.full_path);
        out.push_str(" ===\n");
        for entry in self.buffer.entries_filtered(filter, from, to) {
            out.push_str(&pad);
            out.push_str(&entry.format_line());
            out.push('\n');
        }
        for child in self.children.read().iter() {
            out.push('\n');
            child.extract_into(out, indent + 1, filter, from, to);
        }
    }

    /// Empty only this logger's buffer.
    pub fn clear(&self) {
        self.buffer.clear();
    }

    /// Empty this logger's buffer and every descendant's.
    pub fn clear_all(&self) {
        self.buffer.clear();
        for child in self.children.read().iter() {
            child.clear_all();
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("full_path", &self.full_path)
            .field("is_code_child", &self.is_code_child)
            .field("enabled", &self.enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_effective_enabled_is_conjunction() {
        let root = Logger::new("Root", 8);
        let a = root.create_child("A", 8);
        let b = a.create_child("B", 8);

        assert!(b.effective_enabled());

        a.set_enabled(false);
        assert!(!b.effective_enabled());
        assert!(b.enabled(), "own flag untouched");

        a.set_enabled(true);
        assert!(b.effective_enabled());

        root.set_enabled(false);
        assert!(!b.effective_enabled());
    }

    #[test]
    fn test_set_enabled_same_value_fires_no_events() {
        let root = Logger::new("Root", 8);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        root.on_enabled_changed(Arc::new(move |_, _| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));

        root.set_enabled(true);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        root.set_enabled(false);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_effective_event_reaches_all_descendants() {
        let root = Logger::new("Root", 8);
        let a = root.create_child("A", 8);
        let b = a.create_child("B", 8);

        let hits = Arc::new(AtomicUsize::new(0));
        for node in [&a, &b] {
            let hits_clone = hits.clone();
            node.on_effective_enabled_changed(Arc::new(move |_, value| {
                assert!(!value);
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }));
        }

        root.set_enabled(false);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_add_child_refuses_parented_logger() {
        let root = Logger::new("Root", 8);
        let other = Logger::new("Other", 8);
        let child = root.create_child("Child", 8);

        other.add_child(&child);
        assert!(Arc::ptr_eq(&child.code_parent().unwrap(), &root));
        assert!(other.children().is_empty());

        let orphan = Logger::new("Orphan", 8);
        other.add_child(&orphan);
        assert!(Arc::ptr_eq(&orphan.code_parent().unwrap(), &other));
    }

    #[test]
    fn test_remove_child_guards_stale_parent_link() {
        let root = Logger::new("Root", 8);
        let child = root.create_child("Child", 8);

        assert!(root.remove_child(&child));
        assert!(child.code_parent().is_none());
        assert!(!root.remove_child(&child), "second removal is a no-op");
    }

    #[test]
    fn test_clear_children_asymmetry() {
        let root = Logger::new("Root", 8);
        let code_child = root.create_child("Code", 8);
        let registry_child = root.create_registry_child("Registry");

        root.clear_children();
        assert!(root.children().is_empty());
        assert!(code_child.code_parent().is_some(), "code child keeps its link");
        assert!(registry_child.code_parent().is_none());
    }

    #[test]
    fn test_group_overrides_code_parent() {
        let root = Logger::new("Root", 8);
        let member = root.create_registry_child("Member");
        let group = Logger::new("Group", 8);

        member.assign_to_group(Some(&group)).unwrap();
        group.set_enabled(false);
        assert!(!member.effective_enabled());
        assert!(member.enabled());

        member.remove_from_group();
        assert!(member.effective_enabled());
    }

    #[test]
    fn test_assign_to_group_rejects_code_child() {
        let root = Logger::new("Root", 8);
        let child = root.create_child("Child", 8);
        let group = Logger::new("Group", 8);

        let err = child.assign_to_group(Some(&group)).unwrap_err();
        assert!(matches!(err, LoggerError::CodeChildGrouping { .. }));
        assert!(Arc::ptr_eq(&child.code_parent().unwrap(), &root));
        assert!(child.group_parent().is_none());
    }

    #[test]
    fn test_reassign_group_is_idempotent_in_effect() {
        let root = Logger::new("Root", 8);
        let member = root.create_registry_child("Member");
        let group = Logger::new("Group", 8);

        member.assign_to_group(Some(&group)).unwrap();
        member.assign_to_group(Some(&group)).unwrap();
        assert_eq!(
            group
                .children()
                .iter()
                .filter(|c| Arc::ptr_eq(c, &member))
                .count(),
            1
        );
    }

    #[test]
    fn test_should_log_honors_level_filter() {
        let root = Logger::new("Root", 8);
        root.set_level_filter(LevelFilter::ERRORS_ONLY);
        assert!(!root.should_log(LogLevel::Info));
        assert!(root.should_log(LogLevel::Critical));
    }

    #[test]
    fn test_log_gated_by_effective_state() {
        let root = Logger::new("Root", 8);
        let child = root.create_child("Child", 8);

        root.set_enabled(false);
        child.info("dropped");
        assert!(child.buffer().is_empty());

        root.set_enabled(true);
        child.info("kept");
        assert_eq!(child.buffer().len(), 1);
    }

    #[test]
    fn test_log_direct_bypasses_gate() {
        let root = Logger::new("Root", 8);
        root.set_enabled(false);
        root.log_direct(LogLevel::Info, "forced", None);
        assert_eq!(root.buffer().len(), 1);
    }

    #[test]
    fn test_source_info_dropped_unless_requested() {
        let root = Logger::new("Root", 8);
        let src = SourceLocation {
            file: "worker.rs",
            member: "run",
            line: 7,
        };

        root.log_with_source(LogLevel::Info, "without", src);
        root.set_include_source_info(true);
        root.log_with_source(LogLevel::Info, "with", src);

        let entries = root.buffer().entries();
        assert!(entries[0].file.is_none());
        assert_eq!(entries[1].file.as_deref(), Some("worker.rs"));
    }

    #[test]
    fn test_extract_logs_sections() {
        let root = Logger::new("App", 8);
        let sub = root.create_child("Sub", 8);
        root.info("top level");
        sub.warn("nested");

        let text = root.extract_logs(0, LevelFilter::ALL, None, None);
        assert!(text.contains("=== App ==="));
        assert!(text.contains("=== App/Sub ==="));
        assert!(text.contains("[INF] top level"));
        assert!(text.contains("[WRN] nested"));
        let app_pos = text.find("=== App ===").unwrap();
        let sub_pos = text.find("=== App/Sub ===").unwrap();
        assert!(app_pos < sub_pos);
    }

    #[test]
    fn test_clear_all_recurses() {
        let root = Logger::new("Root", 8);
        let child = root.create_child("Child", 8);
        root.info("a");
        child.info("b");

        root.clear();
        assert!(root.buffer().is_empty());
        assert!(!child.buffer().is_empty());

        child.info("c");
        root.clear_all();
        assert!(child.buffer().is_empty());
    }

    #[test]
    fn test_recursive_disable_touches_own_flags() {
        let root = Logger::new("Root", 8);
        let child = root.create_child("Child", 8);

        root.disable(true);
        assert!(!child.enabled());

        root.enable(false);
        assert!(!child.enabled(), "non-recursive enable leaves children");
        assert!(!child.effective_enabled());
    }

    #[test]
    fn test_settings_round_trip() {
        let root = Logger::new("Root", 8);
        let stored = LoggerSettings {
            enabled: false,
            level_filter: LevelFilter::PRODUCTION,
            console_output: true,
            include_source_info: true,
        };
        root.apply_settings(&stored);
        assert_eq!(root.settings(), stored);
    }
}
