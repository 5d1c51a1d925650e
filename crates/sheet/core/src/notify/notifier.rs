//! Identifier-filtered observer registry.

use super::{DeferredEdits, Notification, SEPARATOR};

/// Receives notifications from a [`Notifier`].
///
/// Closures of the form `FnMut(&Notification, &mut DeferredEdits)` implement
/// this trait, so most observers are registered as plain closures.
pub trait Observer {
    /// Called synchronously for every matching notification.
    ///
    /// Tree mutations must be queued on `deferred`; they run after the
    /// dispatch that delivered `event` has completed.
    fn on_notify(&mut self, event: &Notification, deferred: &mut DeferredEdits);
}

impl<F> Observer for F
where
    F: FnMut(&Notification, &mut DeferredEdits),
{
    fn on_notify(&mut self, event: &Notification, deferred: &mut DeferredEdits) {
        self(event, deferred)
    }
}

/// Handle returned by [`Notifier::register`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Set of identifier prefixes an observer is interested in.
///
/// An entry matches an identifier when it is equal to it, or when it is a
/// dotted prefix of it (`"modifier"` matches `"modifier.cost"` but not
/// `"modifiers.cost"`). An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdFilter {
    prefixes: Vec<String>,
}

impl IdFilter {
    /// Filter that matches every identifier.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        if self.prefixes.is_empty() {
            return true;
        }
        self.prefixes.iter().any(|prefix| {
            id == prefix
                || id
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with(SEPARATOR))
        })
    }
}

struct Registration {
    id: ObserverId,
    filter: IdFilter,
    observer: Box<dyn Observer>,
}

/// Document-scoped publish mechanism.
///
/// Delivery is synchronous and ordered by registration. While a batch is open
/// notifications are collected, de-duplicated, and delivered when the
/// outermost batch closes. A disabled notifier drops everything it is given.
pub struct Notifier {
    registrations: Vec<Registration>,
    next_id: u64,
    enabled: bool,
    batch_depth: u32,
    pending: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            next_id: 0,
            enabled: true,
            batch_depth: 0,
            pending: Vec::new(),
        }
    }

    /// Register an observer for identifiers matching `filter`.
    pub fn register(&mut self, observer: impl Observer + 'static, filter: IdFilter) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            filter,
            observer: Box::new(observer),
        });
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        before != self.registrations.len()
    }

    pub fn observer_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable delivery. Disabling also discards pending batch
    /// contents.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending.clear();
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Open a (possibly nested) batch.
    pub fn start_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch. When the outermost batch closes, the collected
    /// notifications are delivered in first-raised order.
    pub fn end_batch(&mut self) -> DeferredEdits {
        let mut deferred = DeferredEdits::new();
        if self.batch_depth == 0 {
            tracing::warn!("end_batch called without a matching start_batch");
            return deferred;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return deferred;
        }

        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::debug!("Flushing {} batched notifications", pending.len());
        }
        for event in &pending {
            self.deliver(event, &mut deferred);
        }
        deferred
    }

    /// Raise a notification.
    ///
    /// Returns the edits observers queued during delivery; the caller owns
    /// running them.
    pub fn notify(&mut self, event: Notification) -> DeferredEdits {
        let mut deferred = DeferredEdits::new();
        if !self.enabled {
            return deferred;
        }
        if self.batch_depth > 0 {
            if !self.pending.contains(&event) {
                self.pending.push(event);
            }
            return deferred;
        }
        self.deliver(&event, &mut deferred);
        deferred
    }

    fn deliver(&mut self, event: &Notification, deferred: &mut DeferredEdits) {
        for registration in self.registrations.iter_mut() {
            if registration.filter.matches(event.id) {
                registration.observer.on_notify(event, deferred);
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.registrations.len())
            .field("enabled", &self.enabled)
            .field("batch_depth", &self.batch_depth)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ids;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl Observer + use<> {
        let log = Rc::clone(log);
        move |event: &Notification, _: &mut DeferredEdits| {
            log.borrow_mut().push(tag);
            log.borrow_mut().push(event.id);
        }
    }

    #[test]
    fn filter_matches_dotted_prefixes_only() {
        let filter = IdFilter::new(["modifier"]);
        assert!(filter.matches(ids::MODIFIER_COST));
        assert!(filter.matches("modifier"));
        assert!(!filter.matches("modifiers.cost"));
        assert!(!filter.matches(ids::TRAIT_NAME));
        assert!(IdFilter::all().matches(ids::ROW_NOTES));
    }

    #[test]
    fn delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.register(recorder(&log, "first"), IdFilter::all());
        notifier.register(recorder(&log, "second"), IdFilter::new([ids::MODIFIER_PREFIX]));
        notifier.register(recorder(&log, "third"), IdFilter::new([ids::TRAIT_PREFIX]));

        notifier.notify(Notification::new(ids::MODIFIER_NAME, None));

        assert_eq!(
            *log.borrow(),
            vec!["first", ids::MODIFIER_NAME, "second", ids::MODIFIER_NAME]
        );
    }

    #[test]
    fn batch_deduplicates_and_flushes_at_outermost_end() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.register(recorder(&log, "obs"), IdFilter::all());

        notifier.start_batch();
        notifier.notify(Notification::new(ids::MODIFIER_COST, None));
        notifier.start_batch();
        notifier.notify(Notification::new(ids::MODIFIER_NAME, None));
        notifier.notify(Notification::new(ids::MODIFIER_COST, None));
        notifier.end_batch();
        assert!(log.borrow().is_empty());

        notifier.end_batch();
        assert_eq!(
            *log.borrow(),
            vec!["obs", ids::MODIFIER_COST, "obs", ids::MODIFIER_NAME]
        );
    }

    #[test]
    fn disabled_notifier_drops_events() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.register(recorder(&log, "obs"), IdFilter::all());
        notifier.set_enabled(false);
        notifier.notify(Notification::new(ids::ROW_NOTES, None));
        notifier.set_enabled(true);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unregister_stops_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        let id = notifier.register(recorder(&log, "obs"), IdFilter::all());
        assert!(notifier.unregister(id));
        assert!(!notifier.unregister(id));
        notifier.notify(Notification::new(ids::ROW_NOTES, None));
        assert!(log.borrow().is_empty());
        assert_eq!(notifier.observer_count(), 0);
    }
}
