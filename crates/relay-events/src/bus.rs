//! Dispatcher: registration, removal, and sequential chained emission.
//!
//! An [`EventBus`] owns its own queue registry; there is no ambient global
//! state. Share an instance the usual way (`Arc<RwLock<EventBus>>`) when
//! several components register against the same bus.
//!
//! # Dual binding
//!
//! `on("main.sub", ..)` inserts the handler into BOTH the `(main, sub)`
//! queue and the main namespace's primary queue; `on("main", ..)` inserts
//! only into the primary queue. The primary queue is therefore the superset
//! of every handler ever bound under a main namespace, in registration
//! order across all paths. Emission never dual-targets: `emit("main.sub")`
//! runs exactly the `(main, sub)` queue, `emit("main")` runs the primary.
//!
//! # Chained emission
//!
//! Within a queue, handlers run sequentially: the first receives the full
//! original argument list, each subsequent handler receives the previous
//! handler's return value as its single argument, and the last return value
//! resolves the emission.

use std::sync::Arc;

use serde_json::Value;
use tracing::{trace, warn};

use crate::config::{default_config, BusConfig, BusOptions};
use crate::error::{EventError, EventResult};
use crate::namespace::NamespacePath;
use crate::registry::{HandlerEntry, Queue, Registry, SubKey};

/// Signature of a queue handler.
///
/// Receives the emission's argument list (full original arguments for the
/// first handler in a queue, a single chained value afterwards) and returns
/// the value passed to the next handler. A returned error aborts the
/// emission.
pub type HandlerFn = dyn Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync;

/// Shared handler reference.
///
/// Removal matches by reference ([`Arc::ptr_eq`]), so keep a clone of the
/// `Handler` you registered if you intend to remove it selectively later.
pub type Handler = Arc<HandlerFn>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Hierarchical, namespaced event dispatcher.
///
/// Handlers are registered under dotted namespace paths, removed
/// selectively, and run as a sequential chain on emission.
pub struct EventBus {
    config: BusConfig,
    registry: Registry,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a bus from the process-wide defaults (see
    /// [`configure`](crate::configure)).
    pub fn new() -> Self {
        Self::from_config(default_config())
    }

    /// Create a bus with per-instance overrides on top of the defaults.
    pub fn with_options(options: BusOptions) -> Self {
        Self::from_config(options.apply(default_config()))
    }

    fn from_config(config: BusConfig) -> Self {
        Self {
            config,
            registry: Registry::default(),
        }
    }

    /// The active namespace separator.
    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// The name tagged onto this instance's diagnostic messages.
    pub fn instance_name(&self) -> &str {
        &self.config.instance_name
    }

    /// Whether trace-level diagnostics are enabled.
    pub fn debug_enabled(&self) -> bool {
        self.config.debug_enabled
    }

    /// Register `handler` under `name`.
    ///
    /// The handler lands in the main namespace's primary queue and, when the
    /// path names sub-namespaces, in each named sub-namespace queue as well.
    /// Duplicate registrations are allowed and run once per occurrence.
    /// `is_async` is recorded as advisory metadata (see
    /// [`async_flags`](Self::async_flags)); emission does not act on it.
    pub fn on(&mut self, name: &str, handler: Handler, is_async: bool) -> EventResult<&mut Self> {
        let path = self.parse(name)?;

        let mut targets = vec![SubKey::Primary];
        targets.extend(path.subs.iter().map(|sub| SubKey::Named(sub.clone())));

        for sub in &targets {
            self.registry
                .ensure_queue(&path.main, sub)
                .entries
                .push(HandlerEntry {
                    handler: handler.clone(),
                    is_async,
                });
        }

        if self.config.debug_enabled {
            trace!(
                instance = %self.config.instance_name,
                namespace = %name,
                queues = targets.len(),
                "registered handler"
            );
        }
        Ok(self)
    }

    /// Remove handlers bound under `name`.
    ///
    /// Without sub-namespace segments and without `handler`, the entire main
    /// namespace entry is removed — the only way to delete the primary
    /// queue. With sub-namespace segments and without `handler`, each named
    /// sub-namespace queue is cleared; the primary queue is never touched
    /// through this path.
    ///
    /// When `handler` is given, each targeted queue (the primary for a bare
    /// main namespace, the named sub-namespaces otherwise) is filtered down
    /// to the occurrences OF that handler: entries bound to other handlers
    /// are dropped. This keep-only behavior is the documented contract of
    /// the removal operation; each surviving entry keeps its original async
    /// flag.
    ///
    /// Targeting an absent main namespace or sub-namespace logs a warning
    /// and leaves the bus unchanged.
    pub fn off(&mut self, name: &str, handler: Option<&Handler>) -> EventResult<&mut Self> {
        let path = self.parse(name)?;

        if !self.registry.main_exists(&path.main) {
            warn!(
                instance = %self.config.instance_name,
                namespace = %name,
                "cannot remove handlers: namespace is not registered"
            );
            return Ok(self);
        }

        if !path.has_subs() {
            match handler {
                None => {
                    self.registry.clear_main(&path.main);
                    if self.config.debug_enabled {
                        trace!(
                            instance = %self.config.instance_name,
                            namespace = %name,
                            "removed namespace"
                        );
                    }
                }
                Some(target) => self.retain_matching(&path.main, &SubKey::Primary, target, name),
            }
            return Ok(self);
        }

        for sub in &path.subs {
            let key = SubKey::Named(sub.clone());
            if self.registry.queue(&path.main, &key).is_none() {
                warn!(
                    instance = %self.config.instance_name,
                    namespace = %name,
                    sub = %sub,
                    "cannot remove handlers: sub-namespace is not registered"
                );
                continue;
            }
            match handler {
                // Only named queues are cleared here; the primary key is a
                // separate variant and cannot be named by a path segment.
                None => {
                    self.registry.clear_sub(&path.main, &key);
                    if self.config.debug_enabled {
                        trace!(
                            instance = %self.config.instance_name,
                            namespace = %name,
                            sub = %sub,
                            "cleared sub-namespace"
                        );
                    }
                }
                Some(target) => self.retain_matching(&path.main, &key, target, name),
            }
        }
        Ok(self)
    }

    /// Emit `args` to the handlers bound under `name`.
    ///
    /// A bare main namespace targets its primary queue; a path with
    /// sub-namespace segments targets exactly those named queues, in order.
    /// Each targeted queue is folded left-to-right (see the module docs);
    /// the final value of the last processed queue resolves the emission.
    ///
    /// Emitting a namespace that was never bound is not an error: the
    /// emission resolves to `None`. So does hitting a targeted queue that
    /// does not exist, which also stops the iteration. A handler fault
    /// aborts the emission with [`EventError::HandlerFailed`]; no later
    /// handler runs.
    pub async fn emit(&self, name: &str, args: Vec<Value>) -> EventResult<Option<Value>> {
        let path = self.parse(name)?;

        if !self.registry.main_exists(&path.main) {
            if self.config.debug_enabled {
                trace!(
                    instance = %self.config.instance_name,
                    namespace = %name,
                    "emit on unbound namespace"
                );
            }
            return Ok(None);
        }

        let mut result = None;
        for sub in self.emit_targets(&path) {
            let Some(queue) = self.registry.queue(&path.main, &sub) else {
                return Ok(None);
            };
            result = self.fold_queue(queue, &args, name)?;
        }

        if self.config.debug_enabled {
            trace!(
                instance = %self.config.instance_name,
                namespace = %name,
                resolved = result.is_some(),
                "emission settled"
            );
        }
        Ok(result)
    }

    /// Total number of handlers in the queues `emit(name)` would target.
    pub fn handler_count(&self, name: &str) -> EventResult<usize> {
        let path = self.parse(name)?;
        Ok(self
            .emit_targets(&path)
            .into_iter()
            .filter_map(|sub| self.registry.queue(&path.main, &sub))
            .map(|queue| queue.entries.len())
            .sum())
    }

    /// Advisory async flags of the queues `emit(name)` would target, in
    /// registration order.
    ///
    /// Returns `None` when no targeted queue exists. The dispatcher records
    /// these flags at registration but does not yet sequence handlers by
    /// them; they are exposed for callers that will.
    pub fn async_flags(&self, name: &str) -> EventResult<Option<Vec<bool>>> {
        let path = self.parse(name)?;

        let mut found = false;
        let mut flags = Vec::new();
        for sub in self.emit_targets(&path) {
            if let Some(queue) = self.registry.queue(&path.main, &sub) {
                found = true;
                flags.extend(queue.entries.iter().map(|entry| entry.is_async));
            }
        }
        Ok(found.then_some(flags))
    }

    fn parse(&self, raw: &str) -> EventResult<NamespacePath> {
        NamespacePath::parse(raw, &self.config.separator)
    }

    /// Queues an emission of this path touches: the primary queue for a
    /// bare main namespace, otherwise exactly the named sub-namespaces.
    fn emit_targets(&self, path: &NamespacePath) -> Vec<SubKey> {
        if path.has_subs() {
            path.subs
                .iter()
                .map(|sub| SubKey::Named(sub.clone()))
                .collect()
        } else {
            vec![SubKey::Primary]
        }
    }

    /// Keep only entries whose handler is `target`, flags riding along.
    fn retain_matching(&mut self, main: &str, sub: &SubKey, target: &Handler, name: &str) {
        if let Some(queue) = self.registry.queue_mut(main, sub) {
            let before = queue.entries.len();
            queue
                .entries
                .retain(|entry| Arc::ptr_eq(&entry.handler, target));
            if self.config.debug_enabled {
                trace!(
                    instance = %self.config.instance_name,
                    namespace = %name,
                    dropped = before - queue.entries.len(),
                    "filtered queue to matching handler"
                );
            }
        }
    }

    /// Run a queue left-to-right, threading each return value into the next
    /// call. Returns the last handler's value, or `None` for an empty queue.
    fn fold_queue(
        &self,
        queue: &Queue,
        args: &[Value],
        name: &str,
    ) -> EventResult<Option<Value>> {
        let mut carried: Option<Value> = None;
        for entry in &queue.entries {
            let call_args = match carried.take() {
                None => args.to_vec(),
                Some(previous) => vec![previous],
            };
            let value = (entry.handler)(call_args)
                .map_err(|source| EventError::handler_failed(name, source))?;
            carried = Some(value);
        }
        Ok(carried)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_bus() -> EventBus {
        EventBus::with_options(BusOptions {
            debug_enabled: Some(false),
            instance_name: Some("unit".into()),
            separator: Some(".".into()),
        })
    }

    #[test]
    fn accessors_reflect_configuration() {
        let bus = EventBus::with_options(BusOptions {
            debug_enabled: Some(true),
            instance_name: Some("introspect".into()),
            separator: Some("::".into()),
        });
        assert!(bus.debug_enabled());
        assert_eq!(bus.instance_name(), "introspect");
        assert_eq!(bus.separator(), "::");
    }

    #[test]
    fn on_dual_binds_into_primary_and_named() {
        let mut bus = quiet_bus();
        bus.on("main.sub", handler(|_| Ok(Value::Null)), false)
            .unwrap();

        assert_eq!(bus.handler_count("main").unwrap(), 1);
        assert_eq!(bus.handler_count("main.sub").unwrap(), 1);
        assert_eq!(bus.handler_count("main.other").unwrap(), 0);
    }

    #[test]
    fn on_bare_main_binds_primary_only() {
        let mut bus = quiet_bus();
        bus.on("main", handler(|_| Ok(Value::Null)), false).unwrap();

        assert_eq!(bus.handler_count("main").unwrap(), 1);
        assert_eq!(bus.handler_count("main.sub").unwrap(), 0);
    }

    #[test]
    fn on_rejects_malformed_namespace() {
        let mut bus = quiet_bus();
        let result = bus.on("...", handler(|_| Ok(Value::Null)), false);
        assert!(matches!(
            result,
            Err(EventError::InvalidNamespace { .. })
        ));
    }

    #[test]
    fn call_chaining_compiles_and_registers() {
        let mut bus = quiet_bus();
        bus.on("a", handler(|_| Ok(Value::Null)), false)
            .unwrap()
            .on("a.b", handler(|_| Ok(Value::Null)), true)
            .unwrap();

        assert_eq!(bus.handler_count("a").unwrap(), 2);
        assert_eq!(bus.async_flags("a").unwrap(), Some(vec![false, true]));
    }
}
