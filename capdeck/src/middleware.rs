//! Hooks around every trigger

use crate::action::{Action, DispatchResult};

/// Middleware trait for observing triggers
///
/// Implement this trait to add logging, metrics, or other cross-cutting
/// concerns to a dispatcher. Hooks run on the triggering task and must not
/// block.
pub trait Middleware: Send + Sync {
    /// Called before the action's capability is invoked
    fn before(&self, action: &Action);

    /// Called after the action finished, with its result
    fn after(&self, action: &Action, result: &DispatchResult);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl Middleware for NoopMiddleware {
    fn before(&self, _action: &Action) {}
    fn after(&self, _action: &Action, _result: &DispatchResult) {}
}

/// Middleware that logs triggers through `tracing`
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before the capability runs
    pub log_before: bool,
    /// Whether to log the result
    pub log_after: bool,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Log results only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl Middleware for LoggingMiddleware {
    fn before(&self, action: &Action) {
        if self.log_before {
            tracing::debug!(action = %action.name(), kind = %action.kind(), "Triggering action");
        }
    }

    fn after(&self, action: &Action, result: &DispatchResult) {
        if !self.log_after {
            return;
        }
        match result {
            DispatchResult::Ok(outcome) => {
                tracing::debug!(action = %action.name(), ?outcome, "Action completed");
            }
            DispatchResult::Failed(failure) => {
                tracing::debug!(action = %action.name(), %failure, "Action failed");
            }
        }
    }
}

/// Compose multiple middleware into a single middleware
#[derive(Default)]
pub struct ComposedMiddleware {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl std::fmt::Debug for ComposedMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl ComposedMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Builder form of [`add`](Self::add)
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }
}

impl Middleware for ComposedMiddleware {
    fn before(&self, action: &Action) {
        for middleware in &self.middlewares {
            middleware.before(action);
        }
    }

    fn after(&self, action: &Action, result: &DispatchResult) {
        // Reverse order for proper nesting
        for middleware in self.middlewares.iter().rev() {
            middleware.after(action, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Command;
    use std::sync::{Arc, Mutex};

    struct Tracing {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Tracing {
        fn before(&self, action: &Action) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:before:{}", self.tag, action.name()));
        }

        fn after(&self, action: &Action, _result: &DispatchResult) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:after:{}", self.tag, action.name()));
        }
    }

    #[test]
    fn test_composed_nests_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = ComposedMiddleware::new()
            .with(Tracing {
                tag: "outer",
                log: log.clone(),
            })
            .with(Tracing {
                tag: "inner",
                log: log.clone(),
            });

        let action = Action::new("toggle", Command::ToggleBackground);
        composed.before(&action);
        composed.after(&action, &DispatchResult::done());

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "outer:before:toggle",
                "inner:before:toggle",
                "inner:after:toggle",
                "outer:after:toggle",
            ]
        );
    }

    #[test]
    fn test_logging_middleware_defaults() {
        let m = LoggingMiddleware::new();
        assert!(!m.log_before);
        assert!(m.log_after);

        let m = LoggingMiddleware::verbose();
        assert!(m.log_before);
    }
}
