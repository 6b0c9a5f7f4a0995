//! Route registration.

use std::sync::Arc;

use waypoint_core::WaypointResult;
use waypoint_extract::Request;
use waypoint_router::{Method, RouteTable, TypeHints};

use crate::dispatch::{DispatchOptions, Router};
use crate::handler::{Controller, Handler, NotFoundFn};

/// Collects routes and builds a [`Router`].
///
/// Routes are matched per method in registration order, so register more
/// specific patterns before more general ones. Registering the same pattern
/// twice for a method keeps the last handler.
///
/// # Example
///
/// ```rust
/// use waypoint::{Handler, RouterBuilder};
/// use waypoint::core::Signature;
/// use waypoint::router::TypeHints;
///
/// let router = RouterBuilder::new()
///     .get("/", Handler::func(Signature::new(), |_, _| Ok(())), TypeHints::new())
///     .get(
///         "/users/{id}",
///         Handler::func(Signature::new().int("id"), |_, _| Ok(())),
///         [("id", "number")],
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(router.len(), 2);
/// ```
#[derive(Default)]
pub struct RouterBuilder {
    table: RouteTable<Handler>,
    not_found: Option<NotFoundFn>,
    options: DispatchOptions,
}

impl RouterBuilder {
    /// Creates an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one method.
    pub fn route(
        mut self,
        method: Method,
        pattern: impl Into<String>,
        handler: Handler,
        hints: impl Into<TypeHints>,
    ) -> Self {
        self.table.register(method, pattern, handler, hints);
        self
    }

    /// Registers a GET route.
    pub fn get(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Get, pattern, handler, hints)
    }

    /// Registers a HEAD route.
    pub fn head(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Head, pattern, handler, hints)
    }

    /// Registers a POST route.
    pub fn post(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Post, pattern, handler, hints)
    }

    /// Registers a PUT route.
    pub fn put(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Put, pattern, handler, hints)
    }

    /// Registers a PATCH route.
    pub fn patch(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Patch, pattern, handler, hints)
    }

    /// Registers a DELETE route.
    pub fn delete(self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.route(Method::Delete, pattern, handler, hints)
    }

    /// Registers the handler for every method.
    pub fn any(mut self, pattern: impl Into<String>, handler: Handler, hints: impl Into<TypeHints>) -> Self {
        self.table.any(pattern, handler, hints);
        self
    }

    /// Registers the handler for each of `methods`.
    pub fn match_methods(
        mut self,
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
        handler: Handler,
        hints: impl Into<TypeHints>,
    ) -> Self {
        self.table.match_methods(methods, pattern, handler, hints);
        self
    }

    /// Registers the REST routes of resource `name`, served by controller `C`.
    ///
    /// See [`waypoint_router::resource`] for the routes produced.
    pub fn resource<C: Controller>(mut self, name: &str) -> Self {
        self.table
            .resource(name, |action| Handler::action::<C>(action.as_str()));
        self
    }

    /// Sets the handler called when no route matches.
    pub fn not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Replaces the dispatch options.
    pub fn options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of `(method, pattern)` entries registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolves every handler, compiles every pattern and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed patterns, unknown
    /// controller actions and invalid handler signatures.
    pub fn build(self) -> WaypointResult<Router> {
        let table = self
            .table
            .try_map_handlers(|method, pattern, handler| handler.resolve(method, pattern))?
            .freeze()?;

        tracing::info!(
            routes = table.len(),
            get = table.routes_for(Method::Get).len(),
            post = table.routes_for(Method::Post).len(),
            not_found_handler = self.not_found.is_some(),
            "router built"
        );

        Ok(Router::new(table, self.not_found, self.options))
    }
}

impl std::fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("table", &self.table)
            .field("not_found", &self.not_found.is_some())
            .field("options", &self.options)
            .finish()
    }
}
