//! Matching and dispatch.
//!
//! [`Router::run`] takes a request through `Matching` to exactly one of two
//! terminal outcomes: the first route whose pattern accepts the path is
//! invoked, or the not-found path is taken.
//!
//! Handler arguments are bound from a per-method parameter source:
//!
//! | Method | Source |
//! |---|---|
//! | GET, HEAD | path parameters |
//! | POST | url-encoded body fields |
//! | body-binding methods (PUT, PATCH, DELETE by default) | path parameters, then body fields for names the path lacks |
//! | any other | none (untyped parameters read the query string) |

use waypoint_config::{ConfigError, RoutingConfig, DEFAULT_NOT_FOUND_MESSAGE};
use waypoint_core::{Arguments, WaypointError, WaypointResult};
use waypoint_extract::{ArgumentBinder, ParameterStore, Request};
use waypoint_router::{CompiledTable, Method, Miss, Params, RouteMatch};
use waypoint_telemetry::{log_handler_error, log_route_matched, log_route_miss};

use crate::handler::{NotFoundFn, ResolvedHandler};

/// Options that shape dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Message of the terminal not-found error.
    pub not_found_message: String,
    /// Methods whose handlers also bind from url-encoded body fields.
    pub body_binding: Vec<Method>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
            body_binding: vec![Method::Put, Method::Patch, Method::Delete],
        }
    }
}

impl TryFrom<&RoutingConfig> for DispatchOptions {
    type Error = ConfigError;

    fn try_from(config: &RoutingConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            not_found_message: config.not_found_message.clone(),
            body_binding: config.body_binding_methods()?,
        })
    }
}

/// How a request was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A route's handler ran.
    Route {
        /// The matched method.
        method: Method,
        /// The matched pattern.
        pattern: String,
        /// The handler's display name.
        handler: String,
    },
    /// The not-found handler ran.
    NotFound {
        /// Why no route matched.
        reason: Miss,
    },
}

/// A frozen router.
///
/// Built by [`RouterBuilder`](crate::RouterBuilder). Read-only, so it can be
/// shared across threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use waypoint::{Dispatch, Handler, RouterBuilder};
/// use waypoint::core::Signature;
/// use waypoint::extract::Request;
/// use waypoint::router::TypeHints;
///
/// let router = RouterBuilder::new()
///     .get(
///         "/posts/{page?}",
///         Handler::func(Signature::new().int("page"), |_, args| {
///             assert_eq!(args.int("page"), Some(5));
///             Ok(())
///         })
///         .named("listPosts"),
///         TypeHints::new(),
///     )
///     .build()
///     .unwrap();
///
/// let request = Request::builder("GET", "/posts/5").build().unwrap();
/// match router.run(&request).unwrap() {
///     Dispatch::Route { handler, .. } => assert_eq!(handler, "listPosts"),
///     other => panic!("unexpected {other:?}"),
/// }
///
/// let missing = Request::builder("PUT", "/posts").build().unwrap();
/// let err = router.run(&missing).unwrap_err();
/// assert_eq!(err.to_string(), "NOT FOUND");
/// ```
pub struct Router {
    table: CompiledTable<ResolvedHandler>,
    not_found: Option<NotFoundFn>,
    options: DispatchOptions,
}

impl Router {
    pub(crate) fn new(
        table: CompiledTable<ResolvedHandler>,
        not_found: Option<NotFoundFn>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            table,
            not_found,
            options,
        }
    }

    /// The compiled route table.
    #[must_use]
    pub fn table(&self) -> &CompiledTable<ResolvedHandler> {
        &self.table
    }

    /// The dispatch options in effect.
    #[must_use]
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Number of `(method, pattern)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Finds the route for a request without invoking anything.
    pub fn resolve(&self, request: &Request) -> Result<RouteMatch<'_, ResolvedHandler>, Miss> {
        let method = request.route_method().ok_or(Miss::NoRoutesForMethod)?;
        self.table.find(method, request.path())
    }

    /// Binds a matched handler's arguments for `request`.
    #[must_use]
    pub fn bind(&self, request: &Request, matched: &RouteMatch<'_, ResolvedHandler>) -> Arguments {
        let source = self.parameter_source(matched.method, &matched.params, request);
        ArgumentBinder::new(source.as_ref(), request.query()).bind(matched.handler.signature())
    }

    /// Matches `request` and invokes the winning handler or the not-found path.
    ///
    /// # Errors
    ///
    /// - `NotFound` when nothing matched and no not-found handler is set
    /// - `Handler` when the invoked handler fails
    pub fn run(&self, request: &Request) -> WaypointResult<Dispatch> {
        let matched = match self.resolve(request) {
            Ok(matched) => matched,
            Err(reason) => return self.miss(request, reason),
        };

        let handler = matched.handler;
        let args = self.bind(request, &matched);

        log_route_matched!(matched.method, request.path(), matched.pattern, handler.name());

        if let Err(err) = handler.invoke(request, args) {
            log_handler_error!(request.method(), request.path(), handler.name(), err);
            return Err(WaypointError::handler(
                format!("handler `{}` failed", handler.name()),
                err,
            ));
        }

        Ok(Dispatch::Route {
            method: matched.method,
            pattern: matched.pattern.to_string(),
            handler: handler.name().to_string(),
        })
    }

    fn miss(&self, request: &Request, reason: Miss) -> WaypointResult<Dispatch> {
        let Some(not_found) = &self.not_found else {
            log_route_miss!(request.method(), request.path(), reason);
            return Err(WaypointError::not_found(
                self.options.not_found_message.clone(),
                request.method(),
                request.path(),
                reason,
            ));
        };

        tracing::debug!(
            http.method = request.method(),
            http.path = request.path(),
            miss_reason = reason.as_str(),
            "calling not-found handler"
        );

        not_found(request).map_err(|err| {
            log_handler_error!(request.method(), request.path(), "not_found", err);
            WaypointError::handler("not-found handler failed", err)
        })?;

        Ok(Dispatch::NotFound { reason })
    }

    fn parameter_source(&self, method: Method, params: &Params, request: &Request) -> Option<ParameterStore> {
        match method {
            method if method.is_safe() => Some(ParameterStore::from(params)),
            Method::Post => Some(request.form().clone()),
            method if self.options.body_binding.contains(&method) => {
                let mut source = request.form().clone();
                source.merge(&ParameterStore::from(params));
                Some(source)
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("not_found", &self.not_found.is_some())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Handler, RouterBuilder};
    use waypoint_core::Signature;
    use waypoint_router::TypeHints;

    fn noop(signature: Signature) -> Handler {
        Handler::func(signature, |_, _| Ok(()))
    }

    #[test]
    fn test_options_from_config() {
        let config = RoutingConfig {
            not_found_message: "Gone".to_string(),
            body_binding: vec!["patch".to_string()],
        };
        let options = DispatchOptions::try_from(&config).unwrap();
        assert_eq!(options.not_found_message, "Gone");
        assert_eq!(options.body_binding, vec![Method::Patch]);

        let config = RoutingConfig {
            body_binding: vec!["get".to_string()],
            ..RoutingConfig::default()
        };
        assert!(DispatchOptions::try_from(&config).is_err());
        assert_eq!(
            DispatchOptions::try_from(&RoutingConfig::default()).unwrap(),
            DispatchOptions::default()
        );
    }

    #[test]
    fn test_bind_sources_per_method() {
        let signature = Signature::new().untyped("id").untyped("title");
        let router = RouterBuilder::new()
            .get("/notes/{id}", noop(signature.clone()), TypeHints::new())
            .head("/notes/{id}", noop(signature.clone()), TypeHints::new())
            .post("/notes/{id}", noop(signature.clone()), TypeHints::new())
            .put("/notes/{id}", noop(signature.clone()), TypeHints::new())
            .patch("/notes/{id}", noop(signature), TypeHints::new())
            .options(DispatchOptions {
                body_binding: vec![Method::Put],
                ..DispatchOptions::default()
            })
            .build()
            .unwrap();

        let request = |method: &str| {
            Request::builder(method, "/notes/7?title=query")
                .form([("id", "form"), ("title", "body")])
                .build()
                .unwrap()
        };

        let bind = |method: &str| {
            let request = request(method);
            let matched = router.resolve(&request).unwrap();
            let args = router.bind(&request, &matched);
            (
                args.str("id").map(str::to_string),
                args.str("title").map(str::to_string),
            )
        };

        assert_eq!(bind("GET"), (Some("7".into()), None));
        assert_eq!(bind("HEAD"), (Some("7".into()), None));
        assert_eq!(bind("POST"), (Some("form".into()), Some("body".into())));
        assert_eq!(bind("PUT"), (Some("7".into()), Some("body".into())));
        // PATCH is not a body-binding method here, so untyped names read the query
        assert_eq!(bind("PATCH"), (None, Some("query".into())));
    }

    #[test]
    fn test_resolve_unknown_method() {
        let router = RouterBuilder::new()
            .get("/", noop(Signature::new()), TypeHints::new())
            .build()
            .unwrap();
        let request = Request::builder("OPTIONS", "/").build().unwrap();
        assert_eq!(router.resolve(&request).unwrap_err(), Miss::NoRoutesForMethod);

        let request = Request::builder("get", "/").build().unwrap();
        assert!(router.resolve(&request).is_ok());
    }
}
