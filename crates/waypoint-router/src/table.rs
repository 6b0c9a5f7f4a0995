//! Route registration and the frozen, compiled route table.
//!
//! Routes are collected in a [`RouteTable`] during start-up and then frozen
//! into a [`CompiledTable`], which compiles every pattern exactly once per
//! `(method, pattern)` and is read-only from then on.

use indexmap::IndexMap;

use crate::error::PatternError;
use crate::method::{Method, MethodMap};
use crate::pattern::{CompiledPattern, TypeHints, NO_HINTS};
use crate::resource::{ResourceAction, RESOURCE_ID, RESOURCE_ID_TYPE, RESOURCE_ROUTES};
use crate::{Miss, RouteMatch};

/// Routes registered per method, in registration order.
///
/// Registering the same pattern twice for one method replaces the handler
/// but keeps the pattern's original position. Type annotations are keyed by
/// pattern alone, so a pattern reused across methods shares one annotation
/// set.
///
/// # Example
///
/// ```rust
/// use waypoint_router::{Method, RouteTable, TypeHints};
///
/// let mut table = RouteTable::new();
/// table.get("/users", "listUsers", TypeHints::new());
/// table.get("/users/{id}", "getUser", [("id", "number")]);
/// table.post("/users", "createUser", TypeHints::new());
///
/// let gets: Vec<_> = table.routes_for(Method::Get).map(|(p, _)| p).collect();
/// assert_eq!(gets, vec!["/users", "/users/{id}"]);
/// assert_eq!(table.type_hints_for("/users/{id}").get("id"), Some("number"));
/// assert_eq!(table.routes_for(Method::Put).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: MethodMap<IndexMap<String, H>>,
    type_hints: IndexMap<String, TypeHints>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: MethodMap::new(),
            type_hints: IndexMap::new(),
        }
    }

    /// Registers a handler for one method and pattern.
    ///
    /// Non-empty `hints` replace the annotation set stored for `pattern`.
    pub fn register(
        &mut self,
        method: Method,
        pattern: impl Into<String>,
        handler: H,
        hints: impl Into<TypeHints>,
    ) -> &mut Self {
        let pattern = pattern.into();
        let hints = hints.into();

        tracing::debug!(method = %method, pattern = %pattern, "registering route");

        if !hints.is_empty() {
            self.type_hints.insert(pattern.clone(), hints);
        }
        self.routes
            .get_or_insert_with(method, IndexMap::new)
            .insert(pattern, handler);
        self
    }

    /// Registers a GET route.
    pub fn get(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Get, pattern, handler, hints)
    }

    /// Registers a HEAD route.
    pub fn head(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Head, pattern, handler, hints)
    }

    /// Registers a POST route.
    pub fn post(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Post, pattern, handler, hints)
    }

    /// Registers a PUT route.
    pub fn put(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Put, pattern, handler, hints)
    }

    /// Registers a PATCH route.
    pub fn patch(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Patch, pattern, handler, hints)
    }

    /// Registers a DELETE route.
    pub fn delete(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.register(Method::Delete, pattern, handler, hints)
    }

    /// Returns the `(pattern, handler)` pairs for a method in registration order.
    pub fn routes_for(&self, method: Method) -> impl Iterator<Item = (&str, &H)> {
        self.routes
            .get(method)
            .into_iter()
            .flat_map(|routes| routes.iter().map(|(p, h)| (p.as_str(), h)))
    }

    /// Returns the annotation set for a pattern (empty if none was registered).
    #[must_use]
    pub fn type_hints_for(&self, pattern: &str) -> &TypeHints {
        self.type_hints.get(pattern).unwrap_or(&NO_HINTS)
    }

    /// Returns the total number of `(method, pattern)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.iter().map(|(_, routes)| routes.len()).sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts every handler, keeping patterns, order and annotations.
    pub fn try_map_handlers<U, E>(
        self,
        mut f: impl FnMut(Method, &str, H) -> Result<U, E>,
    ) -> Result<RouteTable<U>, E> {
        let routes = self.routes.try_map(|method, routes| {
            routes
                .into_iter()
                .map(|(pattern, handler)| {
                    f(method, &pattern, handler).map(|handler| (pattern, handler))
                })
                .collect::<Result<IndexMap<_, _>, E>>()
        })?;
        Ok(RouteTable {
            routes,
            type_hints: self.type_hints,
        })
    }

    /// Compiles every pattern and returns the read-only table.
    pub fn freeze(self) -> Result<CompiledTable<H>, PatternError> {
        let type_hints = self.type_hints;
        let routes = self.routes.try_map(|_, routes| {
            routes
                .into_iter()
                .map(|(pattern, handler)| {
                    let hints = type_hints.get(&pattern).unwrap_or(&NO_HINTS);
                    CompiledPattern::compile(&pattern, hints)
                        .map(|matcher| CompiledRoute { matcher, handler })
                })
                .collect::<Result<Vec<_>, PatternError>>()
        })?;
        Ok(CompiledTable { routes })
    }
}

impl<H: Clone> RouteTable<H> {
    /// Registers the handler for every method.
    pub fn any(&mut self, pattern: impl Into<String>, handler: H, hints: impl Into<TypeHints>) -> &mut Self {
        self.match_methods(Method::ALL, pattern, handler, hints)
    }

    /// Registers the handler for each of the given methods.
    pub fn match_methods(
        &mut self,
        methods: impl IntoIterator<Item = Method>,
        pattern: impl Into<String>,
        handler: H,
        hints: impl Into<TypeHints>,
    ) -> &mut Self {
        let pattern = pattern.into();
        let hints = hints.into();
        for method in methods {
            self.register(method, pattern.clone(), handler.clone(), hints.clone());
        }
        self
    }

    /// Registers the canonical REST routes for a resource.
    ///
    /// `handler_for` is called once per route definition with the action to
    /// invoke. See [`crate::resource`] for the expansion.
    pub fn resource(
        &mut self,
        name: &str,
        mut handler_for: impl FnMut(ResourceAction) -> H,
    ) -> &mut Self {
        for route in &RESOURCE_ROUTES {
            let hints = if route.has_id() {
                TypeHints::new().with(RESOURCE_ID, RESOURCE_ID_TYPE)
            } else {
                TypeHints::new()
            };
            let handler = handler_for(route.action);
            self.match_methods(route.methods.iter().copied(), route.pattern(name), handler, hints);
        }
        self
    }
}

/// A registered route with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledRoute<H> {
    matcher: CompiledPattern,
    handler: H,
}

impl<H> CompiledRoute<H> {
    /// The route pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// The compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &CompiledPattern {
        &self.matcher
    }

    /// The route's handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// A frozen route table with every pattern compiled.
///
/// Matching is a linear scan of the method's routes in registration order;
/// the first pattern that accepts the path wins.
///
/// # Example
///
/// ```rust
/// use waypoint_router::{Method, Miss, RouteTable, TypeHints};
///
/// let mut table = RouteTable::new();
/// table.get("/posts/{page?}", "listPosts", TypeHints::new());
/// let table = table.freeze().unwrap();
///
/// let m = table.find(Method::Get, "/posts/5").unwrap();
/// assert_eq!(*m.handler, "listPosts");
/// assert_eq!(m.params.get("page"), Some("5"));
///
/// assert_eq!(table.find(Method::Get, "/users").unwrap_err(), Miss::NoPatternMatched);
/// assert_eq!(table.find(Method::Put, "/posts").unwrap_err(), Miss::NoRoutesForMethod);
/// ```
#[derive(Debug, Clone)]
pub struct CompiledTable<H> {
    routes: MethodMap<Vec<CompiledRoute<H>>>,
}

impl<H> CompiledTable<H> {
    /// Finds the first route for `method` whose pattern accepts `path`.
    pub fn find(&self, method: Method, path: &str) -> Result<RouteMatch<'_, H>, Miss> {
        let routes = self
            .routes
            .get(method)
            .filter(|routes| !routes.is_empty())
            .ok_or(Miss::NoRoutesForMethod)?;

        let route = routes
            .iter()
            .find(|route| route.matcher.is_match(path))
            .ok_or(Miss::NoPatternMatched)?;

        tracing::debug!(method = %method, path, pattern = route.pattern(), "route matched");

        Ok(RouteMatch::new(
            method,
            route.pattern(),
            &route.handler,
            route.matcher.extract(path),
        ))
    }

    /// Returns the compiled routes for a method in registration order.
    #[must_use]
    pub fn routes_for(&self, method: Method) -> &[CompiledRoute<H>] {
        self.routes.get(method).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of `(method, pattern)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.iter().map(|(_, routes)| routes.len()).sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn none() -> TypeHints {
        TypeHints::new()
    }

    #[test]
    fn test_table_new() {
        let table: RouteTable<&str> = RouteTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.routes_for(Method::Get).count(), 0);
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut table = RouteTable::new();
        table
            .get("/b", "b", none())
            .get("/a", "a", none())
            .get("/c", "c", none());

        let patterns: Vec<_> = table.routes_for(Method::Get).map(|(p, _)| p).collect();
        assert_eq!(patterns, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_reregistration_replaces_in_place() {
        let mut table = RouteTable::new();
        table
            .get("/a", "first", none())
            .get("/b", "b", none())
            .get("/a", "second", none());

        let routes: Vec<_> = table.routes_for(Method::Get).collect();
        assert_eq!(routes, vec![("/a", &"second"), ("/b", &"b")]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_hints_shared_across_methods() {
        let mut table = RouteTable::new();
        table.get("/items/{id}", "show", [("id", "number")]);
        table.delete("/items/{id}", "destroy", [("id", "uuid")]);

        assert_eq!(table.type_hints_for("/items/{id}").get("id"), Some("uuid"));
        assert!(table.type_hints_for("/nothing").is_empty());
    }

    #[test]
    fn test_empty_hints_keep_existing() {
        let mut table = RouteTable::new();
        table.get("/items/{id}", "show", [("id", "number")]);
        table.head("/items/{id}", "show", none());

        assert_eq!(table.type_hints_for("/items/{id}").get("id"), Some("number"));
    }

    #[test]
    fn test_any_registers_every_method() {
        let mut table = RouteTable::new();
        table.any("/ping", "ping", none());

        for method in Method::ALL {
            assert_eq!(table.routes_for(method).count(), 1, "{method}");
        }
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_match_methods_subset() {
        let mut table = RouteTable::new();
        table.match_methods([Method::Get, Method::Post], "/form", "form", none());

        assert_eq!(table.routes_for(Method::Get).count(), 1);
        assert_eq!(table.routes_for(Method::Post).count(), 1);
        assert_eq!(table.routes_for(Method::Put).count(), 0);
    }

    #[test]
    fn test_resource_expansion() {
        let mut table = RouteTable::new();
        table.resource("posts", |action| action);

        assert_eq!(table.len(), 12);
        assert_eq!(table.type_hints_for("/posts/{id}").get("id"), Some("uuid"));
        assert_eq!(table.type_hints_for("/posts/{id}/edit").get("id"), Some("uuid"));
        assert!(table.type_hints_for("/posts").is_empty());

        let gets: Vec<_> = table
            .routes_for(Method::Get)
            .map(|(p, a)| (p, *a))
            .collect();
        assert_eq!(
            gets,
            vec![
                ("/posts", ResourceAction::Index),
                ("/posts/create", ResourceAction::Create),
                ("/posts/{id}", ResourceAction::Show),
                ("/posts/{id}/edit", ResourceAction::Edit),
            ]
        );
        let puts: Vec<_> = table.routes_for(Method::Put).map(|(_, a)| *a).collect();
        assert_eq!(puts, vec![ResourceAction::Update]);
        let deletes: Vec<_> = table.routes_for(Method::Delete).map(|(_, a)| *a).collect();
        assert_eq!(deletes, vec![ResourceAction::Destroy]);
    }

    #[test]
    fn test_freeze_and_find() {
        let mut table = RouteTable::new();
        table.get("/users", "list", none());
        table.get("/users/{id}", "show", [("id", "uuid")]);
        let table = table.freeze().unwrap();

        let m = table.find(Method::Get, "/users").unwrap();
        assert_eq!(*m.handler, "list");
        assert!(m.params.is_empty());

        let path = format!("/users/{UUID}");
        let m = table.find(Method::Get, &path).unwrap();
        assert_eq!(*m.handler, "show");
        assert_eq!(m.pattern, "/users/{id}");
        assert_eq!(m.method, Method::Get);
        assert_eq!(m.params.get("id"), Some(UUID));

        assert_eq!(
            table.find(Method::Get, "/users/abc").unwrap_err(),
            Miss::NoPatternMatched
        );
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = RouteTable::new();
        table.get("/users/{name}", "general", none());
        table.get("/users/me", "specific", none());
        let table = table.freeze().unwrap();

        assert_eq!(*table.find(Method::Get, "/users/me").unwrap().handler, "general");
    }

    #[test]
    fn test_unregistered_method_misses() {
        let mut table = RouteTable::new();
        table.get("/", "home", none());
        let table = table.freeze().unwrap();

        assert_eq!(table.find(Method::Put, "/").unwrap_err(), Miss::NoRoutesForMethod);
    }

    #[test]
    fn test_root_route_rejects_double_slash() {
        let mut table = RouteTable::new();
        table.get("/", "home", none());
        let table = table.freeze().unwrap();

        assert!(table.find(Method::Get, "/").is_ok());
        assert_eq!(table.find(Method::Get, "//").unwrap_err(), Miss::NoPatternMatched);
    }

    #[test]
    fn test_freeze_reports_bad_pattern() {
        let mut table = RouteTable::new();
        table.get("/ok", "ok", none());
        table.post("/broken/{id", "broken", none());

        let err = table.freeze().unwrap_err();
        assert_eq!(err.pattern(), "/broken/{id");
    }

    #[test]
    fn test_try_map_handlers() {
        let mut table = RouteTable::new();
        table.get("/a", "1", none());
        table.post("/b", "2", [("x", "number")]);

        let mapped = table
            .clone()
            .try_map_handlers(|_, _, h| h.parse::<u8>())
            .unwrap();
        let posts: Vec<_> = mapped.routes_for(Method::Post).collect();
        assert_eq!(posts, vec![("/b", &2)]);
        assert_eq!(mapped.type_hints_for("/b").get("x"), Some("number"));

        table.put("/c", "x", none());
        assert!(table.try_map_handlers(|_, _, h| h.parse::<u8>()).is_err());
    }

    #[test]
    fn test_compiled_routes_for() {
        let mut table = RouteTable::new();
        table.get("/a", 1, none()).get("/b", 2, none());
        let table = table.freeze().unwrap();

        let patterns: Vec<_> = table.routes_for(Method::Get).iter().map(CompiledRoute::pattern).collect();
        assert_eq!(patterns, vec!["/a", "/b"]);
        assert!(table.routes_for(Method::Patch).is_empty());
        assert_eq!(table.len(), 2);
    }
}
