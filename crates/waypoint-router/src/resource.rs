//! REST resource expansion.
//!
//! `resource("posts", ...)` expands to the canonical controller actions:
//!
//! | Action | Methods | Pattern |
//! |---|---|---|
//! | index | GET, HEAD | `/posts` |
//! | store | POST | `/posts` |
//! | create | GET, HEAD | `/posts/create` |
//! | show | GET, HEAD | `/posts/{id}` |
//! | edit | GET, HEAD | `/posts/{id}/edit` |
//! | update | PUT | `/posts/{id}` |
//! | update | PATCH | `/posts/{id}` |
//! | destroy | DELETE | `/posts/{id}` |
//!
//! `{id}` is constrained to the `uuid` type wherever it appears.

use std::fmt;

use crate::method::Method;

/// Name of the placeholder carrying the resource identifier.
pub const RESOURCE_ID: &str = "id";

/// Type constraint applied to [`RESOURCE_ID`].
pub const RESOURCE_ID_TYPE: &str = "uuid";

/// A canonical controller action of a REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    /// List the collection.
    Index,
    /// Show the creation form.
    Create,
    /// Persist a new member.
    Store,
    /// Show one member.
    Show,
    /// Show the edit form of one member.
    Edit,
    /// Modify one member.
    Update,
    /// Remove one member.
    Destroy,
}

impl ResourceAction {
    /// Returns the action's method name on a controller.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Store => "store",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One route definition produced by resource expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRoute {
    /// The controller action invoked.
    pub action: ResourceAction,
    /// Methods the route is registered for.
    pub methods: &'static [Method],
    /// Pattern suffix appended to `/{name}`.
    pub suffix: &'static str,
}

impl ResourceRoute {
    /// Builds the full pattern for a resource name.
    #[must_use]
    pub fn pattern(&self, name: &str) -> String {
        format!("/{}{}", name.trim_matches('/'), self.suffix)
    }

    /// Returns true if the pattern carries the `{id}` placeholder.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.suffix.contains("{id}")
    }
}

const READ: &[Method] = &[Method::Get, Method::Head];

/// The route definitions `resource` registers, in registration order.
pub const RESOURCE_ROUTES: [ResourceRoute; 8] = [
    ResourceRoute {
        action: ResourceAction::Index,
        methods: READ,
        suffix: "",
    },
    ResourceRoute {
        action: ResourceAction::Store,
        methods: &[Method::Post],
        suffix: "",
    },
    ResourceRoute {
        action: ResourceAction::Create,
        methods: READ,
        suffix: "/create",
    },
    ResourceRoute {
        action: ResourceAction::Show,
        methods: READ,
        suffix: "/{id}",
    },
    ResourceRoute {
        action: ResourceAction::Edit,
        methods: READ,
        suffix: "/{id}/edit",
    },
    ResourceRoute {
        action: ResourceAction::Update,
        methods: &[Method::Put],
        suffix: "/{id}",
    },
    ResourceRoute {
        action: ResourceAction::Update,
        methods: &[Method::Patch],
        suffix: "/{id}",
    },
    ResourceRoute {
        action: ResourceAction::Destroy,
        methods: &[Method::Delete],
        suffix: "/{id}",
    },
];
