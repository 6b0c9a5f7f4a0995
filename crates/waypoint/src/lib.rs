//! # Waypoint
//!
//! **A request-routing engine.**
//!
//! Waypoint maps an HTTP method and path to a registered handler:
//!
//! - Route patterns with `{name}` and `{name?}` placeholders, optionally
//!   constrained by a type catalog (`number`, `uuid`, `date`, ...) or a raw
//!   regular expression
//! - Ordered, first-match-wins lookup per method, compiled once at start-up
//! - Handler arguments bound by name and coerced to `int`, `bool`, `string`
//!   or `float`, with collaborator objects built fresh per call
//! - REST resource expansion onto controller types
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = RouterBuilder::new()
//!     .get(
//!         "/users/{id}",
//!         Handler::func(Signature::new().int("id"), |_request, args| {
//!             println!("user {:?}", args.int("id"));
//!             Ok(())
//!         }),
//!         [("id", "number")],
//!     )
//!     .not_found(|request| {
//!         println!("nothing at {}", request.path());
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let request = Request::builder("GET", "/users/42").build()?;
//! router.run(&request)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RouterBuilder ──build──► Router (frozen, compiled)
//!                              │
//! Request ──► resolve ──► ArgumentBinder ──► Handler
//!                 │
//!                 └──miss──► not-found handler / NotFound error
//! ```

#![doc(html_root_url = "https://docs.rs/waypoint/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod dispatch;
mod handler;

pub use builder::RouterBuilder;
pub use dispatch::{Dispatch, DispatchOptions, Router};
pub use handler::{Controller, Handler, HandlerFn, NotFoundFn, ResolvedHandler};

// Re-export core types
pub use waypoint_core as core;

// Re-export router types
pub use waypoint_router as router;

// Re-export extraction types
pub use waypoint_extract as extract;

// Re-export configuration types
pub use waypoint_config as config;

// Re-export telemetry types
pub use waypoint_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use waypoint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Controller, Dispatch, DispatchOptions, Handler, Router, RouterBuilder};

    pub use waypoint_core::{
        Argument, Arguments, ErrorCategory, Signature, WaypointError, WaypointResult,
    };

    pub use waypoint_extract::{BodyFormat, ParameterStore, RawData, Request};

    pub use waypoint_router::{Method, Miss, TypeHints};

    pub use waypoint_config::{ConfigLoader, WaypointConfig};
}
