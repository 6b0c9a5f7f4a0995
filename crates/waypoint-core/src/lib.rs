//! # Waypoint Core
//!
//! Core types shared by the Waypoint routing engine.
//!
//! - [`WaypointError`] - Error taxonomy (configuration, not found, handler)
//! - [`Signature`] - Declared parameter list of a handler
//! - [`Arguments`] - Positional arguments bound for one invocation
//! - [`Primitive`] / [`Value`] - Lenient primitive coercion

#![doc(html_root_url = "https://docs.rs/waypoint-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
mod error;
mod handler;

pub use coerce::{Primitive, Value};
pub use error::{ErrorCategory, WaypointError, WaypointResult};
pub use handler::{Argument, Arguments, ObjectType, ParamKind, ParamSpec, Signature};
