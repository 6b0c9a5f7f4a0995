//! # Waypoint Extract
//!
//! Request data for the Waypoint routing engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Request`] | Method, path, host, headers, query/form fields and body of a request |
//! | [`ParameterStore`] | Ordered key-value bag with lenient typed getters and filters |
//! | [`ArgumentBinder`] | Resolves a handler signature into positional arguments |
//!
//! ## Example
//!
//! ```rust
//! use waypoint_core::Signature;
//! use waypoint_extract::{ArgumentBinder, Request};
//!
//! let request = Request::builder("POST", "/comments?draft=1")
//!     .form([("body", "Nice post"), ("rating", "5 stars")])
//!     .build()
//!     .unwrap();
//!
//! let signature = Signature::new().string("body").int("rating").bool("draft");
//! let args = ArgumentBinder::new(Some(request.form()), request.query()).bind(&signature);
//!
//! assert_eq!(args.str("body"), Some("Nice post"));
//! assert_eq!(args.int("rating"), Some(5));
//! assert_eq!(args.bool("draft"), Some(true));
//! ```
//!
//! ## Error Handling
//!
//! Building a request or decoding its body returns [`ExtractionError`], which
//! records which part of the request failed.

#![doc(html_root_url = "https://docs.rs/waypoint-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod error;
mod request;
mod store;
mod xml;

pub use binder::ArgumentBinder;
pub use error::{ExtractionError, ExtractionSource};
pub use request::{BodyFormat, RawData, Request, RequestBuilder};
pub use store::{Filter, ParameterStore};
