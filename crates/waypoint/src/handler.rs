//! Handler references.
//!
//! A route points at a [`Handler`]: either a closure with an explicit
//! [`Signature`], or an action of a [`Controller`] type. Controllers are
//! built fresh with `Default` for every dispatch.
//!
//! # Example
//!
//! ```rust
//! use waypoint::{Controller, Handler};
//! use waypoint::core::{Arguments, Signature};
//! use waypoint::extract::Request;
//!
//! #[derive(Default)]
//! struct Posts;
//!
//! impl Controller for Posts {
//!     fn signature(action: &str) -> Option<Signature> {
//!         match action {
//!             "show" => Some(Signature::new().string("id")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn call(&mut self, _action: &str, _request: &Request, _args: Arguments) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let show = Handler::action::<Posts>("show");
//! assert_eq!(show.to_string(), "Posts@show");
//!
//! let home = Handler::func(Signature::new(), |_, _| Ok(())).named("home");
//! assert_eq!(home.to_string(), "home");
//! ```

use std::any;
use std::fmt;
use std::sync::Arc;

use waypoint_core::{Arguments, Signature, WaypointError, WaypointResult};
use waypoint_extract::Request;
use waypoint_router::Method;

/// A type-erased handler closure.
pub type HandlerFn = Arc<dyn Fn(&Request, Arguments) -> anyhow::Result<()> + Send + Sync>;

/// A type-erased not-found handler.
pub type NotFoundFn = Arc<dyn Fn(&Request) -> anyhow::Result<()> + Send + Sync>;

/// A type whose actions can be routed to.
///
/// `signature` plays the part of introspection: it is asked once per route
/// when the router is built, and `None` means the action does not exist.
pub trait Controller: Default + Send + 'static {
    /// Declared parameters of `action`, or `None` for unknown actions.
    fn signature(action: &str) -> Option<Signature>;

    /// Invokes `action` with its bound arguments.
    fn call(&mut self, action: &str, request: &Request, args: Arguments) -> anyhow::Result<()>;
}

type SignatureOf = fn(&str) -> Option<Signature>;
type Invoke = fn(&str, &Request, Arguments) -> anyhow::Result<()>;

fn invoke_action<C: Controller>(action: &str, request: &Request, args: Arguments) -> anyhow::Result<()> {
    C::default().call(action, request, args)
}

fn short_type_name<C>() -> &'static str {
    let full = any::type_name::<C>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Clone)]
enum Target {
    Func {
        signature: Signature,
        func: HandlerFn,
    },
    Action {
        controller: &'static str,
        action: String,
        signature_of: SignatureOf,
        invoke: Invoke,
    },
}

/// A handler reference registered on a route.
#[derive(Clone)]
pub struct Handler {
    name: Option<String>,
    target: Target,
}

impl Handler {
    /// A closure handler with its declared parameters.
    pub fn func<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(&Request, Arguments) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: None,
            target: Target::Func {
                signature,
                func: Arc::new(func),
            },
        }
    }

    /// An action of controller `C`.
    ///
    /// Unknown actions are reported when the router is built.
    pub fn action<C: Controller>(action: impl Into<String>) -> Self {
        Self {
            name: None,
            target: Target::Action {
                controller: short_type_name::<C>(),
                action: action.into(),
                signature_of: C::signature,
                invoke: invoke_action::<C>,
            },
        }
    }

    /// Sets the name used in logs and errors.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolves the signature and checks it, once, at build time.
    pub(crate) fn resolve(self, method: Method, pattern: &str) -> WaypointResult<ResolvedHandler> {
        let name = self.to_string();
        let (signature, call) = match self.target {
            Target::Func { signature, func } => (signature, Call::Func(func)),
            Target::Action {
                controller,
                action,
                signature_of,
                invoke,
            } => {
                let signature = signature_of(&action).ok_or_else(|| {
                    WaypointError::configuration(format!(
                        "controller `{controller}` has no action `{action}` ({method} {pattern})"
                    ))
                })?;
                (signature, Call::Action { action, invoke })
            }
        };

        signature.validate().map_err(|e| {
            WaypointError::configuration_with_source(
                format!("invalid signature for `{name}` ({method} {pattern})"),
                e,
            )
        })?;

        Ok(ResolvedHandler {
            name,
            signature,
            call,
        })
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.target) {
            (Some(name), _) => f.write_str(name),
            (None, Target::Func { .. }) => f.write_str("<closure>"),
            (None, Target::Action { controller, action, .. }) => write!(f, "{controller}@{action}"),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.to_string()).finish()
    }
}

#[derive(Clone)]
enum Call {
    Func(HandlerFn),
    Action { action: String, invoke: Invoke },
}

/// A handler whose signature has been resolved.
#[derive(Clone)]
pub struct ResolvedHandler {
    name: String,
    signature: Signature,
    call: Call,
}

impl ResolvedHandler {
    /// The handler's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler's declared parameters.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn invoke(&self, request: &Request, args: Arguments) -> anyhow::Result<()> {
        match &self.call {
            Call::Func(func) => func(request, args),
            Call::Action { action, invoke } => invoke(action, request, args),
        }
    }
}

impl fmt::Debug for ResolvedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedHandler")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use waypoint_core::ErrorCategory;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counter {
        hits: usize,
    }

    impl Controller for Counter {
        fn signature(action: &str) -> Option<Signature> {
            match action {
                "bump" => Some(Signature::new().int("by")),
                "twice" => Some(Signature::new().int("a").int("a")),
                _ => None,
            }
        }

        fn call(&mut self, _action: &str, _request: &Request, args: Arguments) -> anyhow::Result<()> {
            // a fresh instance every time
            assert_eq!(self.hits, 0);
            self.hits += 1;
            let by = usize::try_from(args.int("by").unwrap_or(0))?;
            CALLS.fetch_add(by, Ordering::SeqCst);
            Ok(())
        }
    }

    fn request() -> Request {
        Request::builder("GET", "/").build().unwrap()
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Handler::action::<Counter>("bump").to_string(), "Counter@bump");
        assert_eq!(Handler::func(Signature::new(), |_, _| Ok(())).to_string(), "<closure>");
        assert_eq!(
            Handler::action::<Counter>("bump").named("bumper").to_string(),
            "bumper"
        );
    }

    #[test]
    fn test_resolve_action_and_invoke() {
        let resolved = Handler::action::<Counter>("bump")
            .resolve(Method::Post, "/count")
            .unwrap();
        assert_eq!(resolved.signature().len(), 1);

        let mut args = Arguments::new();
        args.push("by", resolved.signature().params()[0].bind(Some("3")));

        let before = CALLS.load(Ordering::SeqCst);
        resolved.invoke(&request(), args).unwrap();
        assert!(CALLS.load(Ordering::SeqCst) >= before + 3);
    }

    #[test]
    fn test_resolve_unknown_action() {
        let err = Handler::action::<Counter>("shwo")
            .resolve(Method::Get, "/count")
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("shwo"));
    }

    #[test]
    fn test_resolve_duplicate_parameter() {
        let err = Handler::action::<Counter>("twice")
            .resolve(Method::Get, "/count")
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_func_handler_errors_propagate() {
        let resolved = Handler::func(Signature::new(), |_, _| anyhow::bail!("boom"))
            .resolve(Method::Get, "/")
            .unwrap();
        let err = resolved.invoke(&request(), Arguments::new()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
