//! # Command Routing
//!
//! A [`CommandRegistry`] maps command names to handlers that all share one
//! statically known signature. Each nesting level of the CLI builds its own
//! registry with the signature it needs:
//!
//! - the root level hands the remaining argument count and vector to a tool
//!   driver: `CommandRegistry<(usize, Vec<String>), String>`
//! - each tool hands a single parsed string to an operation:
//!   `CommandRegistry<(String,), String>`
//!
//! The argument list is modelled as a tuple so that a handler's arity is
//! checked at compile time. Any `FnMut` closure whose parameters match the
//! tuple's elements implements [`Handler`] for that tuple.
//!
//! ```
//! use statetool::router::{CommandRegistry, Dispatch};
//!
//! let mut registry: CommandRegistry<(u32, u32), u32> = CommandRegistry::new();
//! registry.register("add", |a: u32, b: u32| Ok(a + b));
//!
//! assert!(matches!(registry.dispatch("add", (2, 3)), Ok(Dispatch::Invoked(5))));
//! assert!(matches!(registry.dispatch("sub", (2, 3)), Ok(Dispatch::NotFound)));
//! ```

use crate::error::{Result, StatetoolError};
use std::collections::BTreeMap;
use tracing::debug;

/// A callable accepting the argument tuple `Args` and producing `R`.
pub trait Handler<Args, R> {
    fn call(&mut self, args: Args) -> Result<R>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Handler<($($arg,)*), R> for F
        where
            F: FnMut($($arg),*) -> Result<R>,
        {
            #[allow(non_snake_case)]
            fn call(&mut self, ($($arg,)*): ($($arg,)*)) -> Result<R> {
                self($($arg),*)
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);
impl_handler!(A, B, C, D);

/// Outcome of [`CommandRegistry::dispatch`].
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<R> {
    /// The named handler ran and returned this value.
    Invoked(R),
    /// No handler is registered under the name.
    NotFound,
}

pub struct CommandRegistry<'a, Args, R = ()> {
    handlers: BTreeMap<String, Box<dyn Handler<Args, R> + 'a>>,
}

impl<'a, Args, R> Default for CommandRegistry<'a, Args, R> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<'a, Args, R> CommandRegistry<'a, Args, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. A handler already registered under
    /// the same name is replaced.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: Handler<Args, R> + 'a,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler registered under `name`, moving `args` into it.
    ///
    /// Errors returned by the handler are propagated unchanged.
    pub fn dispatch(&mut self, name: &str, args: Args) -> Result<Dispatch<R>> {
        match self.handlers.get_mut(name) {
            Some(handler) => {
                debug!(command = name, "dispatching");
                handler.call(args).map(Dispatch::Invoked)
            }
            None => {
                debug!(command = name, "no handler registered");
                Ok(Dispatch::NotFound)
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch), but an unknown name becomes an
    /// "Invalid subcommand" error listing the registered names.
    pub fn dispatch_or_usage(&mut self, name: &str, args: Args) -> Result<R> {
        match self.dispatch(name, args)? {
            Dispatch::Invoked(output) => Ok(output),
            Dispatch::NotFound => Err(StatetoolError::unknown_command(
                "Invalid subcommand",
                self.names(),
            )),
        }
    }
}
