// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavior trait definition.
//!
//! A behavior intercepts reads and writes of a single setting. Behaviors are stacked
//! into a [`Behaviors`] chain; the most recently injected behavior runs outermost and the
//! raw accessor of the settings instance runs innermost.

use crate::domain::{Result, Setting, Settings, Value};
use std::fmt;
use std::sync::Arc;

/// Information passed to a behavior on every intercepted access.
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    /// The accessed setting.
    pub setting: &'a Setting,
    /// The settings instance owning the field.
    ///
    /// Behaviors may read sibling fields through it. Use
    /// [`Settings::is_being_validated`] to tell validation reads apart.
    pub owner: &'a Settings,
}

/// A read/write interceptor attached to a setting.
///
/// Every method has a pass-through default, so a behavior only implements the hooks it
/// cares about. A behavior that does not call `next` short-circuits the rest of the
/// chain.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::{Result, Value};
/// use hexsettings::ports::{AccessContext, Behavior};
///
/// /// Doubles integer values on read.
/// struct Double;
///
/// impl Behavior for Double {
///     fn get_value(
///         &self,
///         _ctx: &AccessContext<'_>,
///         next: &mut dyn FnMut() -> Result<Value>,
///     ) -> Result<Value> {
///         Ok(match next()? {
///             Value::Int(n) => Value::Int(n * 2),
///             other => other,
///         })
///     }
/// }
/// ```
pub trait Behavior: Send + Sync {
    /// Called once when the behavior is injected into a setting.
    ///
    /// Behaviors that only mark or decorate the declaration (override flags, extra
    /// validators) do their work here.
    fn attach(&self, _setting: &mut Setting) {}

    /// Intercepts a read. `next` runs the rest of the chain.
    fn get_value(
        &self,
        _ctx: &AccessContext<'_>,
        next: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        next()
    }

    /// Intercepts a write. `next` runs the rest of the chain.
    fn set_value(
        &self,
        _ctx: &AccessContext<'_>,
        value: Value,
        next: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        next(value)
    }

    /// Returns a short human readable description.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl fmt::Debug for dyn Behavior {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Behavior")
            .field(&self.describe())
            .finish()
    }
}

/// An ordered chain of behaviors, outermost first.
#[derive(Clone, Debug, Default)]
pub struct Behaviors {
    chain: Vec<Arc<dyn Behavior>>,
}

impl Behaviors {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a behavior in front of the chain, making it the outermost one.
    pub fn inject(&mut self, behavior: Arc<dyn Behavior>) {
        self.chain.insert(0, behavior);
    }

    /// Returns the number of behaviors.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Iterates over the chain, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Behavior>> {
        self.chain.iter()
    }

    /// Runs a read through the chain, ending in `terminal`.
    pub fn get(
        &self,
        ctx: &AccessContext<'_>,
        terminal: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        self.get_from(0, ctx, terminal)
    }

    /// Runs a write through the chain, ending in `terminal`.
    pub fn set(
        &self,
        ctx: &AccessContext<'_>,
        value: Value,
        terminal: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        self.set_from(0, ctx, value, terminal)
    }

    fn get_from(
        &self,
        index: usize,
        ctx: &AccessContext<'_>,
        terminal: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        match self.chain.get(index) {
            Some(behavior) => {
                behavior.get_value(ctx, &mut || self.get_from(index + 1, ctx, &mut *terminal))
            }
            None => terminal(),
        }
    }

    fn set_from(
        &self,
        index: usize,
        ctx: &AccessContext<'_>,
        value: Value,
        terminal: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        match self.chain.get(index) {
            Some(behavior) => behavior.set_value(ctx, value, &mut |v| {
                self.set_from(index + 1, ctx, v, &mut *terminal)
            }),
            None => terminal(value),
        }
    }
}
