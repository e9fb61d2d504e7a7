// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the seams of the
//! settings system: validators and behaviors attached to settings, and the sources and
//! parsers that feed values into them. These traits are implemented by adapters in
//! the adapters layer.

pub mod behavior;
pub mod parser;
pub mod source;
pub mod validator;

// Re-export commonly used types
pub use behavior::{AccessContext, Behavior, Behaviors};
pub use parser::ConfigParser;
pub use source::Source;
pub use validator::{validator_fn, ValidationContext, Validator};
