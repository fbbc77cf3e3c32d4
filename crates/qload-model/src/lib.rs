//! Value types shared across the qload workspace.
//!
//! Everything here is a pure value: messages as handed over by the transport, directives parsed out of their bodies and the small enums used to configure execution.

mod domain;
pub use domain::*;

mod kind;
pub use kind::*;

mod parse;
pub use parse::{parse, parse_span};

mod error;
pub use error::{DirectiveError, InvalidCancelMode};
