// Internal modules
pub(crate) mod parser;
#[allow(clippy::module_inception)]
mod token;

// Public API exports
pub use token::{PayloadSegment, Token};

pub(crate) use token::{compact, signing_input};
