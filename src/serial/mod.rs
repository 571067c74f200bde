pub mod framer;
pub mod source;

pub use source::{LineSource, Transport};

#[cfg(test)]
pub use source::testing;
