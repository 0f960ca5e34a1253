//! SQL text for table queries: identifiers come from the allow-list only, window values are parameters.

mod builder;
pub use builder::*;
