//! doxyref - Doxygen API reference lookup
//!
//! Answers "describe this class / method" queries from Doxygen XML output with
//! short plain-text replies suitable for chat bots and terminals.

pub mod config;
pub mod docs;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use docs::{DocumentationSet, Emphasis, EmphasisStyle, MethodLookup};
pub use error::DocError;
pub use session::{DescribeError, Session};
