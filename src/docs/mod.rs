//! Doxygen XML documentation lookup
//!
//! This module turns a directory of Doxygen XML output into short, single-line
//! descriptions of classes and functions. Only `index.xml` is read up front;
//! per-class and per-file detail documents are parsed on demand.
//!
//! # Usage
//!
//! ```rust,no_run
//! use doxyref::{Config, DocumentationSet};
//!
//! let docs = DocumentationSet::load(&Config::default(), "3.2").unwrap();
//!
//! // Describe a class: a header line and a description line
//! if let Some(lines) = docs.get_class_description("wxString").unwrap() {
//!     for line in lines {
//!         println!("{}", line);
//!     }
//! }
//!
//! // Describe a method, optionally scoped to a class
//! let lines = docs.get_method_description("Clear", Some("wxString")).unwrap();
//! ```

mod docset;
mod emphasis;
mod reducer;
mod types;
mod xml;

pub use docset::{DocumentationSet, display_class_name};
pub use emphasis::{Emphasis, EmphasisStyle};
pub use reducer::{Reducer, ReducerRules, capitalize};
pub use types::{ClassEntry, MethodLookup, MethodMatch};
pub use xml::{ContentNode, Node, XmlError};
