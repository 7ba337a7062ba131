//! The boundary a chat or command host talks to.
//!
//! A [`Session`] owns the configuration and at most one active
//! [`DocumentationSet`]. Hosts call [`Session::load`] to switch API versions
//! and [`Session::describe`] to answer queries; every reply is a list of
//! single-line strings ready to be sent one message at a time.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Config;
use crate::docs::DocumentationSet;
use crate::error::DocError;

/// Why a query produced no reply lines.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    #[error("Doxygen XML has not been loaded.")]
    NotLoaded,

    #[error("Method not found in the given class or anywhere else.")]
    MethodNotFound,

    #[error("Class or method not found.")]
    NotFound,

    #[error(transparent)]
    Source(#[from] DocError),
}

pub struct Session {
    config: Config,
    docs: Option<Arc<DocumentationSet>>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, docs: None }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The active documentation set, shared with any in-flight queries.
    pub fn docs(&self) -> Option<Arc<DocumentationSet>> {
        self.docs.clone()
    }

    /// Load an API version and make it the active set.
    ///
    /// On failure the previously loaded set (if any) stays active.
    pub fn load(&mut self, api: &str) -> Result<String, DocError> {
        let start = Instant::now();
        let docs = DocumentationSet::load(&self.config, api).inspect_err(|e| {
            warn!(api, error = %e, "failed to load documentation");
        })?;

        let summary = format!(
            "{} classes and {} methods loaded in {:.2} seconds.",
            docs.class_count(),
            docs.method_count(),
            start.elapsed().as_secs_f64()
        );
        self.docs = Some(Arc::new(docs));
        Ok(summary)
    }

    /// Describe a class or method.
    ///
    /// `query` is a class, a method, or `Class::method`. When `method` is
    /// given, `query` is taken as the class to look in.
    pub fn describe(&self, query: &str, method: Option<&str>) -> Result<Vec<String>, DescribeError> {
        self.resolve(query, method, false)
    }

    /// Like [`Session::describe`] but only returns method signatures.
    pub fn signatures(&self, query: &str, method: Option<&str>) -> Result<Vec<String>, DescribeError> {
        self.resolve(query, method, true)
    }

    fn resolve(
        &self,
        query: &str,
        method: Option<&str>,
        signature_only: bool,
    ) -> Result<Vec<String>, DescribeError> {
        let docs = self.docs.as_ref().ok_or(DescribeError::NotLoaded)?;
        let (class, method) = split_query(query, method);
        debug!(api = docs.api(), class, method, "describe");

        let method_lookup = |identifier: &str, scope: Option<&str>| {
            if signature_only {
                docs.get_method_signatures(identifier, scope)
            } else {
                docs.get_method_description(identifier, scope)
            }
        };

        let reply = match method {
            Some(method) => method_lookup(method, Some(class))?.ok_or(DescribeError::MethodNotFound)?,
            None => {
                let class_reply = if signature_only {
                    None
                } else {
                    docs.get_class_description(class)?
                };
                match class_reply {
                    Some(reply) => reply,
                    None => method_lookup(class, None)?.ok_or(DescribeError::NotFound)?,
                }
            }
        };

        Ok(reply.into_iter().map(normalize_line).collect())
    }
}

/// Split `Class::method` when no explicit method was given.
pub fn split_query<'a>(query: &'a str, method: Option<&'a str>) -> (&'a str, Option<&'a str>) {
    match method {
        Some(method) => (query, Some(method)),
        None => match query.rsplit_once("::") {
            Some((class, method)) => (class, Some(method)),
            None => (query, None),
        },
    }
}

/// Reply lines go out over line-oriented transports.
fn normalize_line(line: String) -> String {
    if line.contains(['\r', '\n']) {
        line.replace(['\r', '\n'], " ")
    } else {
        line
    }
}
