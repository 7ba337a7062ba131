use serde::Serialize;
use std::collections::BTreeMap;

/// A documented class and the member functions listed for it in the index.
#[derive(Debug, Clone, Serialize)]
pub struct ClassEntry {
    /// Compound refid, also the stem of the class detail file
    pub id: String,
    /// Display name with spaces and a single type-parameter marker removed
    pub name: String,
    /// Member function refid to function name
    pub methods: BTreeMap<String, String>,
}

impl ClassEntry {
    /// First method refid with the given name, if any.
    pub fn method_id(&self, name: &str) -> Option<&str> {
        self.methods
            .iter()
            .find(|(_, method)| method.as_str() == name)
            .map(|(id, _)| id.as_str())
    }
}

/// One candidate produced by method resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodMatch {
    pub id: String,
    pub name: String,
    /// Owning class display name, empty for free functions
    pub scope: String,
}

impl MethodMatch {
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.scope, self.name)
    }
}

/// Outcome of resolving a method identifier against the index tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodLookup {
    Unique(MethodMatch),
    /// Same name found in several classes (or a class and the global scope)
    Ambiguous(Vec<MethodMatch>),
    NotFound,
}

impl MethodLookup {
    /// Single reply line listing every candidate.
    pub fn summary(candidates: &[MethodMatch]) -> String {
        let names: Vec<String> = candidates.iter().map(MethodMatch::qualified_name).collect();
        format!("{} methods found: {}", candidates.len(), names.join(", "))
    }
}
