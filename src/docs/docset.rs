//! One loaded version of Doxygen XML documentation.
//!
//! Loading reads only `index.xml` and builds the class and free-function
//! tables. Detail files (`<refid>.xml`) are parsed when a query needs them,
//! either fresh every time or through a per-set read-through cache.

use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Instant,
};
use tracing::{debug, info, trace};

use super::emphasis::Emphasis;
use super::reducer::{Reducer, ReducerRules};
use super::types::{ClassEntry, MethodLookup, MethodMatch};
use super::xml::{ContentNode, XmlError};
use crate::config::Config;
use crate::error::DocError;

lazy_static! {
    /// Trailing single type-parameter marker, e.g. the `<T>` in `wxArray<T>`.
    static ref TYPE_PARAM_SUFFIX: Regex = Regex::new(r"^(.+)<\w>$").unwrap();
}

const INDEX_FILE: &str = "index.xml";

type DetailCache = Mutex<HashMap<PathBuf, Arc<ContentNode>>>;

pub struct DocumentationSet {
    api: String,
    dir: PathBuf,
    classes: BTreeMap<String, ClassEntry>,
    methods: BTreeMap<String, String>,
    method_count: usize,
    rules: ReducerRules,
    emphasis: Arc<dyn Emphasis>,
    cache: Option<DetailCache>,
}

impl std::fmt::Debug for DocumentationSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentationSet")
            .field("api", &self.api)
            .field("dir", &self.dir)
            .field("classes", &self.classes.len())
            .field("methods", &self.method_count)
            .finish()
    }
}

impl DocumentationSet {
    /// Load `<docs_root>/<api>/index.xml` and build the lookup tables.
    pub fn load(config: &Config, api: &str) -> Result<Self, DocError> {
        let start = Instant::now();
        let dir = config.api_dir(api);
        let index = read_document(&dir.join(INDEX_FILE), "doxygenindex")?;

        let mut classes = BTreeMap::new();
        let mut methods = BTreeMap::new();
        let mut method_count = 0;

        for compound in index.children_named("compound") {
            let Some(refid) = compound.attr("refid") else {
                continue;
            };
            match compound.attr("kind") {
                Some("class") => {
                    let class_methods: BTreeMap<String, String> = functions(compound).collect();
                    method_count += class_methods.len();
                    classes.insert(
                        refid.to_string(),
                        ClassEntry {
                            id: refid.to_string(),
                            name: display_class_name(&compound.child_text("name")),
                            methods: class_methods,
                        },
                    );
                }
                Some("file") | Some("group") => {
                    for (id, name) in functions(compound) {
                        // A free function shows up under every file and group
                        // that declares it; the first one wins.
                        methods.entry(id).or_insert(name);
                    }
                }
                _ => {}
            }
        }
        method_count += methods.len();

        info!(
            api,
            classes = classes.len(),
            methods = method_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "documentation index loaded"
        );

        Ok(Self {
            api: api.to_string(),
            dir,
            classes,
            methods,
            method_count,
            rules: config.reducer.clone(),
            emphasis: Arc::new(config.emphasis),
            cache: config.cache_details.then(|| Mutex::new(HashMap::new())),
        })
    }

    /// Replace the emphasis used for names, signatures and section labels.
    pub fn with_emphasis(mut self, emphasis: Arc<dyn Emphasis>) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Member functions of all classes plus free functions.
    pub fn method_count(&self) -> usize {
        self.method_count
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values()
    }

    /// Free function refid to name.
    pub fn global_methods(&self) -> &BTreeMap<String, String> {
        &self.methods
    }

    /// First class (in refid order) with the given display name.
    pub fn find_class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.values().find(|class| class.name == name)
    }

    /// Header line and description for a class, `None` if no class has that name.
    pub fn get_class_description(&self, name: &str) -> Result<Option<Vec<String>>, DocError> {
        let Some(class) = self.find_class(name) else {
            return Ok(None);
        };
        trace!(class = %class.name, id = %class.id, "describing class");

        let (path, doc) = self.load_detail(&class.id)?;
        let compound = compound_def(&doc, &path)?;

        let mut header = vec![self.emphasis.emphasize(&class.name)];
        if let Some(includes) = compound.first_child("includes") {
            header.push(format!("[#include \"{}\"]", includes.text()));
        }
        if let Some(bases) = self.emphasized_list(compound, "basecompoundref") {
            header.push(format!("(Super-classes: {})", bases));
        }
        if let Some(derived) = self.emphasized_list(compound, "derivedcompoundref") {
            header.push(format!("(Sub-classes: {})", derived));
        }

        Ok(Some(vec![header.join(" "), self.body(compound, &class.name)]))
    }

    /// Resolve a method name without rendering anything.
    ///
    /// Without a scope a free function wins outright; otherwise every class
    /// is searched. With a scope the named class is tried first, then the
    /// free functions and every class. Base classes are not walked.
    pub fn find_method(&self, identifier: &str, scope: Option<&str>) -> MethodLookup {
        match scope {
            None => {
                if let Some(found) = self.global_match(identifier) {
                    return MethodLookup::Unique(found);
                }
                self.search_all(identifier, false)
            }
            Some(scope) => {
                let direct = self.classes.values().find_map(|class| {
                    if class.name != scope {
                        return None;
                    }
                    class.method_id(identifier).map(|id| MethodMatch {
                        id: id.to_string(),
                        name: identifier.to_string(),
                        scope: class.name.clone(),
                    })
                });
                match direct {
                    Some(found) => MethodLookup::Unique(found),
                    None => {
                        trace!(identifier, scope, "not in scope, searching everywhere");
                        self.search_all(identifier, true)
                    }
                }
            }
        }
    }

    /// Signatures and description of a method, a one-line list of candidates
    /// when the name is ambiguous, or `None` when nothing matches.
    pub fn get_method_description(
        &self,
        identifier: &str,
        scope: Option<&str>,
    ) -> Result<Option<Vec<String>>, DocError> {
        self.render_lookup(self.find_method(identifier, scope), false)
    }

    /// Like [`DocumentationSet::get_method_description`] without the description.
    pub fn get_method_signatures(
        &self,
        identifier: &str,
        scope: Option<&str>,
    ) -> Result<Option<Vec<String>>, DocError> {
        self.render_lookup(self.find_method(identifier, scope), true)
    }

    fn render_lookup(
        &self,
        lookup: MethodLookup,
        signature_only: bool,
    ) -> Result<Option<Vec<String>>, DocError> {
        match lookup {
            MethodLookup::NotFound => Ok(None),
            MethodLookup::Unique(found) => self.method_reply(&found.id, signature_only).map(Some),
            MethodLookup::Ambiguous(candidates) => Ok(Some(vec![MethodLookup::summary(&candidates)])),
        }
    }

    /// Render the member with the given refid plus its same-named overloads.
    pub fn method_reply(&self, id: &str, signature_only: bool) -> Result<Vec<String>, DocError> {
        let stem = id.rsplit_once('_').map_or(id, |(stem, _)| stem);
        let (path, doc) = self.load_detail(stem)?;
        let compound = compound_def(&doc, &path)?;

        let members: Vec<&ContentNode> = compound
            .children_named("sectiondef")
            .flat_map(|section| section.children_named("memberdef"))
            .collect();
        let canonical = members
            .iter()
            .find(|member| member.attr("id") == Some(id))
            .ok_or_else(|| DocError::MissingMember {
                id: id.to_string(),
                path: path.clone(),
            })?;
        let name = canonical.child_text("name");

        let mut details = vec![self.signature(canonical)];
        details.extend(
            members
                .iter()
                .filter(|member| member.attr("id") != Some(id) && member.child_text("name") == name)
                .map(|member| self.signature(member)),
        );

        if !signature_only {
            details.push(self.body(canonical, &name));
        }
        Ok(details)
    }

    fn global_match(&self, identifier: &str) -> Option<MethodMatch> {
        self.methods
            .iter()
            .find(|(_, name)| name.as_str() == identifier)
            .map(|(id, name)| MethodMatch {
                id: id.clone(),
                name: name.clone(),
                scope: String::new(),
            })
    }

    /// Collect at most one candidate per source; overloads within a source
    /// are picked up later when the winner is rendered.
    fn search_all(&self, identifier: &str, include_global: bool) -> MethodLookup {
        let mut found: Vec<MethodMatch> = Vec::new();

        if include_global {
            found.extend(self.global_match(identifier));
        }
        for class in self.classes.values() {
            if let Some(id) = class.method_id(identifier) {
                if found.iter().all(|existing| existing.id != id) {
                    found.push(MethodMatch {
                        id: id.to_string(),
                        name: identifier.to_string(),
                        scope: class.name.clone(),
                    });
                }
            }
        }

        match found.len() {
            0 => MethodLookup::NotFound,
            1 => MethodLookup::Unique(found.remove(0)),
            _ => MethodLookup::Ambiguous(found),
        }
    }

    fn signature(&self, member: &ContentNode) -> String {
        let definition = member.child_text("definition");
        let args = member.child_text("argsstring");
        self.emphasis.emphasize(&format!("{}{}", definition, args))
    }

    /// Brief plus detailed description, or a fallback naming the entity.
    fn body(&self, node: &ContentNode, name: &str) -> String {
        let reducer = Reducer::new(&self.rules, self.emphasis.as_ref());
        let brief = reducer.reduce_opt(node.first_child("briefdescription"));
        let detailed = reducer.reduce_opt(node.first_child("detaileddescription"));
        let full = format!("{} {}", brief, detailed).trim().to_string();
        if full.is_empty() {
            format!("{} has no description.", name)
        } else {
            full
        }
    }

    fn emphasized_list(&self, compound: &ContentNode, tag: &str) -> Option<String> {
        let names: Vec<String> = compound
            .children_named(tag)
            .map(|reference| self.emphasis.emphasize(&reference.text()))
            .collect();
        (!names.is_empty()).then(|| names.join(", "))
    }

    fn load_detail(&self, stem: &str) -> Result<(PathBuf, Arc<ContentNode>), DocError> {
        let path = self.dir.join(format!("{}.xml", stem));

        let Some(cache) = &self.cache else {
            let doc = read_document(&path, "doxygen")?;
            return Ok((path, Arc::new(doc)));
        };

        if let Some(doc) = lock(cache).get(&path) {
            debug!(path = %path.display(), "detail cache hit");
            return Ok((path, Arc::clone(doc)));
        }
        let doc = Arc::new(read_document(&path, "doxygen")?);
        lock(cache).entry(path.clone()).or_insert_with(|| Arc::clone(&doc));
        Ok((path, doc))
    }
}

fn lock(cache: &DetailCache) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<ContentNode>>> {
    // Entries are immutable once inserted, so a poisoned map is still valid.
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `(refid, name)` of every function member listed under an index compound.
fn functions(compound: &ContentNode) -> impl Iterator<Item = (String, String)> + '_ {
    compound
        .children_named("member")
        .filter(|member| member.attr("kind") == Some("function"))
        .filter_map(|member| {
            let refid = member.attr("refid")?;
            Some((refid.to_string(), member.child_text("name")))
        })
}

/// `wxArray< T >` becomes `wxArray`.
pub fn display_class_name(raw: &str) -> String {
    let name = raw.replace(' ', "");
    match TYPE_PARAM_SUFFIX.captures(&name) {
        Some(captures) => captures[1].to_string(),
        None => name,
    }
}

fn compound_def<'a>(doc: &'a ContentNode, path: &Path) -> Result<&'a ContentNode, DocError> {
    doc.first_child("compounddef").ok_or_else(|| DocError::Malformed {
        path: path.to_path_buf(),
        source: XmlError::MissingElement("compounddef".to_string()),
    })
}

fn read_document(path: &Path, root: &str) -> Result<ContentNode, DocError> {
    if !path.is_file() {
        return Err(DocError::SourceNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "parsing Doxygen XML");

    let text = String::from_utf8_lossy(&bytes);
    ContentNode::parse_rooted(&text, root).map_err(|source| DocError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
