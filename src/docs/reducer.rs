//! Flattens Doxygen description trees into single-line reply text.
//!
//! A `<briefdescription>` or `<detaileddescription>` is walked in document
//! order. Text is kept, bulky constructs (code listings, tables, lists) are
//! replaced by short bracketed placeholders, a handful of tags get dedicated
//! handling, and everything else is recursed into. Paragraph ends are tracked
//! so trailing breaks can be trimmed before the fragments are joined.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::emphasis::Emphasis;
use super::xml::{ContentNode, Node};

lazy_static! {
    /// Tags replaced by a placeholder (or dropped when the text is empty).
    static ref DEFAULT_REPLACEMENTS: HashMap<String, String> = [
        ("programlisting", "code example omitted"),
        ("preformatted", "content omitted"),
        ("orderedlist", "list omitted"),
        ("itemizedlist", "list omitted"),
        ("variablelist", "variable list omitted"),
        ("table", "table omitted"),
        ("image", "image omitted"),
        ("dotfile", "graph omitted"),
        ("htmlonly", ""),
    ]
    .into_iter()
    .map(|(tag, text)| (tag.to_string(), text.to_string()))
    .collect();

    /// Tags with dedicated handling instead of plain recursion.
    static ref HANDLERS: HashMap<&'static str, Handler> = HashMap::from([
        ("nonbreakablespace", Handler::NonBreakingSpace),
        ("simplesect", Handler::SimpleSect),
        ("verbatim", Handler::Verbatim),
        ("xrefsect", Handler::XrefSect),
        ("ref", Handler::Ref),
    ]);
}

#[derive(Debug, Clone, Copy)]
enum Handler {
    NonBreakingSpace,
    SimpleSect,
    Verbatim,
    XrefSect,
    Ref,
}

fn default_para_indicator() -> String {
    " ... ".to_string()
}

fn default_stripped_headings() -> Vec<String> {
    vec![
        "Styles".to_string(),
        "Events emitted by this class".to_string(),
        "Events using this class".to_string(),
    ]
}

fn default_replacements() -> HashMap<String, String> {
    DEFAULT_REPLACEMENTS.clone()
}

/// Tunable reduction rules, usually read from the `[reducer]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducerRules {
    /// Text inserted at paragraph boundaries
    #[serde(default = "default_para_indicator")]
    pub para_indicator: String,
    /// Paragraph headings whose paragraph and following element are dropped
    #[serde(default = "default_stripped_headings")]
    pub stripped_headings: Vec<String>,
    /// Tag name to placeholder text; an empty placeholder drops the tag
    #[serde(default = "default_replacements")]
    pub replacements: HashMap<String, String>,
}

impl Default for ReducerRules {
    fn default() -> Self {
        Self {
            para_indicator: default_para_indicator(),
            stripped_headings: default_stripped_headings(),
            replacements: default_replacements(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    Text(String),
    ParaBreak,
}

impl Fragment {
    fn is_blank(&self) -> bool {
        match self {
            Fragment::Text(text) => text.trim().is_empty(),
            Fragment::ParaBreak => true,
        }
    }
}

/// Reduces description subtrees using a set of rules and an emphasis style.
pub struct Reducer<'a> {
    rules: &'a ReducerRules,
    emphasis: &'a dyn Emphasis,
}

impl<'a> Reducer<'a> {
    pub fn new(rules: &'a ReducerRules, emphasis: &'a dyn Emphasis) -> Self {
        Self { rules, emphasis }
    }

    /// Flatten `node` into one trimmed line. An empty result is returned as
    /// is; substituting a "has no description" fallback is up to the caller.
    pub fn reduce(&self, node: &ContentNode) -> String {
        let mut fragments = self.scrape(node);
        while fragments.last().is_some_and(Fragment::is_blank) {
            fragments.pop();
        }

        let joined: String = fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => text.as_str(),
                Fragment::ParaBreak => self.rules.para_indicator.as_str(),
            })
            .collect();
        joined.replace(['\r', '\n'], " ").trim().to_string()
    }

    /// Same as [`Reducer::reduce`] but tolerates an absent subtree.
    pub fn reduce_opt(&self, node: Option<&ContentNode>) -> String {
        node.map(|node| self.reduce(node)).unwrap_or_default()
    }

    fn scrape(&self, node: &ContentNode) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut strip_next = false;

        for child in &node.children {
            let element = match child {
                Node::Text(text) => {
                    out.push(Fragment::Text(text.clone()));
                    continue;
                }
                Node::Element(element) => element,
            };

            if strip_next {
                strip_next = false;
                continue;
            }

            if element.tag == "para" && self.has_stripped_heading(element) {
                strip_next = true;
                continue;
            }

            if let Some(placeholder) = self.rules.replacements.get(&element.tag) {
                if !placeholder.is_empty() {
                    out.push(Fragment::Text(format!(" [ {} ] ", placeholder)));
                }
                continue;
            }

            if let Some(handler) = HANDLERS.get(element.tag.as_str()) {
                out.extend(self.handle(*handler, element));
                continue;
            }

            out.extend(self.scrape(element));
            if element.tag == "para" {
                out.push(Fragment::ParaBreak);
            }
        }

        out
    }

    fn has_stripped_heading(&self, para: &ContentNode) -> bool {
        para.first_child("heading").is_some_and(|heading| {
            let title = heading.text_content();
            self.rules
                .stripped_headings
                .iter()
                .any(|stripped| stripped == title.trim())
        })
    }

    fn handle(&self, handler: Handler, element: &ContentNode) -> Vec<Fragment> {
        match handler {
            Handler::NonBreakingSpace => vec![Fragment::Text(" ".to_string())],
            Handler::SimpleSect => {
                let mut out = Vec::new();
                if let Some(kind) = element.attr("kind") {
                    out.extend(self.label(kind));
                }
                for (i, para) in element.children_named("para").enumerate() {
                    if i > 0 {
                        out.push(Fragment::ParaBreak);
                    }
                    out.extend(self.scrape(para));
                }
                out.push(Fragment::ParaBreak);
                out
            }
            Handler::Verbatim => {
                let text = element.text();
                if text.contains('\n') {
                    vec![Fragment::Text("[ content omitted ]".to_string())]
                } else {
                    vec![Fragment::Text(format!("\"{}\"", text))]
                }
            }
            Handler::XrefSect => {
                let mut out = element
                    .first_child("xreftitle")
                    .map(|title| self.label(&title.text_content()))
                    .unwrap_or_default();
                if let Some(body) = element.first_child("xrefdescription") {
                    out.extend(self.scrape(body));
                }
                out
            }
            Handler::Ref => vec![Fragment::Text(
                self.emphasis.emphasize(&element.text_content()),
            )],
        }
    }

    fn label(&self, title: &str) -> Vec<Fragment> {
        vec![
            Fragment::Text(self.emphasis.emphasize(&capitalize(title))),
            Fragment::Text(": ".to_string()),
        ]
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
