use clap::ValueEnum;
use colored::*;
use serde::{Deserialize, Serialize};

/// Marks a span of reply text as emphasized.
///
/// The reducer and index only decide *what* is emphasized (class names,
/// signatures, section labels); how that looks is up to the transport.
pub trait Emphasis: Send + Sync {
    fn emphasize(&self, text: &str) -> String;
}

/// Built-in emphasis renderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisStyle {
    /// No markup at all
    Plain,
    /// IRC bold control code
    Irc,
    /// ANSI bold for terminals
    #[default]
    Terminal,
    /// Markdown strong emphasis
    Markdown,
}

impl Emphasis for EmphasisStyle {
    fn emphasize(&self, text: &str) -> String {
        match self {
            EmphasisStyle::Plain => text.to_string(),
            EmphasisStyle::Irc => format!("\x02{}\x02", text),
            EmphasisStyle::Terminal => text.bold().to_string(),
            EmphasisStyle::Markdown => format!("**{}**", text),
        }
    }
}
