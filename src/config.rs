use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::docs::{EmphasisStyle, ReducerRules};

pub const CONFIG_FILE: &str = "doxyref.toml";

/// Errors reading an explicitly requested configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one Doxygen XML folder per API version
    #[serde(default = "default_docs_root")]
    pub docs_root: PathBuf,
    #[serde(default)]
    pub emphasis: EmphasisStyle,
    /// Keep parsed detail documents for the lifetime of a loaded set
    #[serde(default)]
    pub cache_details: bool,
    #[serde(default)]
    pub reducer: ReducerRules,
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("./doxygen-xml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            emphasis: EmphasisStyle::default(),
            cache_details: false,
            reducer: ReducerRules::default(),
        }
    }
}

impl Config {
    /// Read `doxyref.toml` from the working directory, falling back to the
    /// defaults when it is missing or unusable.
    pub fn load() -> Self {
        let config_path = PathBuf::from(CONFIG_FILE);

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "using default configuration");
                }
            }
        }

        Config::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Directory containing the XML for one API version.
    pub fn api_dir(&self, api: &str) -> PathBuf {
        self.docs_root.join(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.docs_root, PathBuf::from("./doxygen-xml"));
        assert_eq!(config.emphasis, EmphasisStyle::Terminal);
        assert!(!config.cache_details);
        assert_eq!(config.reducer.para_indicator, " ... ");
        assert_eq!(
            config.reducer.replacements.get("programlisting").map(String::as_str),
            Some("code example omitted")
        );
        assert_eq!(config.api_dir("2.8"), PathBuf::from("./doxygen-xml/2.8"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "docs_root = \"/srv/docs\"\nemphasis = \"irc\"\n\n[reducer]\npara_indicator = \" | \""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.docs_root, PathBuf::from("/srv/docs"));
        assert_eq!(config.emphasis, EmphasisStyle::Irc);
        assert_eq!(config.reducer.para_indicator, " | ");
        assert_eq!(config.reducer.stripped_headings.len(), 3);
        assert!(config.reducer.replacements.contains_key("table"));
    }

    #[test]
    fn test_replacement_table_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[reducer.replacements]\ntable = \"\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.reducer.replacements.len(), 1);
        assert_eq!(config.reducer.replacements["table"], "");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "emphasis = \"sparkles\"").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load_from(Path::new("/nonexistent/doxyref.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
