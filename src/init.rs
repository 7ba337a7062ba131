use colored::*;
use std::{fs, path::PathBuf};

use doxyref::config::CONFIG_FILE;

const TEMPLATE: &str = r#"# doxyref Configuration File

# Directory holding one folder of Doxygen XML per API version,
# e.g. ./doxygen-xml/3.2/index.xml
docs_root = "./doxygen-xml"

# How emphasized text (names, signatures, labels) is rendered:
# "plain", "irc", "terminal" or "markdown"
emphasis = "terminal"

# Keep parsed class/file documents in memory while a version is loaded
cache_details = false

[reducer]
# Marker placed between paragraphs of a description
para_indicator = " ... "

# Paragraphs with these headings are dropped along with the element after them
stripped_headings = [
    "Styles",
    "Events emitted by this class",
    "Events using this class",
]

# Tags replaced by a placeholder; an empty string drops the tag silently.
# Listing this table replaces the built-in one entirely.
[reducer.replacements]
programlisting = "code example omitted"
preformatted = "content omitted"
orderedlist = "list omitted"
itemizedlist = "list omitted"
variablelist = "variable list omitted"
table = "table omitted"
image = "image omitted"
dotfile = "graph omitted"
htmlonly = ""
"#;

pub fn init_config(force: bool) -> Result<(), String> {
    let config_path = PathBuf::from(CONFIG_FILE);

    if config_path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILE
        ));
    }

    fs::write(&config_path, TEMPLATE)
        .map_err(|e| format!("Failed to create {}: {}", CONFIG_FILE, e))?;

    println!("{} Created {}", "✅".green(), CONFIG_FILE);
    println!("\n{}", "Configuration file created with defaults:".cyan());
    println!("  {} docs_root = \"./doxygen-xml\"", "•".blue());
    println!("  {} emphasis = \"terminal\"", "•".blue());
    println!("  {} cache_details = false", "•".blue());
    println!(
        "\n{}",
        "Edit doxyref.toml to point at your Doxygen XML output.".cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxyref::Config;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
