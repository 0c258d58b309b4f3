use std::fs;

use serde::Deserialize;

use crate::error::Result;

/// Settings for the generated explorer page.  Every field has a default so an
/// empty (or absent) config file is valid.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Type shown when the page is opened without a fragment.
    pub start_type: Option<String>,
    pub title: String,
    /// Stylesheet selected before the user picks one.
    pub default_theme: String,
    /// Stylesheets offered by the theme picker.
    pub themes: Vec<String>,
    /// Maximum number of quick-open results; 0 shows them all.
    pub search_limit: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            start_type: None,
            title: "Type Explorer".to_string(),
            default_theme: "light.css".to_string(),
            themes: vec!["light.css".to_string(), "dark.css".to_string()],
            search_limit: 0,
        }
    }
}

impl ExplorerConfig {
    pub fn from_toml_str(s: &str) -> Result<ExplorerConfig> {
        Ok(toml::from_str(s)?)
    }

    /// Load `path`, or the defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<ExplorerConfig> {
        let path = match path {
            Some(path) => path,
            None => return Ok(ExplorerConfig::default()),
        };
        let contents = fs::read_to_string(path)?;
        let config = ExplorerConfig::from_toml_str(&contents)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    /// The theme list always offers the default theme.
    pub fn theme_list(&self) -> Vec<String> {
        let mut themes = self.themes.clone();
        if !themes.contains(&self.default_theme) {
            themes.insert(0, self.default_theme.clone());
        }
        themes
    }
}
