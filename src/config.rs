use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::highlight::{Highlight, Syntax};

pub const CONFIG_FILE: &str = "config.json";
pub const SYNTAX_FILE: &str = "syntax.json";

/// Filetype definitions written on first run.
pub const DEFAULT_SYNTAX_JSON: &str = include_str!("../assets/syntax.json");

/// ANSI SGR foreground code per highlight tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub normal: u8,
    pub comment: u8,
    pub ml_comment: u8,
    pub keyword1: u8,
    pub keyword2: u8,
    pub string: u8,
    pub number: u8,
    pub boolean: u8,
    #[serde(rename = "match")]
    pub search_match: u8,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            normal: 37,
            comment: 90,
            ml_comment: 90,
            keyword1: 94,
            keyword2: 96,
            string: 36,
            number: 33,
            boolean: 35,
            search_match: 32,
        }
    }
}

impl ColorPalette {
    pub const fn code_for(&self, highlight: Highlight) -> u8 {
        match highlight {
            Highlight::Normal => self.normal,
            Highlight::Comment => self.comment,
            Highlight::MlComment => self.ml_comment,
            Highlight::Keyword1 => self.keyword1,
            Highlight::Keyword2 => self.keyword2,
            Highlight::String => self.string,
            Highlight::Number => self.number,
            Highlight::Boolean => self.boolean,
            Highlight::Match => self.search_match,
        }
    }
}

/// Editor tunables from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_stop: usize,
    pub quit_times: usize,
    pub empty_line_char: String,
    pub color_palette: ColorPalette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            quit_times: 3,
            empty_line_char: "~".to_string(),
            color_palette: ColorPalette::default(),
        }
    }
}

impl Config {
    /// Clamp values the editor cannot work with.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.tab_stop = self.tab_stop.max(1);
        self
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub tab_stop: Option<usize>,
    pub quit_times: Option<usize>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(tab_stop) = self.tab_stop {
            config.tab_stop = tab_stop;
        }
        if let Some(quit_times) = self.quit_times {
            config.quit_times = quit_times;
        }
        config.normalized()
    }
}

/// Everything read from the config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub config: Config,
    pub syntaxes: Vec<Arc<Syntax>>,
}

pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("cookie");
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("cookie");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("cookie");
        }
    }

    PathBuf::from(".cookie")
}

/// Load both config files from `dir`, creating missing ones with defaults.
pub fn load_settings(dir: &Path, overrides: &ConfigOverrides) -> Result<Settings> {
    let config = overrides.apply(load_or_init_config(dir)?);
    let syntaxes = load_or_init_syntaxes(dir)?;
    Ok(Settings { config, syntaxes })
}

pub fn load_or_init_config(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        let defaults = serde_json::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;
        write_default(&path, &defaults)?;
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to decode config {}", path.display()))
}

pub fn load_or_init_syntaxes(dir: &Path) -> Result<Vec<Arc<Syntax>>> {
    let path = dir.join(SYNTAX_FILE);
    if !path.exists() {
        write_default(&path, DEFAULT_SYNTAX_JSON)?;
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read syntax file {}", path.display()))?;
    parse_syntaxes(&content)
        .with_context(|| format!("Failed to decode syntax file {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_json::from_str(content)?;
    Ok(config.normalized())
}

pub fn parse_syntaxes(content: &str) -> Result<Vec<Arc<Syntax>>> {
    let syntaxes: Vec<Syntax> = serde_json::from_str(content)?;
    Ok(syntaxes.into_iter().map(Arc::new).collect())
}

/// The built-in filetype definitions.
pub fn default_syntaxes() -> Vec<Arc<Syntax>> {
    parse_syntaxes(DEFAULT_SYNTAX_JSON).unwrap_or_default()
}

fn write_default(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = parse_config(r#"{"tab_stop": 4}"#).unwrap();
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 3);
        assert_eq!(config.empty_line_char, "~");
        assert_eq!(config.color_palette, ColorPalette::default());
    }

    #[test]
    fn test_zero_tab_stop_is_raised() {
        let config = parse_config(r#"{"tab_stop": 0}"#).unwrap();
        assert_eq!(config.tab_stop, 1);
    }

    #[test]
    fn test_palette_uses_tag_names() {
        let config =
            parse_config(r#"{"color_palette": {"match": 31, "keyword2": 92}}"#).unwrap();
        assert_eq!(config.color_palette.code_for(Highlight::Match), 31);
        assert_eq!(config.color_palette.code_for(Highlight::Keyword2), 92);
        assert_eq!(config.color_palette.code_for(Highlight::Normal), 37);
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(parse_config("{ not json").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let overrides = ConfigOverrides {
            tab_stop: Some(2),
            quit_times: None,
        };
        let config = overrides.apply(Config {
            tab_stop: 8,
            quit_times: 5,
            ..Config::default()
        });
        assert_eq!(config.tab_stop, 2);
        assert_eq!(config.quit_times, 5);
    }

    #[test]
    fn test_default_syntaxes_parse() {
        let syntaxes = default_syntaxes();
        let names: Vec<&str> = syntaxes.iter().map(|s| s.filetype.as_str()).collect();
        assert_eq!(names, vec!["c", "rust", "go", "python", "javascript", "json"]);
        assert!(syntaxes.iter().all(|s| s.flags.highlight_strings));
    }

    #[test]
    fn test_load_settings_creates_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("cookie");
        let settings = load_settings(&root, &ConfigOverrides::default()).unwrap();

        assert!(root.join(CONFIG_FILE).exists());
        assert!(root.join(SYNTAX_FILE).exists());
        assert_eq!(settings.config, Config::default());
        assert_eq!(settings.syntaxes, default_syntaxes());
    }

    #[test]
    fn test_existing_files_are_not_overwritten() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"quit_times": 1}"#).unwrap();
        fs::write(dir.path().join(SYNTAX_FILE), "[]").unwrap();

        let settings = load_settings(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(settings.config.quit_times, 1);
        assert!(settings.syntaxes.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join(SYNTAX_FILE)).unwrap(),
            "[]"
        );
    }
}
