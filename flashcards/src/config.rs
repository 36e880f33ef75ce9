use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::validation::Schema;

pub const DEFAULT_CONFIG_PATH: &str = "flashcards.toml";
pub const DEFAULT_DB_URL: &str = "sqlite://words.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

const DATABASE_URL_ENV: &str = "FLASHCARDS_DATABASE_URL";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Parser)]
#[command(name = "flashcards", version, about = "Vocabulary flashcards in the terminal")]
pub struct Cli {
    /// TOML settings file [default: flashcards.toml, if present]
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// SQLite database URL, overrides the settings file and environment
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SchemaName {
    #[default]
    Standard,
    Compact,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    database_url: Option<String>,
    log_filter: Option<String>,
    form_schema: SchemaName,
    suggestion: SuggestionSettings,
}

/// Inputs for picking a suggestion backend; resolved when suggestions are requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestionSettings {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl SuggestionSettings {
    pub fn backend(&self) -> Result<suggestion::Backend, suggestion::SuggestionError> {
        suggestion::Backend::resolve(
            self.endpoint.clone(),
            self.api_key.clone(),
            self.model.clone(),
            self.max_tokens,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub log_filter: String,
    pub schema: Schema,
    pub suggestion: SuggestionSettings,
}

impl Config {
    /// Settings file, then environment, then command line; later sources win.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                read_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, cli, |key| std::env::var(key).ok()))
    }

    fn from_sources(
        file: FileConfig,
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let database_url = cli
            .database
            .clone()
            .or_else(|| env(DATABASE_URL_ENV))
            .or(file.database_url)
            .unwrap_or_else(|| DEFAULT_DB_URL.to_owned());
        let schema = match file.form_schema {
            SchemaName::Standard => Schema::STANDARD,
            SchemaName::Compact => Schema::COMPACT,
        };
        let mut suggestion = file.suggestion;
        suggestion.api_key = env(API_KEY_ENV);
        Self {
            database_url,
            log_filter: file
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
            schema,
            suggestion,
        }
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(database: Option<&str>) -> Cli {
        Cli {
            config: None,
            database: database.map(str::to_owned),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_any_source() {
        let config = Config::from_sources(FileConfig::default(), &cli(None), no_env);
        assert_eq!(config.database_url, DEFAULT_DB_URL);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.schema, Schema::STANDARD);
        assert_eq!(config.suggestion, SuggestionSettings::default());
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let file: FileConfig = toml::from_str(
            r#"
            database_url = "sqlite://file.db"
            log_filter = "flashcards=debug"
            form_schema = "compact"

            [suggestion]
            endpoint = "https://example.test/api/suggestion-word"
            max_tokens = 1024
            "#,
        )
        .unwrap();
        let env = |key: &str| match key {
            DATABASE_URL_ENV => Some("sqlite://env.db".to_owned()),
            API_KEY_ENV => Some("sk-env".to_owned()),
            _ => None,
        };

        let config = Config::from_sources(file, &cli(None), env);
        assert_eq!(config.database_url, "sqlite://env.db");
        assert_eq!(config.log_filter, "flashcards=debug");
        assert_eq!(config.schema, Schema::COMPACT);
        assert_eq!(config.suggestion.max_tokens, Some(1024));
        assert_eq!(config.suggestion.api_key.as_deref(), Some("sk-env"));
        assert!(matches!(
            config.suggestion.backend(),
            Ok(suggestion::Backend::Relay { .. })
        ));

        let config = Config::from_sources(FileConfig::default(), &cli(Some("sqlite://cli.db")), env);
        assert_eq!(config.database_url, "sqlite://cli.db");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.toml");
        fs::write(&path, "databse_url = \"typo\"\n").unwrap();
        assert!(matches!(read_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("missing.toml")),
            database: None,
        };
        assert!(matches!(Config::load(&cli), Err(ConfigError::Read { .. })));
    }
}
