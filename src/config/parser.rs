use crate::config::types::{Config, Subject};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// When the file names a `subjects-file`, that JSON file is read (relative to
/// the directory holding the TOML file) and its subjects are appended after
/// the inline `[[subject]]` entries.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use celeb_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Subjects: {}", config.subjects.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    if let Some(file) = &config.subjects_file {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let extra = load_subjects_file(&base.join(file))?;
        tracing::debug!("Loaded {} subjects from {}", extra.len(), file);
        config.subjects.extend(extra);
    }

    validate(&config)?;

    Ok(config)
}

/// Reads a JSON array of subjects
///
/// Keys may be snake_case (`search_term`) or kebab-case (`search-term`).
pub fn load_subjects_file(path: &Path) -> Result<Vec<Subject>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let subjects: Vec<Subject> = serde_json::from_str(&content)?;
    Ok(subjects)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup and written into the run summary so that
/// output tables can be traced back to the settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
