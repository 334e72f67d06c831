use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

/// Read a YAML or JSON(-LD) configuration file with environment variable substitution
pub fn read_config_file(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    let content = substitute_env_vars(&content)?;
    if content.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let lower = config_path.to_lowercase();
    let value: Value = if lower.ends_with(".jsonld") || lower.ends_with(".json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    // A comment-only YAML document deserializes to null
    if value.is_null() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    debug!("Read configuration file: {}", config_path);
    Ok(value)
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as-is
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    Ok(config)
}

/// Load a text file, stripping a UTF-8 BOM and falling back to GBK for non-UTF-8 bytes
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut bytes = fs::read(file_path)?;

    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        bytes.drain(0..3);
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => {
            let (cow, _, had_errors) = encoding_rs::GBK.decode(e.as_bytes());
            if had_errors {
                debug!("Lossy decode of configuration file: {}", file_path);
            }
            Ok(cow.into_owned())
        }
    }
}
