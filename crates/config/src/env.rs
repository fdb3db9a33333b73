use anyhow::{Context, Result};
use std::env;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Load variables from an env file into the process environment
///
/// Variables already present in the environment are left untouched. A
/// missing file is not an error; returns whether a file was loaded.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();

    match dotenvy::from_path(path) {
        Ok(()) => {
            info!(?path, "Loaded environment file");
            Ok(true)
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(?path, "No environment file found, skipping");
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load environment file: {:?}", path)),
    }
}

/// Look up a variable, treating an empty value as unset
pub fn non_empty<F>(lookup: &F, var_name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var_name).filter(|value| !value.is_empty())
}

/// Process environment lookup for use with [`crate::RelayConfig::from_lookup`]
pub fn process_env(var_name: &str) -> Option<String> {
    env::var(var_name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_non_empty_filters_blank_values() {
        let vars: HashMap<&str, &str> = [("SET", "value"), ("BLANK", "")].into_iter().collect();
        let lookup = |name: &str| vars.get(name).map(|v| v.to_string());

        assert_eq!(non_empty(&lookup, "SET"), Some("value".to_string()));
        assert_eq!(non_empty(&lookup, "BLANK"), None);
        assert_eq!(non_empty(&lookup, "MISSING"), None);
    }

    #[test]
    fn test_load_missing_env_file_is_not_an_error() {
        let path = std::env::temp_dir().join("bbuddy-relay-does-not-exist.env");
        assert!(!load_env_file(&path).unwrap());
    }

    #[test]
    fn test_load_env_file_does_not_override() {
        let path = std::env::temp_dir().join("bbuddy-relay-test-load.env");
        std::fs::write(
            &path,
            "BBUDDY_RELAY_TEST_FRESH=from-file\nBBUDDY_RELAY_TEST_PRESET=from-file\n",
        )
        .unwrap();
        std::env::set_var("BBUDDY_RELAY_TEST_PRESET", "from-process");

        assert!(load_env_file(&path).unwrap());
        assert_eq!(std::env::var("BBUDDY_RELAY_TEST_FRESH").unwrap(), "from-file");
        assert_eq!(std::env::var("BBUDDY_RELAY_TEST_PRESET").unwrap(), "from-process");

        std::fs::remove_file(&path).ok();
    }
}
