pub mod error;
pub mod model;

pub use error::*;
pub use model::*;

use std::path::{Path, PathBuf};

/// Environment variable pointing at the site configuration file
pub const CONFIG_PATH_ENV: &str = "SATFLOW_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["satflow.yaml", ".satflow.yaml"];

/// Per-user configuration directory (~/.config/satflow)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("satflow"))
}

/// Locate the site configuration file
///
/// Priority:
/// 1. `explicit` (from `--config`); it must exist
/// 2. `SATFLOW_CONFIG_PATH`, if the file exists
/// 3. current directory: satflow.yaml, .satflow.yaml
/// 4. ~/.config/satflow/config.yaml
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::ExplicitPathMissing(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Read, parse and validate a site configuration file
pub fn load(path: &Path) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = SiteConfig::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Find and load the site configuration in one step
pub fn discover(explicit: Option<&Path>) -> Result<(PathBuf, SiteConfig)> {
    let path = find_config_file(explicit)?;
    let config = load(&path)?;
    Ok((path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const SITE: &str = r#"
organization: ACME
realm: EXAMPLE.COM
content_view: cv
activation_key: ak
dns_primary: 10.0.0.53
iso_store: /mnt/iso
kerberos:
  principal: svc
"#;

    fn isolated<F: FnOnce()>(dir: &Path, f: F) {
        let config_home = dir.join("xdg");
        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, None),
                ("XDG_CONFIG_HOME", Some(config_home.to_str().unwrap())),
                ("HOME", Some(dir.to_str().unwrap())),
            ],
            f,
        );
    }

    #[test]
    #[serial]
    fn test_find_config_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        fs::write(temp_dir.path().join("satflow.yaml"), SITE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        isolated(temp_dir.path(), || {
            let path = find_config_file(None).unwrap();
            assert!(path.ends_with("satflow.yaml"));
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_visible_file_before_hidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        fs::write(temp_dir.path().join("satflow.yaml"), SITE).unwrap();
        fs::write(temp_dir.path().join(".satflow.yaml"), SITE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        isolated(temp_dir.path(), || {
            let path = find_config_file(None).unwrap();
            assert!(path.ends_with("satflow.yaml"));
            assert!(!path.ends_with(".satflow.yaml"));
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_var_wins_over_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let custom = temp_dir.path().join("custom.yaml");
        fs::write(&custom, SITE).unwrap();
        fs::write(temp_dir.path().join("satflow.yaml"), SITE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(custom.to_str().unwrap()), || {
            assert_eq!(find_config_file(None).unwrap(), custom);
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_var_missing_file_falls_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let absent = temp_dir.path().join("absent.yaml");
        fs::write(temp_dir.path().join("satflow.yaml"), SITE).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(absent.to_str().unwrap()), || {
            let path = find_config_file(None).unwrap();
            assert!(path.ends_with("satflow.yaml"));
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_global_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let empty = temp_dir.path().join("work");
        fs::create_dir(&empty).unwrap();
        let global_dir = temp_dir.path().join("xdg").join("satflow");
        fs::create_dir_all(&global_dir).unwrap();
        fs::write(global_dir.join("config.yaml"), SITE).unwrap();
        std::env::set_current_dir(&empty).unwrap();

        isolated(temp_dir.path(), || {
            let path = find_config_file(None).unwrap();
            assert!(path.ends_with("satflow/config.yaml"));
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        isolated(temp_dir.path(), || {
            let result = find_config_file(None);
            assert!(matches!(result, Err(ConfigError::ConfigFileNotFound)));
        });

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    fn test_explicit_missing() {
        let result = find_config_file(Some(Path::new("/nonexistent/satflow.yaml")));
        assert!(matches!(result, Err(ConfigError::ExplicitPathMissing(_))));
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.yaml");
        fs::write(&path, "organization: [unclosed").unwrap();

        match load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_discover_explicit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("site.yaml");
        fs::write(&path, SITE).unwrap();

        let (found, config) = discover(Some(&path)).unwrap();
        assert_eq!(found, path);
        assert_eq!(config.organization, "ACME");
    }
}
