use std::fs;
use std::path::{Path, PathBuf};

use debt_planner_core::PlannerConfig;

/// Load planner settings from a YAML (`.yaml`/`.yml`) or JSON file.
pub fn read_config(path: &str) -> Result<PlannerConfig, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read(&canonical)?;
    let config: PlannerConfig = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

/// Resolve a user-supplied path against the working directory and check it
/// names an existing file.
pub fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "planner.yaml",
            "min_payment_multiplier: \"2\"\nstart_date: 2025-03-01\nmax_periods: 120\n",
        );
        let config = read_config(&path).unwrap();
        assert_eq!(config.min_payment_multiplier, dec!(2));
        assert_eq!(config.start_date, chrono::NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(config.max_periods, Some(120));
    }

    #[test]
    fn test_read_json_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "planner.json", r#"{"data_file": "debts.json"}"#);
        let config = read_config(&path).unwrap();
        assert_eq!(config.min_payment_multiplier, dec!(1.5));
        assert_eq!(config.data_file, Some(PathBuf::from("debts.json")));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = read_config(&missing.to_string_lossy()).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
