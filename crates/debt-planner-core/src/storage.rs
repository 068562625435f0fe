//! JSON file persistence for a portfolio.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::portfolio::Portfolio;
use crate::DebtPlannerResult;

pub const DEFAULT_FILE_NAME: &str = "DebtFile.json";

#[derive(Debug, Clone)]
pub struct DebtFileStorage {
    directory: PathBuf,
    file_name: String,
}

impl DebtFileStorage {
    /// Storage at `directory/file_name`; missing parts use the current
    /// directory and [`DEFAULT_FILE_NAME`].
    pub fn new(directory: Option<PathBuf>, file_name: Option<String>) -> Self {
        Self {
            directory: directory.unwrap_or_else(|| PathBuf::from(".")),
            file_name: file_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        }
    }

    pub fn at_path(path: &Path) -> Self {
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Self::new(directory, file_name)
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn exists(&self) -> bool {
        self.file_path().is_file()
    }

    pub fn save(&self, portfolio: &Portfolio) -> DebtPlannerResult<()> {
        fs::create_dir_all(&self.directory)?;
        let path = self.file_path();
        fs::write(&path, to_json(portfolio)?)?;
        debug!("saved {} debts to {}", portfolio.len(), path.display());
        Ok(())
    }

    pub fn load(&self) -> DebtPlannerResult<Portfolio> {
        let path = self.file_path();
        let contents = fs::read_to_string(&path)?;
        let portfolio = from_json(&contents)?;
        debug!("loaded {} debts from {}", portfolio.len(), path.display());
        Ok(portfolio)
    }
}

impl Default for DebtFileStorage {
    fn default() -> Self {
        Self::new(None, None)
    }
}

pub fn to_json(portfolio: &Portfolio) -> DebtPlannerResult<String> {
    Ok(serde_json::to_string_pretty(portfolio)?)
}

/// Parse and validate a portfolio document.
pub fn from_json(json: &str) -> DebtPlannerResult<Portfolio> {
    let portfolio: Portfolio = serde_json::from_str(json)?;
    portfolio.validate()?;
    Ok(portfolio)
}
