use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Paths and output settings for a run.
///
/// Every stage takes its paths from here rather than from the working
/// directory, so tests can point a run at a scratch directory.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The raw job postings export.
    pub raw_path: PathBuf,
    /// Where the cleaned table is written, and read back by the report.
    pub clean_path: PathBuf,
    /// The directory that receives one PNG per chart.
    pub figures_dir: PathBuf,
    /// Chart resolution in dots per inch.
    pub dpi: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_path: "data/raw/data_science_job_posts_2025.csv".into(),
            clean_path: "data/processed/ai_jobs_clean.csv".into(),
            figures_dir: "figures".into(),
            dpi: 200,
        }
    }
}

impl Config {
    pub const FILE_PATH: &str = "data/pipeline.ron";

    /// Chart canvas size in inches.
    const CHART_INCHES: (f64, f64) = (6.4, 4.8);

    /// Reads a RON config file, or falls back to the defaults if there is none.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(Error::io(path))?;
        let config = ron::from_str(&config_str).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The chart size in pixels at the configured resolution.
    pub fn chart_size(&self) -> (u32, u32) {
        let (width, height) = Self::CHART_INCHES;
        let dpi = f64::from(self.dpi.max(1));
        ((width * dpi).round() as u32, (height * dpi).round() as u32)
    }
}
