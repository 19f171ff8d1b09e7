//! User configuration (`config.toml`).
//!
//! ```toml
//! [evaluation]
//! max_depth = 512
//! localized_names = true
//! max_range_cells = 1000000
//!
//! [display]
//! decimals = 2
//! ```
//!
//! Loading never fails outright: problems are returned as warnings and the
//! defaults are used in their place.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, TallysheetError};
use tallysheet_engine::engine::{EvalOptions, MAX_DECIMALS};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;
const MAX_DEPTH_LIMIT: usize = 10_000;
const MAX_RANGE_CELLS_LIMIT: usize = 100_000_000;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    evaluation: Option<EvaluationSection>,
    display: Option<DisplaySection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluationSection {
    max_depth: Option<usize>,
    localized_names: Option<bool>,
    max_range_cells: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplaySection {
    decimals: Option<usize>,
}

/// Resolved settings for a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub eval: EvalOptions,
    /// Fixed decimal places for numeric results; `None` shows the shortest form.
    pub decimals: Option<usize>,
}

/// `<config dir>/tallysheet/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tallysheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(TallysheetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: config file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ),
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

impl Config {
    /// Parse TOML text. Syntax errors and unknown keys are errors; values
    /// out of range are replaced and reported in the returned warnings.
    pub fn parse(content: &str, path: &Path) -> Result<(Config, Vec<String>)> {
        let file: ConfigFile = toml::from_str(content).map_err(|err| TallysheetError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let mut config = Config::default();
        let mut warnings = Vec::new();

        if let Some(eval) = file.evaluation {
            match eval.max_depth {
                Some(depth) if (1..=MAX_DEPTH_LIMIT).contains(&depth) => {
                    config.eval.max_depth = depth
                }
                Some(depth) => warnings.push(format!(
                    "{}: evaluation.max_depth must be between 1 and {} (got {}), using {}",
                    path.display(),
                    MAX_DEPTH_LIMIT,
                    depth,
                    config.eval.max_depth
                )),
                None => {}
            }
            if let Some(localized) = eval.localized_names {
                config.eval.localized_names = localized;
            }
            match eval.max_range_cells {
                Some(cells) if (1..=MAX_RANGE_CELLS_LIMIT).contains(&cells) => {
                    config.eval.max_range_cells = cells
                }
                Some(cells) => warnings.push(format!(
                    "{}: evaluation.max_range_cells must be between 1 and {} (got {}), using {}",
                    path.display(),
                    MAX_RANGE_CELLS_LIMIT,
                    cells,
                    config.eval.max_range_cells
                )),
                None => {}
            }
        }

        if let Some(display) = file.display {
            match display.decimals {
                Some(places) if places <= MAX_DECIMALS => config.decimals = Some(places),
                Some(places) => {
                    warnings.push(format!(
                        "{}: display.decimals must be <= {} (got {}), using {}",
                        path.display(),
                        MAX_DECIMALS,
                        places,
                        MAX_DECIMALS
                    ));
                    config.decimals = Some(MAX_DECIMALS);
                }
                None => {}
            }
        }

        Ok((config, warnings))
    }

    /// Load from `path`, or from the default location when `path` is None.
    ///
    /// A missing default file is normal and not reported; a missing
    /// explicit file is a warning.
    pub fn load(path: Option<&Path>) -> (Config, Vec<String>) {
        let explicit = path.is_some();
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return (Config::default(), Vec::new());
        };

        if !path.exists() {
            let warnings = if explicit {
                vec![format!("Config file not found: {}", path.display())]
            } else {
                Vec::new()
            };
            return (Config::default(), warnings);
        }

        let loaded = read_config_file(&path).and_then(|content| Config::parse(&content, &path));
        match loaded {
            Ok((config, warnings)) => {
                tracing::debug!(path = %path.display(), ?config, "loaded config");
                (config, warnings)
            }
            Err(err) => (
                Config::default(),
                vec![format!("Failed to load {}: {}", path.display(), err)],
            ),
        }
    }
}
