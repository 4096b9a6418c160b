//! # Experimental Data Module
//!
//! Loader for measured ignition delay datasets. A dataset file is plain text
//! with one shot per line, `#` comments, and two or three columns separated
//! by commas or whitespace:
//!
//! ```text
//! # T[K]  tau[s]   uncertainty
//! 1350    4.1e-4   0.15
//! 1410,   2.9e-4,  0.15
//! 1480    1.6e-4
//! ```
//!
//! Malformed lines are logged and skipped; a file with no valid rows is an
//! error.
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("File '{0}' does not exist")]
    FileNotFound(String),
    #[error("Failed to open file '{0}': {1}")]
    Io(String, std::io::Error),
    #[error("No valid data rows in file '{0}'")]
    NoValidRows(String),
}

/// A measured ignition delay dataset.
#[derive(Debug, Clone, Default)]
pub struct ExperimentalData {
    /// Temperature [K]
    pub temperature: Vec<f64>,
    /// Ignition delay time [s]
    pub tau: Vec<f64>,
    /// Relative uncertainty per shot; zero when the column is absent
    pub uncertainty: Vec<f64>,
}

impl ExperimentalData {
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Mean relative uncertainty of the dataset.
    pub fn mean_uncertainty(&self) -> f64 {
        if self.uncertainty.is_empty() {
            return 0.0;
        }
        self.uncertainty.iter().sum::<f64>() / self.uncertainty.len() as f64
    }

    fn parse_line(line: &str) -> Option<(f64, f64, f64)> {
        let stripped = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        let fields: Vec<&str> = stripped
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if fields.len() < 2 || fields.len() > 3 {
            return None;
        }
        let temperature: f64 = fields[0].parse().ok()?;
        let tau: f64 = fields[1].parse().ok()?;
        let uncertainty: f64 = match fields.get(2) {
            Some(s) => s.parse().ok()?,
            None => 0.0,
        };
        if temperature <= 0.0 || tau <= 0.0 || uncertainty < 0.0 {
            return None;
        }
        Some((temperature, tau, uncertainty))
    }

    /// Parses dataset content given as a string; `source` only labels log
    /// messages and errors.
    pub fn from_str_data(content: &str, source: &str) -> Result<Self, DataError> {
        let mut data = ExperimentalData::default();
        for (lineno, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match Self::parse_line(trimmed) {
                Some((temperature, tau, uncertainty)) => {
                    data.temperature.push(temperature);
                    data.tau.push(tau);
                    data.uncertainty.push(uncertainty);
                }
                None => {
                    warn!(
                        "skipping malformed data row {} in '{}': '{}'",
                        lineno + 1,
                        source,
                        trimmed
                    );
                }
            }
        }
        if data.is_empty() {
            return Err(DataError::NoValidRows(source.to_string()));
        }
        info!("loaded {} shots from '{}'", data.len(), source);
        Ok(data)
    }

    /// Loads a dataset file.
    pub fn from_file(file_name: &str) -> Result<Self, DataError> {
        let path = Path::new(file_name);
        if !path.exists() {
            return Err(DataError::FileNotFound(file_name.to_string()));
        }
        let file = File::open(path).map_err(|e| DataError::Io(file_name.to_string(), e))?;
        let reader = BufReader::new(file);
        let lines: Vec<String> = reader.lines().filter_map(Result::ok).collect();
        Self::from_str_data(&lines.join("\n"), file_name)
    }
}
