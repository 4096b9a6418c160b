//! # Task Parser for Experiment Planning
//!
//! Parses shock tube planning tasks from structured text documents, bridging
//! human-readable task files and the planning routines. A task names the
//! driven mixture, the fill temperature, the target post-reflected-shock
//! state and optionally the driver gas.
//!
//! ## Document structure
//! ```text
//! mixture
//! CH4: 0.05
//! O2: 0.10
//! AR: 0.85
//! initial_conditions
//! T1: 295.0
//! targets
//! T5: 1500.0
//! P5: 2.0e5
//! driver
//! gas: HE
//! T4: 295.0
//! area_ratio: 1.0
//! ```
use super::driver::solve_driver_pressure;
use super::plan::plan_experiment;
use super::state::{ShockConditions, ShockTubeError};
use crate::Kinetics::mixture::Mixture;
use crate::Kinetics::thermo;
use RustedSciThe::Utils::task_parser::{DocumentMap, DocumentParser, Value};
use log::info;
use std::collections::HashMap;

/// Default planning task; also serves as the documentation of the format.
pub const SHOCK_PLAN_TEMPLATE: &str = r#"
mixture
CH4: 0.05
O2: 0.10
AR: 0.85
initial_conditions
T1: 295.0
targets
T5: 1500.0
P5: 2.0e5
driver
gas: HE
T4: 295.0
area_ratio: 1.0
"#;

/// Driver gas description of a planning task.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct DriverSpec {
    pub gas: Mixture,
    pub T4: f64,
    pub area_ratio: f64,
}

/// A parsed experiment planning task.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct PlanTask {
    pub mixture: Mixture,
    pub T1: f64,
    pub T5: f64,
    pub P5: f64,
    pub driver: Option<DriverSpec>,
}

fn section_float(
    section: &HashMap<String, Option<Vec<Value>>>,
    section_name: &str,
    key: &str,
) -> Result<f64, ShockTubeError> {
    let value = section
        .get(key)
        .and_then(|v| v.clone())
        .ok_or_else(|| {
            ShockTubeError::InvalidParameter(format!(
                "missing key '{}' in section '{}'",
                key, section_name
            ))
        })?;
    value
        .first()
        .and_then(|v| v.as_float())
        .ok_or_else(|| {
            ShockTubeError::InvalidParameter(format!(
                "key '{}' in section '{}' is not a number",
                key, section_name
            ))
        })
}

impl PlanTask {
    /// Builds a task from a parsed document.
    pub fn from_map(task_hashmap: &DocumentMap) -> Result<Self, ShockTubeError> {
        let mixture_section = task_hashmap.get("mixture").ok_or_else(|| {
            ShockTubeError::InvalidParameter("missing section 'mixture'".to_string())
        })?;
        let mut amounts: HashMap<String, f64> = HashMap::new();
        for species in mixture_section.keys() {
            let amount = section_float(mixture_section, "mixture", species)?;
            amounts.insert(species.clone(), amount);
        }
        let mixture = Mixture::from_map(&amounts)?;

        let initial = task_hashmap.get("initial_conditions").ok_or_else(|| {
            ShockTubeError::InvalidParameter("missing section 'initial_conditions'".to_string())
        })?;
        let t1 = section_float(initial, "initial_conditions", "T1")?;

        let targets = task_hashmap.get("targets").ok_or_else(|| {
            ShockTubeError::InvalidParameter("missing section 'targets'".to_string())
        })?;
        let t5 = section_float(targets, "targets", "T5")?;
        let p5 = section_float(targets, "targets", "P5")?;

        let driver = match task_hashmap.get("driver") {
            None => None,
            Some(driver_section) => {
                let gas_name = driver_section
                    .get("gas")
                    .and_then(|v| v.clone())
                    .and_then(|v| v.first().and_then(|x| x.as_string().cloned()))
                    .ok_or_else(|| {
                        ShockTubeError::InvalidParameter(
                            "missing key 'gas' in section 'driver'".to_string(),
                        )
                    })?;
                let t4 = section_float(driver_section, "driver", "T4")?;
                let area_ratio = section_float(driver_section, "driver", "area_ratio")?;
                Some(DriverSpec {
                    gas: Mixture::parse(&gas_name)?,
                    T4: t4,
                    area_ratio,
                })
            }
        };

        Ok(Self {
            mixture,
            T1: t1,
            T5: t5,
            P5: p5,
            driver,
        })
    }

    /// Parses a task document given as a string.
    pub fn from_str_task(content: &str) -> Result<Self, ShockTubeError> {
        let mut parser = DocumentParser::new(content.to_string());
        parser.parse_document().map_err(|e| {
            ShockTubeError::InvalidParameter(format!("failed to parse task document: {:?}", e))
        })?;
        let task_hashmap = parser.get_result().ok_or_else(|| {
            ShockTubeError::InvalidParameter("task document parser returned no result".to_string())
        })?;
        Self::from_map(&task_hashmap)
    }

    /// Reads and parses a task file.
    pub fn from_file(path: &str) -> Result<Self, ShockTubeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShockTubeError::InvalidParameter(format!("failed to read task file '{}': {}", path, e))
        })?;
        Self::from_str_task(&content)
    }

    /// Runs the planning pipeline: the shock state for the targets, plus the
    /// driver pressure when a driver section is present.
    pub fn run(&self) -> Result<(ShockConditions, Option<f64>), ShockTubeError> {
        let conditions = plan_experiment(&self.mixture, self.T1, self.T5, self.P5)?;
        let p4 = match &self.driver {
            None => None,
            Some(driver) => {
                let gamma4 = thermo::gamma_mean(&driver.gas, driver.T4)?;
                let mw4 = driver.gas.mean_molar_mass()?;
                info!(
                    "driver gas {}: gamma4 = {:.4}, MW4 = {:.3} kg/kmol",
                    driver.gas, gamma4, mw4
                );
                Some(solve_driver_pressure(
                    conditions.P2,
                    conditions.U2,
                    mw4,
                    gamma4,
                    driver.T4,
                    driver.area_ratio,
                )?)
            }
        };
        Ok((conditions, p4))
    }
}
