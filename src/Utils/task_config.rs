//! # Task configuration
//!
//! JSON task file describing which batch reactor runs the driver performs. Every
//! section is optional; a missing section is skipped, a missing field inside a
//! section takes the default value of the corresponding task.
//!
//! ```json
//! {
//!   "solver": { "rtol": 1e-8, "atol": 1e-8, "max_steps": 500000 },
//!   "decoupled": { "params": { "c_ini": 10000.0, "k1": 2.0 } },
//!   "monod": { "s_ini": 10000.0, "grid": { "start": 0.0, "end": 4.0, "n_points": 1001 } },
//!   "sweep": { "mu_max_values": [0.5, 1.0, 2.0, 4.0], "parallel": true },
//!   "output_dir": "results"
//! }
//! ```
use crate::Kinetics::decoupled_kinetics::DecoupledParams;
use crate::Kinetics::monod_kinetics::MonodParams;
use crate::ReactorsIVP::batch_reactor::{DecoupledBatchReactor, MonodBatchReactor, default_grid};
use crate::ReactorsIVP::ivp_solver::SolverOptions;
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::scenario_sweep::{DEFAULT_MU_MAX_VALUES, ScenarioSweep};
use crate::ReactorsIVP::time_grid::TimeGrid;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn five_days() -> TimeGrid {
    default_grid(5.0)
}

fn four_days() -> TimeGrid {
    default_grid(4.0)
}

fn default_s_ini() -> f64 {
    10000.0
}

fn default_x_ini() -> f64 {
    1000.0
}

fn default_mu_max_values() -> Vec<f64> {
    DEFAULT_MU_MAX_VALUES.to_vec()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoupledSection {
    #[serde(default)]
    pub params: DecoupledParams,
    #[serde(default = "five_days")]
    pub grid: TimeGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonodSection {
    #[serde(default)]
    pub params: MonodParams,
    #[serde(default = "default_s_ini")]
    pub s_ini: f64,
    #[serde(default = "default_x_ini")]
    pub x_ini: f64,
    #[serde(default = "four_days")]
    pub grid: TimeGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSection {
    /// shared parameters; mu_max is overridden by each swept value
    #[serde(default)]
    pub base: MonodParams,
    #[serde(default = "default_s_ini")]
    pub s_ini: f64,
    #[serde(default = "default_x_ini")]
    pub x_ini: f64,
    #[serde(default = "four_days")]
    pub grid: TimeGrid,
    #[serde(default = "default_mu_max_values")]
    pub mu_max_values: Vec<f64>,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchReactorConfig {
    #[serde(default)]
    pub solver: SolverOptions,
    #[serde(default)]
    pub decoupled: Option<DecoupledSection>,
    #[serde(default)]
    pub monod: Option<MonodSection>,
    #[serde(default)]
    pub sweep: Option<SweepSection>,
    /// directory for JSON export of the trajectories; nothing is written when absent
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl BatchReactorConfig {
    /// All three tasks with their default parameters
    pub fn with_all_defaults() -> Self {
        Self {
            solver: SolverOptions::default(),
            decoupled: Some(DecoupledSection {
                params: DecoupledParams::default(),
                grid: five_days(),
            }),
            monod: Some(MonodSection {
                params: MonodParams::default(),
                s_ini: default_s_ini(),
                x_ini: default_x_ini(),
                grid: four_days(),
            }),
            sweep: Some(SweepSection {
                base: MonodParams::default(),
                s_ini: default_s_ini(),
                x_ini: default_x_ini(),
                grid: four_days(),
                mu_max_values: default_mu_max_values(),
                parallel: true,
            }),
            output_dir: None,
        }
    }

    pub fn decoupled_task(&self) -> Option<DecoupledBatchReactor> {
        self.decoupled.as_ref().map(|s| {
            DecoupledBatchReactor::new(s.params.clone(), s.grid.clone(), self.solver.clone())
        })
    }

    pub fn monod_task(&self) -> Option<MonodBatchReactor> {
        self.monod.as_ref().map(|s| {
            MonodBatchReactor::new(
                s.params.clone(),
                s.s_ini,
                s.x_ini,
                s.grid.clone(),
                self.solver.clone(),
            )
        })
    }

    pub fn sweep_task(&self) -> Option<ScenarioSweep> {
        self.sweep.as_ref().map(|s| {
            let mut sweep = ScenarioSweep::monod_growth_rates(
                s.base.clone(),
                s.s_ini,
                s.x_ini,
                s.grid.clone(),
                self.solver.clone(),
                &s.mu_max_values,
            );
            sweep.parallel = s.parallel;
            sweep
        })
    }

    pub fn is_empty(&self) -> bool {
        self.decoupled.is_none() && self.monod.is_none() && self.sweep.is_none()
    }
}

/// Reads and validates a task file
pub fn load_task_config<P: AsRef<Path>>(file_name: P) -> Result<BatchReactorConfig, ReactorError> {
    let path = file_name.as_ref();
    if !path.exists() {
        return Err(ReactorError::Config(format!(
            "File '{}' does not exist",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    let config: BatchReactorConfig = serde_json::from_str(&text)?;
    config.solver.validate()?;
    if config.is_empty() {
        warn!("task file '{}' contains no reactor sections", path.display());
    }
    info!("loaded task configuration from '{}'", path.display());
    Ok(config)
}

pub fn save_task_config<P: AsRef<Path>>(
    config: &BatchReactorConfig,
    file_name: P,
) -> Result<(), ReactorError> {
    let path = file_name.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    info!("saved task configuration to '{}'", path.display());
    Ok(())
}
