//! # Scenario sweep
//!
//! Re-runs the integration driver for several values of one swept parameter while
//! the time grid, the initial state and every other parameter stay fixed, so the
//! trajectories of a [`ScenarioSet`] can be compared index by index.
//!
//! Each run is independent and pure, the runs are executed in parallel with rayon
//! unless `parallel` is switched off; the result does not depend on the order of
//! execution. The sweep aborts on the first failing variant (in input order) and
//! never returns a partial set.
//!
//! ```rust, ignore
//! let sweep = ScenarioSweep::monod_growth_rates(MonodParams::default(), 10000.0, 1000.0, grid, SolverOptions::default(), &[0.5, 1.0, 2.0, 4.0]);
//! let set = sweep.run()?;
//! let s_fast = set.get(4.0).unwrap().trajectory.component_by_label("S");
//! ```
use crate::Kinetics::monod_kinetics::{MonodKinetics, MonodParams};
use crate::Kinetics::rate_law::RateLaw;
use crate::ReactorsIVP::batch_reactor::{check_initial_concentrations, default_grid};
use crate::ReactorsIVP::ivp_solver::{SolverOptions, integrate};
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::time_grid::TimeGrid;
use crate::ReactorsIVP::trajectory::{Trajectory, TrajectoryRecord};
use log::{error, info};
use nalgebra::DVector;
use prettytable::{Table, row};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;

/// maximum growth rates compared by default, 1/d
pub const DEFAULT_MU_MAX_VALUES: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// Result of one variant of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub label: String,
    pub value: f64,
    pub trajectory: Trajectory,
}

/// Trajectories of all variants, in the order the values were given
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    pub parameter: String,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSetRecord {
    pub parameter: String,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub trajectories: Vec<TrajectoryRecord>,
}

impl ScenarioSet {
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, value: f64) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.value == value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.scenarios.iter().map(|s| s.value).collect()
    }

    /// shared time grid of all scenarios
    pub fn time(&self) -> &[f64] {
        self.scenarios
            .first()
            .map(|s| s.trajectory.time())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn to_record(&self) -> ScenarioSetRecord {
        ScenarioSetRecord {
            parameter: self.parameter.clone(),
            values: self.values(),
            labels: self.scenarios.iter().map(|s| s.label.clone()).collect(),
            trajectories: self
                .scenarios
                .iter()
                .map(|s| s.trajectory.to_record())
                .collect(),
        }
    }

    pub fn save_json(&self, path: &str) -> Result<(), ReactorError> {
        let json = serde_json::to_string_pretty(&self.to_record())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Final state of every scenario
    pub fn pretty_print_summary(&self) {
        println!("\n=== SCENARIOS: {} ===", self.parameter);
        let mut table = Table::new();
        let mut header = row!["Scenario"];
        if let Some(first) = self.scenarios.first() {
            for label in first.trajectory.labels() {
                header.add_cell(prettytable::Cell::new(&format!("{} (final)", label)));
            }
        }
        table.add_row(header);
        for scenario in &self.scenarios {
            let mut r = row![scenario.label];
            if let Some(state) = scenario.trajectory.final_state() {
                for v in state.iter() {
                    r.add_cell(prettytable::Cell::new(&format!("{:.4e}", v)));
                }
            }
            table.add_row(r);
        }
        table.printstd();
    }
}

/// Integrates `build(value)` for every value of the swept parameter.
///
/// Fails with [`ReactorError::InvalidParameter`] when `values` is empty or holds
/// duplicates, otherwise with the error of the first failing value in input order.
pub fn run_sweep<R, F>(
    parameter: &str,
    values: &[f64],
    build: F,
    y0: &DVector<f64>,
    grid: &TimeGrid,
    solver: &SolverOptions,
    parallel: bool,
) -> Result<ScenarioSet, ReactorError>
where
    R: RateLaw,
    F: Fn(f64) -> R + Sync,
{
    check_values(parameter, values)?;
    info!(
        "sweeping {} over {:?} ({} variants, parallel: {})",
        parameter,
        values,
        values.len(),
        parallel
    );
    let run_one = |value: f64| -> Result<Scenario, ReactorError> {
        let trajectory = integrate(&build(value), y0, grid, solver).map_err(|e| {
            error!("{} = {} failed: {}", parameter, value, e);
            e
        })?;
        Ok(Scenario {
            label: format!("{} = {}", parameter, value),
            value,
            trajectory,
        })
    };
    let scenarios: Result<Vec<Scenario>, ReactorError> = if parallel {
        // collected per variant first so that the reported error is the first one in input order
        let results: Vec<Result<Scenario, ReactorError>> =
            values.par_iter().map(|v| run_one(*v)).collect();
        results.into_iter().collect()
    } else {
        values.iter().map(|v| run_one(*v)).collect()
    };
    Ok(ScenarioSet {
        parameter: parameter.to_string(),
        scenarios: scenarios?,
    })
}

fn check_values(parameter: &str, values: &[f64]) -> Result<(), ReactorError> {
    if values.is_empty() {
        return Err(ReactorError::InvalidParameter(format!(
            "no values given for swept parameter {}",
            parameter
        )));
    }
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ReactorError::InvalidParameter(format!(
                "{} = {} is not finite",
                parameter, v
            )));
        }
        if values[..i].contains(v) {
            return Err(ReactorError::InvalidParameter(format!(
                "{} = {} given more than once",
                parameter, v
            )));
        }
    }
    Ok(())
}

/// Maximum growth rate sweep of the Monod batch reactor
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSweep {
    /// parameters shared by every scenario; `mu_max` is replaced by the swept values
    pub base: MonodParams,
    pub s_ini: f64,
    pub x_ini: f64,
    pub grid: TimeGrid,
    pub solver: SolverOptions,
    pub mu_max_values: Vec<f64>,
    pub parallel: bool,
}

impl Default for ScenarioSweep {
    /// S_ini = 10000, X_ini = 1000, b = 0.2, K_s = 10, Y = 0.63, mu_max in {0.5, 1, 2, 4}
    /// over 4 days
    fn default() -> Self {
        Self::monod_growth_rates(
            MonodParams::default(),
            10000.0,
            1000.0,
            default_grid(4.0),
            SolverOptions::default(),
            &DEFAULT_MU_MAX_VALUES,
        )
    }
}

impl ScenarioSweep {
    pub fn monod_growth_rates(
        base: MonodParams,
        s_ini: f64,
        x_ini: f64,
        grid: TimeGrid,
        solver: SolverOptions,
        mu_max_values: &[f64],
    ) -> Self {
        Self {
            base,
            s_ini,
            x_ini,
            grid,
            solver,
            mu_max_values: mu_max_values.to_vec(),
            parallel: true,
        }
    }

    pub fn check_task(&self) -> Result<(), ReactorError> {
        check_initial_concentrations(&[("S_ini", self.s_ini), ("X_ini", self.x_ini)])?;
        self.solver.validate()?;
        for mu_max in &self.mu_max_values {
            self.base.with_mu_max(*mu_max).validate()?;
        }
        Ok(())
    }

    pub fn run(&self) -> Result<ScenarioSet, ReactorError> {
        self.check_task()?;
        let y0 = DVector::from_vec(vec![self.s_ini, self.x_ini]);
        run_sweep(
            "mu_max",
            &self.mu_max_values,
            |mu_max| MonodKinetics::new(self.base.with_mu_max(mu_max)),
            &y0,
            &self.grid,
            &self.solver,
            self.parallel,
        )
    }
}
