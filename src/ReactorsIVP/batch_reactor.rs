//! # Batch reactor tasks
//!
//! Host-facing wrappers around the integration driver. A task bundles the kinetic
//! parameters, the initial concentrations, the time grid and the solver options of
//! one batch reactor run.
//!
//! ## Usage Pattern
//! 1. `default()` or `new(...)` - build the task
//! 2. `check_task()` - validate parameters, grid and solver options
//! 3. `solve()` - integrate; returns the solution, the task itself is not modified
//! 4. `pretty_print_task()` and `Trajectory::pretty_print()` - console summaries
//!
//! ## Tasks
//! - [`DecoupledBatchReactor`]: substrate `C` and biomass `X` follow independent
//!   first-order laws and are integrated as two scalar problems
//! - [`MonodBatchReactor`]: `[S, X]` follow the coupled Monod law
//!
//! ```rust, ignore
//! let reactor = MonodBatchReactor::default();
//! let trajectory = reactor.solve()?;
//! let substrate = trajectory.component_by_label("S").unwrap();
//! ```
use crate::Kinetics::decoupled_kinetics::DecoupledParams;
use crate::Kinetics::monod_kinetics::{MonodKinetics, MonodParams};
use crate::Kinetics::rate_law::KineticModel;
use crate::ReactorsIVP::ivp_solver::{SolverOptions, integrate};
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::time_grid::TimeGrid;
use crate::ReactorsIVP::trajectory::Trajectory;
use log::info;
use nalgebra::DVector;
use prettytable::{Table, row};

/// Independent first-order substrate decay and biomass growth
#[derive(Debug, Clone, PartialEq)]
pub struct DecoupledBatchReactor {
    pub params: DecoupledParams,
    pub grid: TimeGrid,
    pub solver: SolverOptions,
}

/// Trajectories of the two independent scalar problems on a shared grid
#[derive(Debug, Clone, PartialEq)]
pub struct DecoupledSolution {
    pub substrate: Trajectory,
    pub biomass: Trajectory,
}

impl DecoupledSolution {
    pub fn time(&self) -> &[f64] {
        self.substrate.time()
    }
}

impl Default for DecoupledBatchReactor {
    /// C_ini = 10000 mg/L, X_ini = 1000 mg/L, k1 = 2 1/d, k2 = 0.2 1/d over 5 days
    fn default() -> Self {
        Self {
            params: DecoupledParams::default(),
            grid: default_grid(5.0),
            solver: SolverOptions::default(),
        }
    }
}

impl DecoupledBatchReactor {
    pub fn new(params: DecoupledParams, grid: TimeGrid, solver: SolverOptions) -> Self {
        Self {
            params,
            grid,
            solver,
        }
    }

    pub fn check_task(&self) -> Result<(), ReactorError> {
        self.params.validate()?;
        self.solver.validate()?;
        Ok(())
    }

    /// Substrate and biomass laws with their initial concentrations
    pub fn models(&self) -> [(KineticModel, f64); 2] {
        [
            (self.params.substrate_law().into(), self.params.c_ini),
            (self.params.biomass_law().into(), self.params.x_ini),
        ]
    }

    pub fn solve(&self) -> Result<DecoupledSolution, ReactorError> {
        self.check_task()?;
        info!(
            "solving decoupled batch reactor: C_ini = {}, X_ini = {}, k1 = {}, k2 = {}, {} points on [{}, {}]",
            self.params.c_ini,
            self.params.x_ini,
            self.params.k1,
            self.params.k2,
            self.grid.n_points(),
            self.grid.start(),
            self.grid.end()
        );
        let [substrate, biomass] = self.models().map(|(model, y0)| {
            info!("integrating {}", model.name());
            integrate(&model, &DVector::from_element(1, y0), &self.grid, &self.solver)
        });
        let (substrate, biomass) = (substrate?, biomass?);
        Ok(DecoupledSolution { substrate, biomass })
    }

    pub fn pretty_print_task(&self) {
        println!("\n=== DECOUPLED BATCH REACTOR ===");
        let mut table = Table::new();
        table.add_row(row!["Parameter", "Value", "Units"]);
        table.add_row(row!["Initial COD (C_ini)", self.params.c_ini, "mg/L as COD"]);
        table.add_row(row!["Initial biomass (X_ini)", self.params.x_ini, "mg/L as COD"]);
        table.add_row(row!["Substrate decay (k1)", self.params.k1, "1/d"]);
        table.add_row(row!["Biomass growth (k2)", self.params.k2, "1/d"]);
        add_grid_rows(&mut table, &self.grid);
        table.printstd();
    }
}

/// Coupled Monod growth on a single substrate
#[derive(Debug, Clone, PartialEq)]
pub struct MonodBatchReactor {
    pub params: MonodParams,
    /// Initial COD in reactor, mg/L as COD
    pub s_ini: f64,
    /// Initial biomass in reactor, mg/L as COD
    pub x_ini: f64,
    pub grid: TimeGrid,
    pub solver: SolverOptions,
}

impl Default for MonodBatchReactor {
    /// S_ini = 10000 mg/L, X_ini = 1000 mg/L, mu_max = 4 1/d, b = 0.2 1/d,
    /// K_s = 10 mg/L, Y = 0.63 over 4 days
    fn default() -> Self {
        Self {
            params: MonodParams::default(),
            s_ini: 10000.0,
            x_ini: 1000.0,
            grid: default_grid(4.0),
            solver: SolverOptions::default(),
        }
    }
}

impl MonodBatchReactor {
    pub fn new(
        params: MonodParams,
        s_ini: f64,
        x_ini: f64,
        grid: TimeGrid,
        solver: SolverOptions,
    ) -> Self {
        Self {
            params,
            s_ini,
            x_ini,
            grid,
            solver,
        }
    }

    pub fn initial_state(&self) -> DVector<f64> {
        DVector::from_vec(vec![self.s_ini, self.x_ini])
    }

    pub fn check_task(&self) -> Result<(), ReactorError> {
        self.params.validate()?;
        self.solver.validate()?;
        check_initial_concentrations(&[("S_ini", self.s_ini), ("X_ini", self.x_ini)])
    }

    pub fn solve(&self) -> Result<Trajectory, ReactorError> {
        self.check_task()?;
        info!(
            "solving Monod batch reactor: mu_max = {}, b = {}, K_s = {}, Y = {}, {} points on [{}, {}]",
            self.params.mu_max,
            self.params.b,
            self.params.k_s,
            self.params.y,
            self.grid.n_points(),
            self.grid.start(),
            self.grid.end()
        );
        integrate(
            &MonodKinetics::new(self.params.clone()),
            &self.initial_state(),
            &self.grid,
            &self.solver,
        )
    }

    pub fn pretty_print_task(&self) {
        println!("\n=== MONOD BATCH REACTOR ===");
        let mut table = Table::new();
        table.add_row(row!["Parameter", "Value", "Units"]);
        table.add_row(row!["Initial COD (S_ini)", self.s_ini, "mg/L as COD"]);
        table.add_row(row!["Initial biomass (X_ini)", self.x_ini, "mg/L as COD"]);
        table.add_row(row!["Max growth rate (mu_max)", self.params.mu_max, "1/d"]);
        table.add_row(row!["Decay rate (b)", self.params.b, "1/d"]);
        table.add_row(row!["Half saturation (K_s)", self.params.k_s, "mg/L as COD"]);
        table.add_row(row!["Yield (Y)", self.params.y, "g COD/g COD"]);
        add_grid_rows(&mut table, &self.grid);
        table.printstd();
    }
}

/// 1001 evenly spaced points on [0, end]
pub(crate) fn default_grid(end: f64) -> TimeGrid {
    TimeGrid::new(0.0, end, 1001).expect("constant default grid is valid")
}

pub(crate) fn check_initial_concentrations(values: &[(&str, f64)]) -> Result<(), ReactorError> {
    for (name, value) in values {
        if !value.is_finite() || *value < 0.0 {
            return Err(ReactorError::InvalidParameter(format!(
                "{} must be a finite non-negative concentration, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

fn add_grid_rows(table: &mut Table, grid: &TimeGrid) {
    table.add_row(row!["Start time", grid.start(), "d"]);
    table.add_row(row!["End time", grid.end(), "d"]);
    table.add_row(row!["Grid points", grid.n_points(), "-"]);
}
