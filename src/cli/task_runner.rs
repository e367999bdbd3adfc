use crate::ReactorsIVP::batch_reactor::DecoupledSolution;
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::scenario_sweep::ScenarioSet;
use crate::ReactorsIVP::trajectory::Trajectory;
use crate::Utils::task_config::BatchReactorConfig;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// rows of a trajectory table printed to the console
const TABLE_ROWS: usize = 10;

/// Results of every task present in the configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskReport {
    pub decoupled: Option<DecoupledSolution>,
    pub monod: Option<Trajectory>,
    pub sweep: Option<ScenarioSet>,
    /// JSON files written to the output directory
    pub written: Vec<PathBuf>,
}

fn rows_step(trajectory: &Trajectory) -> usize {
    (trajectory.len() / TABLE_ROWS).max(1)
}

/// Solves the configured tasks in the order decoupled, Monod, sweep.
/// Stops at the first failing task.
pub fn run_tasks(config: &BatchReactorConfig, print: bool) -> Result<TaskReport, ReactorError> {
    if config.is_empty() {
        warn!("nothing to solve");
    }
    let mut report = TaskReport::default();

    if let Some(task) = config.decoupled_task() {
        if print {
            task.pretty_print_task();
        }
        let solution = task.solve().map_err(|e| {
            error!("decoupled batch reactor failed: {}", e);
            e
        })?;
        if print {
            solution.substrate.pretty_print(rows_step(&solution.substrate));
            solution.biomass.pretty_print(rows_step(&solution.biomass));
        }
        report.decoupled = Some(solution);
    }

    if let Some(task) = config.monod_task() {
        if print {
            task.pretty_print_task();
        }
        let trajectory = task.solve().map_err(|e| {
            error!("Monod batch reactor failed: {}", e);
            e
        })?;
        if print {
            trajectory.pretty_print(rows_step(&trajectory));
        }
        report.monod = Some(trajectory);
    }

    if let Some(task) = config.sweep_task() {
        let set = task.run()?;
        if print {
            set.pretty_print_summary();
        }
        report.sweep = Some(set);
    }

    if let Some(dir) = &config.output_dir {
        report.written = export(&report, Path::new(dir))?;
    }
    info!("all tasks finished");
    Ok(report)
}

fn export(report: &TaskReport, dir: &Path) -> Result<Vec<PathBuf>, ReactorError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut target = |name: &str| -> Result<String, ReactorError> {
        let path = dir.join(name);
        let s = path
            .to_str()
            .ok_or_else(|| ReactorError::Config(format!("non UTF-8 path {:?}", path)))?
            .to_string();
        written.push(path);
        Ok(s)
    };
    if let Some(solution) = &report.decoupled {
        solution.substrate.save_json(&target("decoupled_substrate.json")?)?;
        solution.biomass.save_json(&target("decoupled_biomass.json")?)?;
    }
    if let Some(trajectory) = &report.monod {
        trajectory.save_json(&target("monod.json")?)?;
    }
    if let Some(set) = &report.sweep {
        set.save_json(&target("mu_max_sweep.json")?)?;
    }
    info!("results written to {}", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::monod_kinetics::MonodParams;
    use crate::ReactorsIVP::time_grid::TimeGrid;
    use crate::Utils::task_config::{MonodSection, SweepSection};

    fn short_grid() -> TimeGrid {
        TimeGrid::new(0.0, 1.0, 21).unwrap()
    }

    #[test]
    fn test_empty_config_gives_empty_report() {
        let report = run_tasks(&BatchReactorConfig::default(), false).unwrap();
        assert_eq!(report, TaskReport::default());
    }

    #[test]
    fn test_runs_configured_sections_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let config = BatchReactorConfig {
            monod: Some(MonodSection {
                params: MonodParams::default(),
                s_ini: 10000.0,
                x_ini: 1000.0,
                grid: short_grid(),
            }),
            sweep: Some(SweepSection {
                base: MonodParams::default(),
                s_ini: 10000.0,
                x_ini: 1000.0,
                grid: short_grid(),
                mu_max_values: vec![1.0, 2.0],
                parallel: false,
            }),
            output_dir: Some(out.to_str().unwrap().to_string()),
            ..Default::default()
        };
        let report = run_tasks(&config, false).unwrap();
        assert!(report.decoupled.is_none());
        assert_eq!(report.monod.as_ref().unwrap().len(), 21);
        assert_eq!(report.sweep.as_ref().unwrap().len(), 2);
        assert_eq!(report.written.len(), 2);
        assert!(out.join("monod.json").exists());
        assert!(out.join("mu_max_sweep.json").exists());
        let text = std::fs::read_to_string(out.join("mu_max_sweep.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["values"][1], 2.0);
    }

    #[test]
    fn test_failing_task_stops_the_run() {
        let config = BatchReactorConfig {
            monod: Some(MonodSection {
                params: MonodParams {
                    k_s: -1.0,
                    ..Default::default()
                },
                s_ini: 10000.0,
                x_ini: 1000.0,
                grid: short_grid(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            run_tasks(&config, false),
            Err(ReactorError::InvalidParameter(_))
        ));
    }
}
