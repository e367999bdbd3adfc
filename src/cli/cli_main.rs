use super::reactor_help::TASK_FILE_HELP;
use super::task_runner::run_tasks;
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::Utils::logger::{init_logger, level_from_verbosity};
use crate::Utils::task_config::{BatchReactorConfig, load_task_config, save_task_config};
use clap::{ArgAction, Parser};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "biobatch")]
#[command(about = "Batch bioreactor kinetics: decoupled first-order and Monod growth")]
#[command(after_long_help = TASK_FILE_HELP)]
pub struct CliArgs {
    /// JSON task file; the default tasks are solved when omitted
    #[arg(conflicts_with = "init")]
    pub task_file: Option<PathBuf>,

    /// Write a task file with all default values and exit
    #[arg(long, value_name = "FILE")]
    pub init: Option<PathBuf>,

    /// More log output, repeat for trace level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings, repeat for errors only
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// solve all tasks with their default parameters
    RunDefaults,
    RunTaskFile(PathBuf),
    /// write a task file holding the defaults
    Init(PathBuf),
}

impl CliArgs {
    pub fn verbosity(&self) -> i32 {
        i32::from(self.verbose) - i32::from(self.quiet)
    }

    pub fn command(&self) -> CliCommand {
        match (&self.init, &self.task_file) {
            (Some(path), _) => CliCommand::Init(path.clone()),
            (None, Some(path)) => CliCommand::RunTaskFile(path.clone()),
            (None, None) => CliCommand::RunDefaults,
        }
    }
}

pub fn execute(command: &CliCommand) -> Result<(), ReactorError> {
    match command {
        CliCommand::Init(path) => {
            save_task_config(&BatchReactorConfig::with_all_defaults(), path)?;
            println!("default task file written to {}", path.display());
        }
        CliCommand::RunDefaults => {
            info!("no task file given, solving the default tasks");
            run_tasks(&BatchReactorConfig::with_all_defaults(), true)?;
        }
        CliCommand::RunTaskFile(path) => {
            let config = load_task_config(path)?;
            run_tasks(&config, true)?;
        }
    }
    Ok(())
}

/// Installs the terminal logger; returns false when a logger was already set
pub fn install_logger(verbosity: i32) -> bool {
    match init_logger(level_from_verbosity(verbosity)) {
        Ok(()) => true,
        Err(e) => {
            debug!("keeping the installed logger: {}", e);
            false
        }
    }
}

/// Entry point of the binary: set up logging, run
pub fn run_cli(args: &CliArgs) -> Result<(), ReactorError> {
    install_logger(args.verbosity());
    execute(&args.command())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("biobatch").chain(list.iter().copied()))
    }

    #[test]
    fn test_no_arguments_runs_defaults() {
        let parsed = parse(&[]).unwrap();
        assert_eq!(parsed.command(), CliCommand::RunDefaults);
        assert_eq!(parsed.verbosity(), 0);
    }

    #[test]
    fn test_task_file_and_verbosity() {
        let parsed = parse(&["-v", "-v", "task.json"]).unwrap();
        assert_eq!(
            parsed.command(),
            CliCommand::RunTaskFile(PathBuf::from("task.json"))
        );
        assert_eq!(parsed.verbosity(), 2);
        let parsed = parse(&["-vvv", "task.json"]).unwrap();
        assert_eq!(parsed.verbosity(), 3);
        let parsed = parse(&["--quiet", "task.json"]).unwrap();
        assert_eq!(parsed.verbosity(), -1);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&["--init"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["--init", "new.json", "task.json"]).is_err());
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");
        let parsed = parse(&["--init", path.to_str().unwrap()]).unwrap();
        assert_eq!(parsed.command(), CliCommand::Init(path.clone()));
        execute(&parsed.command()).unwrap();
        let config = load_task_config(&path).unwrap();
        assert_eq!(config, BatchReactorConfig::with_all_defaults());
    }

    #[test]
    fn test_missing_task_file() {
        let result = execute(&CliCommand::RunTaskFile(PathBuf::from("missing_task.json")));
        assert!(matches!(result, Err(ReactorError::Config(_))));
    }

    #[test]
    fn test_logger_installed_once() {
        install_logger(0);
        assert!(!install_logger(1));
    }
}
