/// Command line arguments and dispatch of the driver binary
pub mod cli_main;
/// Runs the reactor tasks of a task file
pub mod task_runner;
/// Task file reference printed by `--help`
pub mod reactor_help;
