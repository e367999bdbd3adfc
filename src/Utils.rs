/// JSON task file of the batch reactor driver
pub mod task_config;
/// Terminal logger setup
pub mod logger;
