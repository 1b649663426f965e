pub mod config;
pub mod logging;

pub mod perf;
pub mod pool;
pub mod records;
pub mod retry;
