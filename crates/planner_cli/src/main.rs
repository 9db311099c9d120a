//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `planner_core` linkage.
//! - Show where the planner would keep its data without opening it.

use planner_core::PlannerConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("planner_core ping={}", planner_core::ping());
    println!("planner_core version={}", planner_core::core_version());

    match PlannerConfig::from_env() {
        Ok(config) => {
            println!("planner db_path={}", config.db_path.display());
            println!("planner log_dir={}", config.log_dir.display());
            println!("planner max_backups={}", config.max_backups);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("planner config error: {err}");
            ExitCode::FAILURE
        }
    }
}
