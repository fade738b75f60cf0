pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CheckArgs, handle_check, parse_check_args, report_path, run_check, watch_interrupts,
};
