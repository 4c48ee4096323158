//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive output with automatic fallback to plain
//! text in CI/non-interactive environments.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, step_error_detail,
    step_info, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::{FetchProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, LarderTheme};
