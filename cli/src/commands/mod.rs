//! Command implementations for the procure CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod endpoint;
pub mod list;
pub mod login;
pub mod request_actions;
pub mod summary;
pub mod version;

pub use completions::generate_completions;
pub use endpoint::run_endpoint;
pub use list::{ListArgs, run_list};
pub use login::{run_login, run_logout, run_whoami};
pub use request_actions::{run_new, run_row_action};
pub use summary::run_summary;
pub use version::print_version;
