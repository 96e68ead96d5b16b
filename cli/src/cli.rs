use clap::{Parser, Subcommand};
use clap_complete::Shell;
use procure_business::ViewKind;

#[derive(Parser)]
#[command(name = "procure")]
#[command(about = "Purchase-request desk in the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data endpoint, overriding PROCURE_API_URL and the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a session
    Login {
        /// Name used to sign approvals and completions
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Role: admin, viewer, staff_a, staff_b, staff_c
        #[arg(long, short = 'r')]
        role: Option<String>,
    },
    /// End the session
    Logout {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the current user and the pages they may open
    Whoami,
    /// Show a table view
    List {
        /// requests, approval, done, rejected or recap (page file names work too)
        #[arg(default_value = "requests")]
        view: ViewKind,

        /// Case-insensitive text filter
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value = "1")]
        page: usize,

        /// Rows per page (defaults to the view's own size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Print the table as an HTML fragment
        #[arg(long)]
        html: bool,

        /// Pick a row action after listing
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Submit a new purchase request
    New,
    /// Edit a purchase request
    Edit {
        /// Request ID
        id: String,
    },
    /// Approve a pending request
    Approve {
        /// Request ID
        id: String,
    },
    /// Reject a pending request
    Reject {
        /// Request ID
        id: String,
    },
    /// Mark an approved request as (partially) bought
    Done {
        /// Request ID
        id: String,
    },
    /// Counts per status and totals
    Summary,
    /// Show or save the data endpoint
    Endpoint {
        /// URL to store in the config file
        url: Option<String>,
    },
    /// Print version and build information
    Version,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_accepts_page_file() {
        let cli = Cli::parse_from(["procure", "list", "approval.html", "-p", "2"]);
        match cli.command {
            Some(Commands::List { view, page, .. }) => {
                assert_eq!(view, ViewKind::Approval);
                assert_eq!(page, 2);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        assert!(Cli::try_parse_from(["procure", "list", "dashboard"]).is_err());
    }
}
