//! `procure`: the purchase-request desk in the terminal.

mod cli;
mod commands;
mod config;
mod context;
mod dialog;
mod output;
mod table;
mod timing;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};
use procure_business::RowActionKind;
use tracing::instrument;

use crate::cli::{Cli, Commands};
use crate::commands::ListArgs;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);
    run(cli).await
}

#[instrument(skip_all, name = "procure")]
async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Commands that need neither the config file nor the endpoint.
    match command {
        Commands::Version => {
            commands::print_version();
            return Ok(());
        }
        Commands::Completions { shell } => {
            commands::generate_completions(shell);
            return Ok(());
        }
        _ => {}
    }

    let mut ctx = AppContext::load(cli.api_url)?;

    match command {
        Commands::Login { username, role } => commands::run_login(&mut ctx.config, username, role),
        Commands::Logout { yes } => commands::run_logout(&mut ctx.config, yes).await,
        Commands::Whoami => {
            commands::run_whoami(&ctx.config);
            Ok(())
        }
        Commands::List {
            view,
            search,
            page,
            page_size,
            html,
            interactive,
        } => {
            let args = ListArgs {
                view,
                search,
                page,
                page_size,
                html,
                interactive,
            };
            commands::run_list(&ctx, args).await
        }
        Commands::New => commands::run_new(&ctx).await,
        Commands::Edit { id } => commands::run_row_action(&ctx, RowActionKind::Edit, &id).await,
        Commands::Approve { id } => {
            commands::run_row_action(&ctx, RowActionKind::Approve, &id).await
        }
        Commands::Reject { id } => commands::run_row_action(&ctx, RowActionKind::Reject, &id).await,
        Commands::Done { id } => {
            commands::run_row_action(&ctx, RowActionKind::MarkDone, &id).await
        }
        Commands::Summary => commands::run_summary(&ctx).await,
        Commands::Endpoint { url } => commands::run_endpoint(&mut ctx, url),
        Commands::Version | Commands::Completions { .. } => Ok(()),
    }
}
