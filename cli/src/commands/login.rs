//! Session commands: login, logout, whoami.

use anyhow::{Context as _, Result};
use inquire::{Select, Text};
use procure_business::session::{self, Page};
use procure_business::{Role, Session, current_user};
use tracing::{info, instrument};

use crate::config::Config;
use crate::dialog::InquireDialog;
use crate::output::Output;

#[instrument(skip_all, name = "login")]
pub fn run_login(
    config: &mut Config,
    username: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let out = Output::new();

    let username = match username {
        Some(name) => name,
        None => {
            out.header("Login to the purchase desk");
            out.newline();
            Text::new("Username:")
                .with_help_message("Used to sign approvals and completions")
                .prompt()
                .context("Failed to read username")?
        }
    };

    let role = match role {
        Some(role) => role,
        None => {
            let keys: Vec<&str> = Role::ALL.iter().map(|r| r.key()).collect();
            Select::new("Role:", keys)
                .with_starting_cursor(1)
                .prompt()
                .context("Failed to read role")?
                .to_owned()
        }
    };

    // Unknown roles are stored as typed and read back as viewer.
    let resolved = Role::normalize(Some(&role));
    if resolved.key() != role.trim().to_lowercase().replace(' ', "_") {
        out.warning(format!("Unknown role {role:?}, you will have viewer access"));
    }

    session::login(config, username.trim(), &role);
    config.save()?;

    info!(role = resolved.key(), "Logged in");
    out.success(format!(
        "Logged in as {} ({})",
        username.trim(),
        resolved.display_name()
    ));
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub async fn run_logout(config: &mut Config, yes: bool) -> Result<()> {
    let out = Output::new();

    if !Session::read(config).logged_in {
        out.dim("Not logged in.");
        return Ok(());
    }

    if yes {
        session::logout(config);
    } else if !session::confirm_logout(config, &InquireDialog::new()).await {
        return Ok(());
    }

    config.save()?;
    out.success("Logged out");
    Ok(())
}

pub fn run_whoami(config: &Config) {
    let out = Output::new();
    let session = Session::read(config);

    if !session.logged_in {
        out.warning("Not logged in, run `procure login`");
        return;
    }

    let user = current_user(config);
    out.header(&user.username);
    out.labeled_indent("Role", user.role_name, 2);
    let pages: Vec<&str> = Page::ALL
        .into_iter()
        .filter(|page| *page != Page::Login && user.role.can_open(*page))
        .map(Page::file_name)
        .collect();
    out.labeled_indent("Pages", pages.join(", "), 2);
}
