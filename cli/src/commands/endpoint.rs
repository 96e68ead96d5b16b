//! Show or save the data endpoint.

use anyhow::{Result, bail};

use crate::config::Config;
use crate::context::AppContext;
use crate::output::Output;

pub fn run_endpoint(ctx: &mut AppContext, url: Option<String>) -> Result<()> {
    let out = Output::new();

    let Some(url) = url else {
        out.print(ctx.business().api_url());
        match ctx.config.api_url() {
            Some(saved) => out.labeled_indent("Saved", saved, 2),
            None => out.dim("  No endpoint saved, using the built-in default"),
        }
        return Ok(());
    };

    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("Endpoint must be an http(s) URL: {url}");
    }

    ctx.config.api.url = Some(url.to_owned());
    ctx.config.save()?;
    out.success(format!("Endpoint saved to {}", Config::config_path()?.display()));
    Ok(())
}
