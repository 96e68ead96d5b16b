//! Per-invocation context: saved config, resolved endpoint and the API client.

use anyhow::{Context as _, Result, bail};
use procure_business::{
    BusinessConfig, GuardDecision, HttpRequestsApi, Page, Session, ViewKind, check_page,
};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::output::Output;

pub struct AppContext {
    pub config: Config,
    pub api: HttpRequestsApi,
}

impl AppContext {
    /// Endpoint precedence: `--api-url`, `PROCURE_API_URL`, config file, built-in default.
    #[instrument(skip_all, name = "context")]
    pub fn load(api_url: Option<String>) -> Result<Self> {
        let config = Config::load()?;
        let business = resolve_business_config(&config, api_url, std::env::vars())?;
        debug!(api_url = business.api_url(), "Resolved endpoint");
        Ok(Self {
            config,
            api: HttpRequestsApi::new(business),
        })
    }

    pub fn business(&self) -> &BusinessConfig {
        self.api.config()
    }

    pub fn session(&self) -> Session {
        Session::read(&self.config)
    }

    /// Session allowed to open `page`; errors when not logged in or not permitted.
    pub fn require_page(&self, page: Page) -> Result<Session> {
        let session = self.session();
        match check_page(&session, page) {
            GuardDecision::Allow => Ok(session),
            GuardDecision::RedirectToLogin => {
                bail!("Not logged in, run `procure login` first")
            }
            GuardDecision::RedirectToLanding { role, .. } => {
                bail!("{} may not open {}", role.display_name(), page)
            }
        }
    }

    /// Like [`Self::require_page`] for table views, but a view the role may not open
    /// falls back to the role's landing view instead of failing.
    pub fn resolve_view(&self, requested: ViewKind, out: &Output) -> Result<(ViewKind, Session)> {
        let session = self.session();
        match check_page(&session, requested.page()) {
            GuardDecision::Allow => Ok((requested, session)),
            GuardDecision::RedirectToLogin => {
                bail!("Not logged in, run `procure login` first")
            }
            decision @ GuardDecision::RedirectToLanding { role, .. } => {
                let landing = decision
                    .redirect_target()
                    .and_then(ViewKind::from_page)
                    .unwrap_or(ViewKind::Requests);
                out.warning(format!(
                    "{} may not open {requested}, showing {landing}",
                    role.display_name()
                ));
                Ok((landing, session))
            }
        }
    }
}

/// Merge the flag and the config file over the environment-derived config.
pub fn resolve_business_config<I, S>(
    config: &Config,
    flag: Option<String>,
    vars: I,
) -> Result<BusinessConfig>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    let vars: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
        .collect();
    let env_has_url = vars
        .iter()
        .any(|(k, v)| k == "PROCURE_API_URL" && !v.trim().is_empty());

    let mut business =
        BusinessConfig::from_vars(vars).context("Failed to read PROCURE_* environment")?;

    if let Some(url) = flag.filter(|u| !u.trim().is_empty()) {
        business.api_url = url;
    } else if !env_has_url && let Some(url) = config.api_url() {
        business.api_url = url.to_owned();
    }
    Ok(business)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(url: &str) -> Config {
        let mut config = Config::default();
        config.api.url = Some(url.to_owned());
        config
    }

    #[test]
    fn test_flag_wins() {
        let business = resolve_business_config(
            &saved("http://file"),
            Some("http://flag".to_owned()),
            [("PROCURE_API_URL", "http://env")],
        )
        .expect("config");
        assert_eq!(business.api_url(), "http://flag");
    }

    #[test]
    fn test_env_beats_file() {
        let business =
            resolve_business_config(&saved("http://file"), None, [("PROCURE_API_URL", "http://env")])
                .expect("config");
        assert_eq!(business.api_url(), "http://env");
    }

    #[test]
    fn test_file_beats_default() {
        let business = resolve_business_config(&saved("http://file"), None, Vec::<(&str, &str)>::new())
            .expect("config");
        assert_eq!(business.api_url(), "http://file");
    }

    #[test]
    fn test_default_when_nothing_set() {
        let business =
            resolve_business_config(&Config::default(), None, Vec::<(&str, &str)>::new())
                .expect("config");
        assert_eq!(business.api_url(), BusinessConfig::default().api_url());
    }
}
