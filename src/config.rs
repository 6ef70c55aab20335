//! Connection configuration
//!
//! Each setting is taken from, in order: a command-line flag, the process
//! environment (after the dotenv file is loaded), or an interactive prompt.
//! Nothing here touches the network; a missing value in a non-interactive
//! session is an error before any request is made.

use crate::client::Credentials;
use eyre::{Context, Result};
use std::path::Path;
use url::Url;

pub const URL_VAR: &str = "AX_URL";
pub const KEY_VAR: &str = "AX_KEY";
pub const SECRET_VAR: &str = "AX_SECRET";

/// Raw connection values as given on the command line
#[derive(Clone, Debug, Default)]
pub struct ConnectionArgs {
    pub url: Option<String>,
    pub key: Option<String>,
    pub secret: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

/// Whether missing values may be asked for on the terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    Interactive,
    Never,
}

/// Fully resolved settings for [`crate::cli::connect`]
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    pub url: Url,
    pub credentials: Credentials,
    pub verify_tls: bool,
}

impl ConnectionConfig {
    pub fn resolve(args: ConnectionArgs, prompt: Prompt) -> Result<Self> {
        let url = resolve_value(args.url, URL_VAR, "--url", Secrecy::Plain, prompt)?;
        let key = resolve_value(args.key, KEY_VAR, "--key", Secrecy::Masked, prompt)?;
        let secret = resolve_value(args.secret, SECRET_VAR, "--secret", Secrecy::Masked, prompt)?;

        Ok(Self {
            url: parse_base_url(&url)?,
            credentials: Credentials::new(key, secret),
            verify_tls: !args.insecure,
        })
    }
}

/// Load `KEY=value` pairs from a dotenv file into the environment.
///
/// A missing file is not an error; variables already set are kept.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match dotenvy::from_filename(path) {
        Ok(_) => {
            log::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => {
            log::debug!("No dotenv file at {}", path.display());
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

#[derive(Clone, Copy)]
enum Secrecy {
    Plain,
    Masked,
}

fn resolve_value(
    flag: Option<String>,
    var: &str,
    flag_name: &str,
    secrecy: Secrecy,
    prompt: Prompt,
) -> Result<String> {
    if let Some(value) = non_empty(flag) {
        return Ok(value);
    }
    if let Some(value) = non_empty(std::env::var(var).ok()) {
        log::debug!("Using {} from environment", var);
        return Ok(value);
    }
    if prompt == Prompt::Never {
        eyre::bail!(
            "Missing {}: pass {} or set the {} environment variable",
            var,
            flag_name,
            var
        );
    }

    let message = format!("{}:", var);
    let answer = match secrecy {
        Secrecy::Plain => inquire::Text::new(&message).prompt(),
        Secrecy::Masked => inquire::Password::new(&message)
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt(),
    }
    .with_context(|| format!("Failed to read {}", var))?;

    non_empty(Some(answer)).ok_or_else(|| eyre::eyre!("{} must not be empty", var))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the service URL, making sure relative API paths join under it
fn parse_base_url(value: &str) -> Result<Url> {
    let mut url =
        Url::parse(value).with_context(|| format!("Invalid {}: {}", URL_VAR, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        eyre::bail!("Invalid {}: {} (expected http or https)", URL_VAR, value);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
