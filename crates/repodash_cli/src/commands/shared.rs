use std::io::{self, Write};

use clap::ValueEnum;
use repodash::github::GitHubClient;
use repodash::session::{Identity, Session};
use serde::Serialize;

use crate::config::Config;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One `Field | Value` row of a detail card.
#[derive(Debug, Clone, tabled::Tabled)]
pub(crate) struct DetailRow {
    #[tabled(rename = "Field")]
    pub(crate) field: &'static str,
    #[tabled(rename = "Value")]
    pub(crate) value: String,
}

impl DetailRow {
    pub(crate) fn new(field: &'static str, value: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn optional(field: &'static str, value: Option<&str>) -> Self {
        Self::new(field, value.unwrap_or("-"))
    }
}

pub(crate) fn print_table<T: tabled::Tabled>(rows: Vec<T>) {
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{}", table);
}

pub(crate) fn print_json<T: Serialize + ?Sized>(
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build the identity from stored credentials.
pub(crate) fn stored_identity(config: &Config) -> Result<Identity, Box<dyn std::error::Error>> {
    let (Some(token), Some(username)) = (&config.github.token, &config.github.username) else {
        return Err("Not logged in. Run `repodash login` first.".into());
    };
    Ok(Identity::new(token, username)?)
}

pub(crate) fn github_client(
    config: &Config,
    identity: &Identity,
) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    Ok(GitHubClient::with_base_url(
        config.github.api_url(),
        identity.token(),
    )?)
}

/// Open a session for the stored credentials. Nothing is fetched yet.
pub(crate) fn open_session(
    config: &Config,
) -> Result<Session<GitHubClient>, Box<dyn std::error::Error>> {
    let identity = stored_identity(config)?;
    let client = github_client(config, &identity)?;
    Ok(Session::new(identity, client).with_options(config.listing.options()))
}

/// Split `owner/name`, or treat a bare name as belonging to `default_owner`.
pub(crate) fn parse_full_name<'a>(
    input: &'a str,
    default_owner: &'a str,
) -> Result<(&'a str, &'a str), String> {
    let input = input.trim();
    let (owner, name) = match input.split_once('/') {
        Some((owner, name)) => (owner, name),
        None => (default_owner, input),
    };
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(format!(
            "Invalid repository '{input}'. Use owner/name or just name."
        ));
    }
    Ok((owner, name))
}

/// Ask a `[y/N]` question on stdout; anything but `y` is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_default_is_table() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn parse_full_name_accepts_owner_and_bare_name() {
        assert_eq!(parse_full_name("acme/tool", "alice"), Ok(("acme", "tool")));
        assert_eq!(parse_full_name(" dotfiles ", "alice"), Ok(("alice", "dotfiles")));
    }

    #[test]
    fn parse_full_name_rejects_malformed_input() {
        assert!(parse_full_name("/tool", "alice").is_err());
        assert!(parse_full_name("acme/", "alice").is_err());
        assert!(parse_full_name("a/b/c", "alice").is_err());
        assert!(parse_full_name("", "alice").is_err());
    }

    #[test]
    fn is_yes_only_accepts_explicit_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn stored_identity_requires_both_credentials() {
        let mut config = Config::default();
        config.github.token = Some("ghp_x".to_string());
        assert!(stored_identity(&config).is_err());

        config.github.username = Some("octocat".to_string());
        let identity = stored_identity(&config).expect("credentials are complete");
        assert_eq!(identity.username(), "octocat");
    }

    #[test]
    fn open_session_uses_configured_api_url() {
        let mut config = Config::default();
        config.github.token = Some("ghp_x".to_string());
        config.github.username = Some("octocat".to_string());
        config.github.api_url = Some("https://ghe.example.com/api/v3".to_string());

        let session = open_session(&config).expect("session should open");
        assert_eq!(session.source().base_url(), "https://ghe.example.com/api/v3");
        assert!(session.repositories().is_empty());
    }

    #[test]
    fn detail_row_optional_uses_dash() {
        assert_eq!(DetailRow::optional("Bio", None).value, "-");
        assert_eq!(DetailRow::optional("Bio", Some("hi")).value, "hi");
    }
}
