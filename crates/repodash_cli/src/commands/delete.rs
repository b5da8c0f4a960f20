use console::{Term, style};

use crate::commands::shared::{confirm, open_session, parse_full_name};
use crate::config::Config;

/// Permanently delete one of your repositories.
pub(crate) async fn handle_delete(
    repo: &str,
    skip_confirm: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();
    let mut session = open_session(config)?;
    session.load().await?;

    let username = session.identity().username().to_string();
    let (owner, name) = parse_full_name(repo, &username)?;
    let full_name = format!("{owner}/{name}");

    let record = session
        .find_by_full_name(&full_name)
        .ok_or_else(|| format!("Repository '{full_name}' is not among your repositories"))?;
    if record.is_owner == Some(false) {
        return Err(format!(
            "'{}' is owned by {}. Only repositories you own can be deleted.",
            record.full_name,
            record.owner()
        )
        .into());
    }
    let (id, full_name) = (record.id, record.full_name.clone());

    if !skip_confirm {
        if !is_tty {
            return Err("Refusing to delete without confirmation. Pass --yes.".into());
        }

        println!(
            "{} About to permanently delete {}. This cannot be undone.",
            style("⚠").yellow().bold(),
            style(&full_name).cyan(),
        );
        if !confirm("Continue?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    session.delete_repository(id).await?;

    let remaining = session.repositories().len();
    let public_repos = session.profile().map(|p| p.public_repos).unwrap_or_default();
    if is_tty {
        println!(
            "{} Deleted {} ({} repositories left, profile lists {} public)",
            style("✓").green().bold(),
            style(&full_name).cyan(),
            remaining,
            public_repos
        );
    } else {
        tracing::info!(
            repository = %full_name,
            remaining,
            public_repos,
            "Deleted repository"
        );
    }

    Ok(())
}
