use console::{Term, style};

use crate::config::Config;

/// Forget stored credentials.
pub(crate) fn handle_logout() -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();
    let cleared = Config::clear_credentials()?;

    match (&cleared, is_tty) {
        (Some(path), true) => println!(
            "{} Removed credentials from {}",
            style("✓").green().bold(),
            path.display()
        ),
        (None, true) => println!("No stored credentials found."),
        (Some(path), false) => {
            tracing::info!(config_path = %path.display(), "Removed stored credentials");
        }
        (None, false) => tracing::info!("No stored credentials found"),
    }

    if std::env::var_os("REPODASH_GITHUB_TOKEN").is_some() {
        println!(
            "{} REPODASH_GITHUB_TOKEN is still set in the environment.",
            style("Note:").yellow().bold()
        );
    }

    Ok(())
}
