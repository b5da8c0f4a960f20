use repodash::RepositoryBreakdown;
use repodash::UserProfile;
use serde::Serialize;

use crate::commands::shared::{DetailRow, OutputFormat, open_session, print_json, print_table};
use crate::config::Config;

#[derive(Serialize)]
struct ProfileView<'a> {
    profile: &'a UserProfile,
    repositories: RepositoryBreakdown,
}

fn profile_rows(profile: &UserProfile, breakdown: &RepositoryBreakdown) -> Vec<DetailRow> {
    vec![
        DetailRow::new("Login", &profile.login),
        DetailRow::optional("Name", profile.name.as_deref()),
        DetailRow::optional("Email", profile.email.as_deref()),
        DetailRow::optional("Bio", profile.bio.as_deref()),
        DetailRow::new("Public repos", profile.public_repos),
        DetailRow::new("Followers", profile.followers),
        DetailRow::new("Following", profile.following),
        DetailRow::new("Member since", profile.created_at.format("%Y-%m-%d")),
        DetailRow::new("Repositories", breakdown.total),
        DetailRow::new("  owned", breakdown.owned),
        DetailRow::new("  contributed", breakdown.contributed),
        DetailRow::new("  private", breakdown.private),
    ]
}

/// Show the profile card with repository counts.
pub(crate) async fn handle_profile(
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config)?;
    session.load().await?;

    let breakdown = session.breakdown();
    let Some(profile) = session.profile() else {
        return Err("Profile was not loaded".into());
    };

    match output {
        OutputFormat::Table => print_table(profile_rows(profile, &breakdown)),
        OutputFormat::Json => print_json(&ProfileView {
            profile,
            repositories: breakdown,
        })?,
    }

    Ok(())
}
