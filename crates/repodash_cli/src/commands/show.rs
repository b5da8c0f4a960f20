use repodash::RepositoryRecord;
use repodash::listing::format_size;

use crate::commands::shared::{
    DetailRow, OutputFormat, open_session, parse_full_name, print_json, print_table,
};
use crate::config::Config;

fn repository_rows(repo: &RepositoryRecord, username: &str) -> Vec<DetailRow> {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    let pushed = repo
        .pushed_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string());

    vec![
        DetailRow::new("Repository", &repo.full_name),
        DetailRow::optional("Description", repo.description.as_deref()),
        DetailRow::new("Owner", if repo.is_owned_by(username) { "you" } else { repo.owner() }),
        DetailRow::new("Visibility", if repo.private { "private" } else { "public" }),
        DetailRow::optional("Language", repo.language.as_deref()),
        DetailRow::new("Stars", repo.stargazers_count),
        DetailRow::new("Forks", repo.forks_count),
        DetailRow::new("Open issues", repo.open_issues_count),
        DetailRow::new("Size", format_size(repo.size)),
        DetailRow::new("Fork", yes_no(repo.fork)),
        DetailRow::new("Archived", yes_no(repo.archived)),
        DetailRow::new("Created", repo.created_at.format("%Y-%m-%d")),
        DetailRow::new("Updated", repo.updated_at.format("%Y-%m-%d %H:%M UTC")),
        DetailRow::optional("Last push", pushed.as_deref()),
        DetailRow::new("Web", &repo.html_url),
        DetailRow::new("Clone (HTTPS)", &repo.clone_url),
        DetailRow::new("Clone (SSH)", &repo.ssh_url),
    ]
}

/// Show current details of a single repository.
pub(crate) async fn handle_show(
    repo: &str,
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(config)?;
    let username = session.identity().username();
    let (owner, name) = parse_full_name(repo, username)?;

    let record = session.fetch_repository(owner, name).await?;

    match output {
        OutputFormat::Table => print_table(repository_rows(&record, username)),
        OutputFormat::Json => print_json(&record)?,
    }

    Ok(())
}
