use console::{Term, style};
use repodash::RepositoryRecord;
use repodash::listing::{
    ListingQuery, Ownership, SortDirection, SortField, format_size, languages,
};

use crate::commands::shared::{OutputFormat, open_session, print_json, print_table};
use crate::config::Config;

/// Filters and ordering for `repodash repos`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReposArgs {
    /// Case-insensitive text to find in name or description
    #[arg(short, long)]
    pub(crate) search: Option<String>,

    /// Only repositories with this primary language (exact match)
    #[arg(short, long)]
    pub(crate) language: Option<String>,

    /// Only repositories you own
    #[arg(long, conflicts_with = "contributed")]
    pub(crate) owned: bool,

    /// Only repositories you contribute to but do not own
    #[arg(long)]
    pub(crate) contributed: bool,

    /// Sort field: name, updated, stars, forks or size
    #[arg(long, default_value_t = SortField::Updated)]
    pub(crate) sort: SortField,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub(crate) asc: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) output: OutputFormat,
}

impl ReposArgs {
    fn query(&self) -> ListingQuery {
        ListingQuery {
            search: self.search.clone(),
            language: self.language.clone(),
            ownership: if self.owned {
                Ownership::Owned
            } else if self.contributed {
                Ownership::Contributed
            } else {
                Ownership::All
            },
            sort: self.sort,
            direction: if self.asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        }
    }
}

#[derive(Debug, Clone, tabled::Tabled)]
struct RepoRow {
    #[tabled(rename = "Repository")]
    full_name: String,
    #[tabled(rename = "Role")]
    role: &'static str,
    #[tabled(rename = "Visibility")]
    visibility: &'static str,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Stars")]
    stars: u64,
    #[tabled(rename = "Forks")]
    forks: u64,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl RepoRow {
    fn from_record(repo: &RepositoryRecord) -> Self {
        Self {
            full_name: repo.full_name.clone(),
            role: match repo.is_owner {
                Some(true) => "owner",
                Some(false) => "contributor",
                None => "-",
            },
            visibility: if repo.private { "private" } else { "public" },
            language: repo.language.clone().unwrap_or_else(|| "-".to_string()),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            size: format_size(repo.size),
            updated: repo.updated_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// List every repository visible to the stored token.
pub(crate) async fn handle_repos(
    args: ReposArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config)?;
    session.load().await?;

    let all = session.repositories();
    let shown = args.query().apply(all);

    match args.output {
        OutputFormat::Json => print_json(&shown)?,
        OutputFormat::Table => {
            print_table(shown.iter().map(|repo| RepoRow::from_record(repo)).collect());

            let summary = format!("Showing {} of {} repositories", shown.len(), all.len());
            if Term::stdout().is_term() {
                println!("{}", style(summary).dim());
                let langs = languages(all);
                if !langs.is_empty() {
                    println!("{} {}", style("Languages:").dim(), langs.join(", "));
                }
            } else {
                println!("{summary}");
            }
        }
    }

    Ok(())
}
