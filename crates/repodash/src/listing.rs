//! Filtering and sorting of an aggregated repository list.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::platform::RepositoryRecord;

/// Which side of the ownership tag to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ownership {
    #[default]
    All,
    /// Repositories the user owns. Untagged records count as owned.
    Owned,
    /// Repositories the user contributes to but does not own.
    Contributed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    #[default]
    Updated,
    Stars,
    Forks,
    Size,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Updated,
        SortField::Stars,
        SortField::Forks,
        SortField::Size,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Updated => "updated",
            SortField::Stars => "stars",
            SortField::Forks => "forks",
            SortField::Size => "size",
        }
    }

    fn compare(self, a: &RepositoryRecord, b: &RepositoryRecord) -> Ordering {
        match self {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
            SortField::Stars => a.stargazers_count.cmp(&b.stargazers_count),
            SortField::Forks => a.forks_count.cmp(&b.forks_count),
            SortField::Size => a.size.cmp(&b.size),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort field '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// View parameters over an aggregated list.
///
/// The default query keeps everything, most recently updated first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    /// Exact primary language.
    pub language: Option<String>,
    pub ownership: Ownership,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl ListingQuery {
    pub fn matches(&self, repo: &RepositoryRecord) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let needle = search.to_lowercase();
            let in_name = repo.name.to_lowercase().contains(&needle);
            let in_description = repo
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }

        if let Some(language) = self.language.as_deref()
            && repo.language.as_deref() != Some(language)
        {
            return false;
        }

        match self.ownership {
            Ownership::All => true,
            Ownership::Owned => repo.is_owner != Some(false),
            Ownership::Contributed => repo.is_owner == Some(false),
        }
    }

    /// Filter then sort. Ties keep their input order.
    pub fn apply<'a>(&self, records: &'a [RepositoryRecord]) -> Vec<&'a RepositoryRecord> {
        let mut matched: Vec<&RepositoryRecord> =
            records.iter().filter(|repo| self.matches(repo)).collect();

        matched.sort_by(|a, b| {
            let ord = self.sort.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        matched
    }
}

/// Distinct primary languages, sorted.
pub fn languages(records: &[RepositoryRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|repo| repo.language.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Human-readable size for a value in KB.
pub fn format_size(kb: u64) -> String {
    if kb < 1024 {
        format!("{kb} KB")
    } else {
        format!("{:.1} MB", kb as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::platform::fixtures::record;

    fn repo(
        id: u64,
        full_name: &str,
        language: Option<&str>,
        stars: u64,
        updated_day: u32,
    ) -> RepositoryRecord {
        let mut r = record(id, full_name).with_ownership("alice");
        r.language = language.map(str::to_string);
        r.stargazers_count = stars;
        r.updated_at = Utc
            .with_ymd_and_hms(2024, 3, updated_day, 0, 0, 0)
            .unwrap();
        r
    }

    fn sample() -> Vec<RepositoryRecord> {
        let mut tool = repo(1, "alice/tool", Some("Rust"), 5, 10);
        tool.description = Some("A command line helper".to_string());
        vec![
            tool,
            repo(2, "acme/Website", Some("TypeScript"), 50, 20),
            repo(3, "alice/dotfiles", None, 0, 5),
            repo(4, "bob/parser", Some("Rust"), 5, 15),
        ]
    }

    fn ids(repos: &[&RepositoryRecord]) -> Vec<u64> {
        repos.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_query_sorts_by_updated_desc() {
        let records = sample();
        assert_eq!(ids(&ListingQuery::default().apply(&records)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let records = sample();
        let query = ListingQuery {
            search: Some("COMMAND".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![1]);

        let query = ListingQuery {
            search: Some("web".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![2]);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let records = sample();
        let query = ListingQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(&records).len(), 4);
    }

    #[test]
    fn test_language_filter_is_exact() {
        let records = sample();
        let query = ListingQuery {
            language: Some("Rust".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![4, 1]);

        let query = ListingQuery {
            language: Some("rust".to_string()),
            ..Default::default()
        };
        assert!(query.apply(&records).is_empty());
    }

    #[test]
    fn test_ownership_filter() {
        let mut records = sample();
        records.push(record(5, "carol/untagged"));

        let owned = ListingQuery {
            ownership: Ownership::Owned,
            sort: SortField::Name,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(ids(&owned.apply(&records)), vec![3, 1, 5]);

        let contributed = ListingQuery {
            ownership: Ownership::Contributed,
            ..Default::default()
        };
        assert_eq!(ids(&contributed.apply(&records)), vec![2, 4]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let records = sample();
        let query = ListingQuery {
            sort: SortField::Name,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let records = sample();
        let query = ListingQuery {
            sort: SortField::Stars,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![3, 1, 4, 2]);

        let query = ListingQuery {
            sort: SortField::Stars,
            direction: SortDirection::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&records)), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("Stars".parse::<SortField>(), Ok(SortField::Stars));
        assert_eq!("size".parse::<SortField>(), Ok(SortField::Size));
        assert!("popularity".parse::<SortField>().is_err());
        assert_eq!(SortField::Updated.to_string(), "updated");
    }

    #[test]
    fn test_languages_sorted_unique() {
        assert_eq!(languages(&sample()), vec!["Rust", "TypeScript"]);
        assert!(languages(&[]).is_empty());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 KB");
        assert_eq!(format_size(1023), "1023 KB");
        assert_eq!(format_size(1024), "1.0 MB");
        assert_eq!(format_size(1536), "1.5 MB");
        assert_eq!(format_size(10 * 1024 * 1024), "10240.0 MB");
    }
}
