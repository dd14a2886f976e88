use crate::database::models::{Company, Job};

use super::error::FilterError;
use super::types::{JobField, JobFilter, Page, SqlResult};

const JOB_COLUMNS: &str = "j.id, j.title, j.description, j.required_skills, j.experience, j.company_id";

// Byte-order collation keeps Postgres ordering identical to `str::cmp`.
const ORDER_CLAUSE: &str = "ORDER BY j.title COLLATE \"C\" ASC, j.id ASC";

/// Case-insensitive substring predicate on one job field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    pub field: JobField,
    pub needle: String,
}

impl Contains {
    fn matches(&self, job: &Job, company: &Company) -> bool {
        let haystack = match self.field {
            JobField::Title => &job.title,
            JobField::CompanyName => &company.name,
            JobField::Location => &company.location,
            JobField::Experience => &job.experience,
        };
        haystack.to_lowercase().contains(&self.needle.to_lowercase())
    }
}

/// Read query over jobs joined to their company.
///
/// Starts unfiltered and narrows with one AND-ed predicate per filter. The
/// same query renders to SQL for the Postgres store and evaluates in memory
/// for the memory store; both order by title then id.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    predicates: Vec<Contains>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filter(filter: &JobFilter) -> Self {
        filter
            .present()
            .fold(Self::new(), |query, (field, needle)| query.contains(field, needle))
    }

    pub fn contains(mut self, field: JobField, needle: impl Into<String>) -> Self {
        self.predicates.push(Contains { field, needle: needle.into() });
        self
    }

    /// Apply a pagination window. An explicit limit is capped at `max_limit`;
    /// without one every match is returned.
    pub fn page(mut self, page: Page, max_limit: Option<i64>) -> Result<Self, FilterError> {
        if let Some(limit) = page.limit {
            if limit < 0 {
                return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
            }
            let applied = match max_limit {
                Some(max) if limit > max => {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max);
                    max
                }
                _ => limit,
            };
            self.limit = Some(applied);
        }

        if let Some(offset) = page.offset {
            if offset < 0 {
                return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
            }
            self.offset = Some(offset);
        }

        Ok(self)
    }

    pub fn predicates(&self) -> &[Contains] {
        &self.predicates
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn matches(&self, job: &Job, company: &Company) -> bool {
        self.predicates.iter().all(|p| p.matches(job, company))
    }

    /// Evaluate the query over in-memory rows
    pub fn run<'a, I>(&self, rows: I) -> Vec<Job>
    where
        I: IntoIterator<Item = (&'a Job, &'a Company)>,
    {
        let mut jobs: Vec<Job> = rows
            .into_iter()
            .filter(|(job, company)| self.matches(job, company))
            .map(|(job, _)| job.clone())
            .collect();
        jobs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let limit = self.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        jobs.into_iter().skip(offset).take(limit).collect()
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params = Vec::with_capacity(self.predicates.len());
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| {
                params.push(format!("%{}%", escape_like(&p.needle)));
                format!("{} ILIKE ${}", p.field.column(), params.len())
            })
            .collect();

        let query = [
            format!("SELECT {} FROM jobs j", JOB_COLUMNS),
            "INNER JOIN companies c ON c.id = j.company_id".to_string(),
            if conditions.is_empty() { String::new() } else { format!("WHERE {}", conditions.join(" AND ")) },
            ORDER_CLAUSE.to_string(),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
