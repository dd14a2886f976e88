use serde::{Deserialize, Serialize};

/// Optional job-search filters as decoded from the query string.
///
/// `company` is the wire name used by the public API; `companyName` and
/// `company_name` are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    pub title: Option<String>,
    #[serde(rename = "company", alias = "companyName", alias = "company_name")]
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
}

impl JobFilter {
    /// Present, non-blank filters paired with the field they apply to
    pub fn present(&self) -> impl Iterator<Item = (JobField, &str)> {
        [
            (JobField::Title, &self.title),
            (JobField::CompanyName, &self.company_name),
            (JobField::Location, &self.location),
            (JobField::Experience, &self.experience),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.trim().is_empty() => Some((field, v)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Pagination window applied after ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Searchable job attributes. Company attributes come from the joined company row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobField {
    Title,
    CompanyName,
    Location,
    Experience,
}

impl JobField {
    pub fn column(&self) -> &'static str {
        match self {
            JobField::Title => "j.title",
            JobField::CompanyName => "c.name",
            JobField::Location => "c.location",
            JobField::Experience => "j.experience",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
