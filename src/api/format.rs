use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{parse_id, ValidationErrors};

/// `data` of a create or delete that only reports the identity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IdData {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailData {
    pub email: String,
}

/// Body of `POST` and `DELETE /job_applicant`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkPayload {
    pub job_id: Option<String>,
    pub applicant_id: Option<String>,
}

impl LinkPayload {
    /// Parse both identities, reporting every missing or malformed one
    pub fn ids(&self) -> Result<(Uuid, Uuid), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let job_id = Self::field(&mut errors, "job_id", self.job_id.as_deref());
        let applicant_id = Self::field(&mut errors, "applicant_id", self.applicant_id.as_deref());
        errors.into_result()?;

        match (job_id, applicant_id) {
            (Some(job_id), Some(applicant_id)) => Ok((job_id, applicant_id)),
            _ => Err(ValidationErrors::new()),
        }
    }

    fn field(errors: &mut ValidationErrors, name: &str, value: Option<&str>) -> Option<Uuid> {
        let raw = errors.require(name, value)?;
        match parse_id(name, raw) {
            Ok(id) => Some(id),
            Err(invalid) => {
                errors.merge(invalid);
                None
            }
        }
    }
}
