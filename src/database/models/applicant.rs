use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Applicant {
    pub id: Uuid,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 255, message = "This value should have between 3 and 255 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 255, message = "This value should have between 5 and 255 characters.")
    )]
    pub contact: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 255, message = "This value should have between 3 and 255 characters.")
    )]
    pub job_preferences: String,
}
