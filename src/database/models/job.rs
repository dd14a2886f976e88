use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

/// A posting owned by exactly one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Job {
    pub id: Uuid,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 255, message = "This value should have between 3 and 255 characters.")
    )]
    pub title: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 2000, message = "This value should have between 3 and 2000 characters.")
    )]
    pub description: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 2, max = 1000, message = "This value should have between 2 and 1000 characters.")
    )]
    pub required_skills: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 1, max = 255, message = "This value should have between 1 and 255 characters.")
    )]
    pub experience: String,
    pub company_id: Uuid,
}
