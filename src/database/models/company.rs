use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Company {
    pub id: Uuid,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 255, message = "This value should have between 3 and 255 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 2000, message = "This value should have between 3 and 2000 characters.")
    )]
    pub description: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 2, max = 255, message = "This value should have between 2 and 255 characters.")
    )]
    pub location: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 255, message = "This value should have between 5 and 255 characters.")
    )]
    pub contact: String,
}
