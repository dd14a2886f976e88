pub mod applicant;
pub mod company;
pub mod job;
pub mod user;

pub use applicant::Applicant;
pub use company::Company;
pub use job::Job;
pub use user::User;
