//! HTTP handlers. Each decodes the request, calls one service operation and
//! wraps the result in the response envelope.

pub mod applicants;
pub mod companies;
pub mod job_applicant;
pub mod jobs;
pub mod register;
pub mod system;
