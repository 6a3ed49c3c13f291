// Job postings: recruiter CRUD and candidate-facing listings with skill match.

pub mod handlers;
pub mod store;
