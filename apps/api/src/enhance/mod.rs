// AI enhancement: resume text rewrites, skill suggestions and job-match analysis.
// All provider calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod prompts;
pub mod service;

pub use service::{ActionResult, AiEnhancer, EnhancementKind, JobMatchAnalysis};
