// Resume builder backend: ATS scoring and resume persistence.

pub mod ats;
pub mod handlers;
pub mod store;
