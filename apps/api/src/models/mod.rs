pub mod application;
pub mod job;
pub mod profile;
pub mod resume;

use thiserror::Error;

/// A status or role column held a value outside its enum.
#[derive(Debug, Error, PartialEq)]
#[error("invalid {kind} '{value}'")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}
