use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Unrecognised date '{0}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    InvalidDate(String),
}
