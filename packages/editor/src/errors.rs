//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Course already loaded: {0}")]
    DuplicateCourse(String),

    #[error("No course selected")]
    NoCourseSelected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EditorError {
    /// The underlying mutation error, if any
    pub fn as_mutation(&self) -> Option<&crate::mutations::MutationError> {
        match self {
            EditorError::Mutation(err) => Some(err),
            _ => None,
        }
    }
}
