pub mod block;
pub mod error;
pub mod exercise;
pub mod id_generator;
pub mod node;
pub mod schema;

pub use block::{Block, BlockCategory, BlockContent, BlockKind};
pub use error::{SchemaError, SchemaResult};
pub use exercise::{ExerciseConfig, ListeningConfig, ScoringConfig, SpeakingConfig};
pub use id_generator::IdGenerator;
pub use node::{Course, Lesson, LessonNode, LessonStatus, Node, NodeKind, Subcategory, Visibility};
pub use schema::validate_block;
