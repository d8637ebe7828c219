//! # Lingua Editor
//!
//! Course authoring core: a course tree of subcategories and lessons, the
//! edits an author can make to it, and the views derived from it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content: Course / Node / Lesson / Block     │
//! │  - block catalogue and schema checks        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: CourseTree + mutations              │
//! │  - id-indexed tree, unique ids              │
//! │  - validate, then apply                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ views: breadcrumb path, aggregate counts    │
//! │ session: selected course / lesson           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One source of truth**: `parentId`, breadcrumbs and counts are all
//!    derived from tree position
//! 2. **Edits compose**: each edit sees the result of the one before it
//! 3. **Rejections are values**: a failed edit returns its error kind and
//!    leaves the tree as it was
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lingua_editor::{EditSession, EditorConfig, Mutation};
//!
//! let mut session = EditSession::new(courses, EditorConfig::load(".")?)?;
//! session.select_course("spanish-a1")?;
//!
//! let lesson_id = session.new_node_id();
//! session.apply(&Mutation::InsertNode {
//!     parent_id: Some("grammar".to_string()),
//!     node: Node::lesson(lesson_id.clone(), "Past Simple"),
//! })?;
//!
//! session.select_lesson(&lesson_id)?;
//! let crumbs = session.breadcrumb();
//! ```

mod aggregate;
mod config;
mod errors;
mod mutations;
mod path;
mod session;
mod tree;

pub use aggregate::{aggregate, Aggregate};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use mutations::{
    apply_to_course, delete_block, delete_node, insert_node, move_block, rename_node,
    upsert_block, Mutation, MutationError, MutationResult,
};
pub use path::{resolve_path, PathSegment};
pub use session::{EditSession, EditorView, LessonSnapshot};
pub use tree::CourseTree;

// Re-export the content model for convenience
pub use lingua_content;
