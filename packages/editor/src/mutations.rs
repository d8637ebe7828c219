//! # Tree Mutations
//!
//! Edit operations on a course tree.
//!
//! ## Design Principles
//!
//! 1. **Validated first**: every precondition is checked before the tree is
//!    touched, so a rejected edit leaves it exactly as it was
//! 2. **Pure at the boundary**: `insert_node`, `rename_node`, ... take a tree
//!    and return a new one; `Mutation::apply` edits in place for callers that
//!    own the tree
//! 3. **Composed in order**: each edit sees the result of the previous one
//!
//! ## Mutation Semantics
//!
//! ### InsertNode
//! - Appends to the roots or to a subcategory's children
//! - Fails if the parent is missing or is a lesson
//! - Fails if any id in the inserted subtree is already taken
//!
//! ### DeleteNode
//! - Removes the node and all descendants, including their blocks
//!
//! ### UpsertBlock
//! - Replaces a block with the same id in place, otherwise appends
//!
//! ### DeleteBlock
//! - A missing block id is an accepted no-op, so duplicate deliveries of the
//!   same delete converge

use crate::tree::{clean_title, CourseTree, EntryBody, StageRules};
use crate::EditorConfig;
use chrono::{DateTime, Utc};
use lingua_content::{Block, Course, Lesson, Node, NodeKind, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edit intents issued by the authoring UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a node (with its subtree) under a subcategory, or at the root
    InsertNode {
        parent_id: Option<String>,
        node: Node,
    },

    /// Set the title of a subcategory or lesson
    RenameNode {
        node_id: String,
        title: String,
    },

    /// Remove a node and its subtree
    DeleteNode {
        node_id: String,
    },

    /// Add or replace a block in a lesson
    UpsertBlock {
        lesson_id: String,
        block: Block,
    },

    /// Remove a block from a lesson
    DeleteBlock {
        lesson_id: String,
        block_id: String,
    },

    /// Move a block to a new position within its lesson
    MoveBlock {
        lesson_id: String,
        block_id: String,
        index: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Lesson not found: {0}")]
    LessonNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Block {block_id} does not match its type: {source}")]
    BlockSchemaMismatch {
        block_id: String,
        source: SchemaError,
    },
}

impl MutationError {
    /// A colliding id means the id generator is broken; the edit must not be retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, MutationError::DuplicateId(_))
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationResult {
    /// False when the edit was accepted but had nothing to do
    pub changed: bool,

    /// Lesson whose own content changed
    pub touched_lesson: Option<String>,

    /// Node ids removed by a delete, pre-order
    pub removed: Vec<String>,
}

impl MutationResult {
    fn changed() -> Self {
        Self {
            changed: true,
            ..Default::default()
        }
    }

    fn touched(lesson_id: &str) -> Self {
        Self {
            changed: true,
            touched_lesson: Some(lesson_id.to_string()),
            removed: Vec::new(),
        }
    }

    fn unchanged() -> Self {
        Self::default()
    }
}

impl Mutation {
    /// Apply in place with default config, stamping changes with the current time
    pub fn apply(&self, tree: &mut CourseTree) -> Result<MutationResult, MutationError> {
        self.apply_with(tree, &EditorConfig::default(), Utc::now())
    }

    /// Apply in place. On error the tree is unchanged.
    pub fn apply_with(
        &self,
        tree: &mut CourseTree,
        config: &EditorConfig,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        let result = self.apply_unlogged(tree, config, now);

        match &result {
            Ok(outcome) if outcome.changed => {
                tracing::debug!("[{}] applied to course {}", self.name(), tree.id);
            }
            Ok(_) => {
                tracing::debug!("[{}] no-op on course {}", self.name(), tree.id);
            }
            Err(err) if err.is_fatal() => {
                tracing::error!("[{}] rejected on course {}: {}", self.name(), tree.id, err);
            }
            Err(err) => {
                tracing::debug!("[{}] rejected on course {}: {}", self.name(), tree.id, err);
            }
        }

        result
    }

    /// Apply to a copy of `tree`, leaving the original untouched.
    ///
    /// The copy is made only once the edit is known to succeed. Callers that
    /// own their tree use [`Mutation::apply`] and skip it.
    pub fn applied_to(&self, tree: &CourseTree) -> Result<CourseTree, MutationError> {
        let config = EditorConfig::default();
        self.validate(tree, &config)?;

        let mut next = tree.clone();
        self.apply_with(&mut next, &config, Utc::now())?;
        Ok(next)
    }

    /// Check every precondition without touching the tree
    pub fn validate(&self, tree: &CourseTree, config: &EditorConfig) -> Result<(), MutationError> {
        match self {
            Mutation::InsertNode { parent_id, node } => {
                check_parent(tree, parent_id.as_deref())?;
                tree.stage(node, parent_id.as_deref(), &StageRules::authoring(config))
                    .map(|_| ())
            }
            Mutation::RenameNode { node_id, title } => {
                check_node(tree, node_id)?;
                clean_title(title, config.max_title_length).map(|_| ())
            }
            Mutation::DeleteNode { node_id } => check_node(tree, node_id),
            Mutation::UpsertBlock { lesson_id, block } => {
                check_upsert(tree, lesson_id, block, config)
            }
            Mutation::DeleteBlock { lesson_id, .. } => check_lesson(tree, lesson_id).map(|_| ()),
            Mutation::MoveBlock {
                lesson_id, block_id, ..
            } => match check_lesson(tree, lesson_id)?.block(block_id) {
                Some(_) => Ok(()),
                None => Err(MutationError::BlockNotFound(block_id.to_string())),
            },
        }
    }

    /// Lesson whose block list this mutation targets
    pub fn target_lesson(&self) -> Option<&str> {
        match self {
            Mutation::UpsertBlock { lesson_id, .. }
            | Mutation::DeleteBlock { lesson_id, .. }
            | Mutation::MoveBlock { lesson_id, .. } => Some(lesson_id),
            Mutation::InsertNode { .. }
            | Mutation::RenameNode { .. }
            | Mutation::DeleteNode { .. } => None,
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertNode { .. } => "InsertNode",
            Mutation::RenameNode { .. } => "RenameNode",
            Mutation::DeleteNode { .. } => "DeleteNode",
            Mutation::UpsertBlock { .. } => "UpsertBlock",
            Mutation::DeleteBlock { .. } => "DeleteBlock",
            Mutation::MoveBlock { .. } => "MoveBlock",
        }
    }

    fn apply_unlogged(
        &self,
        tree: &mut CourseTree,
        config: &EditorConfig,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        let outcome = match self {
            Mutation::InsertNode { parent_id, node } => {
                Self::apply_insert(tree, parent_id.as_deref(), node, config)
            }
            Mutation::RenameNode { node_id, title } => {
                Self::apply_rename(tree, node_id, title, config, now)
            }
            Mutation::DeleteNode { node_id } => Self::apply_delete(tree, node_id),
            Mutation::UpsertBlock { lesson_id, block } => {
                Self::apply_upsert_block(tree, lesson_id, block, config, now)
            }
            Mutation::DeleteBlock { lesson_id, block_id } => {
                Self::apply_delete_block(tree, lesson_id, block_id, now)
            }
            Mutation::MoveBlock {
                lesson_id,
                block_id,
                index,
            } => Self::apply_move_block(tree, lesson_id, block_id, *index, now),
        }?;

        if outcome.changed {
            tree.touch(now);
        }
        Ok(outcome)
    }

    fn apply_insert(
        tree: &mut CourseTree,
        parent_id: Option<&str>,
        node: &Node,
        config: &EditorConfig,
    ) -> Result<MutationResult, MutationError> {
        check_parent(tree, parent_id)?;
        let staged = tree.stage(node, parent_id, &StageRules::authoring(config))?;
        tree.commit(staged);
        Ok(MutationResult::changed())
    }

    fn apply_rename(
        tree: &mut CourseTree,
        node_id: &str,
        title: &str,
        config: &EditorConfig,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        check_node(tree, node_id)?;
        let title = clean_title(title, config.max_title_length)?;

        let entry = tree
            .entry_mut(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        entry.title = title.clone();

        match &mut entry.body {
            EntryBody::Lesson(lesson) => {
                lesson.title = title;
                lesson.touch(now);
                Ok(MutationResult::touched(node_id))
            }
            EntryBody::Subcategory { .. } => Ok(MutationResult::changed()),
        }
    }

    fn apply_delete(tree: &mut CourseTree, node_id: &str) -> Result<MutationResult, MutationError> {
        check_node(tree, node_id)?;

        let removed = tree.detach(node_id);
        Ok(MutationResult {
            changed: true,
            touched_lesson: None,
            removed,
        })
    }

    fn apply_upsert_block(
        tree: &mut CourseTree,
        lesson_id: &str,
        block: &Block,
        config: &EditorConfig,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        check_upsert(tree, lesson_id, block, config)?;

        let lesson = tree
            .lesson_mut(lesson_id)
            .ok_or_else(|| MutationError::LessonNotFound(lesson_id.to_string()))?;

        match lesson.blocks.iter_mut().find(|b| b.id == block.id) {
            Some(existing) => *existing = block.clone(),
            None => lesson.blocks.push(block.clone()),
        }
        lesson.touch(now);

        tree.register_block(&block.id, lesson_id);
        Ok(MutationResult::touched(lesson_id))
    }

    fn apply_delete_block(
        tree: &mut CourseTree,
        lesson_id: &str,
        block_id: &str,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        let lesson = tree
            .lesson_mut(lesson_id)
            .ok_or_else(|| MutationError::LessonNotFound(lesson_id.to_string()))?;

        let Some(pos) = lesson.blocks.iter().position(|b| b.id == block_id) else {
            return Ok(MutationResult::unchanged());
        };

        lesson.blocks.remove(pos);
        lesson.touch(now);

        tree.unregister_block(block_id);
        Ok(MutationResult::touched(lesson_id))
    }

    fn apply_move_block(
        tree: &mut CourseTree,
        lesson_id: &str,
        block_id: &str,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<MutationResult, MutationError> {
        let lesson = tree
            .lesson_mut(lesson_id)
            .ok_or_else(|| MutationError::LessonNotFound(lesson_id.to_string()))?;

        let from = lesson
            .blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let to = index.min(lesson.blocks.len() - 1);
        if from == to {
            return Ok(MutationResult::unchanged());
        }

        let block = lesson.blocks.remove(from);
        lesson.blocks.insert(to, block);
        lesson.touch(now);
        Ok(MutationResult::touched(lesson_id))
    }
}

fn check_parent(tree: &CourseTree, parent_id: Option<&str>) -> Result<(), MutationError> {
    match parent_id {
        Some(id) if tree.kind_of(id) != Some(NodeKind::Subcategory) => {
            Err(MutationError::ParentNotFound(id.to_string()))
        }
        _ => Ok(()),
    }
}

fn check_node(tree: &CourseTree, node_id: &str) -> Result<(), MutationError> {
    if tree.contains(node_id) {
        Ok(())
    } else {
        Err(MutationError::NodeNotFound(node_id.to_string()))
    }
}

fn check_lesson<'a>(tree: &'a CourseTree, lesson_id: &str) -> Result<&'a Lesson, MutationError> {
    tree.find_lesson(lesson_id)
        .ok_or_else(|| MutationError::LessonNotFound(lesson_id.to_string()))
}

fn check_upsert(
    tree: &CourseTree,
    lesson_id: &str,
    block: &Block,
    config: &EditorConfig,
) -> Result<(), MutationError> {
    check_lesson(tree, lesson_id)?;

    // Block ids share the course-wide id space with nodes
    match tree.block_owner(&block.id) {
        Some(owner) if owner != lesson_id => {
            return Err(MutationError::DuplicateId(block.id.clone()));
        }
        None if tree.contains(&block.id) => {
            return Err(MutationError::DuplicateId(block.id.clone()));
        }
        _ => {}
    }

    if config.validate_blocks {
        block
            .validate()
            .map_err(|source| MutationError::BlockSchemaMismatch {
                block_id: block.id.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Insert `node` under `parent_id` (or at the root), returning the new tree
pub fn insert_node(
    tree: &CourseTree,
    parent_id: Option<&str>,
    node: Node,
) -> Result<CourseTree, MutationError> {
    Mutation::InsertNode {
        parent_id: parent_id.map(str::to_string),
        node,
    }
    .applied_to(tree)
}

/// Rename a subcategory or lesson, returning the new tree
pub fn rename_node(tree: &CourseTree, node_id: &str, title: &str) -> Result<CourseTree, MutationError> {
    Mutation::RenameNode {
        node_id: node_id.to_string(),
        title: title.to_string(),
    }
    .applied_to(tree)
}

/// Delete a node and its subtree, returning the new tree
pub fn delete_node(tree: &CourseTree, node_id: &str) -> Result<CourseTree, MutationError> {
    Mutation::DeleteNode {
        node_id: node_id.to_string(),
    }
    .applied_to(tree)
}

/// Add or replace a block, returning the new tree
pub fn upsert_block(tree: &CourseTree, lesson_id: &str, block: Block) -> Result<CourseTree, MutationError> {
    Mutation::UpsertBlock {
        lesson_id: lesson_id.to_string(),
        block,
    }
    .applied_to(tree)
}

/// Remove a block, returning the new tree. Missing blocks are a no-op.
pub fn delete_block(tree: &CourseTree, lesson_id: &str, block_id: &str) -> Result<CourseTree, MutationError> {
    Mutation::DeleteBlock {
        lesson_id: lesson_id.to_string(),
        block_id: block_id.to_string(),
    }
    .applied_to(tree)
}

/// Move a block within its lesson, returning the new tree
pub fn move_block(
    tree: &CourseTree,
    lesson_id: &str,
    block_id: &str,
    index: usize,
) -> Result<CourseTree, MutationError> {
    Mutation::MoveBlock {
        lesson_id: lesson_id.to_string(),
        block_id: block_id.to_string(),
        index,
    }
    .applied_to(tree)
}

/// Apply one edit to a plain `Course` value
pub fn apply_to_course(course: &Course, mutation: &Mutation) -> Result<Course, MutationError> {
    let mut tree = CourseTree::from_course(course)?;
    mutation.apply(&mut tree)?;
    Ok(tree.to_course())
}
