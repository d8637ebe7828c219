//! # Breadcrumbs
//!
//! Root-to-lesson ancestor chains. A missing lesson resolves to `None`,
//! which callers render as an empty breadcrumb: the lesson may simply have
//! been deleted by an earlier edit.

use crate::tree::CourseTree;
use lingua_content::{Node, NodeKind};
use serde::{Deserialize, Serialize};

/// One step of a breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
}

impl PathSegment {
    fn of(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            title: node.title().to_string(),
            kind: node.kind(),
        }
    }
}

/// Ancestor subcategories of `lesson_id` followed by the lesson itself.
///
/// Depth-first, pre-order over the nested forest. Ids that name a
/// subcategory, or nothing, resolve to `None`.
pub fn resolve_path(nodes: &[Node], lesson_id: &str) -> Option<Vec<PathSegment>> {
    let mut trail: Vec<PathSegment> = Vec::new();
    let mut stack: Vec<(&Node, usize)> = nodes.iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        // Drop siblings' subtrees we have backed out of
        trail.truncate(depth);

        match node {
            Node::Lesson(lesson) if lesson.id == lesson_id => {
                trail.push(PathSegment::of(node));
                return Some(trail);
            }
            Node::Lesson(_) => {}
            Node::Subcategory(sub) => {
                trail.push(PathSegment::of(node));
                stack.extend(sub.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    None
}

impl CourseTree {
    /// Breadcrumb for a lesson, following parent links upward
    pub fn resolve_path(&self, lesson_id: &str) -> Option<Vec<PathSegment>> {
        if self.kind_of(lesson_id) != Some(NodeKind::Lesson) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = Some(lesson_id);
        while let Some(id) = current {
            path.push(PathSegment {
                id: id.to_string(),
                title: self.title_of(id)?.to_string(),
                kind: self.kind_of(id)?,
            });
            current = self.parent_of(id);
        }

        path.reverse();
        Some(path)
    }
}
