//! # Aggregates
//!
//! Summary counts over a forest, computed on demand rather than stored.
//!
//! `max_depth` is the deepest subcategory level, counting roots as level 1.
//! Lessons add no level, so a forest of lessons only has depth 0, and an
//! empty subcategory still counts its own level.

use crate::tree::CourseTree;
use lingua_content::{Node, NodeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub total_lessons: usize,
    pub total_subcategories: usize,
    pub max_depth: usize,
}

impl Aggregate {
    fn count(&mut self, kind: NodeKind, level: usize) {
        match kind {
            NodeKind::Lesson => self.total_lessons += 1,
            NodeKind::Subcategory => {
                self.total_subcategories += 1;
                self.max_depth = self.max_depth.max(level);
            }
        }
    }
}

/// Aggregate a nested forest in one pass
pub fn aggregate(nodes: &[Node]) -> Aggregate {
    let mut totals = Aggregate::default();
    let mut stack: Vec<(&Node, usize)> = nodes.iter().map(|n| (n, 1)).collect();

    while let Some((node, level)) = stack.pop() {
        totals.count(node.kind(), level);
        stack.extend(node.children().iter().map(|child| (child, level + 1)));
    }

    totals
}

impl CourseTree {
    /// Aggregate the whole course
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate_from(self.roots())
    }

    /// Aggregate the contents of one node; `None` for unknown ids.
    ///
    /// Levels restart at the node's children, so a subcategory's own
    /// level is not counted. Lessons have no contents.
    pub fn aggregate_subtree(&self, id: &str) -> Option<Aggregate> {
        match self.kind_of(id)? {
            NodeKind::Lesson => Some(Aggregate::default()),
            NodeKind::Subcategory => Some(self.aggregate_from(self.children_of(id)?)),
        }
    }

    fn aggregate_from(&self, start: &[String]) -> Aggregate {
        let mut totals = Aggregate::default();
        let mut stack: Vec<(&str, usize)> = start.iter().map(|id| (id.as_str(), 1)).collect();

        while let Some((id, level)) = stack.pop() {
            let Some(kind) = self.kind_of(id) else {
                continue;
            };
            totals.count(kind, level);
            if let Some(children) = self.children_of(id) {
                stack.extend(children.iter().map(|c| (c.as_str(), level + 1)));
            }
        }

        totals
    }
}
