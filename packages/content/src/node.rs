//! # Course Structure
//!
//! A course owns an ordered forest of nodes. Subcategories nest to any
//! depth; lessons are leaves holding the block list.
//!
//! ```text
//! Course
//! ├── Subcategory "Grammar"
//! │   ├── Subcategory "Tenses"
//! │   │   └── Lesson "Past Simple"
//! │   └── Lesson "Articles"
//! └── Lesson "Welcome"
//! ```
//!
//! `parentId` is a cached back-reference; whoever rebuilds this shape from
//! an edited tree sets it from position.

use crate::block::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub structure: Vec<Node>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            structure: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_structure(mut self, structure: Vec<Node>) -> Self {
        self.structure = structure;
        self
    }
}

/// Tree node, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Subcategory(Subcategory),
    Lesson(LessonNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Subcategory,
    Lesson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Leaf node referencing a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonNode {
    pub id: String,
    pub title: String,
    pub lesson: Lesson,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Node {
    /// Empty subcategory
    pub fn subcategory(id: impl Into<String>, title: impl Into<String>) -> Self {
        Node::Subcategory(Subcategory {
            id: id.into(),
            title: title.into(),
            children: Vec::new(),
            parent_id: None,
        })
    }

    /// Draft lesson with no blocks; the lesson shares the node id
    pub fn lesson(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let title = title.into();
        Node::Lesson(LessonNode {
            lesson: Lesson::new(id.clone(), title.clone()),
            id,
            title,
            parent_id: None,
        })
    }

    /// Append children (no-op on lessons)
    pub fn with_children(mut self, nodes: Vec<Node>) -> Self {
        if let Node::Subcategory(sub) = &mut self {
            sub.children.extend(nodes);
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Subcategory(sub) => &sub.id,
            Node::Lesson(lesson) => &lesson.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Node::Subcategory(sub) => &sub.title,
            Node::Lesson(lesson) => &lesson.title,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Node::Subcategory(sub) => sub.parent_id.as_deref(),
            Node::Lesson(lesson) => lesson.parent_id.as_deref(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Subcategory(_) => NodeKind::Subcategory,
            Node::Lesson(_) => NodeKind::Lesson,
        }
    }

    /// Children of a subcategory; lessons have none
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Subcategory(sub) => &sub.children,
            Node::Lesson(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    #[default]
    Draft,
    Live,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Unlisted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: LessonStatus,
    /// Presentation order
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "initial_version")]
    pub version: u32,
    pub last_modified: DateTime<Utc>,
}

fn initial_version() -> u32 {
    1
}

impl Lesson {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: LessonStatus::Draft,
            blocks: Vec::new(),
            visibility: Visibility::default(),
            version: initial_version(),
            last_modified: Utc::now(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Record a change made at `now`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_json_uses_type_tag() {
        let node = Node::subcategory("grammar-id", "Grammar")
            .with_children(vec![Node::lesson("lesson-7", "Past Simple")]);

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "subcategory");
        assert_eq!(json["parentId"], serde_json::Value::Null);
        assert_eq!(json["children"][0]["type"], "lesson");
        assert_eq!(json["children"][0]["lesson"]["status"], "draft");
        assert!(json["children"][0].get("children").is_none());

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_lesson_children_are_empty() {
        let node = Node::lesson("l-1", "Greetings").with_children(vec![Node::lesson("l-2", "x")]);
        assert!(node.children().is_empty());
        assert_eq!(node.kind(), NodeKind::Lesson);
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut lesson = Lesson::new("l-1", "Greetings");
        let before = lesson.version;
        let now = Utc::now();
        lesson.touch(now);
        assert_eq!(lesson.version, before + 1);
        assert_eq!(lesson.last_modified, now);
    }
}
