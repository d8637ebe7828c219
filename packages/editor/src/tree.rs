//! # Course Tree
//!
//! Arena representation of a course structure. Nodes are stored by id with
//! parent and child links held as ids, so locating, renaming or detaching a
//! node never rebuilds the path above it.
//!
//! ```text
//! roots:    [grammar, welcome]
//! entries:  grammar → Subcategory { children: [tenses] }, parent: None
//!           tenses  → Subcategory { children: [lesson-7] }, parent: grammar
//!           lesson-7 → Lesson(..), parent: tenses
//! blocks:   b-1 → lesson-7
//! ```
//!
//! `from_course` / `to_course` convert from and to the nested `Course`
//! shape. Both walk with an explicit stack, so depth is bounded by memory
//! rather than by the call stack. Parent ids on the way out always come from
//! tree position.

use crate::mutations::MutationError;
use crate::EditorConfig;
use chrono::{DateTime, Utc};
use lingua_content::{Course, Lesson, LessonNode, Node, NodeKind, Subcategory};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct CourseTree {
    pub id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,

    /// Top-level node ids, in order
    roots: Vec<String>,

    /// Map from node id to node
    entries: HashMap<String, Entry>,

    /// Map from block id to owning lesson id
    block_owners: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    pub(crate) title: String,
    pub(crate) parent: Option<String>,
    pub(crate) body: EntryBody,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntryBody {
    Subcategory { children: Vec<String> },
    Lesson(Lesson),
}

/// Checks applied while flattening a `Node` subtree into entries
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageRules {
    /// Trim titles and reject blank ones
    check_titles: bool,
    max_title_length: Option<usize>,
    validate_blocks: bool,
}

impl StageRules {
    /// Data coming back from storage: only structural checks
    pub(crate) fn import() -> Self {
        Self {
            check_titles: false,
            max_title_length: None,
            validate_blocks: false,
        }
    }

    /// Nodes created by an author
    pub(crate) fn authoring(config: &EditorConfig) -> Self {
        Self {
            check_titles: true,
            max_title_length: config.max_title_length,
            validate_blocks: config.validate_blocks,
        }
    }
}

/// A checked subtree, ready to attach
#[derive(Debug)]
pub(crate) struct Staged {
    root_id: String,
    parent: Option<String>,
    entries: Vec<(String, Entry)>,
    blocks: Vec<(String, String)>,
}

/// Trim a title and check it against the optional length limit
pub(crate) fn clean_title(raw: &str, max_len: Option<usize>) -> Result<String, MutationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(MutationError::InvalidTitle("title is empty".to_string()));
    }
    if let Some(max_len) = max_len.filter(|&max| title.chars().count() > max) {
        return Err(MutationError::InvalidTitle(format!(
            "title is longer than {} characters",
            max_len
        )));
    }
    Ok(title.to_string())
}

impl CourseTree {
    /// Empty tree for a new course
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            updated_at: Utc::now(),
            roots: Vec::new(),
            entries: HashMap::new(),
            block_owners: HashMap::new(),
        }
    }

    /// Index a course. Fails with `DuplicateId` if any node or block id repeats.
    pub fn from_course(course: &Course) -> Result<Self, MutationError> {
        let mut tree = Self::new(course.id.clone(), course.title.clone());
        tree.updated_at = course.updated_at;

        let rules = StageRules::import();
        for node in &course.structure {
            let staged = tree.stage(node, None, &rules)?;
            tree.commit(staged);
        }

        tracing::debug!(
            "Indexed course {} with {} nodes and {} blocks",
            tree.id,
            tree.entries.len(),
            tree.block_owners.len()
        );
        Ok(tree)
    }

    /// Rebuild the nested course shape
    pub fn to_course(&self) -> Course {
        let mut built: HashMap<&str, Node> = HashMap::with_capacity(self.entries.len());
        let mut stack: Vec<(&str, bool)> =
            self.roots.iter().rev().map(|id| (id.as_str(), false)).collect();

        // Post-order: children are built before their subcategory
        while let Some((id, expanded)) = stack.pop() {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };

            match &entry.body {
                EntryBody::Subcategory { children } if !expanded => {
                    stack.push((id, true));
                    stack.extend(children.iter().rev().map(|c| (c.as_str(), false)));
                }
                EntryBody::Subcategory { children } => {
                    let nodes = children
                        .iter()
                        .filter_map(|c| built.remove(c.as_str()))
                        .collect();
                    built.insert(
                        id,
                        Node::Subcategory(Subcategory {
                            id: id.to_string(),
                            title: entry.title.clone(),
                            children: nodes,
                            parent_id: entry.parent.clone(),
                        }),
                    );
                }
                EntryBody::Lesson(lesson) => {
                    built.insert(
                        id,
                        Node::Lesson(LessonNode {
                            id: id.to_string(),
                            title: entry.title.clone(),
                            lesson: lesson.clone(),
                            parent_id: entry.parent.clone(),
                        }),
                    );
                }
            }
        }

        Course {
            id: self.id.clone(),
            title: self.title.clone(),
            structure: self
                .roots
                .iter()
                .filter_map(|id| built.remove(id.as_str()))
                .collect(),
            updated_at: self.updated_at,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a node with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether the id is taken by a node or a block
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(id) || self.block_owners.contains_key(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.entries.get(id).map(|entry| match entry.body {
            EntryBody::Subcategory { .. } => NodeKind::Subcategory,
            EntryBody::Lesson(_) => NodeKind::Lesson,
        })
    }

    pub fn title_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.title.as_str())
    }

    /// Enclosing subcategory id; `None` for roots and unknown ids
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id).and_then(|entry| entry.parent.as_deref())
    }

    /// Child ids of a subcategory
    pub fn children_of(&self, id: &str) -> Option<&[String]> {
        match &self.entries.get(id)?.body {
            EntryBody::Subcategory { children } => Some(children),
            EntryBody::Lesson(_) => None,
        }
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn find_lesson(&self, id: &str) -> Option<&Lesson> {
        match &self.entries.get(id)?.body {
            EntryBody::Lesson(lesson) => Some(lesson),
            EntryBody::Subcategory { .. } => None,
        }
    }

    /// Lesson that owns a block
    pub fn block_owner(&self, block_id: &str) -> Option<&str> {
        self.block_owners.get(block_id).map(String::as_str)
    }

    /// All node ids, depth-first pre-order
    pub fn preorder(&self) -> Vec<&str> {
        self.walk(&self.roots)
    }

    /// Lesson ids, depth-first pre-order
    pub fn lesson_ids(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .filter(|id| self.kind_of(id) == Some(NodeKind::Lesson))
            .collect()
    }

    /// A node and everything below it, pre-order. Empty for unknown ids.
    pub fn subtree(&self, id: &str) -> Vec<&str> {
        match self.entries.get_key_value(id) {
            Some((key, _)) => self.walk(std::slice::from_ref(key)),
            None => Vec::new(),
        }
    }

    fn walk<'a>(&'a self, start: &'a [String]) -> Vec<&'a str> {
        let mut order = Vec::new();
        let mut stack: Vec<&str> = start.iter().rev().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(EntryBody::Subcategory { children }) = self.entries.get(id).map(|e| &e.body) {
                stack.extend(children.iter().rev().map(String::as_str));
            }
        }

        order
    }

    // -----------------------------------------------------------------------
    // Edit primitives, used by `mutations` after its own precondition checks
    // -----------------------------------------------------------------------

    pub(crate) fn entry_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.get_mut(id)
    }

    pub(crate) fn lesson_mut(&mut self, id: &str) -> Option<&mut Lesson> {
        match &mut self.entries.get_mut(id)?.body {
            EntryBody::Lesson(lesson) => Some(lesson),
            EntryBody::Subcategory { .. } => None,
        }
    }

    pub(crate) fn register_block(&mut self, block_id: &str, lesson_id: &str) {
        self.block_owners
            .insert(block_id.to_string(), lesson_id.to_string());
    }

    pub(crate) fn unregister_block(&mut self, block_id: &str) {
        self.block_owners.remove(block_id);
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Flatten `node` into entries under `parent` without touching the tree.
    ///
    /// Fails with `DuplicateId` when an id in the subtree (node or block) is
    /// already used, in the tree or earlier in the subtree.
    pub(crate) fn stage<'a>(
        &self,
        node: &'a Node,
        parent: Option<&'a str>,
        rules: &StageRules,
    ) -> Result<Staged, MutationError> {
        let mut staged = Staged {
            root_id: node.id().to_string(),
            parent: parent.map(str::to_string),
            entries: Vec::new(),
            blocks: Vec::new(),
        };
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&Node, Option<&str>)> = vec![(node, parent)];

        while let Some((node, parent)) = stack.pop() {
            let id = node.id();
            if self.contains_id(id) || !seen.insert(id) {
                return Err(MutationError::DuplicateId(id.to_string()));
            }

            if node.parent_id().is_some() && node.parent_id() != parent {
                tracing::warn!(
                    "Node {} carries parentId {:?} but sits under {:?}; using position",
                    id,
                    node.parent_id(),
                    parent
                );
            }

            let title = if rules.check_titles {
                clean_title(node.title(), rules.max_title_length)?
            } else {
                node.title().to_string()
            };

            let body = match node {
                Node::Subcategory(sub) => {
                    stack.extend(sub.children.iter().rev().map(|child| (child, Some(id))));
                    EntryBody::Subcategory {
                        children: sub.children.iter().map(|c| c.id().to_string()).collect(),
                    }
                }
                Node::Lesson(lesson_node) => {
                    for block in &lesson_node.lesson.blocks {
                        if self.contains_id(&block.id) || !seen.insert(&block.id) {
                            return Err(MutationError::DuplicateId(block.id.clone()));
                        }
                        if rules.validate_blocks {
                            block.validate().map_err(|source| MutationError::BlockSchemaMismatch {
                                block_id: block.id.clone(),
                                source,
                            })?;
                        }
                        staged.blocks.push((block.id.clone(), id.to_string()));
                    }

                    // The lesson mirrors its node's title
                    let mut lesson = lesson_node.lesson.clone();
                    lesson.title = title.clone();
                    EntryBody::Lesson(lesson)
                }
            };

            staged.entries.push((
                id.to_string(),
                Entry {
                    title,
                    parent: parent.map(str::to_string),
                    body,
                },
            ));
        }

        Ok(staged)
    }

    /// Attach a staged subtree as the last child of its parent (or last root)
    pub(crate) fn commit(&mut self, staged: Staged) {
        match &staged.parent {
            Some(parent_id) => {
                if let Some(EntryBody::Subcategory { children }) =
                    self.entries.get_mut(parent_id).map(|e| &mut e.body)
                {
                    children.push(staged.root_id.clone());
                }
            }
            None => self.roots.push(staged.root_id.clone()),
        }

        for (block_id, lesson_id) in staged.blocks {
            self.block_owners.insert(block_id, lesson_id);
        }
        self.entries.extend(staged.entries);
    }

    /// Remove a node and its subtree; returns the removed ids in pre-order
    pub(crate) fn detach(&mut self, id: &str) -> Vec<String> {
        let removed: Vec<String> = self.subtree(id).into_iter().map(str::to_string).collect();
        if removed.is_empty() {
            return removed;
        }

        match self.parent_of(id).map(str::to_string) {
            Some(parent_id) => {
                if let Some(EntryBody::Subcategory { children }) =
                    self.entries.get_mut(&parent_id).map(|e| &mut e.body)
                {
                    children.retain(|c| c != id);
                }
            }
            None => self.roots.retain(|r| r != id),
        }

        for node_id in &removed {
            if let Some(Entry {
                body: EntryBody::Lesson(lesson),
                ..
            }) = self.entries.remove(node_id)
            {
                for block in &lesson.blocks {
                    self.block_owners.remove(&block.id);
                }
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_content::block::TextContent;
    use lingua_content::{Block, BlockContent};

    fn sample() -> Course {
        Course::new("course-1", "Spanish A1").with_structure(vec![
            Node::subcategory("grammar", "Grammar").with_children(vec![
                Node::subcategory("tenses", "Tenses")
                    .with_children(vec![Node::lesson("lesson-7", "Past Simple")]),
                Node::lesson("articles", "Articles"),
            ]),
            Node::lesson("welcome", "Welcome"),
        ])
    }

    #[test]
    fn test_index_links_parents() {
        let tree = CourseTree::from_course(&sample()).unwrap();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.roots(), ["grammar", "welcome"]);
        assert_eq!(tree.parent_of("lesson-7"), Some("tenses"));
        assert_eq!(tree.parent_of("tenses"), Some("grammar"));
        assert_eq!(tree.parent_of("grammar"), None);
        assert_eq!(tree.children_of("grammar").unwrap(), ["tenses", "articles"]);
        assert!(tree.children_of("lesson-7").is_none());
    }

    #[test]
    fn test_preorder() {
        let tree = CourseTree::from_course(&sample()).unwrap();
        assert_eq!(
            tree.preorder(),
            vec!["grammar", "tenses", "lesson-7", "articles", "welcome"]
        );
        assert_eq!(tree.lesson_ids(), vec!["lesson-7", "articles", "welcome"]);
        assert_eq!(tree.subtree("tenses"), vec!["tenses", "lesson-7"]);
        assert!(tree.subtree("missing").is_empty());
    }

    #[test]
    fn test_export_sets_parent_ids_from_position() {
        let mut course = sample();
        // Stale back-reference
        if let Node::Lesson(lesson) = &mut course.structure[1] {
            lesson.parent_id = Some("grammar".to_string());
        }

        let exported = CourseTree::from_course(&course).unwrap().to_course();
        assert_eq!(exported.structure[1].parent_id(), None);
        assert_eq!(exported.structure[0].children()[0].parent_id(), Some("grammar"));
        assert_eq!(
            exported.structure[0].children()[0].children()[0].parent_id(),
            Some("tenses")
        );
    }

    #[test]
    fn test_duplicate_ids_rejected_on_import() {
        let course = Course::new("c", "C").with_structure(vec![
            Node::subcategory("a", "A").with_children(vec![Node::lesson("x", "X")]),
            Node::lesson("x", "Again"),
        ]);

        assert_eq!(
            CourseTree::from_course(&course),
            Err(MutationError::DuplicateId("x".to_string()))
        );
    }

    #[test]
    fn test_detach_removes_subtree_and_blocks() {
        let text = Block::new(
            "b-1",
            BlockContent::Text(TextContent {
                title: "Notes".to_string(),
                body: "Regular verbs add -ed".to_string(),
            }),
        );
        let past = LessonNode {
            id: "lesson-7".to_string(),
            title: "Past Simple".to_string(),
            lesson: Lesson::new("lesson-7", "Past Simple").with_blocks(vec![text]),
            parent_id: None,
        };
        let course = Course::new("c", "C").with_structure(vec![
            Node::subcategory("grammar", "Grammar").with_children(vec![Node::Lesson(past)]),
            Node::lesson("welcome", "Welcome"),
        ]);
        let mut tree = CourseTree::from_course(&course).unwrap();
        assert_eq!(tree.block_owner("b-1"), Some("lesson-7"));

        let removed = tree.detach("grammar");
        assert_eq!(removed, vec!["grammar", "lesson-7"]);
        assert_eq!(tree.roots(), ["welcome"]);
        assert_eq!(tree.len(), 1);
        assert!(tree.block_owner("b-1").is_none());
        assert!(!tree.contains_id("b-1"));

        assert!(tree.detach("grammar").is_empty());
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Verbs  ", Some(10)).unwrap(), "Verbs");
        assert!(matches!(clean_title("   ", None), Err(MutationError::InvalidTitle(_))));
        assert!(matches!(
            clean_title("Very long title", Some(5)),
            Err(MutationError::InvalidTitle(_))
        ));

        let long = "a".repeat(500);
        assert_eq!(clean_title(&long, None).unwrap(), long);
    }
}
