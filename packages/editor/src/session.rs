//! # Edit Session
//!
//! One author's editing surface: the loaded courses, what is open, and the
//! cached view of the open lesson.
//!
//! ```text
//! NoCourseSelected ──select_course──▶ CourseSelected ──select_lesson──▶ LessonSelected
//!        ▲                               │      ▲                              │
//!        └────────────back───────────────┘      └─────back / lesson deleted───┘
//! ```
//!
//! Edits go through [`Mutation`]; after every accepted edit the open lesson
//! is re-read from the tree, never patched, so the canvas cannot drift from
//! the structure it came from.

use crate::aggregate::Aggregate;
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::path::PathSegment;
use crate::tree::CourseTree;
use crate::{EditorConfig, EditorError};
use chrono::Utc;
use lingua_content::{Course, IdGenerator, Lesson};
use serde::{Deserialize, Serialize};

const BLOCK_ID_PREFIX: &str = "block";

/// Which screen the editor shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EditorView {
    #[default]
    NoCourseSelected,
    #[serde(rename_all = "camelCase")]
    CourseSelected { course_id: String },
    #[serde(rename_all = "camelCase")]
    LessonSelected { course_id: String, lesson_id: String },
}

impl EditorView {
    pub fn course_id(&self) -> Option<&str> {
        match self {
            EditorView::NoCourseSelected => None,
            EditorView::CourseSelected { course_id }
            | EditorView::LessonSelected { course_id, .. } => Some(course_id),
        }
    }

    pub fn lesson_id(&self) -> Option<&str> {
        match self {
            EditorView::LessonSelected { lesson_id, .. } => Some(lesson_id),
            _ => None,
        }
    }
}

/// The open lesson as the canvas renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSnapshot {
    pub lesson: Lesson,
    pub path: Vec<PathSegment>,
}

pub struct EditSession {
    courses: Vec<CourseTree>,
    config: EditorConfig,
    node_ids: IdGenerator,
    block_ids: IdGenerator,
    view: EditorView,
    selected_lesson: Option<LessonSnapshot>,

    /// Bumped on every accepted change
    version: u64,
}

impl EditSession {
    /// Index `courses` for editing. Course ids must be distinct.
    pub fn new(courses: Vec<Course>, config: EditorConfig) -> Result<Self, EditorError> {
        let mut session = Self {
            courses: Vec::with_capacity(courses.len()),
            node_ids: IdGenerator::new(&config.id_prefix),
            block_ids: IdGenerator::new(BLOCK_ID_PREFIX),
            config,
            view: EditorView::NoCourseSelected,
            selected_lesson: None,
            version: 0,
        };

        for course in &courses {
            session.load(course)?;
        }

        Ok(session)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selected_course_id(&self) -> Option<&str> {
        self.view.course_id()
    }

    pub fn selected_lesson_id(&self) -> Option<&str> {
        self.view.lesson_id()
    }

    pub fn selected_lesson(&self) -> Option<&LessonSnapshot> {
        self.selected_lesson.as_ref()
    }

    pub fn course(&self, course_id: &str) -> Option<&CourseTree> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn selected_course(&self) -> Option<&CourseTree> {
        self.course(self.selected_course_id()?)
    }

    /// Export every course in load order
    pub fn courses(&self) -> Vec<Course> {
        self.courses.iter().map(CourseTree::to_course).collect()
    }

    /// Open a course. Any open lesson is closed, even when re-selecting the same course.
    pub fn select_course(&mut self, course_id: &str) -> Result<(), EditorError> {
        if self.course(course_id).is_none() {
            return Err(EditorError::CourseNotFound(course_id.to_string()));
        }

        tracing::info!("Selected course {}", course_id);
        self.view = EditorView::CourseSelected {
            course_id: course_id.to_string(),
        };
        self.selected_lesson = None;
        Ok(())
    }

    /// Open a lesson of the selected course
    pub fn select_lesson(&mut self, lesson_id: &str) -> Result<(), EditorError> {
        let course = self.selected_course().ok_or(EditorError::NoCourseSelected)?;
        let snapshot = snapshot(course, lesson_id)
            .ok_or_else(|| MutationError::LessonNotFound(lesson_id.to_string()))?;
        let course_id = course.id.clone();

        tracing::info!("Selected lesson {} in course {}", lesson_id, course_id);
        self.view = EditorView::LessonSelected {
            course_id,
            lesson_id: lesson_id.to_string(),
        };
        self.selected_lesson = Some(snapshot);
        Ok(())
    }

    /// Move one level up
    pub fn back(&mut self) {
        self.view = match std::mem::take(&mut self.view) {
            EditorView::LessonSelected { course_id, .. } => EditorView::CourseSelected { course_id },
            EditorView::CourseSelected { .. } | EditorView::NoCourseSelected => {
                EditorView::NoCourseSelected
            }
        };
        self.selected_lesson = None;
    }

    /// Apply an edit to the selected course
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        let course_id = self
            .selected_course_id()
            .ok_or(EditorError::NoCourseSelected)?
            .to_string();
        self.apply_to(&course_id, mutation)
    }

    /// Apply an edit to any loaded course
    pub fn apply_to(
        &mut self,
        course_id: &str,
        mutation: &Mutation,
    ) -> Result<MutationResult, EditorError> {
        let tree = self
            .courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| EditorError::CourseNotFound(course_id.to_string()))?;

        let result = mutation.apply_with(tree, &self.config, Utc::now())?;

        if result.changed {
            self.version += 1;
            if self.selected_course_id() == Some(course_id) {
                self.refresh_selection();
            }
        }

        Ok(result)
    }

    /// Load another course
    pub fn add_course(&mut self, course: Course) -> Result<(), EditorError> {
        self.load(&course)?;
        self.version += 1;
        Ok(())
    }

    /// Unload a course, returning its final state. Closes it if open.
    pub fn remove_course(&mut self, course_id: &str) -> Result<Course, EditorError> {
        let index = self
            .courses
            .iter()
            .position(|c| c.id == course_id)
            .ok_or_else(|| EditorError::CourseNotFound(course_id.to_string()))?;

        let tree = self.courses.remove(index);
        if self.selected_course_id() == Some(course_id) {
            tracing::info!("Closed removed course {}", course_id);
            self.view = EditorView::NoCourseSelected;
            self.selected_lesson = None;
        }

        self.version += 1;
        Ok(tree.to_course())
    }

    /// Breadcrumb of the open lesson; empty when none is open
    pub fn breadcrumb(&self) -> Vec<PathSegment> {
        self.selected_lesson
            .as_ref()
            .map(|snapshot| snapshot.path.clone())
            .unwrap_or_default()
    }

    /// Counts for the selected course
    pub fn aggregate(&self) -> Option<Aggregate> {
        self.selected_course().map(CourseTree::aggregate)
    }

    /// Fresh id for a subcategory or lesson
    pub fn new_node_id(&mut self) -> String {
        self.node_ids.new_id()
    }

    /// Fresh id for a block
    pub fn new_block_id(&mut self) -> String {
        self.block_ids.new_id()
    }

    fn load(&mut self, course: &Course) -> Result<(), EditorError> {
        if self.course(&course.id).is_some() {
            return Err(EditorError::DuplicateCourse(course.id.clone()));
        }
        self.courses.push(CourseTree::from_course(course)?);
        Ok(())
    }

    /// Re-read the open lesson from its tree
    fn refresh_selection(&mut self) {
        let EditorView::LessonSelected {
            course_id,
            lesson_id,
        } = self.view.clone()
        else {
            return;
        };

        let fresh = self
            .course(&course_id)
            .and_then(|course| snapshot(course, &lesson_id));

        match fresh {
            Some(snapshot) => self.selected_lesson = Some(snapshot),
            None => {
                tracing::info!("Selected lesson {} was removed, closing it", lesson_id);
                self.view = EditorView::CourseSelected { course_id };
                self.selected_lesson = None;
            }
        }
    }
}

fn snapshot(course: &CourseTree, lesson_id: &str) -> Option<LessonSnapshot> {
    Some(LessonSnapshot {
        lesson: course.find_lesson(lesson_id)?.clone(),
        path: course.resolve_path(lesson_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_content::Node;

    fn course() -> Course {
        Course::new("spanish", "Spanish A1").with_structure(vec![Node::subcategory(
            "grammar",
            "Grammar",
        )
        .with_children(vec![Node::lesson("lesson-7", "Past Simple")])])
    }

    fn session() -> EditSession {
        EditSession::new(vec![course()], EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_with_nothing_selected() {
        let session = session();
        assert_eq!(session.view(), &EditorView::NoCourseSelected);
        assert!(session.breadcrumb().is_empty());
        assert_eq!(session.aggregate(), None);
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let result = EditSession::new(vec![course(), course()], EditorConfig::default());
        assert!(matches!(result, Err(EditorError::DuplicateCourse(id)) if id == "spanish"));
    }

    #[test]
    fn test_select_lesson_requires_course() {
        let mut session = session();
        assert!(matches!(
            session.select_lesson("lesson-7"),
            Err(EditorError::NoCourseSelected)
        ));
    }

    #[test]
    fn test_back_moves_one_level() {
        let mut session = session();
        session.select_course("spanish").unwrap();
        session.select_lesson("lesson-7").unwrap();

        session.back();
        assert_eq!(
            session.view(),
            &EditorView::CourseSelected {
                course_id: "spanish".to_string()
            }
        );
        assert!(session.selected_lesson().is_none());

        session.back();
        assert_eq!(session.view(), &EditorView::NoCourseSelected);

        session.back();
        assert_eq!(session.view(), &EditorView::NoCourseSelected);
    }

    #[test]
    fn test_generated_ids_use_configured_prefix() {
        let config = EditorConfig {
            id_prefix: "es".to_string(),
            ..EditorConfig::default()
        };
        let mut session = EditSession::new(Vec::new(), config).unwrap();

        let a = session.new_node_id();
        let b = session.new_node_id();
        assert!(a.starts_with("es-"));
        assert_ne!(a, b);
        assert!(session.new_block_id().starts_with("block-"));
    }

    #[test]
    fn test_view_json() {
        let view = EditorView::LessonSelected {
            course_id: "spanish".to_string(),
            lesson_id: "lesson-7".to_string(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "lessonSelected");
        assert_eq!(json["lessonId"], "lesson-7");
    }
}
