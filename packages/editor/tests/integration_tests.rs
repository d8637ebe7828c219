//! Integration tests for the editing session

use lingua_content::block::TextContent;
use lingua_content::{Block, BlockContent, Course, Node};
use lingua_editor::{
    Aggregate, EditSession, EditorConfig, EditorError, EditorView, Mutation, MutationError,
    DEFAULT_CONFIG_NAME,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn spanish() -> Course {
    Course::new("spanish", "Spanish A1").with_structure(vec![
        Node::subcategory("grammar", "Grammar").with_children(vec![
            Node::subcategory("tenses", "Tenses")
                .with_children(vec![Node::lesson("lesson-7", "Past Simple")]),
            Node::lesson("lesson-8", "Articles"),
        ]),
    ])
}

fn french() -> Course {
    Course::new("french", "French A1").with_structure(vec![Node::lesson("bonjour", "Bonjour")])
}

fn session() -> EditSession {
    init_tracing();
    EditSession::new(vec![spanish(), french()], EditorConfig::default()).unwrap()
}

fn text(id: &str, body: &str) -> Block {
    Block::new(
        id,
        BlockContent::Text(TextContent {
            title: String::new(),
            body: body.to_string(),
        }),
    )
}

#[test]
fn test_select_course_then_lesson() -> anyhow::Result<()> {
    let mut session = session();

    session.select_course("spanish")?;
    assert_eq!(
        session.aggregate(),
        Some(Aggregate {
            total_lessons: 2,
            total_subcategories: 2,
            max_depth: 2
        })
    );

    session.select_lesson("lesson-7")?;
    assert_eq!(session.selected_lesson_id(), Some("lesson-7"));

    let crumbs: Vec<String> = session.breadcrumb().into_iter().map(|s| s.title).collect();
    assert_eq!(crumbs, vec!["Grammar", "Tenses", "Past Simple"]);
    Ok(())
}

#[test]
fn test_switching_course_clears_lesson() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;
    session.select_lesson("lesson-7")?;

    session.select_course("french")?;
    assert_eq!(
        session.view(),
        &EditorView::CourseSelected {
            course_id: "french".to_string()
        }
    );
    assert!(session.selected_lesson().is_none());
    assert!(session.breadcrumb().is_empty());
    Ok(())
}

#[test]
fn test_unknown_course_and_lesson() -> anyhow::Result<()> {
    let mut session = session();

    assert!(matches!(
        session.select_course("german"),
        Err(EditorError::CourseNotFound(_))
    ));

    session.select_course("spanish")?;
    let err = session.select_lesson("bonjour").unwrap_err();
    assert_eq!(
        err.as_mutation(),
        Some(&MutationError::LessonNotFound("bonjour".to_string()))
    );

    // Subcategories cannot be opened on the canvas
    assert!(session.select_lesson("tenses").is_err());
    Ok(())
}

#[test]
fn test_apply_without_course() {
    let mut session = session();
    let result = session.apply(&Mutation::DeleteNode {
        node_id: "grammar".to_string(),
    });
    assert!(matches!(result, Err(EditorError::NoCourseSelected)));
}

#[test]
fn test_snapshot_follows_edits() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;
    session.select_lesson("lesson-7")?;
    let version = session.selected_lesson().map(|s| s.lesson.version);

    session.apply(&Mutation::UpsertBlock {
        lesson_id: "lesson-7".to_string(),
        block: text("b-1", "Add -ed"),
    })?;
    session.apply(&Mutation::RenameNode {
        node_id: "tenses".to_string(),
        title: "Tiempos".to_string(),
    })?;

    let snapshot = session.selected_lesson().cloned().unwrap();
    assert_eq!(snapshot.lesson.blocks.len(), 1);
    assert_eq!(Some(snapshot.lesson.version), version.map(|v| v + 1));
    assert_eq!(snapshot.path[1].title, "Tiempos");

    // The snapshot is what the tree holds, not a hand-patched copy
    let tree_lesson = session.selected_course().and_then(|c| c.find_lesson("lesson-7"));
    assert_eq!(tree_lesson, Some(&snapshot.lesson));
    Ok(())
}

#[test]
fn test_deleting_open_lesson_returns_to_course() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;
    session.select_lesson("lesson-7")?;

    let result = session.apply(&Mutation::DeleteNode {
        node_id: "grammar".to_string(),
    })?;
    assert!(result.removed.contains(&"lesson-7".to_string()));

    assert_eq!(
        session.view(),
        &EditorView::CourseSelected {
            course_id: "spanish".to_string()
        }
    );
    assert!(session.selected_lesson().is_none());
    assert!(session.breadcrumb().is_empty());
    Ok(())
}

#[test]
fn test_edits_to_other_course_leave_selection_alone() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;
    session.select_lesson("lesson-7")?;
    let before = session.selected_lesson().cloned();

    session.apply_to(
        "french",
        &Mutation::RenameNode {
            node_id: "bonjour".to_string(),
            title: "Salut".to_string(),
        },
    )?;

    assert_eq!(session.selected_lesson().cloned(), before);
    let french = session.course("french").unwrap();
    assert_eq!(french.title_of("bonjour"), Some("Salut"));
    Ok(())
}

#[test]
fn test_rejected_edit_keeps_version() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;
    let version = session.version();

    let err = session
        .apply(&Mutation::InsertNode {
            parent_id: None,
            node: Node::lesson("lesson-8", "Clash"),
        })
        .unwrap_err();

    assert!(err.as_mutation().is_some_and(MutationError::is_fatal));
    assert_eq!(session.version(), version);

    // Duplicate delete deliveries are accepted but change nothing
    session.apply(&Mutation::DeleteBlock {
        lesson_id: "lesson-8".to_string(),
        block_id: "b-404".to_string(),
    })?;
    assert_eq!(session.version(), version);
    Ok(())
}

#[test]
fn test_generated_ids_are_accepted() -> anyhow::Result<()> {
    let mut session = session();
    session.select_course("spanish")?;

    let lesson_id = session.new_node_id();
    let block_id = session.new_block_id();

    session.apply(&Mutation::InsertNode {
        parent_id: Some("tenses".to_string()),
        node: Node::lesson(lesson_id.clone(), "Future"),
    })?;
    session.apply(&Mutation::UpsertBlock {
        lesson_id: lesson_id.clone(),
        block: text(&block_id, "Will + verb"),
    })?;

    session.select_lesson(&lesson_id)?;
    assert_eq!(session.breadcrumb().len(), 3);
    Ok(())
}

#[test]
fn test_add_and_remove_courses() -> anyhow::Result<()> {
    let mut session = session();

    assert!(matches!(
        session.add_course(french()),
        Err(EditorError::DuplicateCourse(_))
    ));

    session.add_course(Course::new("german", "German A1"))?;
    session.select_course("german")?;

    let removed = session.remove_course("german")?;
    assert_eq!(removed.id, "german");
    assert_eq!(session.view(), &EditorView::NoCourseSelected);

    let ids: Vec<String> = session.courses().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["spanish", "french"]);
    Ok(())
}

#[test]
fn test_session_from_config_file() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_NAME),
        r#"{ "idPrefix": "es", "maxTitleLength": 10 }"#,
    )?;

    let config = EditorConfig::load(dir.path())?;
    let mut session = EditSession::new(vec![spanish()], config)?;
    session.select_course("spanish")?;

    assert!(session.new_node_id().starts_with("es-"));
    let err = session
        .apply(&Mutation::RenameNode {
            node_id: "grammar".to_string(),
            title: "Gramática española".to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        err.as_mutation(),
        Some(MutationError::InvalidTitle(_))
    ));
    Ok(())
}
