use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lingua_content::block::TextContent;
use lingua_content::{Block, BlockContent, Course, Lesson, LessonNode, Node};
use lingua_editor::{aggregate, resolve_path, CourseTree, Mutation};

/// `breadth` top-level subcategories, each with `breadth` units of `breadth` lessons
fn wide_course(breadth: usize) -> Course {
    let lesson = |id: String| {
        let blocks = (0..5)
            .map(|b| {
                Block::new(
                    format!("{}-b{}", id, b),
                    BlockContent::Text(TextContent {
                        title: String::new(),
                        body: "Lorem ipsum".to_string(),
                    }),
                )
            })
            .collect();
        Node::Lesson(LessonNode {
            lesson: Lesson::new(id.clone(), "Lesson").with_blocks(blocks),
            title: "Lesson".to_string(),
            id,
            parent_id: None,
        })
    };

    let structure = (0..breadth)
        .map(|s| {
            Node::subcategory(format!("s{}", s), "Section").with_children(
                (0..breadth)
                    .map(|u| {
                        Node::subcategory(format!("s{}-u{}", s, u), "Unit").with_children(
                            (0..breadth)
                                .map(|l| lesson(format!("s{}-u{}-l{}", s, u, l)))
                                .collect(),
                        )
                    })
                    .collect(),
            )
        })
        .collect();

    Course::new("bench", "Bench").with_structure(structure)
}

fn index_and_export(c: &mut Criterion) {
    let course = wide_course(10);

    c.bench_function("from_course_wide", |b| {
        b.iter(|| CourseTree::from_course(black_box(&course)))
    });

    let tree = CourseTree::from_course(&course).unwrap();
    c.bench_function("to_course_wide", |b| b.iter(|| black_box(&tree).to_course()));
}

fn derived_views(c: &mut Criterion) {
    let course = wide_course(10);
    let tree = CourseTree::from_course(&course).unwrap();

    c.bench_function("resolve_path_nested", |b| {
        b.iter(|| resolve_path(black_box(&course.structure), "s9-u9-l9"))
    });
    c.bench_function("resolve_path_indexed", |b| {
        b.iter(|| black_box(&tree).resolve_path("s9-u9-l9"))
    });
    c.bench_function("aggregate_nested", |b| {
        b.iter(|| aggregate(black_box(&course.structure)))
    });
}

fn edits(c: &mut Criterion) {
    let tree = CourseTree::from_course(&wide_course(10)).unwrap();

    c.bench_function("rename_deep_lesson", |b| {
        let mutation = Mutation::RenameNode {
            node_id: "s5-u5-l5".to_string(),
            title: "Renamed".to_string(),
        };
        b.iter(|| {
            let mut scratch = tree.clone();
            mutation.apply(black_box(&mut scratch))
        })
    });

    c.bench_function("delete_section", |b| {
        let mutation = Mutation::DeleteNode {
            node_id: "s5".to_string(),
        };
        b.iter(|| {
            let mut scratch = tree.clone();
            mutation.apply(black_box(&mut scratch))
        })
    });
}

criterion_group!(benches, index_and_export, derived_views, edits);
criterion_main!(benches);
