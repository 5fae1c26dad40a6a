use crate::common::Project;
use texbook_babel::model::{LabelKind, LabelRegistry};

#[test]
fn registry_spans_all_included_files() {
    let project = Project::new()
        .with_file("main.tex", "\\chapter{One}\\label{ch:one}\n\\input{two}")
        .with_file("two.tex", "\\chapter{Two}\\label{ch:two}\n\\label{fig:x}");

    let doc = project.parse();
    let keys: Vec<&String> = doc.labels.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["ch:one", "ch:two", "fig:x"]);
    assert!(doc
        .labels
        .iter()
        .all(|(_, label)| label.kind == LabelKind::Unknown && label.file.is_none()));
}

#[test]
fn duplicate_label_keeps_the_later_definition() {
    let project = Project::new()
        .with_file("main.tex", "\\chapter{A}\\label{dup}\\input{b}")
        .with_file("b.tex", "\\chapter{B}\\label{dup}");
    let mut doc = project.parse();
    assert_eq!(doc.labels.len(), 1);

    doc.chapters[0].filename = "ch01-a.md".to_string();
    doc.chapters[1].filename = "ch02-b.md".to_string();
    let scoped = LabelRegistry::collect_scoped(doc.units());
    assert_eq!(scoped.get("dup").unwrap().file.as_deref(), Some("ch02-b.md"));
}
