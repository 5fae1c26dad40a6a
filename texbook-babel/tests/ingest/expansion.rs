use crate::common::{count, Project};
use texbook_babel::ingest::source::{
    ExpansionIssue, CIRCULAR_MARKER, MISSING_MARKER, UNREADABLE_MARKER,
};
use texbook_babel::{BabelError, ProjectParser};

#[test]
fn nested_includes_are_flattened_in_place() {
    let project = Project::new()
        .with_file("main.tex", "begin \\input{chapters/one} end")
        .with_file("chapters/one.tex", "one [\\include{chapters/two.tex}]")
        .with_file("chapters/two.tex", "two \\subfile{chapters/three}")
        .with_file("chapters/three.tex", "three");

    let expansion = project.expand();
    assert_eq!(expansion.text, "begin one [two three] end");
    assert_eq!(expansion.files.len(), 4);
    assert!(expansion.issues.is_empty());
    assert!(!expansion.text.contains("\\input"));
}

#[test]
fn self_include_yields_one_marker() {
    let project = Project::new()
        .with_file("main.tex", "\\input{loop}")
        .with_file("loop.tex", "A \\input{loop} B");

    let expansion = project.expand();
    assert_eq!(count(&expansion.text, CIRCULAR_MARKER), 1);
    assert_eq!(
        expansion.text,
        format!("A {CIRCULAR_MARKER} loop.tex\n B")
    );
    assert!(matches!(
        expansion.issues.as_slice(),
        [ExpansionIssue::Circular(_)]
    ));
}

#[test]
fn mutual_cycle_terminates_with_one_marker() {
    let project = Project::new()
        .with_file("main.tex", "\\input{a}")
        .with_file("a.tex", "a(\\input{b})")
        .with_file("b.tex", "b(\\input{a})");

    let text = project.expand().text;
    assert_eq!(count(&text, CIRCULAR_MARKER), 1);
    assert!(text.starts_with("a(b("));
}

#[test]
fn root_including_itself_is_a_cycle() {
    let project = Project::new().with_file("main.tex", "x \\input{main} y");
    assert_eq!(
        project.expand().text,
        format!("x {CIRCULAR_MARKER} main.tex\n y")
    );
}

#[test]
fn deep_chains_do_not_overflow() {
    let mut project = Project::new().with_file("main.tex", "\\input{f0}");
    for i in 0..2000 {
        project = project.with_file(&format!("f{i}.tex"), format!("{i} \\input{{f{}}}", i + 1));
    }
    project = project.with_file("f2000.tex", "end");

    let text = project.expand().text;
    assert!(text.starts_with("0 1 2 "));
    assert!(text.ends_with("1999 end"));
}

#[test]
fn missing_file_leaves_a_marker_and_continues() {
    let project = Project::new().with_file("main.tex", "before \\input{nope} after");

    let expansion = project.expand();
    assert_eq!(
        expansion.text,
        format!("before {MISSING_MARKER} nope\n after")
    );
    assert!(matches!(
        expansion.issues.as_slice(),
        [ExpansionIssue::Missing(_)]
    ));
}

#[test]
fn undecodable_include_is_replaced_by_a_marker() {
    let project = Project::new()
        .with_file("main.tex", "a \\input{bad} b")
        .with_file("bad.tex", [0xffu8, 0xd8, 0x00]);

    let text = ProjectParser::new(project.main())
        .with_options(texbook_babel::ParseOptions {
            encodings: vec!["utf-8".to_string()],
            ..Default::default()
        })
        .parse_with_expansion()
        .unwrap()
        .1
        .text;
    assert_eq!(text, format!("a {UNREADABLE_MARKER} bad.tex\n b"));
}

#[test]
fn utf16_files_are_decoded() {
    let mut bytes = vec![0xff, 0xfe];
    bytes.extend("\\chapter{سلام}".encode_utf16().flat_map(|u| u.to_le_bytes()));
    let project = Project::new()
        .with_file("main.tex", "\\input{fa}")
        .with_file("fa.tex", bytes);

    let doc = project.parse();
    assert_eq!(doc.chapters[0].title, "سلام");
}

#[test]
fn missing_root_is_distinct_from_bad_content() {
    let project = Project::new();
    match ProjectParser::new(project.root().join("absent.tex")).parse() {
        Err(BabelError::RootUnresolvable(path)) => assert!(path.ends_with("absent.tex")),
        other => panic!("expected RootUnresolvable, got {other:?}"),
    }
}
