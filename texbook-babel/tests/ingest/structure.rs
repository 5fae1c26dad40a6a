use crate::common::Project;
use proptest::prelude::*;
use texbook_babel::ingest::structure::split_units;
use texbook_babel::model::appendix_letter;

#[test]
fn chapters_and_appendix_from_included_files() {
    let project = Project::new()
        .with_file(
            "main.tex",
            "\\documentclass{book}\n\\title{Field Guide}\n\\begin{document}\n\
             \\input{intro}\n\\input{methods}\n\\appendix\n\\input{data}\n\\end{document}\n",
        )
        .with_file("intro.tex", "\\chapter{Intro}\nWelcome.\n")
        .with_file("methods.tex", "\\chapter{Methods}\nWe measure.\n")
        .with_file("data.tex", "\\chapter{Data}\nTables.\n");

    let doc = project.parse();

    let numbers: Vec<String> = doc.chapters.iter().map(|c| c.number()).collect();
    let titles: Vec<&str> = doc.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2"]);
    assert_eq!(titles, vec!["Intro", "Methods"]);

    assert_eq!(doc.appendices.len(), 1);
    assert_eq!(doc.appendices[0].number(), "A");
    assert_eq!(doc.appendices[0].title, "Data");
    assert!(doc.appendices[0].source.contains("Tables."));
    assert!(!doc.chapters[1].source.contains("Tables."));
}

#[test]
fn no_markers_means_no_units() {
    let (chapters, appendices) = split_units("just some text \\section{Not a chapter}");
    assert!(chapters.is_empty());
    assert!(appendices.is_empty());
}

#[test]
fn appendix_without_chapters() {
    let (chapters, appendices) = split_units("\\appendix\\chapter{Only}");
    assert!(chapters.is_empty());
    assert_eq!(appendices[0].number(), "A");
}

#[test]
fn missing_title_gets_placeholder_and_warning() {
    let (chapters, _) = split_units("\\chapter{First}\n\\chapter\ntext");
    assert_eq!(chapters[1].title, "Chapter 2");
    assert_eq!(chapters[1].warnings.len(), 1);
}

proptest! {
    #[test]
    fn chapter_ordinals_have_no_gaps(titles in prop::collection::vec("[A-Za-z ]{0,12}", 0..40)) {
        let text: String = titles
            .iter()
            .map(|title| format!("\\chapter{{{title}}}\nbody\n"))
            .collect();
        let (chapters, _) = split_units(&text);
        prop_assert_eq!(chapters.len(), titles.len());
        for (idx, chapter) in chapters.iter().enumerate() {
            prop_assert_eq!(chapter.ordinal, idx + 1);
        }
    }

    #[test]
    fn appendix_letters_ignore_chapter_count(chapters in 0usize..20, appendices in 0usize..30) {
        let mut text = "\\chapter{C}\n".repeat(chapters);
        text.push_str("\\appendix\n");
        text.push_str(&"\\chapter{A}\n".repeat(appendices));
        let (_, units) = split_units(&text);
        let letters: Vec<String> = units.iter().map(|unit| unit.number()).collect();
        let expected: Vec<String> = (1..=appendices).map(appendix_letter).collect();
        prop_assert_eq!(letters, expected);
    }
}

#[test]
fn appendix_letters_continue_past_z() {
    assert_eq!(appendix_letter(1), "A");
    assert_eq!(appendix_letter(26), "Z");
    assert_eq!(appendix_letter(27), "AA");
}
