use crate::common::Project;
use texbook_babel::model::ContentType;

#[test]
fn metadata_from_the_preamble() {
    let project = Project::new()
        .with_file(
            "main.tex",
            "\\documentclass[12pt]{article}\n\\title{A \\textbf{Bold} Title}\n\\author{Sara}\n\
             \\date{2024-03-01}\n\\keywords{latex, , markdown}\n\\begin{document}\n\
             \\begin{abstract}\n  Short summary.\n\\end{abstract}\n\\end{document}\n",
        )
        .with_file("figs/plot.png", b"png");

    let meta = project.parse().metadata;
    assert_eq!(meta.title, "A \\textbf{Bold} Title");
    assert_eq!(meta.author, "Sara");
    assert_eq!(meta.publish_date, "2024-03-01");
    assert_eq!(meta.tags, vec!["latex", "markdown"]);
    assert_eq!(meta.description, "Short summary.");
    assert_eq!(meta.content_type, ContentType::Article);
}

#[test]
fn absent_fields_keep_defaults() {
    let meta = Project::new().with_file("main.tex", "\\chapter{X}").parse().metadata;
    assert_eq!(meta.title, "");
    assert_eq!(meta.description, "");
    assert_eq!(meta.lang, "fa");
    assert_eq!(meta.content_type, ContentType::Book);
}

#[test]
fn images_resolve_through_graphicspath() {
    let project = Project::new()
        .with_file(
            "main.tex",
            "\\graphicspath{{art/}}\n\\chapter{Pics}\n\\includegraphics[width=3cm]{cover}\n\
             \\includegraphics{ghost}\n",
        )
        .with_file("art/cover.eps", b"%!PS");

    let doc = project.parse();
    let chapter = &doc.chapters[0];
    assert_eq!(chapter.images.len(), 2);
    assert!(chapter.images[0].needs_conversion);
    assert_eq!(chapter.images[0].output_name, "cover.png");
    assert_eq!(chapter.images[1].path, None);
    assert_eq!(chapter.warnings, vec!["image 'ghost' could not be found"]);
    assert_eq!(doc.graphics_paths.len(), 1);
}
