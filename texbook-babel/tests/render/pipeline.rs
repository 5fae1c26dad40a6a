use crate::common::Project;
use texbook_babel::formats::FallbackConverter;
use texbook_babel::publish::{
    prepare, publish, render_index_file, PrepareOptions, PublishArtifact, PublishSpec,
    PublishTarget,
};
use texbook_babel::registry::ConverterRegistry;
use texbook_babel::{ConverterChoice, RenderOptions, Renderer};

fn fallback_renderer(image_base_url: &str) -> Renderer {
    let mut registry = ConverterRegistry::new();
    registry.register(FallbackConverter::default());
    Renderer::with_registry(
        registry,
        RenderOptions {
            converter: ConverterChoice::Named("fallback".to_string()),
            image_base_url: image_base_url.to_string(),
            ..RenderOptions::default()
        },
    )
}

fn sample_project() -> Project {
    Project::new()
        .with_file(
            "main.tex",
            "\\documentclass{book}\n\\title{Notes on Rust}\n\\author{Sam}\n\\begin{document}\n\
             \\input{chapters/intro}\n\\input{chapters/results}\n\\appendix\n\\chapter{Raw Data}\n\
             Numbers live here.\\label{app:raw}\n\\end{document}\n",
        )
        .with_file(
            "chapters/intro.tex",
            "\\chapter{Getting Started}\\label{ch:intro}\n\
             \\section{Why}\nBecause \\emph{speed}. See \\ref{fig:plot} and \\ref{app:raw}.\n",
        )
        .with_file(
            "chapters/results.tex",
            "\\chapter{Results}\n\\begin{figure}\n\\includegraphics{plot}\n\
             \\label{fig:plot}\n\\end{figure}\nMissing: \\ref{fig:missing}.\n",
        )
        .with_file("figures/plot.pdf", b"%PDF-1.4")
}

#[test]
fn renders_a_book_with_cross_file_links() {
    let mut doc = sample_project().parse();
    prepare(
        &mut doc,
        &PrepareOptions {
            scope_labels: true,
            ..PrepareOptions::default()
        },
    );
    let rendered = fallback_renderer("/images/books/notes-on-rust")
        .render_document(&mut doc)
        .unwrap();
    assert_eq!(rendered, 3);

    let intro = &doc.chapters[0];
    assert_eq!(intro.filename, "ch01-getting-started.md");
    insta::assert_snapshot!(intro.rendered.as_deref().unwrap(), @r###"
    <a id="ch:intro"></a>
    ## Why
    Because *speed*. See [fig:plot](ch02-results.md#fig:plot) and [app:raw](app01-raw-data.md#app:raw).
    "###);

    let results = &doc.chapters[1];
    assert_eq!(
        results.rendered.as_deref().unwrap(),
        "![plot](/images/books/notes-on-rust/plot.png)\n<a id=\"fig:plot\"></a>\n\nMissing: [MISSING-REF:fig:missing]."
    );
    assert_eq!(
        results.warnings,
        vec!["reference to undefined label 'fig:missing'"]
    );
    assert_eq!(doc.appendices[0].description, "Numbers live here.");
}

#[test]
fn rendering_twice_is_a_no_op() {
    let mut doc = sample_project().parse();
    let renderer = fallback_renderer("");
    assert_eq!(renderer.render_document(&mut doc).unwrap(), 3);
    let first = doc.chapters[0].rendered.clone();
    assert_eq!(renderer.render_document(&mut doc).unwrap(), 0);
    assert_eq!(doc.chapters[0].rendered, first);
}

#[test]
fn excluded_units_are_not_rendered() {
    let mut doc = sample_project().parse();
    doc.chapters[1].is_included = false;
    assert_eq!(fallback_renderer("").render_document(&mut doc).unwrap(), 2);
    assert!(doc.chapters[1].rendered.is_none());
}

#[test]
fn publishes_unit_and_index_files() {
    let project = sample_project();
    let mut doc = project.parse();
    prepare(&mut doc, &PrepareOptions::default());
    fallback_renderer("").render_document(&mut doc).unwrap();

    let out = project.root().join("out.md");
    let result = publish(PublishSpec::new(&doc, PublishTarget::parse("A")).with_output_path(&out))
        .unwrap();
    assert_eq!(result.file_name, "app01-raw-data.md");
    assert_eq!(result.artifact, PublishArtifact::File(out.clone()));
    let written = std::fs::read_to_string(out).unwrap();
    assert!(written.starts_with("---\ntitle: \"Raw Data\"\n"));
    assert!(written.contains("chapterNumber: 1\n"));
    assert!(written.ends_with("Numbers live here.<a id=\"app:raw\"></a>"));

    insta::assert_snapshot!(render_index_file(&doc.metadata, "Coming soon."), @r###"
    ---
    title: "Notes on Rust"
    description: "Coming soon."
    lang: fa
    author: "Sam"
    coverImage: ""
    pdfUrl: ""
    publishDate: 2025-01-01
    draft: true
    order: 0
    ---

    # Notes on Rust
    "###);
}

#[test]
fn article_without_chapters_publishes_its_body() {
    let project = Project::new().with_file(
        "main.tex",
        "\\documentclass{article}\n\\title{Notes}\n\\begin{document}\n\\maketitle\n\
         \\section{Scope}\nBody text.\n\\end{document}\n",
    );
    let mut doc = project.parse();
    prepare(&mut doc, &PrepareOptions::default());
    assert_eq!(fallback_renderer("").render_document(&mut doc).unwrap(), 1);

    let result = publish(PublishSpec::new(&doc, PublishTarget::Index)).unwrap();
    assert_eq!(result.file_name, "notes.md");
    let PublishArtifact::InMemory(text) = result.artifact else {
        panic!("expected in-memory output");
    };
    assert!(text.starts_with("---\ntitle: \"Notes\"\n"));
    assert!(text.ends_with("## Scope\nBody text."), "{text}");
}
