use proptest::prelude::*;
use texbook_babel::model::{LabelDescriptor, LabelRegistry};
use texbook_babel::refs::ReferenceResolver;
use texbook_babel::render::render_fragment;

#[test]
fn undefined_key_is_marked_literally() {
    let out = render_fragment(r"As shown in Figure~\ref{fig:missing}.", &LabelRegistry::new());
    assert_eq!(out, "As shown in Figure [MISSING-REF:fig:missing].");
}

#[test]
fn every_reference_directive_is_resolved() {
    let mut labels = LabelRegistry::new();
    labels.insert("eq:1", LabelDescriptor::unscoped("eq:1"));
    let resolver = ReferenceResolver::new(&labels);
    for directive in ["ref", "eqref", "autoref", "cref", "Cref", "pageref"] {
        let text = format!("\\{directive}{{eq:1}}");
        assert_eq!(resolver.resolve(&text), "[REF:eq:1](#eq:1)", "{directive}");
    }
}

#[test]
fn references_survive_the_fallback_cleanup() {
    let mut labels = LabelRegistry::new();
    let mut scoped = LabelDescriptor::unscoped("tab:sizes");
    scoped.file = Some("ch02-data.md".to_string());
    labels.insert("tab:sizes", scoped);

    let out = render_fragment(r"\textit{See} \unknown{x} \ref{tab:sizes}", &labels);
    assert_eq!(out, "*See*  [tab:sizes](ch02-data.md#tab:sizes)");
}

proptest! {
    #[test]
    fn known_keys_never_produce_missing_markers(key in "[a-z]{1,8}:[a-z0-9]{1,8}") {
        let mut labels = LabelRegistry::new();
        labels.insert(key.clone(), LabelDescriptor::unscoped(&key));
        let out = ReferenceResolver::new(&labels).resolve(&format!("\\ref{{{key}}}"));
        prop_assert!(!out.contains("MISSING-REF"));

        let empty = LabelRegistry::new();
        let missing = ReferenceResolver::new(&empty).resolve(&format!("\\ref{{{key}}}"));
        prop_assert_eq!(missing, format!("[MISSING-REF:{key}]"));
    }
}
