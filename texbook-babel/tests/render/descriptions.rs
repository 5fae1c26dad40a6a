use proptest::prelude::*;
use texbook_babel::templates::{describe, DESCRIPTION_LIMIT};

proptest! {
    #[test]
    fn description_is_bounded(markdown in "\\PC{0,400}") {
        let out = describe(&markdown, "fallback");
        prop_assert!(out.chars().count() <= DESCRIPTION_LIMIT + 3);
    }

    #[test]
    fn markup_only_input_falls_back(markdown in "[#*`\\[\\] \n\t]{0,60}") {
        prop_assert_eq!(describe(&markdown, "fallback"), "fallback");
    }
}

#[test]
fn long_persian_text_is_cut_on_characters() {
    let paragraph = "این یک جملهٔ آزمایشی است. ".repeat(20);
    let out = describe(&paragraph, "");
    assert!(out.ends_with("..."));
    assert_eq!(out.chars().count(), DESCRIPTION_LIMIT + 3);
}
