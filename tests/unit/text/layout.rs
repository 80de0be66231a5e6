use super::*;

fn chars(s: &str) -> ReelResult<f32> {
    Ok(s.chars().count() as f32)
}

#[test]
fn wrap_packs_words_until_width_is_exceeded() {
    let lines = wrap_greedy("aa bb cc dd", 5.0, chars).unwrap();
    assert_eq!(lines, vec!["aa bb", "cc dd"]);
}

#[test]
fn wrap_keeps_overlong_word_on_its_own_line() {
    let lines = wrap_greedy("a supercalifragilistic b", 5.0, chars).unwrap();
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn wrap_collapses_whitespace_and_handles_blank_text() {
    assert_eq!(
        wrap_greedy("  one\n\ttwo  ", 100.0, chars).unwrap(),
        vec!["one two"]
    );
    assert!(wrap_greedy("   \n ", 100.0, chars).unwrap().is_empty());
}

#[test]
fn wrap_propagates_measure_errors() {
    let err = wrap_greedy("x y", 10.0, |_| Err(ReelError::validation("boom"))).unwrap_err();
    assert!(err.to_string().contains("boom"));
}

#[test]
fn brush_from_array() {
    let b = TextBrushRgba8::from([1, 2, 3, 4]);
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

#[test]
fn engine_measures_longer_text_wider() {
    let Ok(font) = crate::text::font::resolve_font(&crate::config::FontConfig::default()) else {
        return;
    };
    let mut engine = TextLayoutEngine::new(&font).unwrap();
    assert!(!engine.family_name().is_empty());

    let short = engine.measure("Hi", 64.0).unwrap();
    let long = engine.measure("Hi there, everyone", 64.0).unwrap();
    assert!(short.width > 0.0);
    assert!(long.width > short.width);
    assert!(short.height > 0.0);
    assert!(engine.measure("Hi", 0.0).is_err());
}
