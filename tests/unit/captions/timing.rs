use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn split_drops_empty_units_and_trims() {
    assert_eq!(
        split_sentences("Hello world. This is a test! Wow?"),
        vec!["Hello world", "This is a test", "Wow"]
    );
    assert_eq!(split_sentences("a...b\n\n\nc  "), vec!["a", "b", "c"]);
    assert!(split_sentences(" . ! ? \n ").is_empty());
}

#[test]
fn empty_text_yields_no_segments() {
    assert!(naive_segments("", 12.0).is_empty());
    assert!(naive_segments("", 0.0).is_empty());
    assert!(naive_segments("   \n  ", 5.0).is_empty());
}

#[test]
fn unpunctuated_text_spans_whole_duration() {
    for d in [0.3, 0.6, 7.25, 42.0] {
        let segs = naive_segments("just one long thought without an ending", d);
        assert_eq!(segs.len(), 1);
        assert!(approx(segs[0].start, 0.0));
        assert!(approx(segs[0].end, d));
    }
}

#[test]
fn three_sentences_are_allocated_by_length() {
    let segs = naive_segments("Hello world. This is a test! Wow?", 12.0);
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[0].text, "Hello world");
    assert_eq!(segs[1].text, "This is a test");
    assert_eq!(segs[2].text, "Wow");

    let d0 = 12.0 * 11.0 / 28.0;
    let d1 = 12.0 * 14.0 / 28.0;
    assert!(approx(segs[0].start, 0.0));
    assert!(approx(segs[0].end, d0));
    assert!(approx(segs[1].start, d0));
    assert!(approx(segs[1].end, d0 + d1));
    assert!(approx(segs[2].start, d0 + d1));
    assert_eq!(segs[2].end, 12.0);
    for s in &segs {
        assert!(s.duration() >= 0.6 - 1e-9);
    }
}

#[test]
fn segments_are_contiguous_and_cover_duration() {
    let text = "One. Two two. Three three three.\nFour four four four! Five?";
    let d = 9.5;
    let segs = naive_segments(text, d);
    assert!(!segs.is_empty());
    assert!(approx(segs[0].start, 0.0));
    for w in segs.windows(2) {
        assert!(approx(w[0].end, w[1].start));
    }
    let total: f64 = segs.iter().map(CaptionSegment::duration).sum();
    assert!(approx(total, d));
    assert_eq!(segs.last().unwrap().end, d);
}

#[test]
fn floor_can_exhaust_duration_before_all_units() {
    // 5 short units at a 0.6s floor over 1.5s: cursor passes 1.5 on the third unit.
    let segs = naive_segments("A. B. C. D. E.", 1.5);
    assert_eq!(segs.len(), 3);
    assert!(approx(segs[0].end, 0.6));
    assert!(approx(segs[1].end, 1.2));
    assert!(approx(segs[2].start, 1.2));
    assert_eq!(segs[2].end, 1.5);
    for s in &segs {
        assert!(s.end <= 1.5);
        assert!(s.start < 1.5);
    }
}

#[test]
fn custom_floor_is_respected() {
    let segs = naive_segments_with_floor("Tiny. A much much longer sentence here", 10.0, 2.0);
    assert_eq!(segs.len(), 2);
    assert!(segs[0].duration() >= 2.0 - 1e-9);
    assert_eq!(segs[1].end, 10.0);
}

#[test]
fn start_times_are_monotonic() {
    let segs = naive_segments("a. bb. ccc. dddd. eeeee. ffffff.", 30.0);
    for w in segs.windows(2) {
        assert!(w[1].start >= w[0].start);
    }
}
