use crate::captions::CaptionSegment;

/// Default minimum duration of one proportionally timed segment.
pub const DEFAULT_MIN_SEGMENT_SEC: f64 = 0.6;

/// Split narration text into sentence-like units.
///
/// Units are separated by runs of `.`, `!`, `?` or newlines; units are trimmed and empty units
/// are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Proportional caption timing with the default 0.6 s floor.
///
/// See [`naive_segments_with_floor`].
pub fn naive_segments(text: &str, duration: f64) -> Vec<CaptionSegment> {
    naive_segments_with_floor(text, duration, DEFAULT_MIN_SEGMENT_SEC)
}

/// Allocate `duration` across the sentences of `text` in proportion to their character length.
///
/// Each unit gets at least `min_segment_sec`. The walk stops as soon as the running cursor
/// reaches `duration`, even if units remain, and the last emitted segment is stretched to end
/// exactly at `duration`. No segment ends past `duration`.
pub fn naive_segments_with_floor(
    text: &str,
    duration: f64,
    min_segment_sec: f64,
) -> Vec<CaptionSegment> {
    let units = split_sentences(text);
    if units.is_empty() {
        return Vec::new();
    }

    let lens: Vec<usize> = units.iter().map(|u| u.chars().count()).collect();
    let total_len = lens.iter().sum::<usize>().max(1) as f64;

    let mut out = Vec::with_capacity(units.len());
    let mut t = 0.0f64;
    for (unit, len) in units.iter().zip(lens) {
        let dur = (duration * (len as f64 / total_len)).max(min_segment_sec);
        out.push(CaptionSegment::new(*unit, t, duration.min(t + dur)));
        t += dur;
        if t >= duration {
            break;
        }
    }

    if let Some(last) = out.last_mut()
        && last.end < duration
    {
        last.end = duration;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/captions/timing.rs"]
mod tests;
