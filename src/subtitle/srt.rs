//! SRT rendering
//!
//! SRT timestamps are always `HH:MM:SS,mmm` with a comma as the decimal
//! separator. Hours are not wrapped at 24.

use std::fmt::Write;

/// A single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl Cue {
    pub fn new(start_ms: u64, duration_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms: start_ms.saturating_add(duration_ms),
            text: text.into(),
        }
    }
}

/// Format milliseconds as an SRT timestamp: "01:02:03,456"
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Render cues as an SRT document. Indices start at 1 and stay contiguous;
/// cues with no visible text are left out.
pub fn render(cues: &[Cue]) -> String {
    let mut out = String::new();

    let visible = cues.iter().filter_map(|cue| {
        // Blank lines would end the cue early in most players.
        let text = cue
            .text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        (!text.is_empty()).then_some((cue, text))
    });

    for (idx, (cue, text)) in visible.enumerate() {
        let _ = writeln!(out, "{}", idx + 1);
        let _ = writeln!(
            out,
            "{} --> {}",
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms)
        );
        let _ = writeln!(out, "{}", text);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
        assert_eq!(format_timestamp(20_000), "00:00:20,000");
        assert_eq!(format_timestamp(3_723_456), "01:02:03,456");
        assert_eq!(format_timestamp(100 * 3_600_000), "100:00:00,000");
    }

    #[test]
    fn test_render() {
        let cues = vec![
            Cue::new(1_000, 3_000, "first"),
            Cue::new(62_500, 3_000, "second"),
        ];

        assert_eq!(
            render(&cues),
            "1\n00:00:01,000 --> 00:00:04,000\nfirst\n\n\
             2\n00:01:02,500 --> 00:01:05,500\nsecond\n\n"
        );
    }

    #[test]
    fn test_render_drops_blank_lines_inside_text() {
        let cues = vec![Cue::new(0, 1_000, "line one\n\n  \nline two  ")];
        assert_eq!(
            render(&cues),
            "1\n00:00:00,000 --> 00:00:01,000\nline one\nline two\n\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_render_skips_cues_without_text() {
        let cues = vec![
            Cue::new(0, 1_000, ""),
            Cue::new(1_000, 1_000, " \n\t"),
            Cue::new(2_000, 1_000, "kept"),
        ];
        assert_eq!(
            render(&cues),
            "1\n00:00:02,000 --> 00:00:03,000\nkept\n\n"
        );
    }

    #[test]
    fn test_cue_end_is_start_plus_duration() {
        assert_eq!(Cue::new(500, 2_500, "x").end_ms, 3_000);
        assert_eq!(Cue::new(u64::MAX - 1, 10, "x").end_ms, u64::MAX);
    }
}
