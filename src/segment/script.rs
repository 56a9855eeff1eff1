//! Plain-text script conversion into segment JSON.

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::Segment;
use crate::error::Result;

/// Speaker assigned to script lines without a `Speaker:` prefix.
pub const DEFAULT_SPEAKER: &str = "Narrator";

/// Split a script on blank lines into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<Segment> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(index, p)| Segment::new(index, p))
        .collect()
}

/// Parse `Speaker: text` lines.
///
/// Lines without a colon are attributed to [`DEFAULT_SPEAKER`]. Blank lines,
/// and lines whose text after the colon is blank, are dropped.
pub fn parse_script_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Segment> {
    let mut segments = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (speaker, text) = match line.split_once(':') {
            Some((speaker, text)) if !speaker.trim().is_empty() => (speaker.trim(), text.trim()),
            _ => (DEFAULT_SPEAKER, line),
        };
        if text.is_empty() {
            continue;
        }
        segments.push(Segment::new(segments.len(), text).with_speaker(speaker));
    }
    segments
}

#[derive(Serialize)]
struct SegmentRecord<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<&'a str>,
}

/// Write segments as a JSON array of records, creating parent directories.
pub fn write_segments(path: impl AsRef<Path>, segments: &[Segment]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let records: Vec<SegmentRecord<'_>> = segments
        .iter()
        .map(|s| SegmentRecord {
            text: &s.text,
            speaker: s.speaker.as_deref(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&records)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::load_segments;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let segments = split_paragraphs("First para\nstill first.\r\n\r\n\n\nSecond.\n\n   \n");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["First para\nstill first.", "Second."]);
        assert_eq!(segments[1].index, 1);
    }

    #[test]
    fn speaker_prefix_is_parsed() {
        let segments = parse_script_lines(
            "Host: Welcome back.\n\nJust narration here\nGuest:   Thanks!\nGuest:   \n: orphan"
                .lines(),
        );

        assert_eq!(
            segments,
            vec![
                Segment::new(0, "Welcome back.").with_speaker("Host"),
                Segment::new(1, "Just narration here").with_speaker(DEFAULT_SPEAKER),
                Segment::new(2, "Thanks!").with_speaker("Guest"),
                Segment::new(3, ": orphan").with_speaker(DEFAULT_SPEAKER),
            ]
        );
    }

    #[test]
    fn written_segments_load_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("segments.json");
        let segments = vec![
            Segment::new(0, "Hello.").with_speaker("Female – Rachel"),
            Segment::new(1, "Bye."),
        ];

        write_segments(&path, &segments).unwrap();

        assert_eq!(load_segments(&path).unwrap(), segments);
    }
}
