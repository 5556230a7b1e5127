use std::borrow::Cow;
use std::fmt;

use similar::{Algorithm, ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Equal,
    Insert,
    Delete,
}

impl From<ChangeTag> for Operation {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => Operation::Equal,
            ChangeTag::Insert => Operation::Insert,
            ChangeTag::Delete => Operation::Delete,
        }
    }
}

/// A run of consecutive bytes sharing the same [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub operation: Operation,
    pub text: Vec<u8>,
}

impl Segment {
    pub fn new(operation: Operation, text: impl Into<Vec<u8>>) -> Self {
        Self {
            operation,
            text: text.into(),
        }
    }

    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::Equal => write!(f, "{}", self.text_lossy()),
            Operation::Insert => write!(f, "{{+{}+}}", self.text_lossy()),
            Operation::Delete => write!(f, "[-{}-]", self.text_lossy()),
        }
    }
}

/// Predicate over a filename and a segment; returning `true` drops the segment
/// from the differences that make a comparison fail.
pub type IgnoreRule = Box<dyn Fn(&str, &Segment) -> bool>;

/// Computes the character level edit script turning `expected` into `actual`.
///
/// Segments cover both inputs entirely, in order: equal and deleted segments
/// concatenated give back `expected`, equal and inserted ones give back `actual`.
pub fn diff(expected: &[u8], actual: &[u8]) -> Vec<Segment> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(expected, actual);

    let mut segments: Vec<Segment> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let operation = Operation::from(change.tag());
        match segments.last_mut() {
            Some(last) if last.operation == operation => {
                last.text.extend_from_slice(change.value());
            }
            _ => segments.push(Segment::new(operation, change.value())),
        }
    }
    segments
}

/// Keeps only the segments that make two contents different.
///
/// Equal segments and lone carriage returns are always dropped, then each
/// remaining segment is dropped if any of `ignore` matches it.
pub fn filter_diffs(
    filename: &str,
    segments: Vec<Segment>,
    ignore: &[IgnoreRule],
) -> Vec<Segment> {
    segments
        .into_iter()
        .filter(|segment| segment.operation != Operation::Equal && segment.text != b"\r")
        .filter(|segment| !ignore.iter().any(|rule| rule(filename, segment)))
        .collect()
}

/// Renders segments inline, marking deletions with `[-…-]` and insertions with `{+…+}`.
pub fn pretty_text(segments: &[Segment]) -> String {
    segments.iter().map(ToString::to_string).collect()
}

/// Renders a unified line diff of both contents.
pub fn unified(expected_name: &str, expected: &[u8], actual_name: &str, actual: &[u8]) -> String {
    TextDiff::from_lines(expected, actual)
        .unified_diff()
        .context_radius(3)
        .header(expected_name, actual_name)
        .to_string()
}

/// Outcome of [`check`] when contents differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Differences left once equal and ignored segments are removed.
    pub segments: Vec<Segment>,
    pub unified: String,
}

/// Diffs both contents and returns the remaining differences, if any.
///
/// `expected_name` is the filename handed to the ignore rules.
pub fn check(
    expected_name: &str,
    expected: &[u8],
    actual_name: &str,
    actual: &[u8],
    ignore: &[IgnoreRule],
) -> Option<Mismatch> {
    if expected == actual {
        return None;
    }

    let segments = filter_diffs(expected_name, diff(expected, actual), ignore);
    if segments.is_empty() {
        return None;
    }

    Some(Mismatch {
        segments,
        unified: unified(expected_name, expected, actual_name, actual),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(segments: &[Segment], keep: Operation) -> Vec<u8> {
        segments
            .iter()
            .filter(|s| s.operation == Operation::Equal || s.operation == keep)
            .flat_map(|s| s.text.iter().copied())
            .collect()
    }

    #[test]
    fn test_identical_contents_have_no_meaningful_segments() {
        let contents: [&[u8]; 3] = [b"", b"hello", b"multi\nline\ncontent\n"];
        for content in contents {
            let segments = diff(content, content);
            assert!(segments.iter().all(|s| s.operation == Operation::Equal));
            assert!(filter_diffs("a.txt", segments, &[]).is_empty());
            assert!(check("a.txt", content, "a.txt", content, &[]).is_none());
        }
    }

    #[test]
    fn test_segments_cover_both_inputs() {
        let expected = b"the quick brown fox\n";
        let actual = b"the quick red fox jumps\n";

        let segments = diff(expected, actual);

        assert_eq!(rebuild(&segments, Operation::Delete), expected);
        assert_eq!(rebuild(&segments, Operation::Insert), actual);
    }

    #[test]
    fn test_consecutive_changes_are_merged() {
        let segments = diff(b"abcxyz", b"abc123xyz");

        assert_eq!(
            segments,
            vec![
                Segment::new(Operation::Equal, "abc"),
                Segment::new(Operation::Insert, "123"),
                Segment::new(Operation::Equal, "xyz"),
            ]
        );
    }

    #[test]
    fn test_different_contents_have_meaningful_segments() {
        let pairs: [(&[u8], &[u8]); 4] = [
            (b"foo", b"bar"),
            (b"", b"x"),
            (b"x", b""),
            (&[0xff, 0xfe], &[0xfe, 0xff]),
        ];
        for (expected, actual) in pairs {
            let mismatch = check("a.txt", expected, "a.txt", actual, &[]);
            assert!(mismatch.is_some_and(|m| !m.segments.is_empty()));
        }
    }

    #[test]
    fn test_lone_carriage_return_is_ignored() {
        assert!(check("a.txt", b"hello\n", "a.txt", b"hello\r\n", &[]).is_none());
    }

    #[test]
    fn test_ignore_rules_receive_filename() {
        let ignore: Vec<IgnoreRule> = vec![Box::new(|filename: &str, segment: &Segment| {
            filename == "version.txt" && segment.text_lossy().chars().all(|c| c.is_ascii_digit())
        })];

        assert!(check("version.txt", b"v1", "version.txt", b"v2", &ignore).is_none());
        assert!(check("other.txt", b"v1", "other.txt", b"v2", &ignore).is_some());
    }

    #[test]
    fn test_renderings() {
        let mismatch =
            check("expected/a.txt", b"value=1\n", "actual/a.txt", b"value=2\n", &[]).unwrap();

        assert!(mismatch.unified.contains("--- expected/a.txt"));
        assert!(mismatch.unified.contains("+++ actual/a.txt"));
        assert!(mismatch.unified.contains("-value=1"));
        assert!(mismatch.unified.contains("+value=2"));
        assert_eq!(pretty_text(&mismatch.segments), "[-1-]{+2+}");
        assert_eq!(pretty_text(&diff(b"ab", b"ac")), "a[-b-]{+c+}");
    }
}
