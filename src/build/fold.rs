//! Content line folding (RFC 5545 §3.1).

/// Maximum line length in octets, excluding CRLF.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line to the 75-octet limit and appends CRLF.
///
/// The limit is counted in octets, not characters; break points back up
/// so a UTF-8 sequence is never split. Continuation lines begin with a
/// single space, which costs one octet of their budget.
#[must_use]
pub fn fold_line(line: &str) -> String {
    let bytes = line.as_bytes();

    if bytes.len() <= MAX_LINE_OCTETS {
        return format!("{line}\r\n");
    }

    let mut result = String::with_capacity(bytes.len() + (bytes.len() / MAX_LINE_OCTETS + 1) * 3);
    let mut pos = 0;
    let mut first = true;

    while pos < bytes.len() {
        let budget = if first {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };

        let mut end = (pos + budget).min(bytes.len());
        while end > pos && !line.is_char_boundary(end) {
            end -= 1;
        }
        if end == pos {
            // A single character wider than the budget; emit it whole.
            end = pos + 1;
            while end < bytes.len() && !line.is_char_boundary(end) {
                end += 1;
            }
        }

        if !first {
            result.push(' ');
        }
        result.push_str(&line[pos..end]);
        result.push_str("\r\n");

        pos = end;
        first = false;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_untouched() {
        assert_eq!(fold_line("SUMMARY:Short"), "SUMMARY:Short\r\n");
    }

    #[test]
    fn exactly_75_untouched() {
        let line = "X".repeat(75);
        assert_eq!(fold_line(&line), format!("{line}\r\n"));
    }

    #[test]
    fn long_line_folds_and_unfolds() {
        let line = "X".repeat(190);
        let folded = fold_line(&line);
        assert!(folded.contains("\r\n "));
        let unfolded = folded.replace("\r\n ", "").replace("\r\n", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn segments_stay_within_budget() {
        let line = "A".repeat(200);
        let folded = fold_line(&line);
        for segment in folded.split("\r\n").filter(|s| !s.is_empty()) {
            assert!(segment.len() <= 75, "segment too long: {}", segment.len());
        }
    }

    #[test]
    fn first_segment_is_full_width() {
        let line = "A".repeat(80);
        let folded = fold_line(&line);
        let segments: Vec<&str> = folded.split("\r\n").filter(|s| !s.is_empty()).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 75);
        assert_eq!(segments[1], format!(" {}", "A".repeat(5)));
    }

    #[test]
    fn multibyte_sequences_not_split() {
        let line = format!("SUMMARY:{}", "日本語".repeat(20));
        let folded = fold_line(&line);
        for segment in folded.split("\r\n").filter(|s| !s.is_empty()) {
            // Each segment must itself be valid UTF-8 already (we are
            // iterating &str), so check the budget only.
            assert!(segment.len() <= 75);
        }
        let unfolded = folded.replace("\r\n ", "").replace("\r\n", "");
        assert_eq!(unfolded, line);
    }
}
