//! Line framing of the recognizer control protocol.
//!
//! Requests are `r` followed by `x`, each on its own `\r\n`-terminated line.
//! The recognizer answers with candidate lines and ends with a line that is
//! exactly `x`. A line that is exactly `EOF` means the recognizer stalled and
//! needs one more `x` to resynchronize.

/// Response terminator line.
pub const TERMINATOR: &str = "x";

/// Stall sentinel line.
pub const END_OF_STREAM: &str = "EOF";

/// A control message sent to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFrame {
    /// Re-read observations and report candidate goals.
    Request,
    /// Bare end marker, re-sent to unblock a stalled recognizer.
    Resync,
}

impl ControlFrame {
    /// Wire bytes for this frame.
    pub fn encode(self) -> &'static [u8] {
        match self {
            Self::Request => b"r\r\nx\r\n",
            Self::Resync => b"x\r\n",
        }
    }
}

/// One classified line of recognizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine {
    Terminator,
    EndOfStream,
    Candidate(String),
}

impl ResponseLine {
    /// Classify a raw output line, line ending included or not.
    pub fn classify(raw: &str) -> Self {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        match line {
            TERMINATOR => Self::Terminator,
            END_OF_STREAM => Self::EndOfStream,
            _ => Self::Candidate(clean_candidate(line)),
        }
    }
}

/// Strip quote characters and literal `\n` escape sequences from a report line.
pub fn clean_candidate(line: &str) -> String {
    line.replace("\\n", "")
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_two_terminated_lines() {
        assert_eq!(ControlFrame::Request.encode(), b"r\r\nx\r\n");
        assert_eq!(ControlFrame::Resync.encode(), b"x\r\n");
    }

    #[test]
    fn sentinels_must_match_whole_line() {
        assert_eq!(ResponseLine::classify("x\n"), ResponseLine::Terminator);
        assert_eq!(ResponseLine::classify("EOF\n"), ResponseLine::EndOfStream);
        assert_eq!(ResponseLine::classify("x"), ResponseLine::Terminator);
        assert!(matches!(ResponseLine::classify("xx\n"), ResponseLine::Candidate(_)));
        assert!(matches!(ResponseLine::classify("x \n"), ResponseLine::Candidate(_)));
        assert!(matches!(ResponseLine::classify("EOF!\n"), ResponseLine::Candidate(_)));
    }

    #[test]
    fn candidates_lose_quotes_and_escapes() {
        assert_eq!(
            ResponseLine::classify("'boiledegg': 0.75\\n\n"),
            ResponseLine::Candidate("boiledegg: 0.75".into())
        );
        assert_eq!(clean_candidate("\"omelette\": NaN"), "omelette: NaN");
    }
}
