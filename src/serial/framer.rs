use log::warn;

/// Splits a byte stream into newline terminated records.
///
/// Bytes are accumulated until a `\n` arrives. One call to `pop_line`
/// yields at most one record, so lines that arrived together are handed
/// out over several polls.
#[derive(Debug)]
pub struct LineFramer {
    pending: Vec<u8>,
    max_line_length: usize,
}

impl LineFramer {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            pending: Vec::with_capacity(max_line_length),
            max_line_length,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        // no terminator within the limit: the device is not speaking our framing
        if self.pending.len() > self.max_line_length && !self.pending.contains(&b'\n') {
            warn!(
                "Discarding {} buffered bytes without a line terminator",
                self.pending.len()
            );
            self.pending.clear();
        }
    }

    /// Next complete line with `\r` and surrounding whitespace stripped.
    /// Blank lines are returned as empty strings.
    pub fn pop_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line).trim().to_string())
    }

    #[cfg(test)]
    pub fn buffered_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_lines_wait_for_terminator() {
        let mut framer = LineFramer::new(64);
        framer.push(b"1.0,2.0,");
        assert_eq!(framer.pop_line(), None);

        framer.push(b"3.0,131,262,0\r\n");
        assert_eq!(framer.pop_line().as_deref(), Some("1.0,2.0,3.0,131,262,0"));
        assert_eq!(framer.buffered_len(), 0);
    }

    #[test]
    fn one_line_per_pop() {
        let mut framer = LineFramer::new(64);
        framer.push(b"a\nb\nc");

        assert_eq!(framer.pop_line().as_deref(), Some("a"));
        assert_eq!(framer.pop_line().as_deref(), Some("b"));
        assert_eq!(framer.pop_line(), None);
        assert_eq!(framer.buffered_len(), 1);
    }

    #[test]
    fn blank_line_is_an_empty_record() {
        let mut framer = LineFramer::new(64);
        framer.push(b"\r\n");
        assert_eq!(framer.pop_line().as_deref(), Some(""));
    }

    #[test]
    fn runaway_garbage_is_dropped() {
        let mut framer = LineFramer::new(8);
        framer.push(b"0123456789abcdef");
        assert_eq!(framer.buffered_len(), 0);

        framer.push(b"1,2\n");
        assert_eq!(framer.pop_line().as_deref(), Some("1,2"));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut framer = LineFramer::new(64);
        framer.push(&[0xff, b'1', b'\n']);
        let line = framer.pop_line().expect("line");
        assert!(line.ends_with('1'));
        assert!(line.contains('\u{fffd}'));
    }
}
