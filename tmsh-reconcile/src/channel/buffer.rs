//! Reply accumulation with terminal escape handling.

use memchr::memchr_iter;
use vte::{Parser, Perform};

/// Accumulates shell output and hands it back as lines.
///
/// Bytes are fed through a `vte` parser so cursor movement, colour codes and
/// other escape sequences emitted by the appliance pager never reach the
/// engine.
pub struct ReplyBuffer {
    parser: Parser,
    sink: TextSink,
}

/// Collects printable text and line control characters.
#[derive(Default)]
struct TextSink {
    text: String,
}

impl Perform for TextSink {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' | b'\r' | b'\t' => self.text.push(byte as char),
            // backspace
            0x08 => {
                self.text.pop();
            }
            _ => {}
        }
    }
}

impl ReplyBuffer {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            sink: TextSink::default(),
        }
    }

    /// Feed received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.parser.advance(&mut self.sink, data);
    }

    /// Take the complete text so far as lines, split on `\n` with a
    /// trailing `\r` removed. A final partial line is included.
    pub fn take_lines(&mut self) -> Vec<String> {
        let text = std::mem::take(&mut self.sink.text);
        split_lines(&text)
    }

    pub fn len(&self) -> usize {
        self.sink.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.text.is_empty()
    }

    /// Drop everything received so far.
    pub fn clear(&mut self) {
        self.sink.text.clear();
    }
}

impl Default for ReplyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    for end in memchr_iter(b'\n', bytes) {
        lines.push(clean_line(&text[start..end]));
        start = end + 1;
    }
    if start < text.len() {
        lines.push(clean_line(&text[start..]));
    }
    lines
}

fn clean_line(line: &str) -> String {
    line.trim_end_matches('\r').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_crlf() {
        let mut buffer = ReplyBuffer::new();
        buffer.extend(b"ltm profile tcp t1 {\r\n    idle-timeout 300\r\n}\r\n");
        assert_eq!(
            buffer.take_lines(),
            vec!["ltm profile tcp t1 {", "    idle-timeout 300", "}"]
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_escape_sequences_removed() {
        let mut buffer = ReplyBuffer::new();
        buffer.extend(b"\x1b[7m---(less 62%)---\x1b[m\x1b[K    nagle enabled\r\n");
        assert_eq!(
            buffer.take_lines(),
            vec!["---(less 62%)---    nagle enabled"]
        );
    }

    #[test]
    fn test_chunked_input() {
        let mut buffer = ReplyBuffer::new();
        buffer.extend(b"idle-ti");
        buffer.extend(b"meout 300\r");
        buffer.extend(b"\nnagle");
        assert_eq!(buffer.take_lines(), vec!["idle-timeout 300", "nagle"]);
    }

    #[test]
    fn test_split_escape_across_chunks() {
        let mut buffer = ReplyBuffer::new();
        buffer.extend(b"nagle \x1b[");
        buffer.extend(b"1menabled\x1b[0m\r\n");
        assert_eq!(buffer.take_lines(), vec!["nagle enabled"]);
    }

    #[test]
    fn test_backspace() {
        let mut buffer = ReplyBuffer::new();
        buffer.extend(b"tmsx\x08h\r\n");
        assert_eq!(buffer.take_lines(), vec!["tmsh"]);
    }
}
