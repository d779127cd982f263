//! Line-comment stripping for JSON config files.
//!
//! [`CommentStripper`] is a pull-based [`Read`] adapter: it pulls one line at
//! a time from the inner reader and drops everything from the first `//` to
//! the end of that line. The line terminator is kept so token positions in
//! the JSON parser's error messages still point at the right line.
//!
//! The scan does not know about string literals. A `//` inside a quoted value
//! starts a comment too; write it as `/\/` (a valid JSON escape for `//`) to
//! keep it.

use std::io::{self, BufRead, Read};

pub struct CommentStripper<R> {
    inner: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> CommentStripper<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            pos: 0,
        }
    }

    /// Load the next stripped line. Returns `false` at end of input.
    fn fill_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        self.pos = 0;
        if self.inner.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        strip_comment(&mut self.line);
        Ok(true)
    }
}

impl<R: BufRead> Read for CommentStripper<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // A stripped line keeps its newline, so it is only empty when it was
        // the unterminated last line. One refill is enough either way.
        if self.pos >= self.line.len() && !self.fill_line()? {
            return Ok(0);
        }
        let pending = &self.line[self.pos..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.pos += n;
        Ok(n)
    }
}

fn strip_comment(line: &mut Vec<u8>) {
    let Some(start) = line.windows(2).position(|w| w == b"//") else {
        return;
    };
    let had_newline = line.last() == Some(&b'\n');
    line.truncate(start);
    if had_newline {
        line.push(b'\n');
    }
}
