use memchr::{memchr, memchr_iter};

use crate::error::SyntaxError;

/// Byte cursor over the document buffer.
///
/// The buffer is held mutably so strings can be unescaped in place.
pub(crate) struct Cursor<'a> {
    pub input: &'a mut [u8],
    pub pos: usize,
    allow_comments: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a mut [u8], allow_comments: bool) -> Self {
        Self {
            input,
            pos: 0,
            allow_comments,
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn bump(&mut self) {
        self.pos += 1;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn error(&self, reason: &'static str) -> SyntaxError {
        SyntaxError::new(self.pos, reason)
    }

    pub fn skip_ws(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.bump(),
                Some(b'/') if self.allow_comments => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), SyntaxError> {
        let body = self.pos + 2;
        match self.input.get(self.pos + 1) {
            Some(b'/') => {
                self.pos = match memchr(b'\n', &self.input[body..]) {
                    Some(rel) => body + rel + 1,
                    None => self.input.len(),
                };
                Ok(())
            }
            Some(b'*') => {
                let tail = &self.input[body..];
                let close = memchr_iter(b'*', tail).find(|&rel| tail.get(rel + 1) == Some(&b'/'));
                match close {
                    Some(rel) => {
                        self.pos = body + rel + 2;
                        Ok(())
                    }
                    None => Err(self.error("unterminated comment")),
                }
            }
            _ => Err(self.error("invalid comment")),
        }
    }

    pub fn eat_literal(&mut self, word: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), SyntaxError> {
        if self.peek() == Some(byte) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }
}
