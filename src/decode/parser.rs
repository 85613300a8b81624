use std::borrow::Cow;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::scanner::Cursor;
use crate::arena::{ArenaParts, Node, NodeData, NodeId, NodeKind, Pair, Span, StringRef};
use crate::error::SyntaxError;
use crate::num::number::{convert, scan_nan_inf, scan_number};
use crate::num::Number;
use crate::options::ParseOptions;
use crate::text::string::{scan_string, to_utf8, Scanned};

type Scan<T> = Result<T, SyntaxError>;

/// Open container. `start` marks where its entries begin in the pending
/// child/pair stacks.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Array { start: usize },
    Object { start: usize, key: usize },
}

/// Parse `input` into `parts` and return the root node.
///
/// The parser keeps its own frame stack instead of recursing, so nesting
/// depth is bounded only by memory.
pub(crate) fn parse_into(
    input: &mut [u8],
    parts: &mut ArenaParts,
    options: &ParseOptions,
) -> Scan<NodeId> {
    parts.nodes.reserve(input.len() / 8);
    let mut parser = ArenaParser {
        cursor: Cursor::new(input, options.allow_comments),
        parts,
        options,
        stack: SmallVec::new(),
        pending_children: Vec::new(),
        pending_pairs: Vec::new(),
        scratch: Vec::new(),
    };
    parser.parse_document()
}

struct ArenaParser<'a, 'p> {
    cursor: Cursor<'a>,
    parts: &'p mut ArenaParts,
    options: &'p ParseOptions,
    stack: SmallVec<[Frame; 16]>,
    pending_children: Vec<NodeId>,
    pending_pairs: Vec<Pair>,
    scratch: Vec<u8>,
}

impl ArenaParser<'_, '_> {
    fn parse_document(&mut self) -> Scan<NodeId> {
        self.cursor.skip_ws()?;
        if self.cursor.at_end() {
            return Err(self.cursor.error("empty input"));
        }
        let root = self.parse_value()?;
        if !self.options.stop_at_first_value {
            self.cursor.skip_ws()?;
            if !self.cursor.at_end() {
                return Err(self.cursor.error("unexpected trailing content"));
            }
        }
        Ok(root)
    }

    fn parse_value(&mut self) -> Scan<NodeId> {
        'value: loop {
            self.cursor.skip_ws()?;
            let mut node = match self.cursor.peek() {
                Some(b'{') => {
                    self.cursor.bump();
                    self.cursor.skip_ws()?;
                    if self.cursor.peek() == Some(b'}') {
                        self.cursor.bump();
                        let first = self.parts.pairs.len();
                        self.push_container(NodeKind::Object, first, 0)
                    } else {
                        let start = self.pending_pairs.len();
                        let key = self.parse_key()?;
                        self.stack.push(Frame::Object { start, key });
                        continue 'value;
                    }
                }
                Some(b'[') => {
                    self.cursor.bump();
                    self.cursor.skip_ws()?;
                    if self.cursor.peek() == Some(b']') {
                        self.cursor.bump();
                        let first = self.parts.children.len();
                        self.push_container(NodeKind::Array, first, 0)
                    } else {
                        let start = self.pending_children.len();
                        self.stack.push(Frame::Array { start });
                        continue 'value;
                    }
                }
                Some(_) => self.parse_scalar()?,
                None => return Err(self.cursor.error("unexpected end of input")),
            };

            // Attach the finished value to its parent, closing as many
            // containers as the input allows.
            loop {
                let Some(frame) = self.stack.last().copied() else {
                    return Ok(node);
                };
                self.cursor.skip_ws()?;
                match frame {
                    Frame::Array { start } => {
                        self.pending_children.push(node);
                        match self.cursor.peek() {
                            Some(b',') => {
                                self.cursor.bump();
                                if !self.trailing_close(b']')? {
                                    continue 'value;
                                }
                            }
                            Some(b']') => self.cursor.bump(),
                            Some(_) => return Err(self.cursor.error("expected ',' or ']'")),
                            None => return Err(self.cursor.error("unexpected end of input")),
                        }
                        self.stack.pop();
                        node = self.close_array(start);
                    }
                    Frame::Object { start, key } => {
                        self.pending_pairs.push(Pair { key, value: node });
                        match self.cursor.peek() {
                            Some(b',') => {
                                self.cursor.bump();
                                if !self.trailing_close(b'}')? {
                                    let key = self.parse_key()?;
                                    if let Some(Frame::Object { key: slot, .. }) =
                                        self.stack.last_mut()
                                    {
                                        *slot = key;
                                    }
                                    continue 'value;
                                }
                            }
                            Some(b'}') => self.cursor.bump(),
                            Some(_) => return Err(self.cursor.error("expected ',' or '}'")),
                            None => return Err(self.cursor.error("unexpected end of input")),
                        }
                        self.stack.pop();
                        node = self.close_object(start);
                    }
                }
            }
        }
    }

    /// After a comma: consume `close` if trailing commas are allowed and it
    /// follows.
    fn trailing_close(&mut self, close: u8) -> Scan<bool> {
        if !self.options.allow_trailing_commas {
            return Ok(false);
        }
        self.cursor.skip_ws()?;
        if self.cursor.peek() == Some(close) {
            self.cursor.bump();
            return Ok(true);
        }
        Ok(false)
    }

    fn close_array(&mut self, start: usize) -> NodeId {
        let first = self.parts.children.len();
        self.parts
            .children
            .extend(self.pending_children.drain(start..));
        let len = self.parts.children.len() - first;
        self.push_container(NodeKind::Array, first, len)
    }

    fn close_object(&mut self, start: usize) -> NodeId {
        let first = self.parts.pairs.len();
        self.parts.pairs.extend(self.pending_pairs.drain(start..));
        let len = self.parts.pairs.len() - first;
        self.push_container(NodeKind::Object, first, len)
    }

    fn push_container(&mut self, kind: NodeKind, first_child: usize, child_len: usize) -> NodeId {
        self.push_node(Node {
            kind,
            first_child,
            child_len,
            data: NodeData::None,
        })
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.parts.nodes.len();
        self.parts.nodes.push(node);
        id
    }

    fn parse_key(&mut self) -> Scan<usize> {
        self.cursor.skip_ws()?;
        if self.cursor.peek() != Some(b'"') {
            return Err(self.cursor.error("expected string key"));
        }
        let start = self.cursor.pos + 1;
        let scanned = scan_string(self.cursor.input, start, &mut self.scratch)?;
        let allow_invalid = self.options.allow_invalid_unicode;
        let key = match scanned {
            Scanned::Plain { end } => {
                SmolStr::new(to_utf8(&self.cursor.input[start..end], start, allow_invalid)?)
            }
            Scanned::Escaped { .. } => SmolStr::new(to_utf8(&self.scratch, start, allow_invalid)?),
        };
        self.cursor.pos = scanned.end() + 1;
        self.cursor.skip_ws()?;
        self.cursor.expect(b':', "expected ':' after object key")?;

        let index = self.parts.keys.len();
        self.parts.keys.push(key);
        Ok(index)
    }

    fn parse_scalar(&mut self) -> Scan<NodeId> {
        let start = self.cursor.pos;
        if self.options.allow_nan_inf {
            if let Some((end, value)) = scan_nan_inf(self.cursor.input, start) {
                self.cursor.pos = end;
                return Ok(if self.options.number_as_raw {
                    self.push_raw(start, end)
                } else {
                    self.push_node(Node::scalar(NodeKind::Float, NodeData::Float(value)))
                });
            }
        }
        match self.cursor.peek() {
            Some(b'"') => self.parse_string(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b't') if self.cursor.eat_literal(b"true") => {
                Ok(self.push_node(Node::scalar(NodeKind::Bool, NodeData::Bool(true))))
            }
            Some(b'f') if self.cursor.eat_literal(b"false") => {
                Ok(self.push_node(Node::scalar(NodeKind::Bool, NodeData::Bool(false))))
            }
            Some(b'n') if self.cursor.eat_literal(b"null") => {
                Ok(self.push_node(Node::scalar(NodeKind::Null, NodeData::None)))
            }
            _ => Err(self.cursor.error("unexpected character")),
        }
    }

    fn parse_string(&mut self) -> Scan<NodeId> {
        let start = self.cursor.pos + 1;
        let scanned = scan_string(self.cursor.input, start, &mut self.scratch)?;
        let allow_invalid = self.options.allow_invalid_unicode;
        let string = match scanned {
            Scanned::Plain { end } => {
                match to_utf8(&self.cursor.input[start..end], start, allow_invalid)? {
                    Cow::Borrowed(_) => StringRef::Span(Span { start, end }),
                    Cow::Owned(text) => StringRef::Owned(text),
                }
            }
            // Decoded text is never longer than its escaped form. Text with a
            // newline stays owned so error positions keep their line numbers.
            Scanned::Escaped { .. } => match to_utf8(&self.scratch, start, allow_invalid)? {
                Cow::Borrowed(text) if self.options.in_place && !text.contains('\n') => {
                    let end = start + text.len();
                    self.cursor.input[start..end].copy_from_slice(text.as_bytes());
                    StringRef::Span(Span { start, end })
                }
                text => StringRef::Owned(text.into_owned()),
            },
        };
        self.cursor.pos = scanned.end() + 1;

        let index = self.parts.strings.len();
        self.parts.strings.push(string);
        Ok(self.push_node(Node::scalar(NodeKind::String, NodeData::String(index))))
    }

    fn parse_number(&mut self) -> Scan<NodeId> {
        let start = self.cursor.pos;
        let end = scan_number(self.cursor.input, start)?;
        self.cursor.pos = end;
        if self.options.number_as_raw {
            return Ok(self.push_raw(start, end));
        }
        let number = {
            let token = std::str::from_utf8(&self.cursor.input[start..end])
                .map_err(|_| SyntaxError::new(start, "invalid number"))?;
            convert(
                token,
                self.options.bignum_as_raw,
                self.options.allow_nan_inf,
            )
            .map_err(|reason| SyntaxError::new(start, reason))?
        };
        let node = match number {
            Number::Int(value) => Node::scalar(NodeKind::Int, NodeData::Int(value)),
            Number::UInt(value) => Node::scalar(NodeKind::UInt, NodeData::UInt(value)),
            Number::Float(value) => Node::scalar(NodeKind::Float, NodeData::Float(value)),
            Number::Raw => return Ok(self.push_raw(start, end)),
        };
        Ok(self.push_node(node))
    }

    fn push_raw(&mut self, start: usize, end: usize) -> NodeId {
        let index = self.parts.numbers.len();
        self.parts.numbers.push(Span { start, end });
        self.push_node(Node::scalar(NodeKind::Raw, NodeData::Raw(index)))
    }
}
