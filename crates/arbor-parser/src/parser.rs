//! Parser for ASC token streams.
//!
//! This module drives a [`TokenStream`] through the ASC grammar and builds a
//! [`Morphology`] while it goes: sections are appended the moment their
//! points are complete, so ids follow creation order. The public entry point
//! is [`parse_document`].
//!
//! The document is a sequence of top-level groups. Each group starts with a
//! header (a neurite keyword such as `(Axon)`, a quoted label, bare words
//! and skipped groups like `(Color Red)`), followed by points and nested
//! branches:
//!
//! ```text
//! ("dendrite 1"
//!   (Dendrite)
//!   (0 0 0 2)
//!   (0 5 0 2)
//!   (
//!     (1 6 0 1)
//!     Normal
//!   |
//!     (-1 6 0 1)
//!   )
//! )
//! ```

use log::{debug, trace};

use arbor_core::{
    debug_info::DebugInfo,
    error::{Diagnostic, ErrorCode, LoadError, Result},
    marker::Marker,
    mutable::Morphology,
    point_level::PointLevel,
    soma::Soma,
    types::{Float, Point, SectionId, SomaType, points_equal},
};

use crate::{
    lexer::TokenStream,
    tokens::{GroupKind, Token},
};

/// What the header of a group says about the points that follow.
#[derive(Debug, Clone)]
struct Header {
    kind: Option<GroupKind>,
    label: Option<String>,
    parent: Option<SectionId>,
    /// Line of the `(` that opened the group or branch.
    line: usize,
}

/// Points collected for one section, with the line of the first point.
#[derive(Debug, Default)]
struct PendingPoints {
    points: Vec<Point>,
    diameters: Vec<Float>,
    line: Option<usize>,
}

impl PendingPoints {
    fn push(&mut self, point: Point, diameter: Float, line: usize) {
        self.line.get_or_insert(line);
        self.points.push(point);
        self.diameters.push(diameter);
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

struct Parser<'a> {
    tokens: TokenStream<'a>,
    morphology: Morphology,
    debug_info: DebugInfo,
    /// Line of the group that defined the soma.
    soma_line: Option<usize>,
}

/// Parse a whole document into `morphology`.
///
/// # Errors
///
/// Returns the first lexer or parser diagnostic, followed by the warnings
/// recorded before it.
pub(crate) fn parse_document(
    source: &str,
    morphology: Morphology,
) -> std::result::Result<(Morphology, DebugInfo), LoadError> {
    let tokens = TokenStream::new(source)?;
    let mut parser = Parser {
        tokens,
        morphology,
        debug_info: DebugInfo::new(),
        soma_line: None,
    };

    match parser.parse_groups() {
        Ok(()) => Ok((parser.morphology, parser.debug_info)),
        Err(fatal) => {
            let mut diagnostics = vec![fatal];
            diagnostics.extend(parser.morphology.take_diagnostics());
            Err(LoadError::new(diagnostics))
        }
    }
}

impl Parser<'_> {
    fn parse_groups(&mut self) -> Result<()> {
        while !self.tokens.is_eof() {
            if *self.tokens.current() == Token::LeftParen {
                let line = self.tokens.line();
                self.tokens.advance()?;
                let header = self.parse_header(None, line)?;
                if *self.tokens.current() != Token::RightParen {
                    self.parse_section(&header)?;
                }
            }
            // Closes the group, or skips a stray top-level token.
            if !self.tokens.is_eof() {
                self.tokens.advance()?;
            }
        }

        let contour_len = self.morphology.soma().points().len();
        self.morphology
            .soma_mut()
            .set_soma_type(SomaType::from_contour_len(contour_len));
        Ok(())
    }

    /// Scan a group header up to its first point, or to the closing `)`.
    fn parse_header(&mut self, parent: Option<SectionId>, line: usize) -> Result<Header> {
        let mut header = Header {
            kind: None,
            label: None,
            parent,
            line,
        };

        loop {
            match self.tokens.current().clone() {
                Token::Eof => return Err(self.unexpected_eof()),
                Token::Word(_) => self.tokens.advance()?,
                Token::String(label) => {
                    header.label = Some(label.to_string());
                    self.tokens.advance()?;
                }
                Token::RightParen => return Ok(header),
                Token::LeftParen => {
                    let next = self.tokens.peek()?.clone();
                    if next.token.starts_skipped_group() {
                        self.skip_group()?;
                    } else if let Some(kind) = next.token.group_kind() {
                        header.kind = Some(kind);
                        self.tokens.advance()?;
                        self.tokens.advance()?;
                        self.tokens
                            .expect(&Token::RightParen, "a neurite keyword group ends here")?;
                    } else if matches!(next.token, Token::Number(_)) {
                        return Ok(header);
                    } else {
                        return Err(unknown_token(&next.token, next.line));
                    }
                }
                other => return Err(unknown_token(&other, self.tokens.line())),
            }
        }
    }

    /// Parse points and nested branches until `)` or `|`, which is left
    /// unconsumed.
    fn parse_section(&mut self, header: &Header) -> Result<()> {
        let mut pending = PendingPoints::default();

        loop {
            let token = self.tokens.current().clone();
            match token {
                Token::Eof => return Err(self.unexpected_eof()),
                token if token.is_section_end() => {
                    if !pending.is_empty() {
                        self.create(header, pending)?;
                    }
                    return Ok(());
                }
                token if token.is_branch_terminator() => self.tokens.advance()?,
                Token::LeftSpine => self.skip_spine()?,
                Token::LeftParen => {
                    let next = self.tokens.peek()?.clone();
                    if next.token.starts_skipped_group() {
                        self.skip_group()?;
                    } else if matches!(next.token, Token::Number(_)) {
                        let line = self.tokens.line();
                        let (point, diameter) = self.parse_point()?;
                        pending.push(point, diameter, line);
                    } else if next.token == Token::LeftParen {
                        let parent = if pending.is_empty() {
                            header.parent
                        } else {
                            self.create(header, std::mem::take(&mut pending))?
                        };
                        let child = Header {
                            parent,
                            line: self.tokens.line(),
                            ..header.clone()
                        };
                        self.parse_branch(&child)?;
                    } else {
                        return Err(unknown_token(&next.token, next.line));
                    }
                }
                other => return Err(unknown_token(&other, self.tokens.line())),
            }
        }
    }

    /// Parse `( section (| section)* )`; each alternative is a sibling.
    fn parse_branch(&mut self, header: &Header) -> Result<()> {
        self.tokens
            .expect(&Token::LeftParen, "a branch starts with `(`")?;
        loop {
            self.parse_section(header)?;
            if matches!(self.tokens.current(), Token::Pipe | Token::LeftParen) {
                self.tokens.advance()?;
            } else {
                break;
            }
        }
        self.tokens
            .expect(&Token::RightParen, "a branch ends with `)`")
    }

    /// Parse `(x y z d [label])`.
    fn parse_point(&mut self) -> Result<(Point, Float)> {
        self.tokens
            .expect(&Token::LeftParen, "a point starts with `(`")?;

        let mut fields = [0.0; 4];
        for field in &mut fields {
            match self.tokens.current() {
                Token::Number(value) => *field = *value,
                other => {
                    return Err(Diagnostic::error(format!(
                        "cannot convert `{other}` to a number"
                    ))
                    .with_code(ErrorCode::E102)
                    .with_label(self.tokens.line(), "expected x, y, z and diameter")
                    .with_help("a point has exactly four numeric fields"));
                }
            }
            self.tokens.advance()?;
        }

        if matches!(self.tokens.current(), Token::Word(_)) {
            self.tokens.advance()?;
        }
        self.tokens
            .expect(&Token::RightParen, "a point ends after its fourth number")?;

        let [x, y, z, diameter] = fields;
        Ok(([x, y, z], diameter))
    }

    /// Turn collected points into a section, the soma or a marker.
    ///
    /// Returns the section that following branches hang from.
    fn create(&mut self, header: &Header, pending: PendingPoints) -> Result<Option<SectionId>> {
        let line = pending.line.unwrap_or(header.line);
        let mut data = PointLevel::from_points(pending.points, pending.diameters)?;

        match (header.kind, &header.label) {
            (Some(GroupKind::Neurite(section_type)), _) => {
                if let Some(parent) = header.parent {
                    self.reconcile_with_parent(parent, &mut data);
                    if data.len() == 1 {
                        self.morphology.emit(
                            Diagnostic::info(format!(
                                "single point section duplicates the last point of section {parent}"
                            ))
                            .with_label(line, "section dropped"),
                        );
                        return Ok(Some(parent));
                    }
                }

                let id = self
                    .morphology
                    .append_section(header.parent, section_type, data)?;
                self.debug_info.set_line(id, line);
                trace!(id = id, line = line; "Created section");
                Ok(Some(id))
            }
            (Some(GroupKind::Soma), _) => {
                if !self.morphology.soma().is_empty() {
                    let err = Diagnostic::error("a soma is already defined")
                        .with_code(ErrorCode::E201)
                        .with_label(header.line, "second soma group")
                        .with_help("merge the soma contours into one `CellBody` group");
                    return Err(match self.soma_line {
                        Some(first) => err.with_secondary_label(first, "first defined here"),
                        None => err,
                    });
                }
                *self.morphology.soma_mut() = Soma::new(SomaType::Undefined, data);
                self.soma_line = Some(header.line);
                debug!(line = header.line; "Soma defined");
                Ok(None)
            }
            (None, Some(label)) => {
                self.morphology.add_marker(Marker::new(label.clone(), data));
                debug!(label = label.as_str(), line = header.line; "Marker added");
                Ok(None)
            }
            (None, None) => {
                trace!(line = header.line; "Dropped points of an unlabelled group");
                Ok(None)
            }
        }
    }

    /// Prepend the parent's last point, with the child's own first diameter,
    /// unless the child already starts there.
    fn reconcile_with_parent(&self, parent: SectionId, data: &mut PointLevel) {
        let Some(last) = self
            .morphology
            .section(parent)
            .and_then(|section| section.points().last().copied())
        else {
            return;
        };
        let (Some(first), Some(&diameter)) = (data.first_point(), data.diameters().first()) else {
            return;
        };
        if !points_equal(first, &last) {
            data.prepend(last, diameter);
        }
    }

    /// Skip a balanced group starting at the current `(`.
    fn skip_group(&mut self) -> Result<()> {
        let line = self.tokens.line();
        let mut depth = 0usize;
        loop {
            match self.tokens.current() {
                Token::LeftParen | Token::LeftSpine => depth += 1,
                Token::RightParen | Token::RightSpine => depth = depth.saturating_sub(1),
                Token::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
            self.tokens.advance()?;
            if depth == 0 {
                break;
            }
        }
        trace!(line = line; "Skipped group");
        Ok(())
    }

    fn skip_spine(&mut self) -> Result<()> {
        let line = self.tokens.line();
        while !matches!(self.tokens.current(), Token::RightSpine | Token::Eof) {
            self.tokens.advance()?;
        }
        self.tokens.expect(&Token::RightSpine, "a spine ends with `)>`")?;
        trace!(line = line; "Skipped spine");
        Ok(())
    }

    fn unexpected_eof(&self) -> Diagnostic {
        Diagnostic::error("unexpected end of input inside a neurite")
            .with_code(ErrorCode::E103)
            .with_label(self.tokens.line(), "input ends here")
    }
}

fn unknown_token(token: &Token<'_>, line: usize) -> Diagnostic {
    Diagnostic::error(format!("unknown token `{token}`"))
        .with_code(ErrorCode::E101)
        .with_label(line, "not valid here")
}
