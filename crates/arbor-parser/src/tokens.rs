//! Token definitions for Neurolucida ASC source text.

use std::fmt;

use arbor_core::types::SectionType;

/// A lexical token.
///
/// Whitespace, line breaks and `;` comments are never emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `<(`, opens a spine group
    LeftSpine,
    /// `)>`, closes a spine group
    RightSpine,
    /// `|`, separates sibling branches
    Pipe,
    /// `,`
    Comma,
    Number(f64),
    /// A bare word such as `RGB`, `S1` or `FilledCircle`.
    Word(&'a str),
    /// The content of a double quoted string, without the quotes.
    String(&'a str),

    // Neurite type keywords
    Axon,
    Dendrite,
    Apical,
    CellBody,

    // Branch terminator keywords
    Generated,
    High,
    Low,
    Incomplete,
    Normal,
    Midpoint,
    Origin,

    Color,

    /// End of input. Repeated forever once reached.
    Eof,
}

impl Token<'_> {
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    /// Keywords that may close a branch before its `)` or `|`.
    pub fn is_branch_terminator(&self) -> bool {
        matches!(
            self,
            Token::Generated
                | Token::High
                | Token::Low
                | Token::Incomplete
                | Token::Normal
                | Token::Midpoint
                | Token::Origin
        )
    }

    /// Tokens that end a section: `)` or `|`.
    pub fn is_section_end(&self) -> bool {
        matches!(self, Token::RightParen | Token::Pipe)
    }

    /// Tokens whose parenthesized group is skipped with all its content.
    pub fn starts_skipped_group(&self) -> bool {
        matches!(
            self,
            Token::Word(_)
                | Token::Color
                | Token::Generated
                | Token::High
                | Token::Incomplete
                | Token::Low
                | Token::Normal
        )
    }

    /// The kind of group introduced by a neurite keyword.
    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            Token::Axon => Some(GroupKind::Neurite(SectionType::Axon)),
            Token::Dendrite => Some(GroupKind::Neurite(SectionType::BasalDendrite)),
            Token::Apical => Some(GroupKind::Neurite(SectionType::ApicalDendrite)),
            Token::CellBody => Some(GroupKind::Soma),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftSpine => write!(f, "<("),
            Token::RightSpine => write!(f, ")>"),
            Token::Pipe => write!(f, "|"),
            Token::Comma => write!(f, ","),
            Token::Number(n) => write!(f, "{n}"),
            Token::Word(word) => write!(f, "{word}"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Axon => write!(f, "Axon"),
            Token::Dendrite => write!(f, "Dendrite"),
            Token::Apical => write!(f, "Apical"),
            Token::CellBody => write!(f, "CellBody"),
            Token::Generated => write!(f, "Generated"),
            Token::High => write!(f, "High"),
            Token::Low => write!(f, "Low"),
            Token::Incomplete => write!(f, "Incomplete"),
            Token::Normal => write!(f, "Normal"),
            Token::Midpoint => write!(f, "Midpoint"),
            Token::Origin => write!(f, "Origin"),
            Token::Color => write!(f, "Color"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// What a top-level group turns into, decided by its header keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Soma,
    Neurite(SectionType),
}

/// A token with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub line: usize,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, line: usize) -> Self {
        Self { token, line }
    }
}
