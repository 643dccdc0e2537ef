//! Lexical analyzer for ASC source text.
//!
//! The [`Lexer`] produces [`PositionedToken`]s lazily, one at a time, each
//! tagged with the line it starts on. Whitespace and `;` comments are
//! skipped but advance the line counter. The lexer tracks open groups so
//! that input ending inside a group is reported against the line of the
//! innermost `(`.
//!
//! [`TokenStream`] wraps a lexer with the one-token lookahead the parser
//! needs.

use log::trace;
use winnow::{
    Parser as _,
    ascii::float,
    combinator::{alt, cut_err, not, opt, peek, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    token::{literal, one_of, take_till, take_while},
};

use arbor_core::error::{Diagnostic, ErrorCode, Result};

use crate::tokens::{PositionedToken, Token};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the line is supplied by the
/// lexer when the error is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
}

type Input<'a> = &'a str;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Characters allowed in bare words and labels.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '|' | ',' | '"' | ';' | '<' | '>')
}

/// Count `\r\n`, `\n` and bare `\r` line breaks, each as one line.
fn count_line_breaks(text: &str) -> usize {
    let mut chars = text.chars().peekable();
    let mut count = 0;
    while let Some(c) = chars.next() {
        match c {
            '\n' => count += 1,
            '\r' => {
                count += 1;
                chars.next_if_eq(&'\n');
            }
            _ => {}
        }
    }
    count
}

/// Parse one piece of whitespace or one comment, returning the consumed text.
fn trivia<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    alt((
        take_while(1.., char::is_whitespace),
        (';', take_till(0.., ['\n', '\r'])).take(),
    ))
    .parse_next(input)
}

/// Parse a double quoted string; strings may not span lines.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded(
        '"',
        cut_err(terminated(take_till(0.., ['"', '\n', '\r']), '"')).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add the closing `\"` on the same line"),
        }),
    )
    .map(Token::String)
    .parse_next(input)
}

/// Parse a number that is not the prefix of a longer word such as `1-2`.
///
/// Only input starting with a digit or a dot, after an optional sign, is
/// tried, so bare words such as `nan` or `-Infinity` stay words.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded(
        peek((opt(one_of(['+', '-'])), one_of(('0'..='9', '.')))),
        terminated(float, peek(not(one_of(is_word_char)))),
    )
    .map(Token::Number)
    .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((
            alt((
                literal("Axon"),
                literal("Dendrite"),
                literal("Apical"),
                literal("CellBody"),
                literal("Generated"),
                literal("High"),
                literal("Low"),
                literal("Incomplete"),
                literal("Normal"),
            )),
            alt((literal("Midpoint"), literal("Origin"), literal("Color"))),
        )),
        peek(not(one_of(is_word_char))),
    )
    .map(|keyword: &str| match keyword {
        "Axon" => Token::Axon,
        "Dendrite" => Token::Dendrite,
        "Apical" => Token::Apical,
        "CellBody" => Token::CellBody,
        "Generated" => Token::Generated,
        "High" => Token::High,
        "Low" => Token::Low,
        "Incomplete" => Token::Incomplete,
        "Normal" => Token::Normal,
        "Midpoint" => Token::Midpoint,
        "Origin" => Token::Origin,
        "Color" => Token::Color,
        _ => unreachable!(),
    })
    .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., is_word_char)
        .map(Token::Word)
        .parse_next(input)
}

/// Parse structural tokens (order matters - spine delimiters first)
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("<(").value(Token::LeftSpine),
        literal(")>").value(Token::RightSpine),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '|'.value(Token::Pipe),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        punctuation,    // Must come before everything else
        string_literal, // Commits after the opening quote
        keyword,        // Must come before number and word
        number,         // Must come before word
        word,
    ))
    .parse_next(input)
}

/// Lazy tokenizer over a source buffer.
///
/// Once the end of input is reached, [`Lexer::next_token`] keeps returning
/// [`Token::Eof`]. As an [`Iterator`] the lexer yields the `Eof` token once
/// and then stops; it also stops after the first error.
pub struct Lexer<'a> {
    input: Input<'a>,
    line: usize,
    open_groups: Vec<usize>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            input: source,
            line: 1,
            open_groups: Vec::new(),
            done: false,
        }
    }

    /// The current 1-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Produce the next token.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E001`] for a string without a closing quote.
    /// - [`ErrorCode::E002`] for a character that starts no token.
    /// - [`ErrorCode::E003`] when the input ends inside a group.
    pub fn next_token(&mut self) -> Result<PositionedToken<'a>> {
        self.skip_trivia();

        if self.input.is_empty() {
            if let Some(&open_line) = self.open_groups.last() {
                return Err(Diagnostic::error(format!(
                    "unbalanced parentheses: {} group(s) still open at end of input",
                    self.open_groups.len()
                ))
                .with_code(ErrorCode::E003)
                .with_label(open_line, "innermost unclosed group opened here")
                .with_help("add the missing `)`"));
            }
            return Ok(PositionedToken::new(Token::Eof, self.line));
        }

        let line = self.line;
        match token(&mut self.input) {
            Ok(token) => {
                self.track_groups(&token, line);
                trace!(line = line, token:% = token; "Token");
                Ok(PositionedToken::new(token, line))
            }
            Err(err) => Err(self.convert_err_mode(err, line)),
        }
    }

    fn skip_trivia(&mut self) {
        while let Ok(piece) = trivia(&mut self.input) {
            self.line += count_line_breaks(piece);
        }
    }

    fn track_groups(&mut self, token: &Token<'_>, line: usize) {
        match token {
            Token::LeftParen | Token::LeftSpine => self.open_groups.push(line),
            Token::RightParen | Token::RightSpine => {
                self.open_groups.pop();
            }
            _ => {}
        }
    }

    /// Convert an ErrMode to a Diagnostic.
    ///
    /// Uses the `LexerDiagnostic` context when present. Falls back to E002
    /// (unexpected character) otherwise.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        line: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(line, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let message = match self.input.chars().next() {
            Some(c) => format!("unexpected character `{c}`"),
            None => "unexpected end of input".to_string(),
        };
        Diagnostic::error(message)
            .with_code(ErrorCode::E002)
            .with_label(line, ErrorCode::E002.description())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<PositionedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        self.done = match &result {
            Ok(positioned) => positioned.token.is_eof(),
            Err(_) => true,
        };
        Some(result)
    }
}

/// Tokenize a whole source buffer, up to and including [`Token::Eof`].
///
/// # Errors
///
/// Returns the first lexer diagnostic.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>> {
    Lexer::new(source).collect()
}

/// A lexer with a current token and one token of lookahead.
pub(crate) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    current: PositionedToken<'a>,
    peeked: Option<PositionedToken<'a>>,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream positioned on the first token.
    pub(crate) fn new(source: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            peeked: None,
        })
    }

    pub(crate) fn current(&self) -> &Token<'a> {
        &self.current.token
    }

    pub(crate) fn line(&self) -> usize {
        self.current.line
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.current.token.is_eof()
    }

    /// The token after the current one, without consuming anything.
    pub(crate) fn peek(&mut self) -> Result<&PositionedToken<'a>> {
        let next = match self.peeked.take() {
            Some(next) => next,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(next))
    }

    /// Moves to the next token.
    pub(crate) fn advance(&mut self) -> Result<()> {
        self.current = match self.peeked.take() {
            Some(next) => next,
            None => self.lexer.next_token()?,
        };
        Ok(())
    }

    /// Consumes the current token if it is `expected`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E100`] diagnostic explaining `what` was
    /// expected.
    pub(crate) fn expect(&mut self, expected: &Token<'_>, what: &str) -> Result<()> {
        if self.current() != expected {
            return Err(Diagnostic::error(format!(
                "unexpected token: expected `{expected}`, found `{}`",
                self.current()
            ))
            .with_code(ErrorCode::E100)
            .with_label(self.line(), what));
        }
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|positioned| positioned.token)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("Axon Dendrite Apical CellBody"),
            vec![
                Token::Axon,
                Token::Dendrite,
                Token::Apical,
                Token::CellBody,
                Token::Eof
            ]
        );
        assert_eq!(
            tokens("Generated High Low Incomplete Normal Midpoint Origin Color"),
            vec![
                Token::Generated,
                Token::High,
                Token::Low,
                Token::Incomplete,
                Token::Normal,
                Token::Midpoint,
                Token::Origin,
                Token::Color,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_word_boundaries() {
        assert_eq!(tokens("Axons"), vec![Token::Word("Axons"), Token::Eof]);
        assert_eq!(
            tokens("Highlight"),
            vec![Token::Word("Highlight"), Token::Eof]
        );
        assert_eq!(tokens("axon"), vec![Token::Word("axon"), Token::Eof]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 -2.5 +3 1e3 0.5"),
            vec![
                Token::Number(1.0),
                Token::Number(-2.5),
                Token::Number(3.0),
                Token::Number(1000.0),
                Token::Number(0.5),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_non_finite_names_are_words() {
        assert_eq!(
            tokens("nan inf Infinity NaN -inf +nan"),
            vec![
                Token::Word("nan"),
                Token::Word("inf"),
                Token::Word("Infinity"),
                Token::Word("NaN"),
                Token::Word("-inf"),
                Token::Word("+nan"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_number_prefix_of_word() {
        assert_eq!(
            tokens("1-2 R1-1"),
            vec![Token::Word("1-2"), Token::Word("R1-1"), Token::Eof]
        );
    }

    #[test]
    fn test_punctuation_and_spines() {
        assert_eq!(
            tokens("( ) | , <( )>"),
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::Pipe,
                Token::Comma,
                Token::LeftSpine,
                Token::RightSpine,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_point_group() {
        assert_eq!(
            tokens("(1 2 3 0.5 S1)"),
            vec![
                Token::LeftParen,
                Token::Number(1.0),
                Token::Number(2.0),
                Token::Number(3.0),
                Token::Number(0.5),
                Token::Word("S1"),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokens("\"Marker 3\""),
            vec![Token::String("Marker 3"), Token::Eof]
        );
        assert_eq!(tokens("\"\""), vec![Token::String(""), Token::Eof]);
    }

    #[test]
    fn test_lines_and_comments() {
        let input = "; header comment\n(Axon) ; trailing\n\n  (1 2 3 4)";
        let positioned = tokenize(input).unwrap();

        let lines: Vec<usize> = positioned.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![2, 2, 2, 4, 4, 4, 4, 4, 4, 4]);
    }

    #[test]
    fn test_crlf_line_breaks() {
        let positioned = tokenize("(\r\n)\r\n").unwrap();
        assert_eq!(positioned[1].line, 2);
        assert_eq!(positioned[2].line, 3);
    }

    #[test]
    fn test_bare_cr_line_breaks() {
        let positioned = tokenize("(Axon) ; old export\r(1 2 3 4)\r\r)").unwrap();
        let lines: Vec<usize> = positioned.iter().map(|t| t.line).collect();

        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 2, 2, 2, 4, 4]);
    }

    #[test]
    fn test_count_line_breaks() {
        assert_eq!(count_line_breaks("a\nb"), 1);
        assert_eq!(count_line_breaks("\r\n\r\n"), 2);
        assert_eq!(count_line_breaks("\r\r\n\n"), 3);
        assert_eq!(count_line_breaks("  \t "), 0);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\n(\"open label\n)").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E001));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_unbalanced_parens_cite_innermost_group() {
        let err = tokenize("(Axon\n  (1 2 3 4)\n  (\n").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E003));
        assert_eq!(err.line(), Some(3));
        assert!(err.message().contains("2 group(s)"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("(1 2 < 3)").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E002));
        assert_eq!(err.message(), "unexpected character `<`");
    }

    #[test]
    fn test_eof_is_repeated() {
        let mut lexer = Lexer::new("  ");

        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let lexer = Lexer::new("()");
        assert_eq!(lexer.count(), 3);
    }

    #[test]
    fn test_stream_peek_and_expect() {
        let mut stream = TokenStream::new("(Axon)").unwrap();

        assert_eq!(stream.current(), &Token::LeftParen);
        assert_eq!(stream.peek().unwrap().token, Token::Axon);
        assert_eq!(stream.current(), &Token::LeftParen);

        stream.expect(&Token::LeftParen, "group").unwrap();
        assert_eq!(stream.current(), &Token::Axon);

        let err = stream.expect(&Token::RightParen, "close").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(
            err.message(),
            "unexpected token: expected `)`, found `Axon`"
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Numbers written with `{}` read back as the same value.
    fn check_number_round_trip(value: f64) -> std::result::Result<(), TestCaseError> {
        let text = format!("({value})");
        let tokens = tokenize(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(&tokens[1].token, &Token::Number(value));
        Ok(())
    }

    /// Any line count of leading blank lines is reflected in the token line.
    fn check_line_counting(blank_lines: usize) -> std::result::Result<(), TestCaseError> {
        let text = format!("{}(Axon)", "\n".repeat(blank_lines));
        let tokens = tokenize(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(tokens[0].line, blank_lines + 1);
        Ok(())
    }

    /// Every line break style advances the line counter by one.
    fn check_line_break_styles(breaks: &[&str]) -> std::result::Result<(), TestCaseError> {
        let text = format!("{}(Axon)", breaks.concat());
        let tokens = tokenize(&text).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(tokens[0].line, breaks.len() + 1);
        Ok(())
    }

    proptest! {
        #[test]
        fn line_break_styles(breaks in prop::collection::vec(prop::sample::select(vec!["\n", "\r\n", "\r "]), 0..50)) {
            check_line_break_styles(&breaks)?;
        }

        #[test]
        fn number_round_trip(value in -1.0e6f64..1.0e6) {
            check_number_round_trip(value)?;
        }

        #[test]
        fn line_counting(blank_lines in 0usize..200) {
            check_line_counting(blank_lines)?;
        }
    }
}
