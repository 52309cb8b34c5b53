use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
///
/// Keywords are case-strict: `SET` and `set` are keywords, `Set` is an
/// identifier.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Time literal tokens such as `500ms`, `1.5s`, `2m` or `1h`,
    /// normalized to seconds.
    #[regex(r"[0-9]+(\.[0-9]+)?(ms|s|m|h)", parse_time)]
    Time(f64),
    /// Floating-point literal tokens, such as `3.14`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Int(i64),
    /// Boolean literal tokens, `TRUE` or `FALSE`.
    #[token("TRUE", parse_bool)]
    #[token("FALSE", parse_bool)]
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// String literal tokens, single or double quoted.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\]|\\.)*'", parse_string)]
    Str(String),

    /// `SET`
    #[token("SET")]
    #[token("set")]
    Set,
    /// `DEFUN`
    #[token("DEFUN")]
    #[token("defun")]
    Defun,
    /// `LAMBDA`
    #[token("LAMBDA")]
    #[token("lambda")]
    Lambda,
    /// `IF`
    #[token("IF")]
    #[token("if")]
    If,
    /// `THEN`
    #[token("THEN")]
    #[token("then")]
    Then,
    /// `ELSEIF`
    #[token("ELSEIF")]
    #[token("elseif")]
    ElseIf,
    /// `ELSE`
    #[token("ELSE")]
    #[token("else")]
    Else,
    /// `WHILE`
    #[token("WHILE")]
    #[token("while")]
    While,
    /// `REPEAT`
    #[token("REPEAT")]
    #[token("repeat")]
    Repeat,
    /// `TIMES`
    #[token("TIMES")]
    #[token("times")]
    Times,
    /// `RETURN`
    #[token("RETURN")]
    #[token("return")]
    Return,
    /// `BREAK`
    #[token("BREAK")]
    #[token("break")]
    Break,
    /// `CONTINUE`
    #[token("CONTINUE")]
    #[token("continue")]
    Continue,
    /// `YIELD`
    #[token("YIELD")]
    #[token("yield")]
    Yield,
    /// `PASS`
    #[token("PASS")]
    #[token("pass")]
    Pass,
    /// `PRINTLN`
    #[token("PRINTLN")]
    #[token("println")]
    Println,
    /// `PRINT`
    #[token("PRINT")]
    #[token("print")]
    Print,
    /// `WAIT`
    #[token("WAIT")]
    #[token("wait")]
    Wait,
    /// `MOVE`
    #[token("MOVE")]
    #[token("move")]
    Move,
    /// `MOUSE`
    #[token("MOUSE")]
    #[token("mouse")]
    Mouse,
    /// `HOLD`
    #[token("HOLD")]
    #[token("hold")]
    Hold,
    /// `RELEASE`
    #[token("RELEASE")]
    #[token("release")]
    Release,
    /// `PRESS`
    #[token("PRESS")]
    #[token("press")]
    Press,
    /// `FOCUS`
    #[token("FOCUS")]
    #[token("focus")]
    Focus,
    /// `WINDOW`
    #[token("WINDOW")]
    #[token("window")]
    Window,
    /// `KEY`
    #[token("KEY")]
    #[token("key")]
    Key,
    /// `BUTTON`
    #[token("BUTTON")]
    #[token("button")]
    Button,
    /// `EXISTS`
    #[token("EXISTS")]
    #[token("exists")]
    Exists,
    /// `POINT`
    #[token("POINT")]
    #[token("point")]
    Point,
    /// `AS`
    #[token("AS")]
    #[token("as")]
    As,
    /// `TO`
    #[token("TO")]
    #[token("to")]
    To,
    /// Vocabulary reserved for future statements; lexed but not parseable.
    #[token("INPUT", reserved)]
    #[token("OPEN", reserved)]
    #[token("WRITE", reserved)]
    #[token("RUN", reserved)]
    #[token("SCROLL", reserved)]
    #[token("IS", reserved)]
    #[token("IN", reserved)]
    #[token("AT", reserved)]
    #[token("APP", reserved)]
    #[token("input", reserved)]
    #[token("open", reserved)]
    #[token("write", reserved)]
    #[token("run", reserved)]
    #[token("scroll", reserved)]
    #[token("is", reserved)]
    #[token("in", reserved)]
    #[token("at", reserved)]
    #[token("app", reserved)]
    Reserved(String),

    /// Keyboard key names such as `ENTER`, `LCTRL`, `F5` or a single letter.
    /// Reclassified as identifiers unless preceded by the `KEY` keyword.
    #[regex(r"FN|BACKSPACE|ENTER|SPACE|TAB|(L|R)?CTRL|(L|R)?ALT|(L|R)?SHIFT|(L|R)?WIN|DELETE|DEL|END|HOME|INSERT|PG_UP|PG_DOWN|ARROW_LEFT|ARROW_RIGHT|ARROW_UP|ARROW_DOWN|ESC|CAPS_LOCK|F(1[0-2]|[1-9])|[a-zA-Z]",
           |lex| lex.slice().to_string(),
           priority = 10)]
    KeyboardKey(String),
    /// Mouse button names such as `LEFT` or `WHEEL_UP`.
    #[regex(r"LEFT|RIGHT|MIDDLE|WHEEL_UP|WHEEL_DOWN|SCROLL_UP|SCROLL_DOWN",
            |lex| lex.slice().to_string(),
            priority = 10)]
    MouseButton(String),
    /// Identifier tokens; variable or function names such as `x` or `count`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `++`
    #[token("++")]
    Increment,
    /// `--`
    #[token("--")]
    Decrement,
    /// `===`
    #[token("===")]
    StrictEqual,
    /// `!==`
    #[token("!==")]
    StrictNotEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `|>`
    #[token("|>")]
    PipeOp,
    /// `&&`
    #[token("&&")]
    DoubleAmpersand,
    /// `||`
    #[token("||")]
    DoublePipe,
    /// `**`
    #[token("**")]
    DoubleStar,
    /// `//`
    #[token("//")]
    DoubleSlash,
    /// `=`
    #[token("=")]
    Equals,
    /// `|`
    #[token("|")]
    Pipe,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `^`
    #[token("^")]
    Caret,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `;`
    #[token(";")]
    Terminator,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,

    /// ```text
    /// #* Multi line comments. *#
    /// ```
    #[regex(r"#\*([^*]|\*+[^*#])*\*+#", |lex| {
        let comment      = lex.slice();
        let newlines     = comment.chars().filter(|&c| c == '\n').count();
        lex.extras.line += newlines;
        logos::Skip
    })]
    MultiLineComment,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Newlines advance the line counter and are otherwise dropped.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,

    /// End of input, appended once by `tokenize`. The NUL pattern exists
    /// only to satisfy the lexer generator; source text never contains it.
    #[token("\0")]
    Eof,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "TRUE" | "true" => Some(true),
        "FALSE" | "false" => Some(false),
        _ => None,
    }
}

/// Stores the slice of a reserved keyword.
fn reserved(lex: &logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

/// Parses a time literal and normalizes it to seconds.
///
/// `500ms` becomes `0.5`, `2m` becomes `120.0`, `1h` becomes `3600.0`.
fn parse_time(lex: &logos::Lexer<Token>) -> Option<f64> {
    let slice = lex.slice();
    let unit_len = if slice.ends_with("ms") { 2 } else { 1 };
    let (number, unit) = slice.split_at(slice.len() - unit_len);
    let value: f64 = number.parse().ok()?;

    match unit {
        "ms" => Some(value / 1000.0),
        "s" => Some(value),
        "m" => Some(value * 60.0),
        "h" => Some(value * 3600.0),
        _ => None,
    }
}

/// Parses a string literal, stripping the quotes and resolving escapes.
fn parse_string(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                other => result.push(other),
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// Tokenizes an entire source string.
///
/// Produces `(token, line)` pairs with an explicit `Token::Eof` appended.
/// Keyboard-key words double as ordinary identifiers everywhere except
/// directly after the `KEY` keyword, so the reclassification happens here,
/// where the previous significant token is known.
///
/// # Errors
/// Returns `ParseError::InvalidNumber` for unrepresentable numeric literals
/// and `ParseError::UnexpectedCharacter` for any other unlexable input.
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            Ok(Token::KeyboardKey(name)) => {
                let follows_key_keyword = matches!(tokens.last(), Some((Token::Key, _)));
                if follows_key_keyword {
                    tokens.push((Token::KeyboardKey(name), line));
                } else {
                    tokens.push((Token::Identifier(name), line));
                }
            },
            Ok(tok) => tokens.push((tok, line)),
            Err(()) => {
                let slice = lexer.slice();
                return Err(if slice.starts_with(|c: char| c.is_ascii_digit()) {
                               ParseError::InvalidNumber { literal: slice.to_string(),
                                                           line }
                           } else {
                               ParseError::UnexpectedCharacter { found: slice.to_string(),
                                                                 line }
                           });
            },
        }
    }

    tokens.push((Token::Eof, lexer.extras.line));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::{Token, tokenize};

    #[test]
    fn time_literals_normalize_to_seconds() {
        let tokens = tokenize("500ms 2s 3m 1h").unwrap();
        let times: Vec<f64> = tokens.iter()
                                    .filter_map(|(t, _)| match t {
                                        Token::Time(s) => Some(*s),
                                        _ => None,
                                    })
                                    .collect();
        assert_eq!(times, vec![0.5, 2.0, 180.0, 3600.0]);
    }

    #[test]
    fn keyboard_keys_become_identifiers_outside_key_context() {
        let tokens = tokenize("SET a = 1; PRESS KEY a;").unwrap();
        assert!(tokens.iter().any(|(t, _)| *t == Token::Identifier("a".to_string())));
        assert!(tokens.iter().any(|(t, _)| *t == Token::KeyboardKey("a".to_string())));
    }

    #[test]
    fn line_numbers_track_newlines_and_block_comments() {
        let tokens = tokenize("SET a = 1;\n#* two\nlines *#\nSET b = 2;").unwrap();
        let b_line = tokens.iter()
                           .find(|(t, _)| *t == Token::Identifier("b".to_string()))
                           .map(|(_, line)| *line);
        assert_eq!(b_line, Some(4));
    }

    #[test]
    fn unexpected_character_is_reported() {
        assert!(tokenize("SET a = @;").is_err());
    }

    #[test]
    fn strings_support_both_quote_styles_and_escapes() {
        let tokens = tokenize(r#""a\"b" 'c\nd'"#).unwrap();
        let strings: Vec<&str> = tokens.iter()
                                       .filter_map(|(t, _)| match t {
                                           Token::Str(s) => Some(s.as_str()),
                                           _ => None,
                                       })
                                       .collect();
        assert_eq!(strings, vec!["a\"b", "c\nd"]);
    }
}
