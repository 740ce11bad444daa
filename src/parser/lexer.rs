//! Logos-based lexer for the Java test subset
//!
//! Fast tokenization using the logos crate.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// An `ERROR` token whose text opens a string or char literal that never closes
    pub fn is_unterminated_literal(&self) -> bool {
        self.kind == SyntaxKind::ERROR && (self.text.starts_with('"') || self.text.starts_with('\''))
    }

    /// An `ERROR` token produced by a `/*` without a matching `*/`
    pub fn is_unterminated_comment(&self) -> bool {
        self.kind == SyntaxKind::ERROR && self.text.starts_with("/*")
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume a block comment body; an unclosed comment swallows the rest of the input as an error.
fn block_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            let rest = lex.remainder().len();
            lex.bump(rest);
            false
        }
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("@")]
    At,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("?")]
    Question,
    #[token("->")]
    Arrow,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("abstract")]
    Abstract,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("false")]
    False,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("instanceof")]
    Instanceof,
    #[token("interface")]
    Interface,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("static")]
    Static,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("synchronized")]
    Synchronized,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("transient")]
    Transient,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("void")]
    Void,
    #[token("volatile")]
    Volatile,
    #[token("while")]
    While,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Integer => SyntaxKind::INT_NUMBER,
            LogosToken::Float => SyntaxKind::FLOAT_NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Char => SyntaxKind::CHAR,

            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Ellipsis => SyntaxKind::ELLIPSIS,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::ColonColon => SyntaxKind::COLON_COLON,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::PlusPlus => SyntaxKind::PLUS_PLUS,
            LogosToken::MinusMinus => SyntaxKind::MINUS_MINUS,
            LogosToken::PlusEq => SyntaxKind::PLUS_EQ,
            LogosToken::MinusEq => SyntaxKind::MINUS_EQ,
            LogosToken::StarEq => SyntaxKind::STAR_EQ,
            LogosToken::SlashEq => SyntaxKind::SLASH_EQ,
            LogosToken::PercentEq => SyntaxKind::PERCENT_EQ,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,

            LogosToken::Abstract => SyntaxKind::ABSTRACT_KW,
            LogosToken::Assert => SyntaxKind::ASSERT_KW,
            LogosToken::Break => SyntaxKind::BREAK_KW,
            LogosToken::Case => SyntaxKind::CASE_KW,
            LogosToken::Catch => SyntaxKind::CATCH_KW,
            LogosToken::Class => SyntaxKind::CLASS_KW,
            LogosToken::Continue => SyntaxKind::CONTINUE_KW,
            LogosToken::Default => SyntaxKind::DEFAULT_KW,
            LogosToken::Do => SyntaxKind::DO_KW,
            LogosToken::Else => SyntaxKind::ELSE_KW,
            LogosToken::Enum => SyntaxKind::ENUM_KW,
            LogosToken::Extends => SyntaxKind::EXTENDS_KW,
            LogosToken::False => SyntaxKind::FALSE_KW,
            LogosToken::Final => SyntaxKind::FINAL_KW,
            LogosToken::Finally => SyntaxKind::FINALLY_KW,
            LogosToken::For => SyntaxKind::FOR_KW,
            LogosToken::If => SyntaxKind::IF_KW,
            LogosToken::Implements => SyntaxKind::IMPLEMENTS_KW,
            LogosToken::Import => SyntaxKind::IMPORT_KW,
            LogosToken::Instanceof => SyntaxKind::INSTANCEOF_KW,
            LogosToken::Interface => SyntaxKind::INTERFACE_KW,
            LogosToken::Native => SyntaxKind::NATIVE_KW,
            LogosToken::New => SyntaxKind::NEW_KW,
            LogosToken::Null => SyntaxKind::NULL_KW,
            LogosToken::Package => SyntaxKind::PACKAGE_KW,
            LogosToken::Private => SyntaxKind::PRIVATE_KW,
            LogosToken::Protected => SyntaxKind::PROTECTED_KW,
            LogosToken::Public => SyntaxKind::PUBLIC_KW,
            LogosToken::Return => SyntaxKind::RETURN_KW,
            LogosToken::Static => SyntaxKind::STATIC_KW,
            LogosToken::Super => SyntaxKind::SUPER_KW,
            LogosToken::Switch => SyntaxKind::SWITCH_KW,
            LogosToken::Synchronized => SyntaxKind::SYNCHRONIZED_KW,
            LogosToken::This => SyntaxKind::THIS_KW,
            LogosToken::Throw => SyntaxKind::THROW_KW,
            LogosToken::Throws => SyntaxKind::THROWS_KW,
            LogosToken::Transient => SyntaxKind::TRANSIENT_KW,
            LogosToken::True => SyntaxKind::TRUE_KW,
            LogosToken::Try => SyntaxKind::TRY_KW,
            LogosToken::Void => SyntaxKind::VOID_KW,
            LogosToken::Volatile => SyntaxKind::VOLATILE_KW,
            LogosToken::While => SyntaxKind::WHILE_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input)
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_method_call_chain() {
        assert_eq!(
            kinds(r#"driver.findElement(By.id("username"));"#),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::DOT,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::IDENT,
                SyntaxKind::DOT,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::STRING,
                SyntaxKind::R_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::SEMICOLON,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_vs_identifiers() {
        assert_eq!(
            kinds("public class classes extends Object"),
            vec![
                SyntaxKind::PUBLIC_KW,
                SyntaxKind::CLASS_KW,
                SyntaxKind::IDENT,
                SyntaxKind::EXTENDS_KW,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            kinds("10 500L 0x1F 3.14 2f"),
            vec![
                SyntaxKind::INT_NUMBER,
                SyntaxKind::INT_NUMBER,
                SyntaxKind::INT_NUMBER,
                SyntaxKind::FLOAT_NUMBER,
                SyntaxKind::FLOAT_NUMBER,
            ]
        );
    }

    #[test]
    fn test_lex_comments_are_trivia() {
        let tokens = tokenize("/* block */ // line\nx");
        assert_eq!(tokens[0].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens[0].text, "/* block */");
        assert_eq!(tokens[2].kind, SyntaxKind::LINE_COMMENT);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::IDENT));
    }

    #[test]
    fn test_lex_string_with_escapes() {
        let tokens = tokenize(r#""say \"hi\"""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
    }

    #[test]
    fn test_lex_unterminated_string_is_error() {
        let tokens = tokenize("x = \"open\n;");
        assert!(tokens.iter().any(|t| t.is_unterminated_literal()));
    }

    #[test]
    fn test_lex_unterminated_block_comment_is_error() {
        let tokens = tokenize("int a; /* never closed");
        let last = tokens.last().expect("tokens");
        assert!(last.is_unterminated_comment());
        assert_eq!(last.text, "/* never closed");
    }

    #[test]
    fn test_lex_lambda_and_method_ref() {
        assert_eq!(
            kinds("wd -> x :: y"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::ARROW,
                SyntaxKind::IDENT,
                SyntaxKind::COLON_COLON,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let input = "a.b(\"c\");";
        let mut expected = 0u32;
        for token in Lexer::new(input) {
            assert_eq!(u32::from(token.offset), expected);
            expected += token.text.len() as u32;
        }
        assert_eq!(expected as usize, input.len());
    }
}
