//! Recursive descent parser for the Java test subset
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST. Only unterminated
//! literals and unbalanced delimiters are fatal; everything else recovers
//! into `ERROR` nodes that later stages pass through as opaque text.

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error that makes the tree unusable, if any
    pub fn fatal_error(&self) -> Option<&SyntaxError> {
        self.errors.iter().find(|e| e.is_fatal())
    }

    /// A flat tree holding every token, used when the structure check fails.
    fn unparsed(tokens: &[Token<'_>], error: SyntaxError) -> Self {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::SOURCE_FILE.into());
        for token in tokens {
            builder.token(token.kind.into(), token.text);
        }
        builder.finish_node();
        Self {
            green: builder.finish(),
            errors: vec![error],
        }
    }
}

/// Parse Java source code into a CST
pub fn parse_java(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    if let Err(error) = check_structure(&tokens, TextSize::new(input.len() as u32)) {
        return Parse::unparsed(&tokens, error);
    }
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Reject unterminated literals and unbalanced `{}`, `()` or `[]`.
///
/// Runs before parsing so that the recursive descent can assume every opening
/// delimiter has a partner.
pub fn check_structure(tokens: &[Token<'_>], end: TextSize) -> Result<(), SyntaxError> {
    let mut open: Vec<(SyntaxKind, TextRange)> = Vec::new();
    for token in tokens {
        let range = TextRange::at(token.offset, TextSize::of(token.text));
        if token.is_unterminated_literal() {
            return Err(SyntaxError::new("unterminated literal", range, ErrorCode::E0102)
                .with_hint("close the literal on the same line"));
        }
        if token.is_unterminated_comment() {
            return Err(SyntaxError::new(
                "unterminated block comment",
                range,
                ErrorCode::E0103,
            ));
        }
        match token.kind {
            SyntaxKind::L_BRACE | SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => {
                open.push((token.kind, range));
            }
            SyntaxKind::R_BRACE | SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => {
                let Some((opener, opened_at)) = open.pop() else {
                    return Err(SyntaxError::new(
                        format!("unexpected '{}'", token.text),
                        range,
                        ErrorCode::E0205,
                    ));
                };
                if closer_for(opener) != token.kind {
                    return Err(SyntaxError::builder(ErrorCode::E0207)
                        .message(format!("mismatched '{}'", token.text))
                        .range(range)
                        .related("opened here", opened_at)
                        .build());
                }
            }
            _ => {}
        }
    }
    if let Some((opener, opened_at)) = open.pop() {
        let symbol = match opener {
            SyntaxKind::L_BRACE => "{",
            SyntaxKind::L_PAREN => "(",
            _ => "[",
        };
        return Err(SyntaxError::builder(ErrorCode::E0202)
            .message(format!("unclosed '{symbol}'"))
            .at_offset(end)
            .related("opened here", opened_at)
            .build());
    }
    Ok(())
}

fn closer_for(opener: SyntaxKind) -> SyntaxKind {
    match opener {
        SyntaxKind::L_BRACE => SyntaxKind::R_BRACE,
        SyntaxKind::L_PAREN => SyntaxKind::R_PAREN,
        _ => SyntaxKind::R_BRACKET,
    }
}

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    /// Indices of the non-trivia tokens
    significant: Vec<usize>,
    /// Index into `significant` of the current token
    cursor: usize,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    /// Names of the enclosing classes, innermost last (constructor detection)
    class_names: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            cursor: 0,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            class_names: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn current_offset(&self) -> TextSize {
        self.current()
            .map(|t| t.offset)
            .or_else(|| {
                self.tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
            })
            .unwrap_or_default()
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Look ahead `n` significant tokens
    fn nth(&self, n: usize) -> SyntaxKind {
        self.kind_at(self.cursor + n)
    }

    /// Kind of the significant token at absolute index `i`
    fn kind_at(&self, i: usize) -> SyntaxKind {
        self.significant
            .get(i)
            .map(|&idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn text_at(&self, i: usize) -> &'a str {
        self.significant
            .get(i)
            .map(|&idx| self.tokens[idx].text)
            .unwrap_or("")
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Bump the current token and any trivia that follows it
    fn bump(&mut self) {
        let tokens = self.tokens;
        if let Some(token) = tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
            if !token.kind.is_trivia() {
                self.cursor += 1;
            }
        }
        self.skip_trivia();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(ErrorCode::E0902, format!("expected {what}"));
            false
        }
    }

    fn expect_semicolon(&mut self) {
        if !self.eat(SyntaxKind::SEMICOLON) {
            self.error(ErrorCode::E0201, "expected ';'");
        }
    }

    fn skip_trivia(&mut self) {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>) {
        let offset = self.current_offset();
        self.errors
            .push(SyntaxError::at_offset(message, offset, code));
    }

    /// Wrap the current token in an `ERROR` node so the caller makes progress
    fn bump_as_error(&mut self, message: &str) {
        self.error(ErrorCode::E0901, format!("{message}, found '{}'", self.current_text()));
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Bump a balanced `open ... close` group as plain tokens
    fn bump_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current_kind();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
    }

    // =========================================================================
    // Lookahead scanners (operate on significant-token indices)
    // =========================================================================

    /// Index just past the matching closer for the opener at `i`
    fn scan_balanced(&self, mut i: usize) -> Option<usize> {
        let open = self.kind_at(i);
        let close = closer_for(open);
        let mut depth = 0usize;
        while i < self.significant.len() {
            let kind = self.kind_at(i);
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            i += 1;
        }
        None
    }

    /// Index just past a type starting at `i`
    fn scan_type(&self, mut i: usize) -> Option<usize> {
        match self.kind_at(i) {
            SyntaxKind::IDENT | SyntaxKind::VOID_KW => i += 1,
            _ => return None,
        }
        while self.kind_at(i) == SyntaxKind::DOT && self.kind_at(i + 1) == SyntaxKind::IDENT {
            i += 2;
        }
        if self.kind_at(i) == SyntaxKind::LT {
            i = self.scan_type_args(i)?;
            while self.kind_at(i) == SyntaxKind::DOT && self.kind_at(i + 1) == SyntaxKind::IDENT {
                i += 2;
            }
        }
        while self.kind_at(i) == SyntaxKind::L_BRACKET && self.kind_at(i + 1) == SyntaxKind::R_BRACKET {
            i += 2;
        }
        Some(i)
    }

    fn scan_type_args(&self, mut i: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.kind_at(i) {
                SyntaxKind::LT => depth += 1,
                SyntaxKind::GT => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SyntaxKind::IDENT
                | SyntaxKind::DOT
                | SyntaxKind::COMMA
                | SyntaxKind::QUESTION
                | SyntaxKind::EXTENDS_KW
                | SyntaxKind::SUPER_KW
                | SyntaxKind::L_BRACKET
                | SyntaxKind::R_BRACKET
                | SyntaxKind::AMP => {}
                _ => return None,
            }
            i += 1;
        }
    }

    /// Index past any modifiers and annotations starting at `i`
    fn scan_modifiers(&self, mut i: usize) -> usize {
        loop {
            let kind = self.kind_at(i);
            if kind.is_modifier() {
                i += 1;
            } else if kind == SyntaxKind::AT && self.kind_at(i + 1) == SyntaxKind::IDENT {
                i += 2;
                while self.kind_at(i) == SyntaxKind::DOT && self.kind_at(i + 1) == SyntaxKind::IDENT {
                    i += 2;
                }
                if self.kind_at(i) == SyntaxKind::L_PAREN {
                    match self.scan_balanced(i) {
                        Some(next) => i = next,
                        None => return i,
                    }
                }
            } else {
                return i;
            }
        }
    }

    fn at_type_decl_start(&self) -> bool {
        let i = self.scan_modifiers(self.cursor);
        match self.kind_at(i) {
            SyntaxKind::CLASS_KW | SyntaxKind::INTERFACE_KW | SyntaxKind::ENUM_KW => true,
            SyntaxKind::AT => self.kind_at(i + 1) == SyntaxKind::INTERFACE_KW,
            _ => false,
        }
    }

    /// `Type name =`, `Type name;`, `Type name,` or `Type name :` ahead
    fn at_local_var_decl(&self) -> bool {
        let i = self.scan_modifiers(self.cursor);
        let Some(j) = self.scan_type(i) else {
            return false;
        };
        self.kind_at(j) == SyntaxKind::IDENT
            && matches!(
                self.kind_at(j + 1),
                SyntaxKind::EQ
                    | SyntaxKind::SEMICOLON
                    | SyntaxKind::COMMA
                    | SyntaxKind::COLON
                    | SyntaxKind::L_BRACKET
            )
    }

    /// `(Type) operand` ahead, where Type is capitalized or primitive
    fn at_cast(&self) -> bool {
        let i = self.cursor + 1;
        if self.kind_at(i) != SyntaxKind::IDENT {
            return false;
        }
        let name = self.text_at(i);
        let type_like = name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            || PRIMITIVES.contains(&name);
        if !type_like {
            return false;
        }
        let Some(mut j) = self.scan_type(i) else {
            return false;
        };
        while self.kind_at(j) == SyntaxKind::AMP {
            match self.scan_type(j + 1) {
                Some(next) => j = next,
                None => return false,
            }
        }
        self.kind_at(j) == SyntaxKind::R_PAREN
            && matches!(
                self.kind_at(j + 1),
                SyntaxKind::IDENT
                    | SyntaxKind::INT_NUMBER
                    | SyntaxKind::FLOAT_NUMBER
                    | SyntaxKind::STRING
                    | SyntaxKind::CHAR
                    | SyntaxKind::TRUE_KW
                    | SyntaxKind::FALSE_KW
                    | SyntaxKind::NULL_KW
                    | SyntaxKind::L_PAREN
                    | SyntaxKind::THIS_KW
                    | SyntaxKind::SUPER_KW
                    | SyntaxKind::NEW_KW
                    | SyntaxKind::BANG
                    | SyntaxKind::TILDE
            )
    }

    /// `( ... ) ->` ahead
    fn at_paren_lambda(&self) -> bool {
        self.scan_balanced(self.cursor)
            .is_some_and(|next| self.kind_at(next) == SyntaxKind::ARROW)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        self.skip_trivia();

        while !self.at_eof() {
            let before = self.pos;
            match self.current_kind() {
                SyntaxKind::PACKAGE_KW => self.parse_package_decl(),
                SyntaxKind::IMPORT_KW => self.parse_import_decl(),
                SyntaxKind::SEMICOLON => self.bump(),
                _ if self.at_type_decl_start() => self.parse_type_decl(),
                _ => self.bump_as_error("expected a type declaration"),
            }
            if self.pos == before {
                self.bump_as_error("unexpected token");
            }
        }

        self.finish_node();
    }

    fn parse_package_decl(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_DECL);
        self.bump();
        self.parse_qualified_name();
        self.expect_semicolon();
        self.finish_node();
    }

    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump();
        self.eat(SyntaxKind::STATIC_KW);
        self.parse_qualified_name();
        if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::STAR {
            self.bump();
            self.bump();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QUALIFIED_NAME);
        if self.at(SyntaxKind::IDENT) {
            self.bump();
            while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            }
        } else {
            self.error(ErrorCode::E0301, "expected a name");
        }
        self.finish_node();
    }

    fn parse_type_decl(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        self.start_node_at(checkpoint, SyntaxKind::CLASS_DECL);
        self.parse_class_rest();
        self.finish_node();
    }

    /// Everything after the modifiers of a class, interface, enum or annotation type
    fn parse_class_rest(&mut self) {
        let annotation_type = self.eat(SyntaxKind::AT);
        let opaque_body = annotation_type || self.at(SyntaxKind::ENUM_KW);
        if self.at_any(&[SyntaxKind::CLASS_KW, SyntaxKind::INTERFACE_KW, SyntaxKind::ENUM_KW]) {
            self.bump();
        } else {
            self.error(ErrorCode::E0902, "expected 'class', 'interface' or 'enum'");
        }

        let name = if self.at(SyntaxKind::IDENT) {
            let name = self.current_text();
            self.bump();
            name
        } else {
            self.error(ErrorCode::E0301, "expected a type name");
            ""
        };

        if self.at(SyntaxKind::LT) {
            self.parse_type_params();
        }

        if self.at_any(&[SyntaxKind::EXTENDS_KW, SyntaxKind::IMPLEMENTS_KW]) {
            self.start_node(SyntaxKind::SUPERTYPES);
            while self.at_any(&[SyntaxKind::EXTENDS_KW, SyntaxKind::IMPLEMENTS_KW]) {
                self.bump();
                self.parse_type();
                while self.eat(SyntaxKind::COMMA) {
                    self.parse_type();
                }
            }
            self.finish_node();
        }

        if !self.at(SyntaxKind::L_BRACE) {
            self.error(ErrorCode::E0307, "expected a class body");
            return;
        }
        if opaque_body {
            self.parse_opaque_body();
        } else {
            self.class_names.push(name);
            self.parse_class_body();
            self.class_names.pop();
        }
    }

    fn parse_type_params(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMS);
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current_kind();
            if kind == SyntaxKind::LT {
                depth += 1;
            } else if kind == SyntaxKind::GT {
                depth -= 1;
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
        self.finish_node();
    }

    /// A brace-delimited body kept verbatim (enum constants, switch arms)
    fn parse_opaque_body(&mut self) {
        self.start_node(SyntaxKind::OPAQUE_BODY);
        self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_class_body(&mut self) {
        self.start_node(SyntaxKind::CLASS_BODY);
        self.bump();
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.pos;
            self.parse_member();
            if self.pos == before {
                self.bump_as_error("unexpected token in class body");
            }
        }
        self.expect(SyntaxKind::R_BRACE, "'}'");
        self.finish_node();
    }

    fn parse_member(&mut self) {
        if self.at(SyntaxKind::SEMICOLON) {
            self.bump();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_modifiers();

        match self.current_kind() {
            SyntaxKind::CLASS_KW | SyntaxKind::INTERFACE_KW | SyntaxKind::ENUM_KW => {
                self.start_node_at(checkpoint, SyntaxKind::CLASS_DECL);
                self.parse_class_rest();
                self.finish_node();
                return;
            }
            SyntaxKind::AT if self.nth(1) == SyntaxKind::INTERFACE_KW => {
                self.start_node_at(checkpoint, SyntaxKind::CLASS_DECL);
                self.parse_class_rest();
                self.finish_node();
                return;
            }
            SyntaxKind::L_BRACE => {
                self.start_node_at(checkpoint, SyntaxKind::INITIALIZER);
                self.parse_block();
                self.finish_node();
                return;
            }
            _ => {}
        }

        if self.at(SyntaxKind::LT) {
            self.parse_type_params();
        }

        let class_name = self.class_names.last().copied().unwrap_or("");
        if self.at(SyntaxKind::IDENT)
            && self.nth(1) == SyntaxKind::L_PAREN
            && self.current_text() == class_name
        {
            self.start_node_at(checkpoint, SyntaxKind::CONSTRUCTOR_DECL);
            self.bump();
            self.parse_method_rest();
            self.finish_node();
            return;
        }

        let typed_member = self
            .scan_type(self.cursor)
            .is_some_and(|next| self.kind_at(next) == SyntaxKind::IDENT);
        if !typed_member {
            self.start_node_at(checkpoint, SyntaxKind::ERROR);
            self.error(ErrorCode::E0304, format!("unexpected '{}' in class body", self.current_text()));
            self.recover_member();
            self.finish_node();
            return;
        }

        self.parse_type();
        let name_checkpoint = self.checkpoint();
        self.bump();

        if self.at(SyntaxKind::L_PAREN) {
            self.start_node_at(checkpoint, SyntaxKind::METHOD_DECL);
            self.parse_method_rest();
            self.finish_node();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::FIELD_DECL);
            self.start_node_at(name_checkpoint, SyntaxKind::VAR_DECLARATOR);
            self.parse_declarator_rest();
            self.finish_node();
            while self.eat(SyntaxKind::COMMA) {
                self.parse_var_declarator();
            }
            self.expect_semicolon();
            self.finish_node();
        }
    }

    /// Skip to the end of an unrecognized member: a `;` or a balanced block
    fn recover_member(&mut self) {
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            match self.current_kind() {
                SyntaxKind::SEMICOLON => {
                    self.bump();
                    return;
                }
                SyntaxKind::L_BRACE => {
                    self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
                    return;
                }
                SyntaxKind::L_PAREN => self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN),
                _ => self.bump(),
            }
        }
    }

    fn parse_modifiers(&mut self) {
        self.start_node(SyntaxKind::MODIFIERS);
        loop {
            if self.current_kind().is_modifier() && !self.at_eof() {
                self.bump();
            } else if self.at(SyntaxKind::AT) && self.nth(1) == SyntaxKind::IDENT {
                self.parse_annotation();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_annotation(&mut self) {
        self.start_node(SyntaxKind::ANNOTATION);
        self.bump();
        self.parse_qualified_name();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::ANNOTATION_ARGS);
            self.bump();
            if !self.at(SyntaxKind::R_PAREN) {
                loop {
                    self.start_node(SyntaxKind::ANNOTATION_ARG);
                    if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::EQ {
                        self.bump();
                        self.bump();
                    }
                    self.parse_expr();
                    self.finish_node();
                    if !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
            self.expect(SyntaxKind::R_PAREN, "')'");
            self.finish_node();
        }
        self.finish_node();
    }

    /// Parameters, throws clause and body of a method or constructor
    fn parse_method_rest(&mut self) {
        self.parse_param_list();
        while self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
            self.bump();
            self.bump();
        }
        if self.at(SyntaxKind::THROWS_KW) {
            self.start_node(SyntaxKind::THROWS_CLAUSE);
            self.bump();
            self.parse_type();
            while self.eat(SyntaxKind::COMMA) {
                self.parse_type();
            }
            self.finish_node();
        }
        if self.eat(SyntaxKind::DEFAULT_KW) {
            self.parse_expr();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else if !self.eat(SyntaxKind::SEMICOLON) {
            self.error(ErrorCode::E0307, "expected a method body or ';'");
        }
    }

    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.bump();
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_param();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN, "')'");
        self.finish_node();
    }

    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        self.parse_modifiers();
        self.parse_type();
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error(ErrorCode::E0301, "expected a parameter name");
        }
        self.finish_node();
    }

    fn parse_var_declarator(&mut self) {
        self.start_node(SyntaxKind::VAR_DECLARATOR);
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error(ErrorCode::E0301, "expected a variable name");
        }
        self.parse_declarator_rest();
        self.finish_node();
    }

    fn parse_declarator_rest(&mut self) {
        while self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
            self.bump();
            self.bump();
        }
        if self.eat(SyntaxKind::EQ) {
            if self.at(SyntaxKind::L_BRACE) {
                self.parse_array_init();
            } else {
                self.parse_expr();
            }
        }
    }

    fn parse_type(&mut self) {
        self.start_node(SyntaxKind::TYPE_REF);
        if self.at(SyntaxKind::VOID_KW) {
            self.bump();
        } else if self.at(SyntaxKind::IDENT) {
            self.bump();
            while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            }
        } else {
            self.error(ErrorCode::E0305, "expected a type");
        }
        if self.at(SyntaxKind::LT) {
            self.parse_type_args();
        }
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
        while self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
            self.bump();
            self.bump();
        }
        self.eat(SyntaxKind::ELLIPSIS);
        self.finish_node();
    }

    fn parse_type_args(&mut self) {
        self.start_node(SyntaxKind::TYPE_ARGS);
        self.bump();
        loop {
            if self.eat(SyntaxKind::GT) {
                break;
            }
            if self.eat(SyntaxKind::QUESTION) {
                if self.at_any(&[SyntaxKind::EXTENDS_KW, SyntaxKind::SUPER_KW]) {
                    self.bump();
                    self.parse_type();
                }
            } else if self.at(SyntaxKind::IDENT) {
                self.parse_type();
            } else {
                self.error(ErrorCode::E0305, "expected a type argument");
                break;
            }
            while self.eat(SyntaxKind::AMP) {
                self.parse_type();
            }
            if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::GT) {
                self.error(ErrorCode::E0902, "expected ',' or '>'");
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE, "'{'");
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.bump_as_error("unexpected token in block");
            }
        }
        self.expect(SyntaxKind::R_BRACE, "'}'");
        self.finish_node();
    }

    fn parse_block_or_error(&mut self) {
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error(ErrorCode::E0902, "expected '{'");
        }
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::TRY_KW => self.parse_try(),
            SyntaxKind::FOR_KW => self.parse_for(),
            SyntaxKind::WHILE_KW => self.parse_while(),
            SyntaxKind::DO_KW => self.parse_do(),
            SyntaxKind::SWITCH_KW => self.parse_switch(),
            SyntaxKind::RETURN_KW => {
                self.start_node(SyntaxKind::RETURN_STMT);
                self.bump();
                if !self.at(SyntaxKind::SEMICOLON) {
                    self.parse_expr();
                }
                self.expect_semicolon();
                self.finish_node();
            }
            SyntaxKind::THROW_KW => {
                self.start_node(SyntaxKind::THROW_STMT);
                self.bump();
                self.parse_expr();
                self.expect_semicolon();
                self.finish_node();
            }
            SyntaxKind::BREAK_KW | SyntaxKind::CONTINUE_KW => {
                self.start_node(SyntaxKind::JUMP_STMT);
                self.bump();
                self.eat(SyntaxKind::IDENT);
                self.expect_semicolon();
                self.finish_node();
            }
            SyntaxKind::SYNCHRONIZED_KW
            | SyntaxKind::ASSERT_KW
            | SyntaxKind::CLASS_KW
            | SyntaxKind::INTERFACE_KW
            | SyntaxKind::ENUM_KW => self.parse_opaque_stmt(),
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON => self.parse_opaque_stmt(),
            _ if self.at_local_var_decl() => self.parse_local_var(),
            _ => {
                self.start_node(SyntaxKind::EXPR_STMT);
                self.parse_expr();
                self.expect_semicolon();
                self.finish_node();
            }
        }
    }

    /// A statement kept verbatim: up to a `;` or the end of a balanced block
    fn parse_opaque_stmt(&mut self) {
        self.start_node(SyntaxKind::OPAQUE_STMT);
        let mut bumped = false;
        while !self.at_eof() && !(bumped && self.at(SyntaxKind::R_BRACE)) {
            match self.current_kind() {
                SyntaxKind::SEMICOLON => {
                    self.bump();
                    break;
                }
                SyntaxKind::L_BRACE => {
                    self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
                    break;
                }
                SyntaxKind::L_PAREN => self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN),
                _ => self.bump(),
            }
            bumped = true;
        }
        self.finish_node();
    }

    fn parse_local_var(&mut self) {
        self.start_node(SyntaxKind::LOCAL_VAR_STMT);
        self.parse_modifiers();
        self.parse_type();
        self.parse_var_declarator();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_var_declarator();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn parse_condition(&mut self) {
        self.start_node(SyntaxKind::CONDITION);
        self.expect(SyntaxKind::L_PAREN, "'('");
        self.parse_expr();
        self.expect(SyntaxKind::R_PAREN, "')'");
        self.finish_node();
    }

    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump();
        self.parse_condition();
        self.parse_statement();
        if self.eat(SyntaxKind::ELSE_KW) {
            self.parse_statement();
        }
        self.finish_node();
    }

    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TRY_STMT);
        self.bump();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::RESOURCE_SPEC);
            self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
            self.finish_node();
        }
        self.parse_block_or_error();

        while self.at(SyntaxKind::CATCH_KW) {
            self.start_node(SyntaxKind::CATCH_CLAUSE);
            self.bump();
            self.expect(SyntaxKind::L_PAREN, "'('");
            self.start_node(SyntaxKind::CATCH_PARAM);
            self.parse_modifiers();
            self.parse_type();
            while self.eat(SyntaxKind::PIPE) {
                self.parse_type();
            }
            if !self.eat(SyntaxKind::IDENT) {
                self.error(ErrorCode::E0301, "expected an exception variable");
            }
            self.finish_node();
            self.expect(SyntaxKind::R_PAREN, "')'");
            self.parse_block_or_error();
            self.finish_node();
        }

        if self.at(SyntaxKind::FINALLY_KW) {
            self.start_node(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_block_or_error();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_for(&mut self) {
        self.start_node(SyntaxKind::FOR_STMT);
        self.bump();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::FOR_HEADER);
            self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
            self.finish_node();
        } else {
            self.error(ErrorCode::E0902, "expected '('");
        }
        self.parse_statement();
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump();
        self.parse_condition();
        self.parse_statement();
        self.finish_node();
    }

    fn parse_do(&mut self) {
        self.start_node(SyntaxKind::DO_STMT);
        self.bump();
        self.parse_statement();
        if self.eat(SyntaxKind::WHILE_KW) {
            self.parse_condition();
        } else {
            self.error(ErrorCode::E0902, "expected 'while'");
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn parse_switch(&mut self) {
        self.start_node(SyntaxKind::SWITCH_STMT);
        self.bump();
        self.parse_condition();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_opaque_body();
        } else {
            self.error(ErrorCode::E0902, "expected '{'");
        }
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) {
        self.parse_assignment();
    }

    fn parse_assignment(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_ternary();
        if self.current_kind().is_assign_op() && !self.at_eof() {
            self.start_node_at(checkpoint, SyntaxKind::ASSIGN_EXPR);
            self.bump();
            self.parse_assignment();
            self.finish_node();
        }
    }

    fn parse_ternary(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        if self.at(SyntaxKind::QUESTION) {
            self.start_node_at(checkpoint, SyntaxKind::TERNARY_EXPR);
            self.bump();
            self.parse_expr();
            self.expect(SyntaxKind::COLON, "':'");
            self.parse_ternary();
            self.finish_node();
        }
    }

    fn parse_binary(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        loop {
            if self.at_eof() {
                break;
            }
            let kind = self.current_kind();
            let Some(bp) = binary_binding_power(kind) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            if kind == SyntaxKind::INSTANCEOF_KW {
                self.start_node_at(checkpoint, SyntaxKind::INSTANCEOF_EXPR);
                self.bump();
                self.parse_type();
                self.eat(SyntaxKind::IDENT);
                self.finish_node();
                continue;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
            self.bump();
            self.parse_binary(bp + 1);
            self.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.current_kind() {
            SyntaxKind::BANG
            | SyntaxKind::MINUS
            | SyntaxKind::PLUS
            | SyntaxKind::TILDE
            | SyntaxKind::PLUS_PLUS
            | SyntaxKind::MINUS_MINUS
                if !self.at_eof() =>
            {
                self.start_node(SyntaxKind::PREFIX_EXPR);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::L_PAREN if self.at_cast() => {
                self.start_node(SyntaxKind::CAST_EXPR);
                self.bump();
                self.parse_type();
                while self.eat(SyntaxKind::AMP) {
                    self.parse_type();
                }
                self.expect(SyntaxKind::R_PAREN, "')'");
                self.parse_unary();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::DOT => match self.nth(1) {
                    SyntaxKind::IDENT if self.nth(2) == SyntaxKind::L_PAREN => {
                        self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                        self.bump();
                        self.bump();
                        self.parse_arg_list();
                        self.finish_node();
                    }
                    SyntaxKind::IDENT | SyntaxKind::CLASS_KW | SyntaxKind::THIS_KW => {
                        self.start_node_at(checkpoint, SyntaxKind::FIELD_EXPR);
                        self.bump();
                        self.bump();
                        self.finish_node();
                    }
                    SyntaxKind::LT => {
                        self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                        self.bump();
                        self.parse_type_args();
                        if !self.eat(SyntaxKind::IDENT) {
                            self.error(ErrorCode::E0301, "expected a method name");
                        }
                        if self.at(SyntaxKind::L_PAREN) {
                            self.parse_arg_list();
                        }
                        self.finish_node();
                    }
                    _ => {
                        self.error(ErrorCode::E0301, "expected a member name after '.'");
                        break;
                    }
                },
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.bump();
                    self.parse_expr();
                    self.expect(SyntaxKind::R_BRACKET, "']'");
                    self.finish_node();
                }
                SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                    self.start_node_at(checkpoint, SyntaxKind::POSTFIX_EXPR);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::COLON_COLON => {
                    self.start_node_at(checkpoint, SyntaxKind::METHOD_REF);
                    self.bump();
                    if self.at_any(&[SyntaxKind::IDENT, SyntaxKind::NEW_KW]) {
                        self.bump();
                    } else {
                        self.error(ErrorCode::E0301, "expected a method name after '::'");
                    }
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_primary(&mut self) {
        if self.at_eof() {
            self.error(ErrorCode::E0406, "expected an expression");
            return;
        }
        match self.current_kind() {
            kind if kind.is_literal() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                if self.nth(1) == SyntaxKind::ARROW {
                    self.start_node(SyntaxKind::LAMBDA_EXPR);
                    self.start_node(SyntaxKind::LAMBDA_PARAMS);
                    self.bump();
                    self.finish_node();
                    self.bump();
                    self.parse_lambda_body();
                    self.finish_node();
                } else if self.nth(1) == SyntaxKind::L_PAREN {
                    self.start_node(SyntaxKind::CALL_EXPR);
                    self.bump();
                    self.parse_arg_list();
                    self.finish_node();
                } else {
                    self.start_node(SyntaxKind::NAME_REF);
                    self.bump();
                    self.finish_node();
                }
            }
            SyntaxKind::THIS_KW | SyntaxKind::SUPER_KW => {
                if self.nth(1) == SyntaxKind::L_PAREN {
                    self.start_node(SyntaxKind::CALL_EXPR);
                    self.bump();
                    self.parse_arg_list();
                } else {
                    self.start_node(SyntaxKind::THIS_EXPR);
                    self.bump();
                }
                self.finish_node();
            }
            SyntaxKind::VOID_KW => {
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::NEW_KW => self.parse_new(),
            SyntaxKind::L_PAREN => {
                if self.at_paren_lambda() {
                    self.start_node(SyntaxKind::LAMBDA_EXPR);
                    self.start_node(SyntaxKind::LAMBDA_PARAMS);
                    self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
                    self.finish_node();
                    self.bump();
                    self.parse_lambda_body();
                    self.finish_node();
                } else {
                    self.start_node(SyntaxKind::PAREN_EXPR);
                    self.bump();
                    self.parse_expr();
                    self.expect(SyntaxKind::R_PAREN, "')'");
                    self.finish_node();
                }
            }
            SyntaxKind::L_BRACE => self.parse_array_init(),
            _ => self.error(ErrorCode::E0406, format!("expected an expression, found '{}'", self.current_text())),
        }
    }

    fn parse_lambda_body(&mut self) {
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.parse_expr();
        }
    }

    fn parse_new(&mut self) {
        self.start_node(SyntaxKind::NEW_EXPR);
        self.bump();
        self.parse_type();
        let mut array = false;
        while self.at(SyntaxKind::L_BRACKET) {
            array = true;
            self.bump();
            if !self.at(SyntaxKind::R_BRACKET) {
                self.parse_expr();
            }
            self.expect(SyntaxKind::R_BRACKET, "']'");
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
            if self.at(SyntaxKind::L_BRACE) {
                // anonymous class body
                self.parse_opaque_body();
            }
        } else if self.at(SyntaxKind::L_BRACE) && array {
            self.parse_array_init();
        } else if !array {
            self.error(ErrorCode::E0902, "expected '(' after constructor type");
        }
        self.finish_node();
    }

    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        self.bump();
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_expr();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        if !self.eat(SyntaxKind::R_PAREN) {
            self.error(ErrorCode::E0404, "expected ')' to close the argument list");
        }
        self.finish_node();
    }

    fn parse_array_init(&mut self) {
        self.start_node(SyntaxKind::ARRAY_INIT);
        self.bump();
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            if self.at(SyntaxKind::L_BRACE) {
                self.parse_array_init();
            } else {
                self.parse_expr();
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE, "'}'");
        self.finish_node();
    }
}

fn binary_binding_power(kind: SyntaxKind) -> Option<u8> {
    let bp = match kind {
        SyntaxKind::PIPE_PIPE => 1,
        SyntaxKind::AMP_AMP => 2,
        SyntaxKind::PIPE => 3,
        SyntaxKind::CARET => 4,
        SyntaxKind::AMP => 5,
        SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => 6,
        SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::INSTANCEOF_KW => 7,
        SyntaxKind::PLUS | SyntaxKind::MINUS => 9,
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => 10,
        _ => return None,
    };
    Some(bp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxNode;

    fn count(node: &SyntaxNode, kind: SyntaxKind) -> usize {
        node.descendants().filter(|n| n.kind() == kind).count()
    }

    fn parse_ok(input: &str) -> SyntaxNode {
        let parse = parse_java(input);
        assert!(parse.ok(), "unexpected errors: {:?}", parse.errors);
        parse.syntax()
    }

    #[test]
    fn test_parse_empty() {
        let parse = parse_java("");
        assert!(parse.ok());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn test_tree_is_lossless() {
        let input = "package a.b;\n\n// note\npublic class X { int y = 1; }\n";
        assert_eq!(parse_java(input).syntax().text().to_string(), input);
    }

    #[test]
    fn test_parse_package_and_imports() {
        let root = parse_ok(
            "package com.example;\nimport org.junit.Test;\nimport static org.junit.Assert.*;\nclass A {}",
        );
        assert_eq!(count(&root, SyntaxKind::PACKAGE_DECL), 1);
        assert_eq!(count(&root, SyntaxKind::IMPORT_DECL), 2);
        assert_eq!(count(&root, SyntaxKind::CLASS_DECL), 1);
    }

    #[test]
    fn test_parse_members() {
        let root = parse_ok(
            r#"public class LoginPage {
                @FindBy(id = "user") private WebElement user;
                private final WebDriver driver;
                public LoginPage(WebDriver driver) { this.driver = driver; }
                public void login(String u, String p) throws Exception { user.sendKeys(u); }
                public static <T> List<T> all() { return null; }
            }"#,
        );
        assert_eq!(count(&root, SyntaxKind::FIELD_DECL), 2);
        assert_eq!(count(&root, SyntaxKind::CONSTRUCTOR_DECL), 1);
        assert_eq!(count(&root, SyntaxKind::METHOD_DECL), 2);
        assert_eq!(count(&root, SyntaxKind::ANNOTATION), 1);
        assert_eq!(count(&root, SyntaxKind::THROWS_CLAUSE), 1);
    }

    #[test]
    fn test_parse_local_var_vs_expression() {
        let root = parse_ok(
            "class A { void m() { List<WebElement> items = find(); items.get(0).click(); x = 2; } }",
        );
        assert_eq!(count(&root, SyntaxKind::LOCAL_VAR_STMT), 1);
        assert_eq!(count(&root, SyntaxKind::EXPR_STMT), 2);
        assert_eq!(count(&root, SyntaxKind::ASSIGN_EXPR), 1);
    }

    #[test]
    fn test_parse_casts_and_lambdas() {
        let root = parse_ok(
            r#"class A { void m() {
                JavascriptExecutor js = (JavascriptExecutor) driver;
                wait.until((ExpectedCondition<Boolean>) wd -> ((JavascriptExecutor) wd).executeScript("return 1").equals("complete"));
                int n = (int) (a * b);
                boolean b = (x) > 1;
            } }"#,
        );
        assert_eq!(count(&root, SyntaxKind::CAST_EXPR), 4);
        assert_eq!(count(&root, SyntaxKind::LAMBDA_EXPR), 1);
    }

    #[test]
    fn test_parse_try_catch_finally() {
        let root = parse_ok(
            "class A { boolean m() { try { return a.isDisplayed(); } catch (NoSuchElementException | TimeoutException e) { return false; } finally { x(); } } }",
        );
        assert_eq!(count(&root, SyntaxKind::TRY_STMT), 1);
        assert_eq!(count(&root, SyntaxKind::CATCH_CLAUSE), 1);
        assert_eq!(count(&root, SyntaxKind::FINALLY_CLAUSE), 1);
        assert_eq!(count(&root, SyntaxKind::CATCH_PARAM), 1);
    }

    #[test]
    fn test_parse_loops_are_kept() {
        let root = parse_ok(
            "class A { void m() { for (int i = 0; i < n; i++) { s.append(i); } while (x) y(); switch (k) { case 1: break; } } }",
        );
        assert_eq!(count(&root, SyntaxKind::FOR_STMT), 1);
        assert_eq!(count(&root, SyntaxKind::FOR_HEADER), 1);
        assert_eq!(count(&root, SyntaxKind::WHILE_STMT), 1);
        assert_eq!(count(&root, SyntaxKind::SWITCH_STMT), 1);
    }

    #[test]
    fn test_binary_precedence() {
        let root = parse_ok("class A { boolean b = a + b * c > 0 && d; }");
        let outer = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::BINARY_EXPR)
            .expect("binary");
        assert!(outer.text().to_string().contains("&&"));
        assert_eq!(count(&root, SyntaxKind::BINARY_EXPR), 4);
    }

    #[test]
    fn test_enum_body_is_opaque() {
        let root = parse_ok("enum Size { SMALL, MEDIUM; int x() { return 1; } }");
        assert_eq!(count(&root, SyntaxKind::OPAQUE_BODY), 1);
        assert_eq!(count(&root, SyntaxKind::METHOD_DECL), 0);
    }

    #[test]
    fn test_recoverable_garbage_is_not_fatal() {
        let parse = parse_java("class A { void m() { a.b(,); # c(); } }");
        assert!(!parse.ok());
        assert!(parse.fatal_error().is_none());
        assert!(count(&parse.syntax(), SyntaxKind::METHOD_DECL) == 1);
    }

    #[test]
    fn test_unbalanced_brace_is_fatal() {
        let parse = parse_java("class A { void m() { a(); }");
        let fatal = parse.fatal_error().expect("fatal");
        assert_eq!(fatal.code, ErrorCode::E0202);
        assert_eq!(fatal.related.len(), 1);
    }

    #[test]
    fn test_mismatched_delimiter_is_fatal() {
        let parse = parse_java("class A { void m() { a(]; } }");
        assert_eq!(parse.fatal_error().map(|e| e.code), Some(ErrorCode::E0207));
    }

    #[test]
    fn test_stray_closer_is_fatal() {
        let parse = parse_java("class A { } }");
        assert_eq!(parse.fatal_error().map(|e| e.code), Some(ErrorCode::E0205));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let parse = parse_java("class A { String s = \"open; }");
        assert_eq!(parse.fatal_error().map(|e| e.code), Some(ErrorCode::E0102));
        // the unparsed tree still holds every byte
        assert_eq!(parse.syntax().text().to_string(), "class A { String s = \"open; }");
    }
}
