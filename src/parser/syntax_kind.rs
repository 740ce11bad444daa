//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! for the Java subset that browser tests are written in.

/// All syntax kinds (tokens and nodes) of the Java test subset
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (classes, methods, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,        // identifier
    INT_NUMBER,   // 42, 0x1F, 10L
    FLOAT_NUMBER, // 3.14, 2.5f
    STRING,       // "hello"
    CHAR,         // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,       // {
    R_BRACE,       // }
    L_BRACKET,     // [
    R_BRACKET,     // ]
    L_PAREN,       // (
    R_PAREN,       // )
    SEMICOLON,     // ;
    COMMA,         // ,
    DOT,           // .
    ELLIPSIS,      // ...
    AT,            // @
    COLON,         // :
    COLON_COLON,   // ::
    QUESTION,      // ?
    ARROW,         // ->
    EQ,            // =
    EQ_EQ,         // ==
    BANG_EQ,       // !=
    LT,            // <
    GT,            // >
    LT_EQ,         // <=
    GT_EQ,         // >=
    PLUS,          // +
    MINUS,         // -
    STAR,          // *
    SLASH,         // /
    PERCENT,       // %
    PLUS_PLUS,     // ++
    MINUS_MINUS,   // --
    PLUS_EQ,       // +=
    MINUS_EQ,      // -=
    STAR_EQ,       // *=
    SLASH_EQ,      // /=
    PERCENT_EQ,    // %=
    AMP,           // &
    PIPE,          // |
    CARET,         // ^
    TILDE,         // ~
    BANG,          // !
    AMP_AMP,       // &&
    PIPE_PIPE,     // ||

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    ABSTRACT_KW,
    ASSERT_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DO_KW,
    ELSE_KW,
    ENUM_KW,
    EXTENDS_KW,
    FALSE_KW,
    FINAL_KW,
    FINALLY_KW,
    FOR_KW,
    IF_KW,
    IMPLEMENTS_KW,
    IMPORT_KW,
    INSTANCEOF_KW,
    INTERFACE_KW,
    NATIVE_KW,
    NEW_KW,
    NULL_KW,
    PACKAGE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    RETURN_KW,
    STATIC_KW,
    SUPER_KW,
    SWITCH_KW,
    SYNCHRONIZED_KW,
    THIS_KW,
    THROW_KW,
    THROWS_KW,
    TRANSIENT_KW,
    TRUE_KW,
    TRY_KW,
    VOID_KW,
    VOLATILE_KW,
    WHILE_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    // =========================================================================
    // NODES: declarations
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_DECL,
    IMPORT_DECL,
    QUALIFIED_NAME,
    CLASS_DECL,
    CLASS_BODY,
    OPAQUE_BODY,
    MODIFIERS,
    ANNOTATION,
    ANNOTATION_ARGS,
    ANNOTATION_ARG,
    TYPE_PARAMS,
    SUPERTYPES,
    FIELD_DECL,
    VAR_DECLARATOR,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    INITIALIZER,
    PARAM_LIST,
    PARAM,
    THROWS_CLAUSE,
    TYPE_REF,
    TYPE_ARGS,

    // =========================================================================
    // NODES: statements
    // =========================================================================
    BLOCK,
    LOCAL_VAR_STMT,
    EXPR_STMT,
    IF_STMT,
    CONDITION,
    TRY_STMT,
    RESOURCE_SPEC,
    CATCH_CLAUSE,
    CATCH_PARAM,
    FINALLY_CLAUSE,
    FOR_STMT,
    FOR_HEADER,
    WHILE_STMT,
    DO_STMT,
    SWITCH_STMT,
    RETURN_STMT,
    THROW_STMT,
    JUMP_STMT,
    EMPTY_STMT,
    OPAQUE_STMT,

    // =========================================================================
    // NODES: expressions
    // =========================================================================
    LITERAL,
    NAME_REF,
    THIS_EXPR,
    CALL_EXPR,
    ARG_LIST,
    FIELD_EXPR,
    INDEX_EXPR,
    NEW_EXPR,
    ARRAY_INIT,
    CAST_EXPR,
    PAREN_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    BINARY_EXPR,
    INSTANCEOF_EXPR,
    TERNARY_EXPR,
    ASSIGN_EXPR,
    LAMBDA_EXPR,
    LAMBDA_PARAMS,
    METHOD_REF,

    // Sentinel, must stay last
    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::WHILE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::PIPE_PIPE as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT_NUMBER
                | Self::FLOAT_NUMBER
                | Self::STRING
                | Self::CHAR
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::NULL_KW
        )
    }

    /// Check if this is a declaration modifier keyword
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::PUBLIC_KW
                | Self::PRIVATE_KW
                | Self::PROTECTED_KW
                | Self::STATIC_KW
                | Self::FINAL_KW
                | Self::ABSTRACT_KW
                | Self::SYNCHRONIZED_KW
                | Self::NATIVE_KW
                | Self::TRANSIENT_KW
                | Self::VOLATILE_KW
                | Self::DEFAULT_KW
        )
    }

    /// Check if this token is an assignment operator
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            Self::EQ | Self::PLUS_EQ | Self::MINUS_EQ | Self::STAR_EQ | Self::SLASH_EQ | Self::PERCENT_EQ
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl rowan::Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<JavaLanguage>;
