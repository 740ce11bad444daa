//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Accessors return `None` when the parser recovered from an error and the
//! child is missing.

use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Source text of the node with surrounding trivia trimmed
    fn text(&self) -> String {
        self.syntax().text().to_string().trim().to_string()
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Generates an enum over several node wrappers with `AstNode` dispatch.
macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ident) = $kind:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($ty),)+
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some(Self::$variant($ty(node))),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(n) => n.syntax(),)+
                }
            }
        }
    };
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    node.children().filter_map(N::cast)
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn last_ident(node: &SyntaxNode) -> Option<SmolStr> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .last()
        .map(|t| SmolStr::new(t.text()))
}

/// First non-trivia token that is a direct child of `node`
fn first_operator(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
}

// ============================================================================
// Root and headers
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn package(&self) -> Option<PackageDecl> {
        child(&self.0)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl> + '_ {
        children(&self.0)
    }

    pub fn classes(&self) -> impl Iterator<Item = ClassDecl> + '_ {
        children(&self.0)
    }
}

ast_node!(PackageDecl, PACKAGE_DECL);

impl PackageDecl {
    pub fn name(&self) -> Option<SmolStr> {
        child::<QualifiedName>(&self.0).map(|q| q.path())
    }
}

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn is_static(&self) -> bool {
        token(&self.0, SyntaxKind::STATIC_KW).is_some()
    }

    /// `import a.b.*;`
    pub fn is_wildcard(&self) -> bool {
        token(&self.0, SyntaxKind::STAR).is_some()
    }

    /// The dotted path without the trailing `.*`
    pub fn path(&self) -> Option<SmolStr> {
        child::<QualifiedName>(&self.0).map(|q| q.path())
    }
}

ast_node!(QualifiedName, QUALIFIED_NAME);

impl QualifiedName {
    pub fn segments(&self) -> impl Iterator<Item = SmolStr> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| SmolStr::new(t.text()))
    }

    pub fn path(&self) -> SmolStr {
        let segments: Vec<_> = self.segments().collect();
        SmolStr::new(segments.join("."))
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(ClassDecl, CLASS_DECL);

impl ClassDecl {
    pub fn modifiers(&self) -> Option<Modifiers> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn is_interface(&self) -> bool {
        token(&self.0, SyntaxKind::INTERFACE_KW).is_some()
    }

    pub fn is_enum(&self) -> bool {
        token(&self.0, SyntaxKind::ENUM_KW).is_some()
    }

    /// The `extends` type, if any
    pub fn superclass(&self) -> Option<TypeRef> {
        let supertypes = child::<Supertypes>(&self.0)?;
        let mut in_extends = false;
        for element in supertypes.0.children_with_tokens() {
            match element.kind() {
                SyntaxKind::EXTENDS_KW => in_extends = true,
                SyntaxKind::IMPLEMENTS_KW => in_extends = false,
                SyntaxKind::TYPE_REF if in_extends => {
                    return element.into_node().and_then(TypeRef::cast);
                }
                _ => {}
            }
        }
        None
    }

    pub fn supertypes(&self) -> Vec<TypeRef> {
        child::<Supertypes>(&self.0)
            .map(|s| children(&s.0).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<ClassBody> {
        child(&self.0)
    }
}

ast_node!(Supertypes, SUPERTYPES);

ast_node!(ClassBody, CLASS_BODY);

impl ClassBody {
    pub fn members(&self) -> impl Iterator<Item = ClassMember> + '_ {
        children(&self.0)
    }
}

ast_enum! {
    /// Anything declared directly inside a class body
    ClassMember {
        Field(FieldDecl) = FIELD_DECL,
        Method(MethodDecl) = METHOD_DECL,
        Constructor(ConstructorDecl) = CONSTRUCTOR_DECL,
        Class(ClassDecl) = CLASS_DECL,
        Initializer(Initializer) = INITIALIZER,
    }
}

ast_node!(Initializer, INITIALIZER);

impl Initializer {
    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(Modifiers, MODIFIERS);

impl Modifiers {
    pub fn annotations(&self) -> impl Iterator<Item = Annotation> + '_ {
        children(&self.0)
    }

    pub fn annotation(&self, name: &str) -> Option<Annotation> {
        self.annotations().find(|a| a.name().as_deref() == Some(name))
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn has(&self, kind: SyntaxKind) -> bool {
        token(&self.0, kind).is_some()
    }

    pub fn is_static(&self) -> bool {
        self.has(SyntaxKind::STATIC_KW)
    }

    pub fn is_final(&self) -> bool {
        self.has(SyntaxKind::FINAL_KW)
    }
}

ast_node!(Annotation, ANNOTATION);

impl Annotation {
    /// Simple name: `@org.junit.Test` is `Test`
    pub fn name(&self) -> Option<SmolStr> {
        child::<QualifiedName>(&self.0).and_then(|q| q.segments().last())
    }

    pub fn args(&self) -> Vec<AnnotationArg> {
        child::<AnnotationArgs>(&self.0)
            .map(|a| children(&a.0).collect())
            .unwrap_or_default()
    }

    /// The value of `key = ...`; `value` also matches a single unnamed argument
    pub fn arg(&self, key: &str) -> Option<Expr> {
        self.args().into_iter().find_map(|arg| match arg.key() {
            Some(k) if k == key => arg.value(),
            None if key == "value" => arg.value(),
            _ => None,
        })
    }
}

ast_node!(AnnotationArgs, ANNOTATION_ARGS);
ast_node!(AnnotationArg, ANNOTATION_ARG);

impl AnnotationArg {
    pub fn key(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::EQ)?;
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn value(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn modifiers(&self) -> Option<Modifiers> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        children(&self.0)
    }
}

ast_node!(VarDeclarator, VAR_DECLARATOR);

impl VarDeclarator {
    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn init(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    pub fn modifiers(&self) -> Option<Modifiers> {
        child(&self.0)
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn params(&self) -> Vec<Param> {
        child::<ParamList>(&self.0)
            .map(|p| children(&p.0).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);

impl ConstructorDecl {
    pub fn modifiers(&self) -> Option<Modifiers> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn params(&self) -> Vec<Param> {
        child::<ParamList>(&self.0)
            .map(|p| children(&p.0).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(ParamList, PARAM_LIST);
ast_node!(Param, PARAM);

impl Param {
    pub fn ty(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }
}

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    /// Dotted name without type arguments or array brackets
    pub fn name(&self) -> SmolStr {
        let segments: Vec<_> = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::VOID_KW))
            .map(|t| t.text().to_string())
            .collect();
        SmolStr::new(segments.join("."))
    }

    /// Last segment of the name: `Map.Entry` is `Entry`
    pub fn simple_name(&self) -> SmolStr {
        last_ident(&self.0)
            .or_else(|| token(&self.0, SyntaxKind::VOID_KW).map(|t| SmolStr::new(t.text())))
            .unwrap_or_default()
    }

    pub fn type_args(&self) -> Vec<TypeRef> {
        child::<TypeArgs>(&self.0)
            .map(|a| children(&a.0).collect())
            .unwrap_or_default()
    }

    pub fn is_array(&self) -> bool {
        token(&self.0, SyntaxKind::L_BRACKET).is_some()
            || token(&self.0, SyntaxKind::ELLIPSIS).is_some()
    }

    pub fn is_void(&self) -> bool {
        token(&self.0, SyntaxKind::VOID_KW).is_some()
    }
}

ast_node!(TypeArgs, TYPE_ARGS);

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        children(&self.0)
    }
}

ast_enum! {
    Stmt {
        Block(Block) = BLOCK,
        LocalVar(LocalVarStmt) = LOCAL_VAR_STMT,
        Expr(ExprStmt) = EXPR_STMT,
        If(IfStmt) = IF_STMT,
        Try(TryStmt) = TRY_STMT,
        For(ForStmt) = FOR_STMT,
        While(WhileStmt) = WHILE_STMT,
        Do(DoStmt) = DO_STMT,
        Switch(SwitchStmt) = SWITCH_STMT,
        Return(ReturnStmt) = RETURN_STMT,
        Throw(ThrowStmt) = THROW_STMT,
        Jump(JumpStmt) = JUMP_STMT,
        Empty(EmptyStmt) = EMPTY_STMT,
        Opaque(OpaqueStmt) = OPAQUE_STMT,
        Error(ErrorNode) = ERROR,
    }
}

ast_node!(LocalVarStmt, LOCAL_VAR_STMT);

impl LocalVarStmt {
    pub fn modifiers(&self) -> Option<Modifiers> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        children(&self.0)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        child::<Condition>(&self.0).and_then(|c| c.expr())
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        children(&self.0).next()
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        children(&self.0).nth(1)
    }
}

ast_node!(Condition, CONDITION);

impl Condition {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    pub fn has_resources(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::RESOURCE_SPEC)
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn catches(&self) -> impl Iterator<Item = CatchClause> + '_ {
        children(&self.0)
    }

    pub fn finally_block(&self) -> Option<Block> {
        child::<FinallyClause>(&self.0).and_then(|f| child(&f.0))
    }
}

ast_node!(CatchClause, CATCH_CLAUSE);

impl CatchClause {
    /// Simple names of the caught exception types
    pub fn exception_types(&self) -> Vec<SmolStr> {
        child::<CatchParam>(&self.0)
            .map(|p| children::<TypeRef>(&p.0).map(|t| t.simple_name()).collect())
            .unwrap_or_default()
    }

    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(CatchParam, CATCH_PARAM);
ast_node!(FinallyClause, FINALLY_CLAUSE);
ast_node!(ForStmt, FOR_STMT);
ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        child::<Condition>(&self.0).and_then(|c| c.expr())
    }

    pub fn body(&self) -> Option<Stmt> {
        child(&self.0)
    }
}

ast_node!(DoStmt, DO_STMT);
ast_node!(SwitchStmt, SWITCH_STMT);
ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(ThrowStmt, THROW_STMT);
ast_node!(JumpStmt, JUMP_STMT);
ast_node!(EmptyStmt, EMPTY_STMT);
ast_node!(OpaqueStmt, OPAQUE_STMT);
ast_node!(ErrorNode, ERROR);

// ============================================================================
// Expressions
// ============================================================================

ast_enum! {
    Expr {
        Literal(Literal) = LITERAL,
        Name(NameRef) = NAME_REF,
        This(ThisExpr) = THIS_EXPR,
        Call(CallExpr) = CALL_EXPR,
        Field(FieldExpr) = FIELD_EXPR,
        Index(IndexExpr) = INDEX_EXPR,
        New(NewExpr) = NEW_EXPR,
        ArrayInit(ArrayInit) = ARRAY_INIT,
        Cast(CastExpr) = CAST_EXPR,
        Paren(ParenExpr) = PAREN_EXPR,
        Prefix(PrefixExpr) = PREFIX_EXPR,
        Postfix(PostfixExpr) = POSTFIX_EXPR,
        Binary(BinaryExpr) = BINARY_EXPR,
        InstanceOf(InstanceOfExpr) = INSTANCEOF_EXPR,
        Ternary(TernaryExpr) = TERNARY_EXPR,
        Assign(AssignExpr) = ASSIGN_EXPR,
        Lambda(LambdaExpr) = LAMBDA_EXPR,
        MethodRef(MethodRef) = METHOD_REF,
    }
}

impl Expr {
    /// Strip any number of enclosing parentheses and casts
    pub fn unwrap_parens(self) -> Expr {
        match self {
            Expr::Paren(p) => p.expr().map(Expr::unwrap_parens).unwrap_or(Expr::Paren(p)),
            Expr::Cast(c) => c.expr().map(Expr::unwrap_parens).unwrap_or(Expr::Cast(c)),
            other => other,
        }
    }
}

ast_node!(Literal, LITERAL);

/// Decoded value of a literal token
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Char(char),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_operator(&self.0)
    }

    pub fn value(&self) -> Option<LiteralValue> {
        let token = self.token()?;
        let text = token.text();
        let value = match token.kind() {
            SyntaxKind::STRING => LiteralValue::String(unescape(&text[1..text.len() - 1])),
            SyntaxKind::CHAR => LiteralValue::Char(unescape(&text[1..text.len() - 1]).chars().next()?),
            SyntaxKind::INT_NUMBER => LiteralValue::Int(parse_int(text)?),
            SyntaxKind::FLOAT_NUMBER => {
                LiteralValue::Float(text.trim_end_matches(['f', 'F', 'd', 'D']).parse().ok()?)
            }
            SyntaxKind::TRUE_KW => LiteralValue::Bool(true),
            SyntaxKind::FALSE_KW => LiteralValue::Bool(false),
            SyntaxKind::NULL_KW => LiteralValue::Null,
            _ => return None,
        };
        Some(value)
    }

    pub fn as_string(&self) -> Option<String> {
        match self.value()? {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits: String = text
        .trim_end_matches(['l', 'L'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        digits.parse().ok()
    }
}

/// Decode Java escape sequences
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn name(&self) -> SmolStr {
        first_operator(&self.0)
            .map(|t| SmolStr::new(t.text()))
            .unwrap_or_default()
    }
}

ast_node!(ThisExpr, THIS_EXPR);

impl ThisExpr {
    pub fn is_super(&self) -> bool {
        token(&self.0, SyntaxKind::SUPER_KW).is_some()
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The expression before the `.`, absent for unqualified calls
    pub fn receiver(&self) -> Option<Expr> {
        token(&self.0, SyntaxKind::DOT)?;
        child(&self.0)
    }

    /// Method name; `this(...)` and `super(...)` report the keyword
    pub fn name(&self) -> Option<SmolStr> {
        last_ident(&self.0).or_else(|| {
            first_operator(&self.0)
                .filter(|t| matches!(t.kind(), SyntaxKind::THIS_KW | SyntaxKind::SUPER_KW))
                .map(|t| SmolStr::new(t.text()))
        })
    }

    pub fn args(&self) -> Vec<Expr> {
        child::<ArgList>(&self.0)
            .map(|a| a.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        children(&self.0)
    }
}

ast_node!(FieldExpr, FIELD_EXPR);

impl FieldExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::IDENT | SyntaxKind::CLASS_KW | SyntaxKind::THIS_KW
                )
            })
            .last()
            .map(|t| SmolStr::new(t.text()))
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn base(&self) -> Option<Expr> {
        children(&self.0).next()
    }

    pub fn index(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    pub fn ty(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn args(&self) -> Vec<Expr> {
        child::<ArgList>(&self.0)
            .map(|a| a.args().collect())
            .unwrap_or_default()
    }

    pub fn is_array(&self) -> bool {
        token(&self.0, SyntaxKind::L_BRACKET).is_some()
            || self.ty().is_some_and(|t| t.is_array())
    }

    pub fn has_class_body(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::OPAQUE_BODY)
    }
}

ast_node!(ArrayInit, ARRAY_INIT);

impl ArrayInit {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        children(&self.0)
    }
}

ast_node!(CastExpr, CAST_EXPR);

impl CastExpr {
    pub fn ty(&self) -> Option<TypeRef> {
        child(&self.0)
    }

    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        first_operator(&self.0).map(|t| t.kind())
    }

    pub fn operand(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(PostfixExpr, POSTFIX_EXPR);

impl PostfixExpr {
    pub fn operand(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        children(&self.0).next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxKind> {
        first_operator(&self.0).map(|t| t.kind())
    }
}

ast_node!(InstanceOfExpr, INSTANCEOF_EXPR);
ast_node!(TernaryExpr, TERNARY_EXPR);

impl TernaryExpr {
    pub fn condition(&self) -> Option<Expr> {
        children(&self.0).next()
    }

    pub fn then_expr(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }

    pub fn else_expr(&self) -> Option<Expr> {
        children(&self.0).nth(2)
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    pub fn target(&self) -> Option<Expr> {
        children(&self.0).next()
    }

    pub fn value(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxKind> {
        first_operator(&self.0).map(|t| t.kind())
    }
}

ast_node!(LambdaExpr, LAMBDA_EXPR);

impl LambdaExpr {
    /// Parameter names; typed parameters report the name after the type
    pub fn params(&self) -> Vec<SmolStr> {
        let Some(params) = self.0.children().find(|n| n.kind() == SyntaxKind::LAMBDA_PARAMS) else {
            return Vec::new();
        };
        let mut names = Vec::new();
        let mut last = None;
        for token in params.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::IDENT => last = Some(SmolStr::new(token.text())),
                SyntaxKind::COMMA | SyntaxKind::R_PAREN => names.extend(last.take()),
                _ => {}
            }
        }
        names.extend(last);
        names
    }

    pub fn body_block(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn body_expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(MethodRef, METHOD_REF);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_java;

    fn source(input: &str) -> SourceFile {
        let parse = parse_java(input);
        assert!(parse.ok(), "{:?}", parse.errors);
        SourceFile::cast(parse.syntax()).expect("root")
    }

    fn first_expr(input: &str) -> Expr {
        let file = source(&format!("class A {{ Object x = {input}; }}"));
        file.syntax()
            .descendants()
            .find_map(VarDeclarator::cast)
            .and_then(|d| d.init())
            .expect("initializer")
    }

    #[test]
    fn test_headers() {
        let file = source("package com.acme.tests;\nimport java.util.*;\nimport static org.junit.Assert.assertEquals;\nclass A {}");
        assert_eq!(file.package().and_then(|p| p.name()).as_deref(), Some("com.acme.tests"));
        let imports: Vec<_> = file.imports().collect();
        assert!(imports[0].is_wildcard());
        assert_eq!(imports[0].path().as_deref(), Some("java.util"));
        assert!(imports[1].is_static());
    }

    #[test]
    fn test_class_members() {
        let file = source(
            r#"public class LoginTest extends BaseTest implements Runnable {
                @FindBy(id = "username") WebElement user;
                @Test(enabled = false) public void skipped() {}
                public LoginTest() {}
            }"#,
        );
        let class = file.classes().next().expect("class");
        assert_eq!(class.name().as_deref(), Some("LoginTest"));
        assert_eq!(class.superclass().map(|t| t.name()).as_deref(), Some("BaseTest"));
        assert_eq!(class.supertypes().len(), 2);

        let members: Vec<_> = class.body().expect("body").members().collect();
        assert_eq!(members.len(), 3);
        let ClassMember::Field(field) = &members[0] else {
            panic!("expected field");
        };
        let find_by = field.modifiers().and_then(|m| m.annotation("FindBy")).expect("annotation");
        let value = find_by.arg("id").and_then(|e| match e {
            Expr::Literal(l) => l.as_string(),
            _ => None,
        });
        assert_eq!(value.as_deref(), Some("username"));
        assert!(matches!(members[2], ClassMember::Constructor(_)));
    }

    #[test]
    fn test_call_accessors() {
        let Expr::Call(call) = first_expr("driver.findElement(By.id(\"x\"))") else {
            panic!("expected call");
        };
        assert_eq!(call.name().as_deref(), Some("findElement"));
        assert!(matches!(call.receiver(), Some(Expr::Name(_))));
        assert_eq!(call.args().len(), 1);

        let Expr::Call(bare) = first_expr("helper(1, 2)") else {
            panic!("expected call");
        };
        assert!(bare.receiver().is_none());
        assert_eq!(bare.args().len(), 2);
    }

    #[test]
    fn test_literal_values() {
        let Expr::Literal(s) = first_expr(r#""a\"b\n""#) else {
            panic!("expected literal");
        };
        assert_eq!(s.value(), Some(LiteralValue::String("a\"b\n".to_string())));
        let Expr::Literal(n) = first_expr("0x1F") else {
            panic!("expected literal");
        };
        assert_eq!(n.value(), Some(LiteralValue::Int(31)));
        let Expr::Literal(l) = first_expr("10L") else {
            panic!("expected literal");
        };
        assert_eq!(l.value(), Some(LiteralValue::Int(10)));
    }

    #[test]
    fn test_lambda_params_and_unwrap() {
        let Expr::Lambda(lambda) = first_expr("(a, b) -> a") else {
            panic!("expected lambda");
        };
        assert_eq!(lambda.params(), vec![SmolStr::new("a"), SmolStr::new("b")]);
        assert!(matches!(first_expr("((String) (y))").unwrap_parens(), Expr::Name(_)));
    }
}
