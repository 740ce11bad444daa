//! Lexer token classification.

use rstest::rstest;
use testport::parser::{SyntaxKind, tokenize};

fn significant(input: &str) -> Vec<SyntaxKind> {
    tokenize(input)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[rstest]
#[case::annotation(r#"@FindBy(id = "q")"#, vec![
    SyntaxKind::AT,
    SyntaxKind::IDENT,
    SyntaxKind::L_PAREN,
    SyntaxKind::IDENT,
    SyntaxKind::EQ,
    SyntaxKind::STRING,
    SyntaxKind::R_PAREN,
])]
#[case::lambda("d -> d", vec![SyntaxKind::IDENT, SyntaxKind::ARROW, SyntaxKind::IDENT])]
#[case::char_literal("'c'", vec![SyntaxKind::CHAR])]
#[case::comparison("a != null", vec![SyntaxKind::IDENT, SyntaxKind::BANG_EQ, SyntaxKind::NULL_KW])]
#[case::new_instance("new LoginPage(driver)", vec![
    SyntaxKind::NEW_KW,
    SyntaxKind::IDENT,
    SyntaxKind::L_PAREN,
    SyntaxKind::IDENT,
    SyntaxKind::R_PAREN,
])]
fn test_token_kinds(#[case] input: &str, #[case] expected: Vec<SyntaxKind>) {
    assert_eq!(significant(input), expected);
}

#[test]
fn test_comments_are_trivia() {
    let tokens = tokenize("// setup\n/* wait */ driver");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&SyntaxKind::LINE_COMMENT));
    assert!(kinds.contains(&SyntaxKind::BLOCK_COMMENT));
    assert_eq!(significant("// setup\n/* wait */ driver"), vec![SyntaxKind::IDENT]);
}

#[test]
fn test_token_offsets_cover_the_input() {
    let input = "driver.get(\"https://example.com\");";
    let tokens = tokenize(input);
    let rebuilt: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(rebuilt, input);
    let last = tokens.last().expect("tokens");
    assert_eq!(u32::from(last.offset) as usize, input.len() - 1);
}
