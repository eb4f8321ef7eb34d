use csstree::{AstNode, CssError, parse};

#[test]
fn parses_rules_and_declarations() {
    let nodes = parse(".a { color: red; margin: 0 auto }").unwrap();
    let AstNode::Rule(rule) = &nodes[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.selector, ".a");
    assert_eq!(
        rule.nodes,
        vec![AstNode::decl("color", "red"), AstNode::decl("margin", "0 auto")]
    );
}

#[test]
fn parses_statement_and_block_at_rules() {
    let source = r#"
        @import "./theme.css" layer(theme);
        @tailwind utilities;
        @media (width >= 40rem) {
            .a { color: red; }
        }
    "#;
    let nodes = parse(source).unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(
        nodes[0],
        AstNode::statement("import", "\"./theme.css\" layer(theme)")
    );
    assert_eq!(nodes[1], AstNode::statement("tailwind", "utilities"));
    assert!(nodes[2].is_at_rule("media"));
}

#[test]
fn parses_theme_blocks_with_keyframes() {
    let source = r#"
        @theme {
            --color-red-500: #ef4444;
            --animate-spin: spin 1s linear infinite;
            @keyframes spin {
                to { transform: rotate(360deg); }
            }
        }
    "#;
    let nodes = parse(source).unwrap();
    let children = nodes[0].children().unwrap();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], AstNode::decl("--color-red-500", "#ef4444"));
    assert!(children[2].is_at_rule("keyframes"));
}

#[test]
fn custom_property_values_are_kept_verbatim() {
    let nodes = parse(":root { --x:  { a: b }; --y: 1px   2px; }").unwrap();
    let children = nodes[0].children().unwrap();
    assert_eq!(children[0], AstNode::decl("--x", "{ a: b }"));
    assert_eq!(children[1], AstNode::decl("--y", "1px   2px"));
}

#[test]
fn comments_are_preserved_at_block_level() {
    let nodes = parse("/* license */ .a { /* inner */ color: red; }").unwrap();
    assert_eq!(nodes[0], AstNode::comment(" license "));
    assert_eq!(nodes[1].children().unwrap()[0], AstNode::comment(" inner "));
}

#[test]
fn important_and_nested_rules() {
    let nodes = parse(".a { color: red !important; &:hover { color: blue } }").unwrap();
    let children = nodes[0].children().unwrap();
    let AstNode::Declaration(decl) = &children[0] else {
        panic!("expected a declaration");
    };
    assert!(decl.important);
    assert!(matches!(&children[1], AstNode::Rule(rule) if rule.selector == "&:hover"));
}

#[test]
fn unclosed_block_is_an_error() {
    let err = parse(".a { color: red;").unwrap_err();
    assert_eq!(err, CssError::UnclosedBlock(".a".to_string()));
}

#[test]
fn stray_closing_brace_is_an_error() {
    assert!(matches!(parse(".a {} }"), Err(CssError::InvalidSyntax(_))));
}
