//! `@custom-variant`, `@variant`, `@utility` and `@apply` working together.

use tailor::{CompileError, CompileOptions, compile};

async fn build(css: &str, candidates: &[&str]) -> String {
    compile(css, "", CompileOptions::default())
        .await
        .unwrap()
        .build(candidates)
}

#[tokio::test]
async fn selector_custom_variant() {
    let output = build(
        "@custom-variant theme-midnight (&:where([data-theme=midnight] *)); @tailwind utilities;",
        &["theme-midnight:flex"],
    )
    .await;
    assert_eq!(
        output,
        ".theme-midnight\\:flex:where([data-theme=midnight] *) {\n  display: flex;\n}\n"
    );
}

#[tokio::test]
async fn body_custom_variant() {
    let css = r#"
        @custom-variant any-hover {
          @media (any-hover: hover) {
            &:hover {
              @slot;
            }
          }
        }
        @tailwind utilities;
    "#;
    insta::assert_snapshot!(build(css, &["any-hover:flex"]).await, @r"
    @media (any-hover: hover) {
      .any-hover\:flex:hover {
        display: flex;
      }
    }
    ");
}

#[tokio::test]
async fn custom_variants_compose_with_builtins() {
    let output = build(
        "@custom-variant pressed (&[aria-pressed=true]); @tailwind utilities;",
        &["group-pressed:flex"],
    )
    .await;
    assert_eq!(
        output,
        ".group-pressed\\:flex:is(:where(.group)[aria-pressed=true] *) {\n  display: flex;\n}\n"
    );
}

#[tokio::test]
async fn custom_variant_without_slot_is_rejected() {
    let result = compile(
        "@custom-variant broken { &:hover { color: red; } }",
        "",
        CompileOptions::default(),
    )
    .await;
    assert!(matches!(result, Err(CompileError::InvalidDirective { .. })));
}

#[tokio::test]
async fn variant_blocks_inside_rules() {
    let output = build(".card { color: black; @variant hover { color: red; } }", &[]).await;
    assert_eq!(output, ".card {\n  color: black;\n}\n.card:hover {\n  color: red;\n}\n");
}

#[tokio::test]
async fn unknown_variant_blocks_fail() {
    let result = compile(
        ".card { @variant nope { color: red; } }",
        "",
        CompileOptions::default(),
    )
    .await;
    assert!(matches!(result, Err(CompileError::UnknownVariant(_))));
}

#[tokio::test]
async fn static_custom_utility() {
    let output = build(
        "@utility content-auto { content-visibility: auto; } @tailwind utilities;",
        &["content-auto", "hover:content-auto"],
    )
    .await;
    assert_eq!(
        output,
        ".content-auto {\n  content-visibility: auto;\n}\n.hover\\:content-auto:hover {\n  content-visibility: auto;\n}\n"
    );
}

#[tokio::test]
async fn functional_custom_utility() {
    let css = r#"
        @theme { --tab-size-github: 8; }
        @utility tab-* {
          tab-size: --value(--tab-size-*, integer, [integer]);
        }
        @tailwind utilities;
    "#;
    let output = build(css, &["tab-2", "tab-github", "tab-[12]", "tab-wide"]).await;
    assert!(output.contains(".tab-2 {\n  tab-size: 2;\n}\n"));
    assert!(output.contains("tab-size: var(--tab-size-github, 8);"));
    assert!(output.contains("tab-size: 12;"));
    assert!(!output.contains("tab-wide"));
}

#[tokio::test]
async fn custom_utilities_can_apply_other_utilities() {
    let output = build(
        "@theme { --spacing: 0.25rem; } @utility btn { @apply flex p-4; } @tailwind utilities;",
        &["btn"],
    )
    .await;
    assert_eq!(
        output,
        ":root {\n  --spacing: 0.25rem;\n}\n.btn {\n  display: flex;\n  padding: calc(var(--spacing, 0.25rem) * 4);\n}\n"
    );
}

#[tokio::test]
async fn custom_utilities_are_applicable() {
    let output = build(
        "@utility content-auto { content-visibility: auto; } .a { @apply content-auto; }",
        &[],
    )
    .await;
    assert_eq!(output, ".a {\n  content-visibility: auto;\n}\n");
}

#[tokio::test]
async fn applied_utilities_can_be_important() {
    let output = build(".a { @apply flex !important; }", &[]).await;
    assert_eq!(output, ".a {\n  display: flex !important;\n}\n");
}

#[tokio::test]
async fn apply_reports_unknown_variants() {
    let result = compile(".a { @apply nope:flex; }", "", CompileOptions::default()).await;
    match result {
        Err(CompileError::UnknownVariant(name)) => assert_eq!(name, "nope"),
        other => panic!("expected an unknown variant error, got {:?}", other),
    }
}

#[tokio::test]
async fn dark_mode_defaults_to_media() {
    let output = build("@tailwind utilities;", &["dark:flex"]).await;
    insta::assert_snapshot!(output, @r"
    @media (prefers-color-scheme: dark) {
      .dark\:flex {
        display: flex;
      }
    }
    ");
}
