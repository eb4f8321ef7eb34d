//! How `@theme` blocks combine and what ends up in `:root`.

use tailor::{CompileError, CompileOptions, MemoryResolver, compile};

async fn build(css: &str, candidates: &[&str]) -> String {
    compile(css, "", CompileOptions::default())
        .await
        .unwrap()
        .build(candidates)
}

#[tokio::test]
async fn later_blocks_override_earlier_ones() {
    let output = build(
        "@theme { --color-brand: red; } @theme { --color-brand: blue; } @tailwind utilities;",
        &["bg-brand"],
    )
    .await;
    assert_eq!(
        output,
        ":root {\n  --color-brand: blue;\n}\n.bg-brand {\n  background-color: var(--color-brand, blue);\n}\n"
    );
}

#[tokio::test]
async fn reference_values_are_inlined_and_not_emitted() {
    let output = build(
        "@theme reference { --color-brand: red; } @tailwind utilities;",
        &["bg-brand"],
    )
    .await;
    assert_eq!(output, ".bg-brand {\n  background-color: red;\n}\n");
}

#[tokio::test]
async fn later_plain_values_lift_reference_suppression() {
    let output = build(
        "@theme reference { --color-x: #123456; } @theme { --color-x: #654321; } @tailwind utilities;",
        &["bg-x"],
    )
    .await;
    assert_eq!(
        output,
        ":root {\n  --color-x: #654321;\n}\n.bg-x {\n  background-color: var(--color-x, #654321);\n}\n"
    );
}

#[tokio::test]
async fn inline_values_are_still_emitted_when_referenced_elsewhere() {
    let output = build(
        "@theme inline { --color-brand: red; } .a { color: var(--color-brand); } @tailwind utilities;",
        &["bg-brand"],
    )
    .await;
    assert!(output.contains(".bg-brand {\n  background-color: red;\n}\n"));
    assert!(output.contains(":root {\n  --color-brand: red;\n}\n"));
}

#[tokio::test]
async fn namespace_reset_removes_values() {
    let css = r#"
        @theme { --color-red: red; --color-blue: blue; --spacing-4: 1rem; }
        @theme { --color-*: initial; --color-green: green; }
        @tailwind utilities;
    "#;
    assert_eq!(build(css, &["bg-red", "bg-blue"]).await, "");
    assert!(build(css, &["bg-green"]).await.contains("var(--color-green, green)"));
    assert!(build(css, &["p-4"]).await.contains("var(--spacing-4, 1rem)"));
}

#[tokio::test]
async fn global_reset_removes_everything() {
    let css = "@theme { --color-red: red; } @theme { --*: initial; } @tailwind utilities;";
    assert_eq!(build(css, &["bg-red"]).await, "");
}

#[tokio::test]
async fn static_values_are_always_emitted() {
    let output = build("@theme static { --color-brand: red; } @tailwind utilities;", &[]).await;
    assert_eq!(output, ":root {\n  --color-brand: red;\n}\n");
}

#[tokio::test]
async fn dependencies_of_used_values_are_emitted() {
    let css = r#"
        @theme {
          --color-base: #111;
          --color-brand: var(--color-base);
          --color-unused: #222;
        }
        @tailwind utilities;
    "#;
    let output = build(css, &["bg-brand"]).await;
    assert!(output.contains("--color-base: #111;"));
    assert!(output.contains("--color-brand: var(--color-base);"));
    assert!(!output.contains("--color-unused"));
}

#[tokio::test]
async fn keyframes_follow_the_animations_that_use_them() {
    let css = r#"
        @theme {
          --animate-spin: spin 1s linear infinite;
          @keyframes spin { to { transform: rotate(360deg); } }
          @keyframes unused { to { opacity: 0; } }
        }
        @tailwind utilities;
    "#;
    let output = build(css, &["animate-spin"]).await;
    assert!(output.contains("@keyframes spin {"));
    assert!(!output.contains("@keyframes unused"));
    assert!(!build(css, &["flex"]).await.contains("@keyframes"));
}

#[tokio::test]
async fn host_selectors_extend_the_root_block() {
    let output = build(
        "@theme { --color-brand: red; } :host { display: block; } @tailwind utilities;",
        &["bg-brand"],
    )
    .await;
    assert!(output.starts_with(":root, :host {\n  --color-brand: red;\n}\n"));
}

#[tokio::test]
async fn theme_functions_resolve_against_the_theme() {
    let css = r#"
        @theme { --color-brand: #0088cc; --spacing: 0.25rem; }
        .a { color: theme(--color-brand); }
        .b { color: --theme(--color-brand); }
        .c { margin: --spacing(4); }
        .d { color: --alpha(var(--color-brand) / 50%); }
        .e { color: theme(colors.brand / 50%); }
    "#;
    let output = build(css, &[]).await;
    assert!(output.contains(".a {\n  color: #0088cc;\n}\n"));
    assert!(output.contains(".b {\n  color: var(--color-brand);\n}\n"));
    assert!(output.contains(".c {\n  margin: calc(var(--spacing, 0.25rem) * 4);\n}\n"));
    assert!(output.contains(
        ".d {\n  color: color-mix(in srgb, var(--color-brand) 50%, transparent);\n}\n"
    ));
    assert!(output.contains(".e {\n  color: #0088cc80;\n}\n"));
}

#[tokio::test]
async fn theme_blocks_reject_rules() {
    let result = compile("@theme { .a { color: red; } }", "", CompileOptions::default()).await;
    assert!(matches!(result, Err(CompileError::InvalidTheme(_))));
}

#[tokio::test]
async fn reference_imports_do_not_emit_variables() {
    let resolver = MemoryResolver::new().with_stylesheet(
        "theme.css",
        "@theme { --color-brand: red; } .from-theme { color: blue; }",
    );
    let compiler = compile(
        "@import \"theme.css\" theme(reference); @tailwind utilities;",
        "",
        CompileOptions::new().with_resolver(resolver),
    )
    .await
    .unwrap();
    let output = compiler.build(["bg-brand"]);
    assert!(output.contains(".bg-brand {\n  background-color: red;\n}\n"));
    assert!(!output.contains(":root"));
}
