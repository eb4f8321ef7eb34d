//! End-to-end compiles of small stylesheets: one source, one candidate set,
//! one expected output.

use tailor::{CompileError, CompileOptions, Compiler, compile};

async fn compiler(css: &str) -> Compiler {
    compile(css, "", CompileOptions::default()).await.unwrap()
}

#[tokio::test]
async fn static_utilities_in_registration_order() {
    let compiler = compiler("@tailwind utilities;").await;
    assert_eq!(
        compiler.build(["grid", "flex"]),
        ".flex {\n  display: flex;\n}\n.grid {\n  display: grid;\n}\n"
    );
}

#[tokio::test]
async fn theme_values_are_emitted_when_used() {
    let compiler = compiler("@theme { --spacing-4: 1rem; } @tailwind utilities;").await;
    insta::assert_snapshot!(compiler.build(["mx-4"]), @r"
    :root {
      --spacing-4: 1rem;
    }
    .mx-4 {
      margin-left: var(--spacing-4, 1rem);
      margin-right: var(--spacing-4, 1rem);
    }
    ");
}

#[tokio::test]
async fn unused_theme_values_are_not_emitted() {
    let compiler = compiler("@theme { --spacing-4: 1rem; } @tailwind utilities;").await;
    assert_eq!(compiler.build(["flex"]), ".flex {\n  display: flex;\n}\n");
}

#[tokio::test]
async fn hover_variant() {
    let compiler = compiler("@tailwind utilities;").await;
    assert_eq!(
        compiler.build(["hover:flex"]),
        ".hover\\:flex:hover {\n  display: flex;\n}\n"
    );
}

#[tokio::test]
async fn group_variant() {
    let compiler = compiler("@tailwind utilities;").await;
    assert_eq!(
        compiler.build(["group-hover:flex"]),
        ".group-hover\\:flex:is(:where(.group):hover *) {\n  display: flex;\n}\n"
    );
}

#[tokio::test]
async fn applying_an_unknown_utility_fails() {
    let result = compile(
        ".btn { @apply bg-not-found; } @tailwind utilities;",
        "",
        CompileOptions::default(),
    )
    .await;
    match result {
        Err(CompileError::UnknownUtility(name)) => assert_eq!(name, "bg-not-found"),
        other => panic!("expected an unknown utility error, got {:?}", other),
    }
}

#[tokio::test]
async fn negative_values() {
    let compiler = compiler("@tailwind utilities;").await;
    let output = compiler.build(["z-10", "-z-10"]);
    assert!(output.contains(".z-10 {\n  z-index: 10;\n}\n"));
    assert!(output.contains(".-z-10 {\n  z-index: calc(10 * -1);\n}\n"));
}

#[tokio::test]
async fn opacity_modifiers_fold_into_colors() {
    let compiler = compiler("@tailwind utilities;").await;
    let output = compiler.build(["bg-[#0088cc]/50", "bg-[--some-var]/50"]);
    assert!(output.contains("background-color: #0088cc80;"));
    assert!(output.contains(
        "background-color: color-mix(in srgb, var(--some-var) 50%, transparent);"
    ));
}

#[tokio::test]
async fn applied_utilities_keep_cascade_order() {
    let compiler = compiler("@theme { --spacing: 0.25rem; } .btn { @apply hover:flex p-4 flex; }").await;
    insta::assert_snapshot!(compiler.build(Vec::<String>::new()), @r"
    :root {
      --spacing: 0.25rem;
    }
    .btn {
      display: flex;
      padding: calc(var(--spacing, 0.25rem) * 4);
    }
    .btn:hover {
      display: flex;
    }
    ");
}

#[tokio::test]
async fn output_stays_in_place_of_the_marker() {
    let compiler = compiler(".before { color: red; } @tailwind utilities; .after { color: blue; }").await;
    assert_eq!(
        compiler.build(["flex"]),
        ".before {\n  color: red;\n}\n.flex {\n  display: flex;\n}\n.after {\n  color: blue;\n}\n"
    );
}

#[tokio::test]
async fn without_a_marker_no_utilities_are_emitted() {
    let compiler = compiler(".a { color: red; }").await;
    assert_eq!(compiler.build(["flex"]), ".a {\n  color: red;\n}\n");
}

#[tokio::test]
async fn registered_properties_are_appended() {
    let compiler = compiler("@tailwind utilities;").await;
    let output = compiler.build(["content-['a']"]);
    assert!(output.contains("--tw-content: 'a';"));
    assert!(output.contains("@property --tw-content {"));
    assert!(output.find("@property").unwrap() > output.find("--tw-content: 'a'").unwrap());
}
