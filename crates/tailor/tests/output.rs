//! Properties of `Compiler::build` that hold for any candidate set.

use tailor::{CompileOptions, compile};

const SOURCE: &str = r#"
@theme {
  --color-brand: #0088cc;
  --breakpoint-md: 48rem;
  --breakpoint-lg: 64rem;
}
@tailwind utilities;
"#;

const CANDIDATES: [&str; 9] = [
    "p-4",
    "flex",
    "hover:flex",
    "md:flex",
    "lg:p-2",
    "bg-brand",
    "md:hover:underline",
    "-mt-2",
    "text-brand/50",
];

#[tokio::test]
async fn output_does_not_depend_on_candidate_order() {
    let compiler = compile(SOURCE, "", CompileOptions::default()).await.unwrap();
    let forward = compiler.build(CANDIDATES);
    let mut reversed = CANDIDATES;
    reversed.reverse();
    assert_eq!(forward, compiler.build(reversed));

    let mut rotated = CANDIDATES;
    rotated.rotate_left(4);
    assert_eq!(forward, compiler.build(rotated));
}

#[tokio::test]
async fn duplicates_and_repeated_builds_are_idempotent() {
    let compiler = compile(SOURCE, "", CompileOptions::default()).await.unwrap();
    let once = compiler.build(CANDIDATES);
    let doubled: Vec<&str> = CANDIDATES.iter().chain(CANDIDATES.iter()).copied().collect();
    assert_eq!(once, compiler.build(doubled));
    assert_eq!(once, compiler.build(CANDIDATES));
}

#[tokio::test]
async fn unknown_candidates_are_ignored() {
    let compiler = compile("@tailwind utilities;", "", CompileOptions::default())
        .await
        .unwrap();
    assert_eq!(compiler.build(["not-a-utility", "hover:", "bg-[", "  ", ""]), "");
    assert_eq!(
        compiler.build(["not-a-utility", "flex"]),
        compiler.build(["flex"])
    );
}

#[tokio::test]
async fn breakpoints_sort_after_base_utilities_and_by_size() {
    let compiler = compile(SOURCE, "", CompileOptions::default()).await.unwrap();
    let output = compiler.build(["lg:flex", "md:flex", "flex"]);
    let base = output.find(".flex {").unwrap();
    let md = output.find("@media (width >= 48rem)").unwrap();
    let lg = output.find("@media (width >= 64rem)").unwrap();
    assert!(base < md && md < lg, "{}", output);
}

#[tokio::test]
async fn compilers_are_shared_across_tasks() {
    let compiler = compile(SOURCE, "", CompileOptions::default()).await.unwrap();
    let expected = compiler.build(CANDIDATES);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compiler = compiler.clone();
            tokio::spawn(async move { compiler.build(CANDIDATES) })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

#[tokio::test]
async fn variant_chains_sort_before_utility_order() {
    let compiler = compile(SOURCE, "", CompileOptions::default()).await.unwrap();
    insta::assert_snapshot!(compiler.build(["md:block", "flex"]), @r"
    .flex {
      display: flex;
    }
    @media (width >= 48rem) {
      .md\:block {
        display: block;
      }
    }
    ");
}
