//! The default utility set.
//!
//! Registration order is cascade order: shorthands come before their
//! longhands (`inset` before `inset-x` before `top`) so a longhand utility
//! always wins over a shorthand one regardless of class order in markup.

use super::{
    BareFn, FunctionalOptions, Utilities, accepts_arbitrary, compile_fn, decls, degrees_bare,
    integer_bare, ms_bare, percent_bare, px_bare, spacing_bare,
};
use crate::candidate::{CandidateValue, Modifier};
use crate::property::property;
use crate::theme::Theme;
use crate::value::{DataType, infer_data_type, is_fraction};
use csstree::AstNode;

type PropertyTable = &'static [(&'static str, &'static [&'static str])];

const INSETS: PropertyTable = &[
    ("inset", &["inset"]),
    ("inset-x", &["left", "right"]),
    ("inset-y", &["top", "bottom"]),
    ("start", &["inset-inline-start"]),
    ("end", &["inset-inline-end"]),
    ("top", &["top"]),
    ("right", &["right"]),
    ("bottom", &["bottom"]),
    ("left", &["left"]),
];

const MARGINS: PropertyTable = &[
    ("m", &["margin"]),
    ("mx", &["margin-left", "margin-right"]),
    ("my", &["margin-top", "margin-bottom"]),
    ("ms", &["margin-inline-start"]),
    ("me", &["margin-inline-end"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
];

const PADDINGS: PropertyTable = &[
    ("p", &["padding"]),
    ("px", &["padding-left", "padding-right"]),
    ("py", &["padding-top", "padding-bottom"]),
    ("ps", &["padding-inline-start"]),
    ("pe", &["padding-inline-end"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
];

const SCROLL_MARGINS: PropertyTable = &[
    ("scroll-m", &["scroll-margin"]),
    ("scroll-mx", &["scroll-margin-inline"]),
    ("scroll-my", &["scroll-margin-block"]),
    ("scroll-ms", &["scroll-margin-inline-start"]),
    ("scroll-me", &["scroll-margin-inline-end"]),
    ("scroll-mt", &["scroll-margin-top"]),
    ("scroll-mr", &["scroll-margin-right"]),
    ("scroll-mb", &["scroll-margin-bottom"]),
    ("scroll-ml", &["scroll-margin-left"]),
];

const SCROLL_PADDINGS: PropertyTable = &[
    ("scroll-p", &["scroll-padding"]),
    ("scroll-px", &["scroll-padding-inline"]),
    ("scroll-py", &["scroll-padding-block"]),
    ("scroll-ps", &["scroll-padding-inline-start"]),
    ("scroll-pe", &["scroll-padding-inline-end"]),
    ("scroll-pt", &["scroll-padding-top"]),
    ("scroll-pr", &["scroll-padding-right"]),
    ("scroll-pb", &["scroll-padding-bottom"]),
    ("scroll-pl", &["scroll-padding-left"]),
];

const RADII: PropertyTable = &[
    ("rounded", &["border-radius"]),
    ("rounded-s", &["border-start-start-radius", "border-end-start-radius"]),
    ("rounded-e", &["border-start-end-radius", "border-end-end-radius"]),
    ("rounded-t", &["border-top-left-radius", "border-top-right-radius"]),
    ("rounded-r", &["border-top-right-radius", "border-bottom-right-radius"]),
    ("rounded-b", &["border-bottom-right-radius", "border-bottom-left-radius"]),
    ("rounded-l", &["border-top-left-radius", "border-bottom-left-radius"]),
    ("rounded-ss", &["border-start-start-radius"]),
    ("rounded-se", &["border-start-end-radius"]),
    ("rounded-ee", &["border-end-end-radius"]),
    ("rounded-es", &["border-end-start-radius"]),
    ("rounded-tl", &["border-top-left-radius"]),
    ("rounded-tr", &["border-top-right-radius"]),
    ("rounded-br", &["border-bottom-right-radius"]),
    ("rounded-bl", &["border-bottom-left-radius"]),
];

const BORDER_WIDTHS: PropertyTable = &[
    ("border", &["border-width"]),
    ("border-x", &["border-left-width", "border-right-width"]),
    ("border-y", &["border-top-width", "border-bottom-width"]),
    ("border-s", &["border-inline-start-width"]),
    ("border-e", &["border-inline-end-width"]),
    ("border-t", &["border-top-width"]),
    ("border-r", &["border-right-width"]),
    ("border-b", &["border-bottom-width"]),
    ("border-l", &["border-left-width"]),
];

const BORDER_COLORS: PropertyTable = &[
    ("border", &["border-color"]),
    ("border-x", &["border-left-color", "border-right-color"]),
    ("border-y", &["border-top-color", "border-bottom-color"]),
    ("border-s", &["border-inline-start-color"]),
    ("border-e", &["border-inline-end-color"]),
    ("border-t", &["border-top-color"]),
    ("border-r", &["border-right-color"]),
    ("border-b", &["border-bottom-color"]),
    ("border-l", &["border-left-color"]),
];

const WIDTH_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("svw", "100svw"),
    ("lvw", "100lvw"),
    ("dvw", "100dvw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("px", "1px"),
];

const MAX_WIDTH_KEYWORDS: &[(&str, &str)] = &[
    ("none", "none"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("px", "1px"),
];

const HEIGHT_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("svh", "100svh"),
    ("lvh", "100lvh"),
    ("dvh", "100dvh"),
    ("lh", "1lh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("px", "1px"),
];

const MAX_HEIGHT_KEYWORDS: &[(&str, &str)] = &[
    ("none", "none"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("lh", "1lh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("px", "1px"),
];

const SIZE_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("px", "1px"),
];

const TRANSFORM_CHAIN: &str = "var(--tw-rotate-x,) var(--tw-rotate-y,) var(--tw-rotate-z,) var(--tw-skew-x,) var(--tw-skew-y,)";

const FILTER_CHAIN: &str = "var(--tw-blur,) var(--tw-brightness,) var(--tw-contrast,) var(--tw-grayscale,) var(--tw-hue-rotate,) var(--tw-invert,) var(--tw-saturate,) var(--tw-sepia,) var(--tw-drop-shadow,)";

const BACKDROP_CHAIN: &str = "var(--tw-backdrop-blur,) var(--tw-backdrop-brightness,) var(--tw-backdrop-contrast,) var(--tw-backdrop-grayscale,) var(--tw-backdrop-hue-rotate,) var(--tw-backdrop-invert,) var(--tw-backdrop-opacity,) var(--tw-backdrop-saturate,) var(--tw-backdrop-sepia,)";

const SHADOW_CHAIN: &str = "var(--tw-inset-shadow), var(--tw-inset-ring-shadow), var(--tw-ring-offset-shadow), var(--tw-ring-shadow), var(--tw-shadow)";

const NUMERIC_CHAIN: &str = "var(--tw-ordinal,) var(--tw-slashed-zero,) var(--tw-numeric-figure,) var(--tw-numeric-spacing,) var(--tw-numeric-fraction,)";

const CONTAIN_CHAIN: &str = "var(--tw-contain-size,) var(--tw-contain-layout,) var(--tw-contain-paint,) var(--tw-contain-style,)";

const GRADIENT_STOPS: &str = "var(--tw-gradient-via-stops, var(--tw-gradient-position), var(--tw-gradient-from) var(--tw-gradient-from-position), var(--tw-gradient-to) var(--tw-gradient-to-position))";

const GRADIENT_VIA_STOPS: &str = "var(--tw-gradient-position), var(--tw-gradient-from) var(--tw-gradient-from-position), var(--tw-gradient-via) var(--tw-gradient-via-position), var(--tw-gradient-to) var(--tw-gradient-to-position)";

const DEFAULT_TRANSITION: &str = "color, background-color, border-color, outline-color, text-decoration-color, fill, stroke, --tw-gradient-from, --tw-gradient-via, --tw-gradient-to, opacity, box-shadow, transform, translate, scale, rotate, filter, -webkit-backdrop-filter, backdrop-filter";

const COLOR_TRANSITION: &str = "color, background-color, border-color, outline-color, text-decoration-color, fill, stroke, --tw-gradient-from, --tw-gradient-via, --tw-gradient-to";

const CURSORS: &[&str] = &[
    "auto", "default", "pointer", "wait", "text", "move", "help", "not-allowed", "none",
    "context-menu", "progress", "cell", "crosshair", "vertical-text", "alias", "copy", "no-drop",
    "grab", "grabbing", "all-scroll", "col-resize", "row-resize", "n-resize", "e-resize",
    "s-resize", "w-resize", "ne-resize", "nw-resize", "se-resize", "sw-resize", "ew-resize",
    "ns-resize", "nesw-resize", "nwse-resize", "zoom-in", "zoom-out",
];

const FONT_SIZE_TYPES: &[DataType] = &[
    DataType::Length,
    DataType::Percentage,
    DataType::AbsoluteSize,
    DataType::RelativeSize,
];

/// Builds the default utility registry.
pub fn utilities() -> Utilities {
    let mut utilities = Utilities::new();
    layout(&mut utilities);
    placement(&mut utilities);
    sizing(&mut utilities);
    flex_and_table(&mut utilities);
    transforms(&mut utilities);
    interactivity(&mut utilities);
    grid(&mut utilities);
    alignment(&mut utilities);
    overflow_and_text_flow(&mut utilities);
    borders(&mut utilities);
    backgrounds(&mut utilities);
    svg_and_objects(&mut utilities);
    padding(&mut utilities);
    typography(&mut utilities);
    effects(&mut utilities);
    filters(&mut utilities);
    transitions(&mut utilities);
    misc(&mut utilities);
    utilities
}

/// Sets every property in `properties` to the resolved value.
fn set_all(properties: &'static [&'static str]) -> impl Fn(&str) -> Vec<AstNode> + Send + Sync + 'static {
    move |value| {
        properties
            .iter()
            .map(|property| AstNode::decl(*property, value))
            .collect()
    }
}

/// Registers `prefix-suffix` static utilities setting `property`.
fn static_family(utilities: &mut Utilities, prefix: &str, property: &str, values: &[(&str, &str)]) {
    for (suffix, value) in values {
        let name = if prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}-{}", prefix, suffix)
        };
        utilities.static_decls(&name, &[(property, value)]);
    }
}

fn properties(names: &[(&str, Option<&str>, Option<&str>)]) -> Vec<AstNode> {
    names
        .iter()
        .map(|(name, initial, syntax)| property(name, *initial, *syntax))
        .collect()
}

fn layout(utilities: &mut Utilities) {
    utilities.static_decls(
        "sr-only",
        &[
            ("position", "absolute"),
            ("width", "1px"),
            ("height", "1px"),
            ("padding", "0"),
            ("margin", "-1px"),
            ("overflow", "hidden"),
            ("clip", "rect(0, 0, 0, 0)"),
            ("white-space", "nowrap"),
            ("border-width", "0"),
        ],
    );
    utilities.static_decls(
        "not-sr-only",
        &[
            ("position", "static"),
            ("width", "auto"),
            ("height", "auto"),
            ("padding", "0"),
            ("margin", "0"),
            ("overflow", "visible"),
            ("clip", "auto"),
            ("white-space", "normal"),
        ],
    );
    static_family(utilities, "pointer-events", "pointer-events", &[("none", "none"), ("auto", "auto")]);
    static_family(
        utilities,
        "",
        "visibility",
        &[("visible", "visible"), ("invisible", "hidden"), ("collapse", "collapse")],
    );
    for position in ["static", "fixed", "absolute", "relative", "sticky"] {
        utilities.static_decls(position, &[("position", position)]);
    }
}

fn placement(utilities: &mut Utilities) {
    for (name, properties) in INSETS {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--inset", "--spacing"],
                keywords: &[("auto", "auto"), ("full", "100%"), ("px", "1px")],
                bare: Some(spacing_bare),
                supports_negative: true,
                supports_fractions: true,
                ..Default::default()
            },
            set_all(properties),
        );
    }

    utilities.static_decls("isolate", &[("isolation", "isolate")]);
    utilities.static_decls("isolation-auto", &[("isolation", "auto")]);

    utilities.functional_utility(
        "z",
        FunctionalOptions {
            theme_keys: &["--z-index"],
            keywords: &[("auto", "auto")],
            bare: Some(integer_bare),
            supports_negative: true,
            ..Default::default()
        },
        set_all(&["z-index"]),
    );
    utilities.functional_utility(
        "order",
        FunctionalOptions {
            theme_keys: &["--order"],
            keywords: &[("first", "calc(-infinity)"), ("last", "calc(infinity)"), ("none", "0")],
            bare: Some(integer_bare),
            supports_negative: true,
            ..Default::default()
        },
        set_all(&["order"]),
    );

    for (axis, property) in [("col", "grid-column"), ("row", "grid-row")] {
        utilities.static_decls(&format!("{}-auto", axis), &[(property, "auto")]);
        utilities.functional_utility(
            axis,
            FunctionalOptions {
                theme_keys: if axis == "col" { &["--grid-column"] } else { &["--grid-row"] },
                bare: Some(integer_bare),
                ..Default::default()
            },
            move |value| decls(&[(property, value)]),
        );
        utilities.static_decls(&format!("{}-span-full", axis), &[(property, "1 / -1")]);
        utilities.functional_utility(
            &format!("{}-span", axis),
            FunctionalOptions {
                bare: Some(integer_bare),
                ..Default::default()
            },
            move |value| vec![AstNode::decl(property, format!("span {} / span {}", value, value))],
        );
        for (edge, longhand) in [("start", "-start"), ("end", "-end")] {
            let longhand = format!("{}{}", property, longhand);
            utilities.functional_utility(
                &format!("{}-{}", axis, edge),
                FunctionalOptions {
                    keywords: &[("auto", "auto")],
                    bare: Some(integer_bare),
                    supports_negative: true,
                    ..Default::default()
                },
                move |value| vec![AstNode::decl(longhand.as_str(), value)],
            );
        }
    }

    static_family(
        utilities,
        "float",
        "float",
        &[
            ("start", "inline-start"),
            ("end", "inline-end"),
            ("right", "right"),
            ("left", "left"),
            ("none", "none"),
        ],
    );
    static_family(
        utilities,
        "clear",
        "clear",
        &[
            ("start", "inline-start"),
            ("end", "inline-end"),
            ("right", "right"),
            ("left", "left"),
            ("both", "both"),
            ("none", "none"),
        ],
    );

    for (name, properties) in MARGINS {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--margin", "--spacing"],
                keywords: &[("auto", "auto"), ("px", "1px")],
                bare: Some(spacing_bare),
                supports_negative: true,
                ..Default::default()
            },
            set_all(properties),
        );
    }
}

fn sizing(utilities: &mut Utilities) {
    static_family(utilities, "box", "box-sizing", &[("border", "border-box"), ("content", "content-box")]);

    utilities.static_decls(
        "line-clamp-none",
        &[
            ("overflow", "visible"),
            ("display", "block"),
            ("-webkit-box-orient", "horizontal"),
            ("-webkit-line-clamp", "unset"),
        ],
    );
    utilities.functional_utility(
        "line-clamp",
        FunctionalOptions {
            theme_keys: &["--line-clamp"],
            bare: Some(integer_bare),
            ..Default::default()
        },
        |value| {
            decls(&[
                ("overflow", "hidden"),
                ("display", "-webkit-box"),
                ("-webkit-box-orient", "vertical"),
                ("-webkit-line-clamp", value),
            ])
        },
    );

    for display in [
        "block",
        "inline-block",
        "inline",
        "flex",
        "inline-flex",
        "table",
        "inline-table",
        "table-caption",
        "table-cell",
        "table-column",
        "table-column-group",
        "table-footer-group",
        "table-header-group",
        "table-row-group",
        "table-row",
        "flow-root",
        "grid",
        "inline-grid",
        "contents",
        "list-item",
    ] {
        utilities.static_decls(display, &[("display", display)]);
    }
    utilities.static_decls("hidden", &[("display", "none")]);

    utilities.functional(
        "aspect",
        compile_fn(|candidate, theme| {
            if candidate.negative() {
                return None;
            }
            let value = match candidate.value()? {
                CandidateValue::Arbitrary { value, data_type } => {
                    if !accepts_arbitrary(value, data_type.as_deref(), &[DataType::Ratio]) {
                        return None;
                    }
                    value.clone()
                }
                CandidateValue::Named {
                    fraction: Some(fraction),
                    ..
                } => {
                    if !is_fraction(fraction) {
                        return None;
                    }
                    fraction.clone()
                }
                CandidateValue::Named { value, .. } => match value.as_str() {
                    "auto" => "auto".to_string(),
                    "square" => "1 / 1".to_string(),
                    other => theme
                        .resolve(Some(other), &["--aspect"])
                        .or_else(|| (other == "video").then(|| "16 / 9".to_string()))?,
                },
            };
            Some(decls(&[("aspect-ratio", value.as_str())]))
        }),
    );

    let sizes: [(&str, &'static [&'static str], &'static [&'static str], &'static [(&'static str, &'static str)]); 7] = [
        ("size", &["width", "height"], &["--size", "--spacing"], SIZE_KEYWORDS),
        ("w", &["width"], &["--width", "--spacing", "--container"], WIDTH_KEYWORDS),
        ("min-w", &["min-width"], &["--min-width", "--spacing", "--container"], WIDTH_KEYWORDS),
        ("max-w", &["max-width"], &["--max-width", "--spacing", "--container"], MAX_WIDTH_KEYWORDS),
        ("h", &["height"], &["--height", "--spacing"], HEIGHT_KEYWORDS),
        ("min-h", &["min-height"], &["--min-height", "--spacing"], HEIGHT_KEYWORDS),
        ("max-h", &["max-height"], &["--max-height", "--spacing"], MAX_HEIGHT_KEYWORDS),
    ];
    for (name, properties, theme_keys, keywords) in sizes {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys,
                keywords,
                bare: Some(spacing_bare),
                supports_fractions: true,
                ..Default::default()
            },
            set_all(properties),
        );
    }
}

fn flex_and_table(utilities: &mut Utilities) {
    utilities.functional_utility(
        "flex",
        FunctionalOptions {
            keywords: &[("auto", "auto"), ("initial", "0 auto"), ("none", "none")],
            bare: Some(integer_bare),
            supports_fractions: true,
            ..Default::default()
        },
        set_all(&["flex"]),
    );
    for (name, property) in [("shrink", "flex-shrink"), ("grow", "flex-grow")] {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                default_value: Some("1"),
                bare: Some(integer_bare),
                ..Default::default()
            },
            move |value| decls(&[(property, value)]),
        );
    }
    utilities.functional_utility(
        "basis",
        FunctionalOptions {
            theme_keys: &["--flex-basis", "--spacing", "--container"],
            keywords: &[("auto", "auto"), ("full", "100%"), ("px", "1px")],
            bare: Some(spacing_bare),
            supports_fractions: true,
            ..Default::default()
        },
        set_all(&["flex-basis"]),
    );

    static_family(utilities, "table", "table-layout", &[("auto", "auto"), ("fixed", "fixed")]);
    static_family(utilities, "caption", "caption-side", &[("top", "top"), ("bottom", "bottom")]);
    static_family(
        utilities,
        "border",
        "border-collapse",
        &[("collapse", "collapse"), ("separate", "separate")],
    );

    for (name, axes) in [
        ("border-spacing", &["x", "y"][..]),
        ("border-spacing-x", &["x"][..]),
        ("border-spacing-y", &["y"][..]),
    ] {
        let axes: Vec<&'static str> = axes.to_vec();
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--border-spacing", "--spacing"],
                keywords: &[("px", "1px")],
                bare: Some(spacing_bare),
                ..Default::default()
            },
            move |value| {
                let mut nodes: Vec<AstNode> = axes
                    .iter()
                    .map(|axis| AstNode::decl(format!("--tw-border-spacing-{}", axis), value))
                    .collect();
                nodes.push(AstNode::decl(
                    "border-spacing",
                    "var(--tw-border-spacing-x) var(--tw-border-spacing-y)",
                ));
                nodes.extend(properties(&[
                    ("--tw-border-spacing-x", Some("0"), Some("\"<length>\"")),
                    ("--tw-border-spacing-y", Some("0"), Some("\"<length>\"")),
                ]));
                nodes
            },
        );
    }
}

fn transforms(utilities: &mut Utilities) {
    utilities.functional_utility(
        "origin",
        FunctionalOptions {
            theme_keys: &["--transform-origin"],
            keywords: &[
                ("center", "center"),
                ("top", "top"),
                ("top-right", "top right"),
                ("right", "right"),
                ("bottom-right", "bottom right"),
                ("bottom", "bottom"),
                ("bottom-left", "bottom left"),
                ("left", "left"),
                ("top-left", "top left"),
            ],
            ..Default::default()
        },
        set_all(&["transform-origin"]),
    );

    let translate_properties = || {
        properties(&[
            ("--tw-translate-x", Some("0"), None),
            ("--tw-translate-y", Some("0"), None),
            ("--tw-translate-z", Some("0"), None),
        ])
    };
    utilities.static_decls("translate-none", &[("translate", "none")]);
    for (name, axes) in [
        ("translate", &["x", "y"][..]),
        ("translate-x", &["x"][..]),
        ("translate-y", &["y"][..]),
    ] {
        let axes: Vec<&'static str> = axes.to_vec();
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--translate", "--spacing"],
                keywords: &[("full", "100%"), ("px", "1px")],
                bare: Some(spacing_bare),
                supports_negative: true,
                supports_fractions: true,
                ..Default::default()
            },
            move |value| {
                let mut nodes: Vec<AstNode> = axes
                    .iter()
                    .map(|axis| AstNode::decl(format!("--tw-translate-{}", axis), value))
                    .collect();
                nodes.push(AstNode::decl(
                    "translate",
                    "var(--tw-translate-x) var(--tw-translate-y)",
                ));
                nodes.extend(translate_properties());
                nodes
            },
        );
    }

    utilities.static_decls("scale-none", &[("scale", "none")]);
    for (name, axes) in [
        ("scale", &["x", "y", "z"][..]),
        ("scale-x", &["x"][..]),
        ("scale-y", &["y"][..]),
    ] {
        let axes: Vec<&'static str> = axes.to_vec();
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--scale"],
                bare: Some(percent_bare),
                supports_negative: true,
                ..Default::default()
            },
            move |value| {
                let mut nodes: Vec<AstNode> = axes
                    .iter()
                    .map(|axis| AstNode::decl(format!("--tw-scale-{}", axis), value))
                    .collect();
                nodes.push(AstNode::decl("scale", "var(--tw-scale-x) var(--tw-scale-y)"));
                nodes.extend(properties(&[
                    ("--tw-scale-x", Some("1"), None),
                    ("--tw-scale-y", Some("1"), None),
                    ("--tw-scale-z", Some("1"), None),
                ]));
                nodes
            },
        );
    }

    utilities.static_decls("rotate-none", &[("rotate", "none")]);
    utilities.functional_utility(
        "rotate",
        FunctionalOptions {
            theme_keys: &["--rotate"],
            bare: Some(degrees_bare),
            supports_negative: true,
            ..Default::default()
        },
        set_all(&["rotate"]),
    );

    let transform_properties = || {
        properties(&[
            ("--tw-rotate-x", None, None),
            ("--tw-rotate-y", None, None),
            ("--tw-rotate-z", None, None),
            ("--tw-skew-x", None, None),
            ("--tw-skew-y", None, None),
        ])
    };
    for (name, axes) in [
        ("skew", &["x", "y"][..]),
        ("skew-x", &["x"][..]),
        ("skew-y", &["y"][..]),
    ] {
        let axes: Vec<&'static str> = axes.to_vec();
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--skew"],
                bare: Some(degrees_bare),
                supports_negative: true,
                ..Default::default()
            },
            move |value| {
                let mut nodes: Vec<AstNode> = axes
                    .iter()
                    .map(|axis| {
                        AstNode::decl(
                            format!("--tw-skew-{}", axis),
                            format!("skew{}({})", axis.to_ascii_uppercase(), value),
                        )
                    })
                    .collect();
                nodes.push(AstNode::decl("transform", TRANSFORM_CHAIN));
                nodes.extend(transform_properties());
                nodes
            },
        );
    }

    let mut transform = decls(&[("transform", TRANSFORM_CHAIN)]);
    transform.extend(transform_properties());
    utilities.static_nodes("transform", transform);
    let mut gpu = vec![AstNode::decl("transform", format!("translateZ(0) {}", TRANSFORM_CHAIN))];
    gpu.extend(transform_properties());
    utilities.static_nodes("transform-gpu", gpu);
    let mut cpu = decls(&[("transform", TRANSFORM_CHAIN)]);
    cpu.extend(transform_properties());
    utilities.static_nodes("transform-cpu", cpu);
    utilities.static_decls("transform-none", &[("transform", "none")]);
}

fn cursor_bare(_: &Theme, value: &str) -> Option<String> {
    CURSORS.contains(&value).then(|| value.to_string())
}

fn interactivity(utilities: &mut Utilities) {
    utilities.functional_utility(
        "cursor",
        FunctionalOptions {
            theme_keys: &["--cursor"],
            bare: Some(cursor_bare),
            ..Default::default()
        },
        set_all(&["cursor"]),
    );

    static_family(
        utilities,
        "touch",
        "touch-action",
        &[
            ("auto", "auto"),
            ("none", "none"),
            ("manipulation", "manipulation"),
            ("pan-x", "pan-x"),
            ("pan-left", "pan-left"),
            ("pan-right", "pan-right"),
            ("pan-y", "pan-y"),
            ("pan-up", "pan-up"),
            ("pan-down", "pan-down"),
            ("pinch-zoom", "pinch-zoom"),
        ],
    );
    for value in ["none", "text", "all", "auto"] {
        utilities.static_decls(
            &format!("select-{}", value),
            &[("-webkit-user-select", value), ("user-select", value)],
        );
    }
    static_family(
        utilities,
        "",
        "resize",
        &[
            ("resize-none", "none"),
            ("resize", "both"),
            ("resize-x", "horizontal"),
            ("resize-y", "vertical"),
        ],
    );

    utilities.static_decls("snap-none", &[("scroll-snap-type", "none")]);
    for (name, axis) in [("snap-x", "x"), ("snap-y", "y"), ("snap-both", "both")] {
        let mut nodes = vec![AstNode::decl(
            "scroll-snap-type",
            format!("{} var(--tw-scroll-snap-strictness)", axis),
        )];
        nodes.push(property("--tw-scroll-snap-strictness", Some("proximity"), None));
        utilities.static_nodes(name, nodes);
    }
    for strictness in ["mandatory", "proximity"] {
        let nodes = vec![
            AstNode::decl("--tw-scroll-snap-strictness", strictness),
            property("--tw-scroll-snap-strictness", Some("proximity"), None),
        ];
        utilities.static_nodes(&format!("snap-{}", strictness), nodes);
    }
    static_family(
        utilities,
        "snap",
        "scroll-snap-align",
        &[("align-none", "none"), ("start", "start"), ("end", "end"), ("center", "center")],
    );
    static_family(utilities, "snap", "scroll-snap-stop", &[("normal", "normal"), ("always", "always")]);

    for (name, properties) in SCROLL_MARGINS {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--scroll-margin", "--spacing"],
                keywords: &[("px", "1px")],
                bare: Some(spacing_bare),
                supports_negative: true,
                ..Default::default()
            },
            set_all(properties),
        );
    }
    for (name, properties) in SCROLL_PADDINGS {
        utilities.spacing_utility(name, &["--scroll-padding", "--spacing"], false, set_all(properties));
    }

    static_family(utilities, "list", "list-style-position", &[("inside", "inside"), ("outside", "outside")]);
    utilities.functional_utility(
        "list",
        FunctionalOptions {
            theme_keys: &["--list-style-type"],
            keywords: &[("none", "none"), ("disc", "disc"), ("decimal", "decimal")],
            ..Default::default()
        },
        set_all(&["list-style-type"]),
    );
    utilities.functional_utility(
        "list-image",
        FunctionalOptions {
            theme_keys: &["--list-style-image"],
            keywords: &[("none", "none")],
            ..Default::default()
        },
        set_all(&["list-style-image"]),
    );

    static_family(utilities, "appearance", "appearance", &[("none", "none"), ("auto", "auto")]);

    utilities.functional_utility(
        "columns",
        FunctionalOptions {
            theme_keys: &["--columns", "--container"],
            keywords: &[("auto", "auto")],
            bare: Some(integer_bare),
            ..Default::default()
        },
        set_all(&["columns"]),
    );
}

fn grid_template_bare(_: &Theme, value: &str) -> Option<String> {
    let count: u32 = value.parse().ok()?;
    (count > 0).then(|| format!("repeat({}, minmax(0, 1fr))", count))
}

fn grid(utilities: &mut Utilities) {
    static_family(
        utilities,
        "grid-flow",
        "grid-auto-flow",
        &[
            ("row", "row"),
            ("col", "column"),
            ("dense", "dense"),
            ("row-dense", "row dense"),
            ("col-dense", "column dense"),
        ],
    );
    let auto_tracks: [(&str, &'static str, &'static [&'static str]); 2] = [
        ("auto-cols", "grid-auto-columns", &["--grid-auto-columns"]),
        ("auto-rows", "grid-auto-rows", &["--grid-auto-rows"]),
    ];
    for (name, property, theme_keys) in auto_tracks {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys,
                keywords: &[
                    ("auto", "auto"),
                    ("min", "min-content"),
                    ("max", "max-content"),
                    ("fr", "minmax(0, 1fr)"),
                ],
                ..Default::default()
            },
            move |value| decls(&[(property, value)]),
        );
    }
    let templates: [(&str, &'static str, &'static [&'static str]); 2] = [
        ("grid-cols", "grid-template-columns", &["--grid-template-columns"]),
        ("grid-rows", "grid-template-rows", &["--grid-template-rows"]),
    ];
    for (name, property, theme_keys) in templates {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys,
                keywords: &[("none", "none"), ("subgrid", "subgrid")],
                bare: Some(grid_template_bare),
                ..Default::default()
            },
            move |value| decls(&[(property, value)]),
        );
    }
}

fn alignment(utilities: &mut Utilities) {
    static_family(
        utilities,
        "flex",
        "flex-direction",
        &[
            ("row", "row"),
            ("row-reverse", "row-reverse"),
            ("col", "column"),
            ("col-reverse", "column-reverse"),
        ],
    );
    static_family(
        utilities,
        "flex",
        "flex-wrap",
        &[("wrap", "wrap"), ("wrap-reverse", "wrap-reverse"), ("nowrap", "nowrap")],
    );

    static_family(
        utilities,
        "place-content",
        "place-content",
        &[
            ("center", "center"),
            ("start", "start"),
            ("end", "end"),
            ("between", "space-between"),
            ("around", "space-around"),
            ("evenly", "space-evenly"),
            ("baseline", "baseline"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "place-items",
        "place-items",
        &[
            ("start", "start"),
            ("end", "end"),
            ("center", "center"),
            ("baseline", "baseline"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "content",
        "align-content",
        &[
            ("normal", "normal"),
            ("center", "center"),
            ("start", "flex-start"),
            ("end", "flex-end"),
            ("between", "space-between"),
            ("around", "space-around"),
            ("evenly", "space-evenly"),
            ("baseline", "baseline"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "items",
        "align-items",
        &[
            ("start", "flex-start"),
            ("end", "flex-end"),
            ("center", "center"),
            ("baseline", "baseline"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "justify",
        "justify-content",
        &[
            ("normal", "normal"),
            ("start", "flex-start"),
            ("end", "flex-end"),
            ("center", "center"),
            ("between", "space-between"),
            ("around", "space-around"),
            ("evenly", "space-evenly"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "justify-items",
        "justify-items",
        &[
            ("normal", "normal"),
            ("start", "start"),
            ("end", "end"),
            ("center", "center"),
            ("stretch", "stretch"),
        ],
    );

    for (name, properties) in [
        ("gap", &["gap"][..]),
        ("gap-x", &["column-gap"][..]),
        ("gap-y", &["row-gap"][..]),
    ] {
        let properties: Vec<&'static str> = properties.to_vec();
        utilities.spacing_utility(name, &["--gap", "--spacing"], false, move |value| {
            properties
                .iter()
                .map(|property| AstNode::decl(*property, value))
                .collect()
        });
    }

    for (axis, start, end) in [
        ("x", "margin-inline-start", "margin-inline-end"),
        ("y", "margin-block-start", "margin-block-end"),
    ] {
        let reverse = format!("--tw-space-{}-reverse", axis);
        let handle_reverse = reverse.clone();
        utilities.spacing_utility(
            &format!("space-{}", axis),
            &["--space", "--spacing"],
            true,
            move |value| {
                vec![
                    AstNode::rule(
                        ":where(& > :not(:last-child))",
                        vec![
                            AstNode::decl(handle_reverse.as_str(), "0"),
                            AstNode::decl(start, format!("calc({} * var({}))", value, handle_reverse)),
                            AstNode::decl(
                                end,
                                format!("calc({} * calc(1 - var({})))", value, handle_reverse),
                            ),
                        ],
                    ),
                    property(&handle_reverse, Some("0"), None),
                ]
            },
        );
        utilities.static_nodes(
            &format!("space-{}-reverse", axis),
            vec![
                AstNode::rule(
                    ":where(& > :not(:last-child))",
                    vec![AstNode::decl(reverse.as_str(), "1")],
                ),
                property(&reverse, Some("0"), None),
            ],
        );
    }

    static_family(
        utilities,
        "place-self",
        "place-self",
        &[
            ("auto", "auto"),
            ("start", "start"),
            ("end", "end"),
            ("center", "center"),
            ("stretch", "stretch"),
        ],
    );
    static_family(
        utilities,
        "self",
        "align-self",
        &[
            ("auto", "auto"),
            ("start", "flex-start"),
            ("end", "flex-end"),
            ("center", "center"),
            ("stretch", "stretch"),
            ("baseline", "baseline"),
        ],
    );
    static_family(
        utilities,
        "justify-self",
        "justify-self",
        &[
            ("auto", "auto"),
            ("start", "start"),
            ("end", "end"),
            ("center", "center"),
            ("stretch", "stretch"),
        ],
    );
}

fn overflow_and_text_flow(utilities: &mut Utilities) {
    for (prefix, property) in [
        ("overflow", "overflow"),
        ("overflow-x", "overflow-x"),
        ("overflow-y", "overflow-y"),
    ] {
        static_family(
            utilities,
            prefix,
            property,
            &[
                ("auto", "auto"),
                ("hidden", "hidden"),
                ("clip", "clip"),
                ("visible", "visible"),
                ("scroll", "scroll"),
            ],
        );
    }
    for (prefix, property) in [
        ("overscroll", "overscroll-behavior"),
        ("overscroll-x", "overscroll-behavior-x"),
        ("overscroll-y", "overscroll-behavior-y"),
    ] {
        static_family(
            utilities,
            prefix,
            property,
            &[("auto", "auto"), ("contain", "contain"), ("none", "none")],
        );
    }
    static_family(utilities, "scroll", "scroll-behavior", &[("auto", "auto"), ("smooth", "smooth")]);

    utilities.static_decls(
        "truncate",
        &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
    );
    static_family(utilities, "text", "text-overflow", &[("ellipsis", "ellipsis"), ("clip", "clip")]);
    static_family(
        utilities,
        "whitespace",
        "white-space",
        &[
            ("normal", "normal"),
            ("nowrap", "nowrap"),
            ("pre", "pre"),
            ("pre-line", "pre-line"),
            ("pre-wrap", "pre-wrap"),
            ("break-spaces", "break-spaces"),
        ],
    );
    static_family(
        utilities,
        "text",
        "text-wrap",
        &[
            ("wrap", "wrap"),
            ("nowrap", "nowrap"),
            ("balance", "balance"),
            ("pretty", "pretty"),
        ],
    );
    utilities.static_decls("break-normal", &[("overflow-wrap", "normal"), ("word-break", "normal")]);
    utilities.static_decls("break-words", &[("overflow-wrap", "break-word")]);
    utilities.static_decls("break-all", &[("word-break", "break-all")]);
    utilities.static_decls("break-keep", &[("word-break", "keep-all")]);
}

fn borders(utilities: &mut Utilities) {
    for (name, properties) in RADII {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--radius"],
                keywords: &[("none", "0"), ("full", "calc(infinity * 1px)")],
                default_key: Some("--radius"),
                default_value: Some("0.25rem"),
                ..Default::default()
            },
            set_all(properties),
        );
    }

    for style in ["solid", "dashed", "dotted", "double", "hidden", "none"] {
        utilities.static_nodes(
            &format!("border-{}", style),
            vec![
                AstNode::decl("--tw-border-style", style),
                AstNode::decl("border-style", style),
                property("--tw-border-style", Some("solid"), None),
            ],
        );
    }

    for (name, properties) in BORDER_WIDTHS {
        utilities.functional_utility(
            name,
            FunctionalOptions {
                theme_keys: &["--border-width"],
                default_key: Some("--default-border-width"),
                default_value: Some("1px"),
                bare: Some(px_bare),
                types: &[DataType::LineWidth, DataType::Length],
                ..Default::default()
            },
            move |value| {
                let mut nodes = vec![AstNode::decl("border-style", "var(--tw-border-style)")];
                nodes.extend(properties.iter().map(|property| AstNode::decl(*property, value)));
                nodes.push(property("--tw-border-style", Some("solid"), None));
                nodes
            },
        );
    }
    for (name, properties) in BORDER_COLORS {
        utilities.color_utility(name, &["--border-color", "--color"], set_all(properties));
    }
}

fn gradient_direction(theme: &Theme, value: &str) -> Option<String> {
    let direction = match value {
        "to-t" => "to top",
        "to-tr" => "to top right",
        "to-r" => "to right",
        "to-br" => "to bottom right",
        "to-b" => "to bottom",
        "to-bl" => "to bottom left",
        "to-l" => "to left",
        "to-tl" => "to top left",
        angle => return degrees_bare(theme, angle).map(|deg| format!("{} in oklab", deg)),
    };
    Some(format!("{} in oklab", direction))
}

fn gradient_properties() -> Vec<AstNode> {
    properties(&[
        ("--tw-gradient-position", None, None),
        ("--tw-gradient-from", Some("#0000"), Some("\"<color>\"")),
        ("--tw-gradient-via", Some("#0000"), Some("\"<color>\"")),
        ("--tw-gradient-to", Some("#0000"), Some("\"<color>\"")),
        ("--tw-gradient-stops", None, None),
        ("--tw-gradient-via-stops", None, None),
        ("--tw-gradient-from-position", Some("0%"), Some("\"<length-percentage>\"")),
        ("--tw-gradient-via-position", Some("50%"), Some("\"<length-percentage>\"")),
        ("--tw-gradient-to-position", Some("100%"), Some("\"<length-percentage>\"")),
    ])
}

/// A gradient stop position such as the `10%` in `from-10%`.
fn stop_position_bare(_: &Theme, value: &str) -> Option<String> {
    let number = value.strip_suffix('%')?;
    number.parse::<f64>().ok().map(|_| value.to_string())
}

fn backgrounds(utilities: &mut Utilities) {
    utilities.color_utility("bg", &["--background-color", "--color"], set_all(&["background-color"]));

    utilities.static_decls("bg-none", &[("background-image", "none")]);
    utilities.functional(
        "bg",
        compile_fn(|candidate, _| {
            if candidate.negative() || candidate.modifier().is_some() {
                return None;
            }
            let CandidateValue::Arbitrary { value, data_type } = candidate.value()? else {
                return None;
            };
            let property = match data_type.as_deref() {
                Some("image" | "url") => "background-image",
                Some("position") => "background-position",
                Some("size" | "bg-size" | "length" | "percentage") => "background-size",
                Some(_) => return None,
                None => match infer_data_type(
                    value,
                    &[DataType::Image, DataType::Position, DataType::BgSize],
                )? {
                    DataType::Image => "background-image",
                    DataType::Position => "background-position",
                    _ => "background-size",
                },
            };
            Some(decls(&[(property, value.as_str())]))
        }),
    );

    for root in ["bg-linear", "bg-gradient"] {
        utilities.functional(
            root,
            compile_fn(|candidate, theme| {
                if candidate.negative() || candidate.modifier().is_some() {
                    return None;
                }
                let mut nodes = match candidate.value()? {
                    CandidateValue::Arbitrary { value, .. } => vec![
                        AstNode::decl("--tw-gradient-position", value.as_str()),
                        AstNode::decl(
                            "background-image",
                            format!("linear-gradient(var(--tw-gradient-stops, {}))", value),
                        ),
                    ],
                    CandidateValue::Named { value, fraction: None } => vec![
                        AstNode::decl("--tw-gradient-position", gradient_direction(theme, value)?),
                        AstNode::decl("background-image", "linear-gradient(var(--tw-gradient-stops))"),
                    ],
                    CandidateValue::Named { .. } => return None,
                };
                nodes.extend(gradient_properties());
                Some(nodes)
            }),
        );
    }

    static_family(
        utilities,
        "bg",
        "background-position",
        &[
            ("bottom", "bottom"),
            ("center", "center"),
            ("left", "left"),
            ("left-bottom", "left bottom"),
            ("left-top", "left top"),
            ("right", "right"),
            ("right-bottom", "right bottom"),
            ("right-top", "right top"),
            ("top", "top"),
        ],
    );
    static_family(
        utilities,
        "bg",
        "background-size",
        &[("auto", "auto"), ("cover", "cover"), ("contain", "contain")],
    );
    static_family(
        utilities,
        "bg",
        "background-repeat",
        &[
            ("repeat", "repeat"),
            ("no-repeat", "no-repeat"),
            ("repeat-x", "repeat-x"),
            ("repeat-y", "repeat-y"),
            ("repeat-round", "round"),
            ("repeat-space", "space"),
        ],
    );
    static_family(
        utilities,
        "bg",
        "background-attachment",
        &[("fixed", "fixed"), ("local", "local"), ("scroll", "scroll")],
    );

    for (stop, stops_property, stops_value) in [
        ("from", "--tw-gradient-stops", GRADIENT_STOPS),
        ("via", "--tw-gradient-via-stops", GRADIENT_VIA_STOPS),
        ("to", "--tw-gradient-stops", GRADIENT_STOPS),
    ] {
        let variable = format!("--tw-gradient-{}", stop);
        utilities.color_utility(stop, &["--background-color", "--color"], move |color| {
            let mut nodes = vec![
                AstNode::decl(variable.as_str(), color),
                AstNode::decl(stops_property, stops_value),
            ];
            if stop == "via" {
                nodes.push(AstNode::decl("--tw-gradient-stops", "var(--tw-gradient-via-stops)"));
            }
            nodes.extend(gradient_properties());
            nodes
        });
        let position = format!("--tw-gradient-{}-position", stop);
        utilities.functional_utility(
            stop,
            FunctionalOptions {
                bare: Some(stop_position_bare),
                types: &[DataType::Length, DataType::Percentage],
                ..Default::default()
            },
            move |value| {
                let mut nodes = vec![AstNode::decl(position.as_str(), value)];
                nodes.extend(gradient_properties());
                nodes
            },
        );
    }
}

fn svg_and_objects(utilities: &mut Utilities) {
    utilities.static_decls("fill-none", &[("fill", "none")]);
    utilities.color_utility("fill", &["--fill", "--color"], set_all(&["fill"]));
    utilities.static_decls("stroke-none", &[("stroke", "none")]);
    utilities.color_utility("stroke", &["--stroke", "--color"], set_all(&["stroke"]));
    utilities.functional_utility(
        "stroke",
        FunctionalOptions {
            theme_keys: &["--stroke-width"],
            bare: Some(integer_bare),
            types: &[DataType::Length, DataType::Number, DataType::Percentage],
            ..Default::default()
        },
        set_all(&["stroke-width"]),
    );

    static_family(
        utilities,
        "object",
        "object-fit",
        &[
            ("contain", "contain"),
            ("cover", "cover"),
            ("fill", "fill"),
            ("none", "none"),
            ("scale-down", "scale-down"),
        ],
    );
    static_family(
        utilities,
        "object",
        "object-position",
        &[
            ("bottom", "bottom"),
            ("center", "center"),
            ("left", "left"),
            ("left-bottom", "left bottom"),
            ("left-top", "left top"),
            ("right", "right"),
            ("right-bottom", "right bottom"),
            ("right-top", "right top"),
            ("top", "top"),
        ],
    );
}

fn padding(utilities: &mut Utilities) {
    for (name, properties) in PADDINGS {
        utilities.spacing_utility(name, &["--padding", "--spacing"], false, set_all(properties));
    }
}

fn font_weight_bare(_: &Theme, value: &str) -> Option<String> {
    let weight = match value {
        "thin" => "100",
        "extralight" => "200",
        "light" => "300",
        "normal" => "400",
        "medium" => "500",
        "semibold" => "600",
        "bold" => "700",
        "extrabold" => "800",
        "black" => "900",
        _ => return None,
    };
    Some(weight.to_string())
}

fn line_height(theme: &Theme, modifier: &Modifier) -> Option<String> {
    match modifier {
        Modifier::Named(named) => theme
            .resolve(Some(named), &["--leading"])
            .or_else(|| spacing_bare(theme, named)),
        Modifier::Arbitrary(arbitrary) => Some(arbitrary.clone()),
    }
}

fn typography(utilities: &mut Utilities) {
    static_family(
        utilities,
        "text",
        "text-align",
        &[
            ("left", "left"),
            ("center", "center"),
            ("right", "right"),
            ("justify", "justify"),
            ("start", "start"),
            ("end", "end"),
        ],
    );
    utilities.spacing_utility("indent", &["--text-indent", "--spacing"], true, set_all(&["text-indent"]));
    utilities.functional_utility(
        "align",
        FunctionalOptions {
            keywords: &[
                ("baseline", "baseline"),
                ("top", "top"),
                ("middle", "middle"),
                ("bottom", "bottom"),
                ("text-top", "text-top"),
                ("text-bottom", "text-bottom"),
                ("sub", "sub"),
                ("super", "super"),
            ],
            ..Default::default()
        },
        set_all(&["vertical-align"]),
    );

    utilities.functional_utility(
        "font",
        FunctionalOptions {
            theme_keys: &["--font"],
            types: &[DataType::FamilyName, DataType::GenericName],
            ..Default::default()
        },
        set_all(&["font-family"]),
    );
    utilities.functional_utility(
        "font",
        FunctionalOptions {
            theme_keys: &["--font-weight"],
            bare: Some(font_weight_bare),
            types: &[DataType::Number],
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-font-weight", value), ("font-weight", value)]);
            nodes.push(property("--tw-font-weight", None, None));
            nodes
        },
    );

    utilities.static_decls("normal-nums", &[("font-variant-numeric", "normal")]);
    for (name, variable, value) in [
        ("ordinal", "--tw-ordinal", "ordinal"),
        ("slashed-zero", "--tw-slashed-zero", "slashed-zero"),
        ("lining-nums", "--tw-numeric-figure", "lining-nums"),
        ("oldstyle-nums", "--tw-numeric-figure", "oldstyle-nums"),
        ("proportional-nums", "--tw-numeric-spacing", "proportional-nums"),
        ("tabular-nums", "--tw-numeric-spacing", "tabular-nums"),
        ("diagonal-fractions", "--tw-numeric-fraction", "diagonal-fractions"),
        ("stacked-fractions", "--tw-numeric-fraction", "stacked-fractions"),
    ] {
        let mut nodes = decls(&[(variable, value), ("font-variant-numeric", NUMERIC_CHAIN)]);
        nodes.extend(properties(&[
            ("--tw-ordinal", None, None),
            ("--tw-slashed-zero", None, None),
            ("--tw-numeric-figure", None, None),
            ("--tw-numeric-spacing", None, None),
            ("--tw-numeric-fraction", None, None),
        ]));
        utilities.static_nodes(name, nodes);
    }

    utilities.functional(
        "text",
        compile_fn(|candidate, theme| {
            if candidate.negative() {
                return None;
            }
            let (size, nested) = match candidate.value()? {
                CandidateValue::Arbitrary { value, data_type } => {
                    if !accepts_arbitrary(value, data_type.as_deref(), FONT_SIZE_TYPES) {
                        return None;
                    }
                    (value.clone(), Vec::new())
                }
                CandidateValue::Named { value, .. } => theme.resolve_with(
                    value,
                    &["--text"],
                    &["--line-height", "--letter-spacing", "--font-weight"],
                )?,
            };
            let mut nodes = vec![AstNode::decl("font-size", size)];
            match candidate.modifier() {
                Some(modifier) => {
                    nodes.push(AstNode::decl("line-height", line_height(theme, modifier)?));
                }
                None => {
                    for (suffix, value) in nested {
                        let (property, variable) = match suffix.as_str() {
                            "--line-height" => ("line-height", "--tw-leading"),
                            "--letter-spacing" => ("letter-spacing", "--tw-tracking"),
                            _ => ("font-weight", "--tw-font-weight"),
                        };
                        nodes.push(AstNode::decl(property, format!("var({}, {})", variable, value)));
                    }
                }
            }
            Some(nodes)
        }),
    );
    utilities.color_utility("text", &["--text-color", "--color"], set_all(&["color"]));

    utilities.functional_utility(
        "leading",
        FunctionalOptions {
            theme_keys: &["--leading"],
            keywords: &[("none", "1")],
            bare: Some(spacing_bare),
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-leading", value), ("line-height", value)]);
            nodes.push(property("--tw-leading", None, None));
            nodes
        },
    );
    utilities.functional_utility(
        "tracking",
        FunctionalOptions {
            theme_keys: &["--tracking"],
            supports_negative: true,
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-tracking", value), ("letter-spacing", value)]);
            nodes.push(property("--tw-tracking", None, None));
            nodes
        },
    );

    static_family(
        utilities,
        "",
        "text-transform",
        &[
            ("uppercase", "uppercase"),
            ("lowercase", "lowercase"),
            ("capitalize", "capitalize"),
            ("normal-case", "none"),
        ],
    );
    static_family(utilities, "", "font-style", &[("italic", "italic"), ("not-italic", "normal")]);
    static_family(
        utilities,
        "",
        "text-decoration-line",
        &[
            ("underline", "underline"),
            ("overline", "overline"),
            ("line-through", "line-through"),
            ("no-underline", "none"),
        ],
    );
    static_family(
        utilities,
        "decoration",
        "text-decoration-style",
        &[
            ("solid", "solid"),
            ("double", "double"),
            ("dotted", "dotted"),
            ("dashed", "dashed"),
            ("wavy", "wavy"),
        ],
    );
    utilities.color_utility(
        "decoration",
        &["--text-decoration-color", "--color"],
        set_all(&["text-decoration-color"]),
    );
    utilities.functional_utility(
        "decoration",
        FunctionalOptions {
            keywords: &[("auto", "auto"), ("from-font", "from-font")],
            bare: Some(px_bare),
            types: &[DataType::Length, DataType::Percentage],
            ..Default::default()
        },
        set_all(&["text-decoration-thickness"]),
    );
    utilities.functional_utility(
        "underline-offset",
        FunctionalOptions {
            keywords: &[("auto", "auto")],
            bare: Some(px_bare),
            supports_negative: true,
            ..Default::default()
        },
        set_all(&["text-underline-offset"]),
    );
}

fn shadow_properties() -> Vec<AstNode> {
    properties(&[
        ("--tw-shadow", Some("0 0 #0000"), None),
        ("--tw-shadow-color", None, None),
        ("--tw-inset-shadow", Some("0 0 #0000"), None),
        ("--tw-inset-ring-shadow", Some("0 0 #0000"), None),
        ("--tw-ring-color", None, None),
        ("--tw-ring-shadow", Some("0 0 #0000"), None),
        ("--tw-ring-inset", None, None),
        ("--tw-ring-offset-width", Some("0px"), Some("\"<length>\"")),
        ("--tw-ring-offset-color", Some("#fff"), None),
        ("--tw-ring-offset-shadow", Some("0 0 #0000"), None),
    ])
}

fn effects(utilities: &mut Utilities) {
    utilities.functional_utility(
        "opacity",
        FunctionalOptions {
            theme_keys: &["--opacity"],
            bare: Some(percent_bare),
            ..Default::default()
        },
        set_all(&["opacity"]),
    );

    utilities.functional_utility(
        "shadow",
        FunctionalOptions {
            theme_keys: &["--shadow"],
            keywords: &[("none", "0 0 #0000")],
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-shadow", value), ("box-shadow", SHADOW_CHAIN)]);
            nodes.extend(shadow_properties());
            nodes
        },
    );
    utilities.color_utility("shadow", &["--box-shadow-color", "--color"], |color| {
        let mut nodes = decls(&[("--tw-shadow-color", color)]);
        nodes.extend(shadow_properties());
        nodes
    });

    utilities.static_nodes("ring-inset", {
        let mut nodes = decls(&[("--tw-ring-inset", "inset")]);
        nodes.extend(shadow_properties());
        nodes
    });
    utilities.functional_utility(
        "ring",
        FunctionalOptions {
            theme_keys: &["--ring-width"],
            default_key: Some("--default-ring-width"),
            default_value: Some("1px"),
            bare: Some(px_bare),
            types: &[DataType::Length],
            ..Default::default()
        },
        |value| {
            let ring = format!(
                "var(--tw-ring-inset,) 0 0 0 calc({} + var(--tw-ring-offset-width)) var(--tw-ring-color, currentcolor)",
                value
            );
            let mut nodes = vec![
                AstNode::decl("--tw-ring-shadow", ring),
                AstNode::decl("box-shadow", SHADOW_CHAIN),
            ];
            nodes.extend(shadow_properties());
            nodes
        },
    );
    utilities.color_utility("ring", &["--ring-color", "--color"], |color| {
        let mut nodes = decls(&[("--tw-ring-color", color)]);
        nodes.extend(shadow_properties());
        nodes
    });
    utilities.functional_utility(
        "ring-offset",
        FunctionalOptions {
            theme_keys: &["--ring-offset-width"],
            bare: Some(px_bare),
            types: &[DataType::Length],
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[
                ("--tw-ring-offset-width", value),
                (
                    "--tw-ring-offset-shadow",
                    "var(--tw-ring-inset,) 0 0 0 var(--tw-ring-offset-width) var(--tw-ring-offset-color)",
                ),
            ]);
            nodes.extend(shadow_properties());
            nodes
        },
    );
    utilities.color_utility("ring-offset", &["--ring-offset-color", "--color"], |color| {
        let mut nodes = decls(&[("--tw-ring-offset-color", color)]);
        nodes.extend(shadow_properties());
        nodes
    });

    utilities.static_decls(
        "outline-hidden",
        &[("outline", "2px solid transparent"), ("outline-offset", "2px")],
    );
    for style in ["none", "solid", "dashed", "dotted", "double"] {
        utilities.static_nodes(
            &format!("outline-{}", style),
            vec![
                AstNode::decl("--tw-outline-style", style),
                AstNode::decl("outline-style", style),
                property("--tw-outline-style", Some("solid"), None),
            ],
        );
    }
    utilities.functional_utility(
        "outline",
        FunctionalOptions {
            theme_keys: &["--outline-width"],
            default_value: Some("1px"),
            bare: Some(px_bare),
            types: &[DataType::Length],
            ..Default::default()
        },
        |value| {
            vec![
                AstNode::decl("outline-style", "var(--tw-outline-style)"),
                AstNode::decl("outline-width", value),
                property("--tw-outline-style", Some("solid"), None),
            ]
        },
    );
    utilities.color_utility("outline", &["--outline-color", "--color"], set_all(&["outline-color"]));
    utilities.functional_utility(
        "outline-offset",
        FunctionalOptions {
            theme_keys: &["--outline-offset"],
            bare: Some(px_bare),
            supports_negative: true,
            ..Default::default()
        },
        set_all(&["outline-offset"]),
    );
}

/// Registers a filter function utility that writes one slot of the shared
/// `filter` (or `backdrop-filter`) chain.
fn filter_utility(
    utilities: &mut Utilities,
    name: &str,
    function: &'static str,
    theme_keys: &'static [&'static str],
    bare: Option<BareFn>,
    default_value: Option<&'static str>,
    backdrop: bool,
) {
    let (root, variable) = if backdrop {
        (format!("backdrop-{}", name), format!("--tw-backdrop-{}", name))
    } else {
        (name.to_string(), format!("--tw-{}", name))
    };
    utilities.functional_utility(
        &root,
        FunctionalOptions {
            theme_keys,
            default_value,
            bare,
            supports_negative: function == "hue-rotate",
            ..Default::default()
        },
        move |value| {
            let mut nodes = vec![AstNode::decl(variable.as_str(), format!("{}({})", function, value))];
            nodes.extend(filter_declarations(backdrop));
            nodes
        },
    );
}

fn filter_declarations(backdrop: bool) -> Vec<AstNode> {
    let mut nodes = if backdrop {
        decls(&[
            ("-webkit-backdrop-filter", BACKDROP_CHAIN),
            ("backdrop-filter", BACKDROP_CHAIN),
        ])
    } else {
        decls(&[("filter", FILTER_CHAIN)])
    };
    let names: &[&str] = if backdrop {
        &[
            "--tw-backdrop-blur",
            "--tw-backdrop-brightness",
            "--tw-backdrop-contrast",
            "--tw-backdrop-grayscale",
            "--tw-backdrop-hue-rotate",
            "--tw-backdrop-invert",
            "--tw-backdrop-opacity",
            "--tw-backdrop-saturate",
            "--tw-backdrop-sepia",
        ]
    } else {
        &[
            "--tw-blur",
            "--tw-brightness",
            "--tw-contrast",
            "--tw-grayscale",
            "--tw-hue-rotate",
            "--tw-invert",
            "--tw-saturate",
            "--tw-sepia",
            "--tw-drop-shadow",
        ]
    };
    nodes.extend(names.iter().map(|name| property(name, None, None)));
    nodes
}

fn filters(utilities: &mut Utilities) {
    utilities.static_nodes("filter", filter_declarations(false));
    utilities.static_decls("filter-none", &[("filter", "none")]);
    for backdrop in [false, true] {
        if backdrop {
            utilities.static_nodes("backdrop-filter", filter_declarations(true));
            utilities.static_decls(
                "backdrop-filter-none",
                &[("-webkit-backdrop-filter", "none"), ("backdrop-filter", "none")],
            );
        }
        let blur_keys: &'static [&'static str] = if backdrop { &["--backdrop-blur", "--blur"] } else { &["--blur"] };
        filter_utility(utilities, "blur", "blur", blur_keys, None, Some("8px"), backdrop);
        filter_utility(utilities, "brightness", "brightness", &["--brightness"], Some(percent_bare), None, backdrop);
        filter_utility(utilities, "contrast", "contrast", &["--contrast"], Some(percent_bare), None, backdrop);
        filter_utility(utilities, "grayscale", "grayscale", &["--grayscale"], Some(percent_bare), Some("100%"), backdrop);
        filter_utility(utilities, "hue-rotate", "hue-rotate", &["--hue-rotate"], Some(degrees_bare), None, backdrop);
        filter_utility(utilities, "invert", "invert", &["--invert"], Some(percent_bare), Some("100%"), backdrop);
        if backdrop {
            filter_utility(utilities, "opacity", "opacity", &["--opacity"], Some(percent_bare), None, true);
        }
        filter_utility(utilities, "saturate", "saturate", &["--saturate"], Some(percent_bare), None, backdrop);
        filter_utility(utilities, "sepia", "sepia", &["--sepia"], Some(percent_bare), Some("100%"), backdrop);
        if !backdrop {
            filter_utility(utilities, "drop-shadow", "drop-shadow", &["--drop-shadow"], None, None, false);
        }
    }
}

fn transitions(utilities: &mut Utilities) {
    let timing = "var(--tw-ease, var(--default-transition-timing-function, cubic-bezier(0.4, 0, 0.2, 1)))";
    let duration = "var(--tw-duration, var(--default-transition-duration, 150ms))";
    utilities.static_decls("transition-none", &[("transition-property", "none")]);
    utilities.functional_utility(
        "transition",
        FunctionalOptions {
            theme_keys: &["--transition-property"],
            keywords: &[
                ("all", "all"),
                ("colors", COLOR_TRANSITION),
                ("opacity", "opacity"),
                ("shadow", "box-shadow"),
                ("transform", "transform, translate, scale, rotate"),
            ],
            default_value: Some(DEFAULT_TRANSITION),
            ..Default::default()
        },
        move |value| {
            decls(&[
                ("transition-property", value),
                ("transition-timing-function", timing),
                ("transition-duration", duration),
            ])
        },
    );
    utilities.functional_utility(
        "delay",
        FunctionalOptions {
            theme_keys: &["--transition-delay"],
            bare: Some(ms_bare),
            ..Default::default()
        },
        set_all(&["transition-delay"]),
    );
    utilities.functional_utility(
        "duration",
        FunctionalOptions {
            theme_keys: &["--transition-duration"],
            keywords: &[("initial", "initial")],
            bare: Some(ms_bare),
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-duration", value), ("transition-duration", value)]);
            nodes.push(property("--tw-duration", None, None));
            nodes
        },
    );
    utilities.functional_utility(
        "ease",
        FunctionalOptions {
            theme_keys: &["--ease"],
            keywords: &[("linear", "linear"), ("initial", "initial")],
            ..Default::default()
        },
        |value| {
            let mut nodes = decls(&[("--tw-ease", value), ("transition-timing-function", value)]);
            nodes.push(property("--tw-ease", None, None));
            nodes
        },
    );
}

fn misc(utilities: &mut Utilities) {
    utilities.functional_utility(
        "will-change",
        FunctionalOptions {
            keywords: &[
                ("auto", "auto"),
                ("scroll", "scroll-position"),
                ("contents", "contents"),
                ("transform", "transform"),
            ],
            ..Default::default()
        },
        set_all(&["will-change"]),
    );

    static_family(
        utilities,
        "contain",
        "contain",
        &[("none", "none"), ("content", "content"), ("strict", "strict")],
    );
    for (name, variable, value) in [
        ("contain-size", "--tw-contain-size", "size"),
        ("contain-inline-size", "--tw-contain-size", "inline-size"),
        ("contain-layout", "--tw-contain-layout", "layout"),
        ("contain-paint", "--tw-contain-paint", "paint"),
        ("contain-style", "--tw-contain-style", "style"),
    ] {
        let mut nodes = decls(&[(variable, value), ("contain", CONTAIN_CHAIN)]);
        nodes.extend(properties(&[
            ("--tw-contain-size", None, None),
            ("--tw-contain-layout", None, None),
            ("--tw-contain-paint", None, None),
            ("--tw-contain-style", None, None),
        ]));
        utilities.static_nodes(name, nodes);
    }

    utilities.static_nodes(
        "content-none",
        vec![
            AstNode::decl("--tw-content", "none"),
            AstNode::decl("content", "none"),
            property("--tw-content", Some("\"\""), None),
        ],
    );
    utilities.functional(
        "content",
        compile_fn(|candidate, _| {
            if candidate.negative() || candidate.modifier().is_some() {
                return None;
            }
            let CandidateValue::Arbitrary { value, .. } = candidate.value()? else {
                return None;
            };
            Some(vec![
                AstNode::decl("--tw-content", value.as_str()),
                AstNode::decl("content", "var(--tw-content)"),
                property("--tw-content", Some("\"\""), None),
            ])
        }),
    );

    utilities.functional_utility(
        "animate",
        FunctionalOptions {
            theme_keys: &["--animate"],
            keywords: &[("none", "none")],
            ..Default::default()
        },
        set_all(&["animation"]),
    );
}
