//! Legacy JavaScript-style configuration loaded with `@config`.
//!
//! ```json
//! {
//!   "darkMode": ["selector", ".dark"],
//!   "theme": {
//!     "colors": { "brand": "#0088cc" },
//!     "extend": { "spacing": { "18": "4.5rem" } }
//!   },
//!   "plugins": ["forms"]
//! }
//! ```
//!
//! Theme values become `--color-brand`, `--spacing-18` and so on. They are
//! registered as inline reference defaults: CSS `@theme` values win, and
//! config values are substituted literally rather than through `var()`.

use crate::error::{CompileError, Result};
use crate::theme::{ThemeEvent, ThemeOptions, escape_key_segment, key_path_to_property};
use crate::variants::DarkMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A configuration module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub theme: ThemeConfig,
    /// Plugin ids, resolved relative to the config file.
    pub plugins: Vec<String>,
    pub dark_mode: Option<DarkModeConfig>,
}

/// The `theme` section. Keys other than `extend` are theme namespaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub extend: Map<String, Value>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// `darkMode: "media"`, `darkMode: "class"` or `darkMode: ["selector", ".dark"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DarkModeConfig {
    Strategy(String),
    WithValue(String, StringOrList),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(one) => vec![one],
            StringOrList::Many(many) => many,
        }
    }
}

impl Config {
    /// Parses a JSON configuration.
    pub fn from_json(id: &str, source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| CompileError::Module {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Resolves the `darkMode` setting, if present.
    pub fn dark_mode(&self) -> Result<Option<DarkMode>> {
        let Some(config) = &self.dark_mode else {
            return Ok(None);
        };
        let mode = match config.clone() {
            DarkModeConfig::Strategy(strategy) => match strategy.as_str() {
                "media" => DarkMode::Media,
                "class" | "selector" => DarkMode::Selector(".dark".to_string()),
                other => return Err(invalid_dark_mode(other)),
            },
            DarkModeConfig::WithValue(strategy, value) => match strategy.as_str() {
                "class" | "selector" => match value {
                    StringOrList::One(selector) => DarkMode::Selector(selector),
                    StringOrList::Many(_) => return Err(invalid_dark_mode(&strategy)),
                },
                "variant" => DarkMode::Variant(value.into_vec()),
                other => return Err(invalid_dark_mode(other)),
            },
        };
        Ok(Some(mode))
    }

    /// Theme events for every value, replacements before extensions.
    pub fn theme_events(&self) -> Vec<ThemeEvent> {
        let options = ThemeOptions::INLINE | ThemeOptions::REFERENCE | ThemeOptions::DEFAULT;
        let mut events = Vec::new();
        for section in [&self.theme.values, &self.theme.extend] {
            for (namespace, value) in section {
                let mut path = vec![namespace.clone()];
                flatten_value(&mut path, value, &mut |key, value| {
                    events.push(ThemeEvent::Set {
                        key,
                        value,
                        options,
                    });
                });
            }
        }
        events
    }
}

fn invalid_dark_mode(strategy: &str) -> CompileError {
    CompileError::InvalidDirective {
        directive: "config",
        message: format!("unknown `darkMode` strategy `{}`", strategy),
    }
}

/// Walks a nested theme object, emitting `(key, value)` for every leaf.
fn flatten_value(path: &mut Vec<String>, value: &Value, emit: &mut dyn FnMut(String, String)) {
    match value {
        Value::Object(map) => {
            for (segment, child) in map {
                path.push(escape_key_segment(segment));
                flatten_value(path, child, emit);
                path.pop();
            }
        }
        // `fontSize: { sm: ["0.875rem", { lineHeight: "1.25rem" }] }`
        Value::Array(items) if is_font_size_tuple(path, items) => {
            let Some(key) = key_path_to_property(path) else {
                return;
            };
            if let Some(Value::String(size)) = items.first() {
                emit(key.clone(), size.clone());
            }
            match items.get(1) {
                Some(Value::String(line_height)) => {
                    emit(format!("{}--line-height", key), line_height.clone());
                }
                Some(Value::Object(nested)) => {
                    for (name, value) in nested {
                        if let Some(value) = scalar(value) {
                            emit(format!("{}--{}", key, kebab(name)), value);
                        }
                    }
                }
                _ => {}
            }
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar).collect();
            if let Some(key) = key_path_to_property(path) {
                emit(key, parts.join(", "));
            }
        }
        other => {
            if let (Some(key), Some(value)) = (key_path_to_property(path), scalar(other)) {
                emit(key, value);
            }
        }
    }
}

fn is_font_size_tuple(path: &[String], items: &[Value]) -> bool {
    path.first().is_some_and(|namespace| namespace == "fontSize")
        && matches!(
            items,
            [Value::String(_), Value::Object(_) | Value::String(_)]
        )
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
