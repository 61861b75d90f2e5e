//! Document options and their declarative settings table
//!
//! Options are applied through typed setting descriptors: each descriptor
//! names the option, its aliases, its type (used for parsing and
//! validation), and a setter function pointer. Setters receive parsed
//! `SettingValue`s, never raw strings.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorKind};
use crate::indent::AutoIndentMode;

/// Line ending style recorded for the document
///
/// The buffer itself is always newline-only; the style is re-applied when
/// a caller materializes content for saving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    LF,
    CRLF,
}

impl LineEnding {
    /// Detect the style of raw text (first `\r\n` wins)
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::LF => "\n",
            LineEnding::CRLF => "\r\n",
        }
    }
}

/// Document-specific options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Column count of a tab for indentation arithmetic
    pub tab_size: usize,
    /// Indent with spaces instead of a tab character
    pub insert_spaces: bool,
    /// New-line indentation behavior
    pub auto_indent: AutoIndentMode,
    /// Line ending style to re-apply on save
    pub line_ending: LineEnding,
    /// Detect tab size / spaces from the initial content at construction
    pub detect_indent: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            tab_size: 4,
            insert_spaces: true,
            auto_indent: AutoIndentMode::Full,
            line_ending: LineEnding::LF,
            detect_indent: false,
        }
    }
}

/// Typed value after parsing and validation
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Integer(usize),
    /// Canonicalized enum identifier
    Enum(String),
}

/// Setting type definition for parsing and validation
#[derive(Debug, Clone)]
pub enum SettingType {
    /// Boolean setting (true/false, on/off, yes/no, 1/0)
    Boolean,
    /// Integer setting with optional min/max bounds (inclusive)
    Integer {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Enum setting with static variant list
    Enum { variants: &'static [&'static str] },
}

/// Structured error for setting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// Failed to parse string value
    ParseError(String),
    /// Value failed validation (out of range, etc.)
    ValidationError(String),
    /// Unknown option name
    UnknownOption(String),
}

impl std::fmt::Display for SettingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            SettingError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            SettingError::UnknownOption(name) => write!(f, "Unknown option: {name}"),
        }
    }
}

impl From<SettingError> for CoreError {
    fn from(err: SettingError) -> Self {
        match err {
            SettingError::ParseError(msg) => CoreError::new(ErrorKind::Parse, "SETTING_PARSE_ERROR", msg),
            SettingError::ValidationError(msg) => {
                CoreError::new(ErrorKind::Settings, "SETTING_VALIDATION_ERROR", msg)
            }
            SettingError::UnknownOption(name) => CoreError::new(
                ErrorKind::Settings,
                "UNKNOWN_SETTING",
                format!("Unknown option: {name}"),
            ),
        }
    }
}

/// Setter function signature
///
/// Function pointers (not trait objects) for static dispatch.
pub type SettingSetter<T> = fn(&mut T, SettingValue) -> Result<(), SettingError>;

/// Setting descriptor: name, aliases, type, and setter
#[derive(Debug, Clone)]
pub struct SettingDescriptor<T: 'static> {
    /// Canonical setting name (e.g., "tabstop")
    pub name: &'static str,
    /// Short aliases (e.g., &["ts"])
    pub aliases: &'static [&'static str],
    /// Setting type for parsing and validation
    pub ty: SettingType,
    /// Setter function pointer
    pub set: SettingSetter<T>,
}

/// Registry that resolves option names and applies typed values
#[derive(Clone, Copy)]
pub struct SettingsRegistry<T: 'static> {
    settings: &'static [SettingDescriptor<T>],
}

impl<T> SettingsRegistry<T> {
    #[must_use]
    pub const fn new(descriptors: &'static [SettingDescriptor<T>]) -> Self {
        SettingsRegistry {
            settings: descriptors,
        }
    }

    /// Parse a string value to a `SettingValue` using the setting type
    pub(crate) fn parse_value(ty: &SettingType, value: &str) -> Result<SettingValue, SettingError> {
        match ty {
            SettingType::Boolean => match value.to_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Ok(SettingValue::Bool(true)),
                "false" | "0" | "off" | "no" => Ok(SettingValue::Bool(false)),
                _ => Err(SettingError::ParseError(format!(
                    "Invalid boolean value: {value}"
                ))),
            },
            SettingType::Integer { min, max } => {
                let val = value.parse::<usize>().map_err(|_| {
                    SettingError::ParseError(format!("Invalid integer value: {value}"))
                })?;
                if let Some(min_val) = min {
                    if val < *min_val {
                        return Err(SettingError::ValidationError(format!(
                            "Value {val} is below minimum {min_val}"
                        )));
                    }
                }
                if let Some(max_val) = max {
                    if val > *max_val {
                        return Err(SettingError::ValidationError(format!(
                            "Value {val} is above maximum {max_val}"
                        )));
                    }
                }
                Ok(SettingValue::Integer(val))
            }
            SettingType::Enum { variants } => {
                let val_lower = value.to_lowercase();
                if let Some(canonical) = variants.iter().find(|v| v.to_lowercase() == val_lower) {
                    Ok(SettingValue::Enum(canonical.to_string()))
                } else {
                    Err(SettingError::ParseError(format!(
                        "Invalid enum value: {value}. Valid values: {variants:?}"
                    )))
                }
            }
        }
    }

    /// Resolve a name (canonical or alias) and apply the value
    pub fn execute(&self, name: &str, value: &str, target: &mut T) -> Result<(), SettingError> {
        let desc = self
            .settings
            .iter()
            .find(|d| d.name == name || d.aliases.contains(&name))
            .ok_or_else(|| SettingError::UnknownOption(name.to_string()))?;
        let typed = Self::parse_value(&desc.ty, value)?;
        (desc.set)(target, typed)
    }
}

fn set_tab_size(options: &mut DocumentOptions, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Integer(n) => {
            options.tab_size = n;
            Ok(())
        }
        _ => Err(SettingError::ValidationError(
            "Expected integer".to_string(),
        )),
    }
}

fn set_insert_spaces(options: &mut DocumentOptions, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Bool(b) => {
            options.insert_spaces = b;
            Ok(())
        }
        _ => Err(SettingError::ValidationError(
            "Expected boolean".to_string(),
        )),
    }
}

fn set_auto_indent(options: &mut DocumentOptions, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Enum(s) => {
            options.auto_indent = match s.as_str() {
                "none" => AutoIndentMode::None,
                "keep" => AutoIndentMode::Keep,
                "full" => AutoIndentMode::Full,
                _ => {
                    return Err(SettingError::ValidationError(format!(
                        "Invalid auto-indent mode: {s}"
                    )))
                }
            };
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected enum value".to_string())),
    }
}

fn set_line_ending(options: &mut DocumentOptions, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Enum(s) => match s.as_str() {
            "lf" | "unix" => {
                options.line_ending = LineEnding::LF;
                Ok(())
            }
            "crlf" | "dos" | "windows" => {
                options.line_ending = LineEnding::CRLF;
                Ok(())
            }
            _ => Err(SettingError::ValidationError(format!(
                "Invalid line ending: {s}. Expected 'lf' or 'crlf'"
            ))),
        },
        _ => Err(SettingError::ValidationError("Expected enum value".to_string())),
    }
}

/// Document-specific settings
const DOCUMENT_SETTINGS: &[SettingDescriptor<DocumentOptions>] = &[
    SettingDescriptor {
        name: "tabstop",
        aliases: &["ts"],
        ty: SettingType::Integer {
            min: Some(1),
            max: Some(64),
        },
        set: set_tab_size,
    },
    SettingDescriptor {
        name: "expandtab",
        aliases: &["et"],
        ty: SettingType::Boolean,
        set: set_insert_spaces,
    },
    SettingDescriptor {
        name: "autoindent",
        aliases: &["ai"],
        ty: SettingType::Enum {
            variants: &["none", "keep", "full"],
        },
        set: set_auto_indent,
    },
    SettingDescriptor {
        name: "lineending",
        aliases: &["ff", "fileformat"], // mimicking vim's fileformat
        ty: SettingType::Enum {
            variants: &["lf", "crlf", "unix", "dos", "windows"],
        },
        set: set_line_ending,
    },
];

pub fn document_settings_registry() -> SettingsRegistry<DocumentOptions> {
    SettingsRegistry::new(DOCUMENT_SETTINGS)
}
