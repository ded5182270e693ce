//! Error types with fix suggestions
//!
//! Error code ranges:
//! - CONF-000-009: Component/discriminator errors
//! - CONF-010-019: Document and context errors
//! - CONF-020-029: Placeholder errors
//! - CONF-030-039: Argument and cast errors
//! - CONF-040-049: File/parse errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Every failure surfaced while loading or binding a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    // ─────────────────────────────────────────────────────────────
    // Component / discriminator errors (CONF-001 to CONF-006)
    // ─────────────────────────────────────────────────────────────
    #[error("[CONF-001] Component '{name}' is not registered")]
    ComponentNotFound { name: String },

    #[error("[CONF-002] Config key '{key}' not found in configuration arguments for '{argument}'")]
    KeyNotInConfig { key: String, argument: String },

    #[error("[CONF-003] Config value for '{argument}' is invalid: {reason}")]
    InvalidConfigValue { argument: String, reason: String },

    #[error("[CONF-004] Configuration type '{type_name}' not defined for '{argument}'")]
    TypeNotDefined { type_name: String, argument: String },

    #[error("[CONF-005] '{name}' does not support bind")]
    DoesNotSupportBind { name: String },

    #[error("[CONF-006] Component '{component}' failed to construct: {reason}")]
    Construct { component: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Document / context errors (CONF-010 to CONF-013)
    // ─────────────────────────────────────────────────────────────
    #[error("[CONF-010] Invalid config key path: '{path}'")]
    InvalidConfigKey { path: String },

    #[error("[CONF-011] Key '{path}' not found in configuration")]
    MissingKey { path: String },

    #[error("[CONF-012] Expected a mapping at '{path}', found {found}")]
    ExpectedMapping { path: String, found: String },

    #[error("[CONF-013] Merge would overwrite existing keys: {}", .keys.join(", "))]
    MergeCollision { keys: Vec<String> },

    // ─────────────────────────────────────────────────────────────
    // Placeholder errors (CONF-020)
    // ─────────────────────────────────────────────────────────────
    #[error("[CONF-020] Environment variable {variable_name} not found")]
    EnvironmentVariableNotFound { variable_name: String },

    // ─────────────────────────────────────────────────────────────
    // Argument / cast errors (CONF-030 to CONF-033)
    // ─────────────────────────────────────────────────────────────
    #[error("[CONF-030] Cannot convert {value} with '{resolver}'")]
    CastFailed { resolver: String, value: String },

    #[error("[CONF-031] Component '{component}' is missing argument '{argument}'")]
    MissingArgument { component: String, argument: String },

    #[error("[CONF-032] Argument '{argument}' of '{component}' expected {expected}, found {found}")]
    ArgumentType {
        component: String,
        argument: String,
        expected: String,
        found: String,
    },

    #[error("[CONF-033] Component '{component}' got unexpected arguments: {}", .arguments.join(", "))]
    UnexpectedArgument {
        component: String,
        arguments: Vec<String>,
    },

    // ─────────────────────────────────────────────────────────────
    // File / parse errors (CONF-040 to CONF-044)
    // ─────────────────────────────────────────────────────────────
    #[error("[CONF-040] Unable to determine file type for {file}")]
    FileTypeNotRecognized { file: String },

    #[error("[CONF-041] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[CONF-042] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("[CONF-043] YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[CONF-044] TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// Error raised from inside a user constructor
    pub fn construct(component: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::Construct {
            component: component.into(),
            reason: reason.to_string(),
        }
    }

    /// Name of the undefined environment variable, if this is that error
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            ConfigError::EnvironmentVariableNotFound { variable_name } => Some(variable_name),
            _ => None,
        }
    }

    /// Stable code prefix, e.g. `CONF-020`
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::ComponentNotFound { .. } => "CONF-001",
            ConfigError::KeyNotInConfig { .. } => "CONF-002",
            ConfigError::InvalidConfigValue { .. } => "CONF-003",
            ConfigError::TypeNotDefined { .. } => "CONF-004",
            ConfigError::DoesNotSupportBind { .. } => "CONF-005",
            ConfigError::Construct { .. } => "CONF-006",
            ConfigError::InvalidConfigKey { .. } => "CONF-010",
            ConfigError::MissingKey { .. } => "CONF-011",
            ConfigError::ExpectedMapping { .. } => "CONF-012",
            ConfigError::MergeCollision { .. } => "CONF-013",
            ConfigError::EnvironmentVariableNotFound { .. } => "CONF-020",
            ConfigError::CastFailed { .. } => "CONF-030",
            ConfigError::MissingArgument { .. } => "CONF-031",
            ConfigError::ArgumentType { .. } => "CONF-032",
            ConfigError::UnexpectedArgument { .. } => "CONF-033",
            ConfigError::FileTypeNotRecognized { .. } => "CONF-040",
            ConfigError::Io(_) => "CONF-041",
            ConfigError::Json(_) => "CONF-042",
            ConfigError::Yaml(_) => "CONF-043",
            ConfigError::Toml(_) => "CONF-044",
        }
    }
}

impl FixSuggestion for ConfigError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ConfigError::ComponentNotFound { .. } => {
                Some("Register the component before building a one-of set from it")
            }
            ConfigError::KeyNotInConfig { .. } => {
                Some("Add a `type:` key naming one of the declared variants")
            }
            ConfigError::InvalidConfigValue { .. } => {
                Some("Polymorphic arguments must be mappings with a `type:` key")
            }
            ConfigError::TypeNotDefined { .. } => {
                Some("Use a `type:` value matching one of the declared variant names")
            }
            ConfigError::DoesNotSupportBind { .. } => {
                Some("Instantiate with a component descriptor, not a scalar resolver")
            }
            ConfigError::Construct { .. } => Some("Check the values passed to this component"),
            ConfigError::InvalidConfigKey { .. } => {
                Some("Use dotted keys with optional indices: a.b[0].c")
            }
            ConfigError::MissingKey { .. } => Some("Check the key exists in the loaded documents"),
            ConfigError::ExpectedMapping { .. } => {
                Some("Configuration documents must have a mapping at the top level")
            }
            ConfigError::MergeCollision { .. } => {
                Some("Rename the colliding keys or merge with a plain load")
            }
            ConfigError::EnvironmentVariableNotFound { .. } => {
                Some("Export the variable or add it to your .env file")
            }
            ConfigError::CastFailed { .. } => {
                Some("Check the value has the shape the argument expects")
            }
            ConfigError::MissingArgument { .. } => {
                Some("Add the argument to the component's configuration")
            }
            ConfigError::ArgumentType { .. } => {
                Some("Declare a resolver for the argument or fix its value")
            }
            ConfigError::UnexpectedArgument { .. } => {
                Some("Remove the unknown keys or check their spelling")
            }
            ConfigError::FileTypeNotRecognized { .. } => {
                Some("Use a .json, .toml, .yaml or .yml file")
            }
            ConfigError::Io(_) => Some("Check file path and permissions"),
            ConfigError::Json(_) => Some("Check JSON syntax: commas and quoting"),
            ConfigError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            ConfigError::Toml(_) => Some("Check TOML syntax: tables and quoting"),
        }
    }
}
