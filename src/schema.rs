//! Schema a spider declares before its filter can run: components with
//! their attributes, and typed variables.

use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use thiserror::Error;

use crate::value::Value;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

const RESERVED: [&str; 6] = ["and", "or", "not", "in", "True", "False"];

/// What a name in a script or schema refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Component,
    Attribute,
    Variable,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Component => f.write_str("component"),
            IdentifierKind::Attribute => f.write_str("attribute"),
            IdentifierKind::Variable => f.write_str("variable"),
        }
    }
}

/// Errors raised while a spider declares its schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("A component named '{0}' has already been declared")]
    DuplicateComponent(String),

    #[error("The symbol '{symbol}' is already used by the component '{existing}'")]
    DuplicateSymbol { symbol: char, existing: String },

    #[error("The component '{component}' already has an attribute named '{attribute}'")]
    DuplicateAttribute { component: String, attribute: String },

    #[error("A variable named '{0}' has already been declared")]
    DuplicateVariable(String),

    #[error("The symbol '{symbol}' of the component '{component}' must be a single alphabetic character")]
    InvalidSymbol { component: String, symbol: String },

    #[error("The {kind} name '{name}' must be at least 2 characters long")]
    NameTooShort { kind: IdentifierKind, name: String },

    #[error(
        "The {kind} name '{name}' is not a valid identifier (letters, digits and \
        underscores, not starting with a digit, not a keyword)"
    )]
    InvalidName { kind: IdentifierKind, name: String },

    #[error("No component with the name or symbol '{0}' has been declared")]
    UnknownComponent(String),

    #[error("The component '{component}' has no attribute named '{attribute}'")]
    UnknownAttribute { component: String, attribute: String },

    #[error("The default value of the variable '{variable}' is invalid: {reason}")]
    InvalidDefault { variable: String, reason: String },
}

/// Check that `name` can be written in a script and is at least two
/// characters long.
pub(crate) fn validate_name(kind: IdentifierKind, name: &str) -> Result<(), SchemaError> {
    if !IDENTIFIER.is_match(name) || RESERVED.contains(&name) {
        return Err(SchemaError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    if name.chars().count() < 2 {
        return Err(SchemaError::NameTooShort {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A named category of scraped entity, filterable as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub(crate) name: String,
    pub(crate) symbol: Option<char>,
    pub(crate) info: String,
    pub(crate) attributes: Vec<Attribute>,
}

impl Component {
    pub(crate) fn new(name: &str, symbol: Option<char>, info: &str) -> Self {
        Component {
            name: name.to_string(),
            symbol,
            info: info.to_string(),
            attributes: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub(crate) fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|attr| attr.name == name)
    }

    /// Whether `key` is this component's name or its symbol.
    pub fn is_named(&self, key: &str) -> bool {
        if self.name == key {
            return true;
        }
        let mut chars = key.chars();
        match (self.symbol, chars.next(), chars.next()) {
            (Some(symbol), Some(ch), None) => symbol == ch,
            _ => false,
        }
    }
}

/// A named scalar field of a component, assigned a value per scraped item.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) info: String,
    pub(crate) value: Option<Value>,
}

impl Attribute {
    pub(crate) fn new(name: &str, info: &str) -> Self {
        Attribute {
            name: name.to_string(),
            info: info.to_string(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    /// Current value, `None` until the spider assigns one.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

type CoerceFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A spider-provided conversion for a custom variable type.
#[derive(Clone)]
pub struct Coercion {
    name: String,
    func: Arc<CoerceFn>,
}

impl Coercion {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Coercion {
            name: name.to_string(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion").field("name", &self.name).finish()
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone)]
pub enum VarType {
    String,
    Integer,
    Float,
    /// Accepts `True`, `False`, `1` and `0`
    Boolean,
    /// Comma separated values, each trimmed
    List,
    Custom(Coercion),
}

impl VarType {
    pub fn name(&self) -> &str {
        match self {
            VarType::String => "string",
            VarType::Integer => "integer",
            VarType::Float => "float",
            VarType::Boolean => "boolean",
            VarType::List => "list",
            VarType::Custom(coercion) => coercion.name(),
        }
    }

    /// Look up a built-in type by the name [`VarType::name`] gives it.
    pub fn from_name(name: &str) -> Option<VarType> {
        match name {
            "string" | "str" => Some(VarType::String),
            "integer" | "int" => Some(VarType::Integer),
            "float" => Some(VarType::Float),
            "boolean" | "bool" => Some(VarType::Boolean),
            "list" => Some(VarType::List),
            _ => None,
        }
    }

    /// Convert `value` to this type. `Null` passes through unchanged.
    ///
    /// The error is a short reason, without the variable's name.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self {
            VarType::String => match value {
                Value::String(_) => Ok(value.clone()),
                other => Ok(Value::String(other.to_string())),
            },
            VarType::Integer => match value {
                Value::Integer(_) => Ok(value.clone()),
                Value::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                    Ok(Value::Integer(*n as i64))
                }
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| format!("'{}' is not an integer", s)),
                other => Err(format!("{} '{}' is not an integer", other.type_name(), other)),
            },
            VarType::Float => match value {
                Value::Float(_) => Ok(value.clone()),
                Value::Integer(n) => Ok(Value::Float(*n as f64)),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| format!("'{}' is not a number", s)),
                other => Err(format!("{} '{}' is not a number", other.type_name(), other)),
            },
            VarType::Boolean => match value {
                Value::Boolean(_) => Ok(value.clone()),
                Value::Integer(1) => Ok(Value::Boolean(true)),
                Value::Integer(0) => Ok(Value::Boolean(false)),
                Value::String(s) => match s.as_str() {
                    "True" | "1" => Ok(Value::Boolean(true)),
                    "False" | "0" => Ok(Value::Boolean(false)),
                    _ => Err(format!("'{}' is not one of True, False, 1 or 0", s)),
                },
                other => Err(format!("'{}' is not one of True, False, 1 or 0", other)),
            },
            VarType::List => match value {
                Value::List(_) => Ok(value.clone()),
                Value::String(s) if s.trim().is_empty() => Ok(Value::List(vec![])),
                Value::String(s) => Ok(Value::List(
                    s.split(',')
                        .map(|part| Value::String(part.trim().to_string()))
                        .collect(),
                )),
                other => Ok(Value::List(vec![other.clone()])),
            },
            VarType::Custom(coercion) => (coercion.func)(value),
        }
    }
}

/// A typed run parameter assignable from a script.
#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) var_type: VarType,
    pub(crate) default: Value,
    pub(crate) info: String,
}

impl Variable {
    /// Declare a variable; the default is coerced to `var_type` right away.
    pub(crate) fn new(
        name: &str,
        var_type: VarType,
        default: Value,
        info: &str,
    ) -> Result<Self, SchemaError> {
        let default = var_type
            .coerce(&default)
            .map_err(|reason| SchemaError::InvalidDefault {
                variable: name.to_string(),
                reason,
            })?;

        Ok(Variable {
            name: name.to_string(),
            var_type,
            default,
            info: info.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> &VarType {
        &self.var_type
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}
