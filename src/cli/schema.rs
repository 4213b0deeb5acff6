//! Spider schema files

use std::{fs, path::Path};

use log::debug;
use serde::Deserialize;

use super::CliError;
use crate::{Registry, SchemaError, Value, VarType};

/// A spider's declarations, as stored in a JSON schema file.
///
/// ```json
/// { "spider": "reddit",
///   "components": [ { "name": "post", "symbol": "p", "info": "A user post",
///                     "attributes": [ { "name": "score", "info": "Upvotes" } ] } ],
///   "variables": [ { "name": "limit", "type": "integer", "default": 5 } ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaFile {
    pub spider: String,
    pub components: Vec<ComponentDecl>,
    pub variables: Vec<VariableDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentDecl {
    pub name: String,
    pub symbol: Option<String>,
    pub info: String,
    pub attributes: Vec<AttributeDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttributeDecl {
    pub name: String,
    pub info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub info: String,
}

fn default_type() -> String {
    "string".to_string()
}

impl SchemaFile {
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read(path: &Path) -> Result<Self, CliError> {
        let json = fs::read_to_string(path).map_err(|source| CliError::SchemaFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Declare everything in this schema on a new registry for `script`.
    pub fn into_registry(self, script: &str) -> Result<Registry, CliError> {
        let mut registry = Registry::new(script, &self.spider)?;

        for component in self.components {
            let symbol = match component.symbol.as_deref() {
                None | Some("") => None,
                Some(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(ch), None) => Some(ch),
                        _ => {
                            return Err(SchemaError::InvalidSymbol {
                                component: component.name,
                                symbol: s.to_string(),
                            }
                            .into());
                        }
                    }
                }
            };
            registry.add_component(&component.name, symbol, &component.info)?;

            for attribute in component.attributes {
                registry.add_attribute(&component.name, &attribute.name, &attribute.info)?;
            }
        }

        for variable in self.variables {
            let var_type =
                VarType::from_name(&variable.type_name).ok_or_else(|| CliError::UnknownType {
                    variable: variable.name.clone(),
                    type_name: variable.type_name.clone(),
                })?;
            registry.add_variable(
                &variable.name,
                var_type,
                Value::from(variable.default),
                &variable.info,
            )?;
        }

        debug!(
            "Loaded the schema of the spider '{}': {} component(s), {} variable(s)",
            registry.spider_name(),
            registry.components().len(),
            registry.variables().len()
        );
        Ok(registry)
    }
}

/// Read a schema file and build the registry for `script`.
pub fn load_schema(path: &Path, script: &str) -> Result<Registry, CliError> {
    SchemaFile::read(path)?.into_registry(script)
}
