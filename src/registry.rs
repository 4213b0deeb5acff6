use std::sync::OnceLock;

use log::trace;

use crate::{
    evaluator::{Decisions, EvalContext, EvalError},
    interpreter::Interpreter,
    parser::ParseError,
    schema::{
        Attribute, Component, IdentifierKind, SchemaError, VarType, Variable, validate_name,
    },
    value::Value,
};

/// Everything a spider declares about itself plus the operator's filter.
///
/// A spider builds one registry per run: it declares its components,
/// attributes and variables, then for every scraped item assigns attribute
/// values and asks [`Registry::should_scrape`].
///
/// # Examples
///
/// ```
/// use scrape_filter::{Registry, Value, VarType};
///
/// let mut registry = Registry::new("post { score > 50 } @limit = 10", "reddit").unwrap();
/// registry.add_component("post", Some('p'), "A user post").unwrap();
/// registry.add_attribute("post", "score", "Upvotes").unwrap();
/// registry.add_variable("limit", VarType::Integer, 5, "Posts to fetch").unwrap();
/// registry.validate().unwrap();
///
/// registry.set_attr_values("post", [("score", 60)]).unwrap();
/// assert!(registry.should_scrape("post").unwrap());
/// assert_eq!(registry.variable("limit").unwrap(), &Value::Integer(10));
///
/// registry.set_attr_values("post", [("score", 10)]).unwrap();
/// assert!(!registry.should_scrape("post").unwrap());
/// ```
#[derive(Debug)]
pub struct Registry {
    spider_name: String,
    script: String,
    interpreter: Interpreter,
    components: Vec<Component>,
    variables: Vec<Variable>,
    /// Decisions for the current attribute values, dropped on every change
    decisions: OnceLock<Decisions>,
}

impl Registry {
    /// Parse `script` for the spider `spider_name`. Syntax errors surface
    /// here, before any component is declared.
    pub fn new(script: &str, spider_name: &str) -> Result<Self, ParseError> {
        Ok(Registry {
            spider_name: spider_name.to_string(),
            script: script.to_string(),
            interpreter: Interpreter::set(script)?,
            components: vec![],
            variables: vec![],
            decisions: OnceLock::new(),
        })
    }

    pub fn spider_name(&self) -> &str {
        &self.spider_name
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Borrow the schema and the current values for the evaluator.
    pub fn context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.components, &self.variables)
    }

    /// Declare a component.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifier of at least two characters
    /// * `symbol` - Optional one-letter alias usable in scripts
    /// * `info` - Description shown by [`Registry::detail`]
    pub fn add_component(
        &mut self,
        name: &str,
        symbol: Option<char>,
        info: &str,
    ) -> Result<&mut Self, SchemaError> {
        validate_name(IdentifierKind::Component, name)?;

        if let Some(symbol) = symbol
            && !symbol.is_ascii_alphabetic()
        {
            return Err(SchemaError::InvalidSymbol {
                component: name.to_string(),
                symbol: symbol.to_string(),
            });
        }
        if self.components.iter().any(|c| c.name() == name) {
            return Err(SchemaError::DuplicateComponent(name.to_string()));
        }
        if let Some(symbol) = symbol
            && let Some(existing) = self.components.iter().find(|c| c.symbol() == Some(symbol))
        {
            return Err(SchemaError::DuplicateSymbol {
                symbol,
                existing: existing.name().to_string(),
            });
        }

        self.components.push(Component::new(name, symbol, info));
        self.decisions.take();
        Ok(self)
    }

    /// Declare an attribute of an already declared component, given by
    /// name or symbol.
    pub fn add_attribute(
        &mut self,
        component: &str,
        name: &str,
        info: &str,
    ) -> Result<&mut Self, SchemaError> {
        validate_name(IdentifierKind::Attribute, name)?;

        let target = self.component_mut(component)?;
        if target.attribute(name).is_some() {
            return Err(SchemaError::DuplicateAttribute {
                component: target.name().to_string(),
                attribute: name.to_string(),
            });
        }
        target.attributes.push(Attribute::new(name, info));

        self.decisions.take();
        Ok(self)
    }

    /// Declare a variable. The default is coerced to `var_type` at once, so
    /// a bad default fails here rather than at the first lookup.
    pub fn add_variable(
        &mut self,
        name: &str,
        var_type: VarType,
        default: impl Into<Value>,
        info: &str,
    ) -> Result<&mut Self, SchemaError> {
        validate_name(IdentifierKind::Variable, name)?;

        if self.variables.iter().any(|v| v.name() == name) {
            return Err(SchemaError::DuplicateVariable(name.to_string()));
        }
        self.variables
            .push(Variable::new(name, var_type, default.into(), info)?);

        self.decisions.take();
        Ok(self)
    }

    /// Find a component by name or symbol
    pub fn get(&self, key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.is_named(key))
    }

    pub fn variable_def(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    fn component_mut(&mut self, key: &str) -> Result<&mut Component, SchemaError> {
        self.components
            .iter_mut()
            .find(|c| c.is_named(key))
            .ok_or_else(|| SchemaError::UnknownComponent(key.to_string()))
    }

    /// Assign values to attributes of a component for the current item.
    ///
    /// Attributes not listed keep their previous value. Nothing is assigned
    /// if any listed attribute is unknown.
    pub fn set_attr_values<I, K, V>(&mut self, component: &str, values: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let target = self.component_mut(component)?;
        let values = values
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect::<Vec<_>>();

        if let Some((name, _)) = values
            .iter()
            .find(|(name, _)| target.attribute(name.as_ref()).is_none())
        {
            return Err(SchemaError::UnknownAttribute {
                component: target.name().to_string(),
                attribute: name.as_ref().to_string(),
            });
        }

        for (name, value) in values {
            if let Some(attribute) = target.attribute_mut(name.as_ref()) {
                attribute.value = Some(value);
            }
        }

        self.decisions.take();
        Ok(())
    }

    /// Forget every attribute value, e.g. before moving to an unrelated item.
    pub fn clear_attr_values(&mut self) {
        for attribute in self
            .components
            .iter_mut()
            .flat_map(|c| c.attributes.iter_mut())
        {
            attribute.value = None;
        }
        self.decisions.take();
    }

    /// Decisions for the current attribute values. The script is evaluated
    /// at most once between two changes to the registry.
    pub fn decisions(&self) -> Result<&Decisions, EvalError> {
        if let Some(decisions) = self.decisions.get() {
            return Ok(decisions);
        }

        trace!("Evaluating the filter of the spider '{}'", self.spider_name);
        let ctx = self.interpreter.feed(self);
        let decisions = self.interpreter.output(&ctx)?;
        Ok(self.decisions.get_or_init(|| decisions))
    }

    /// Whether the current item of `component` (name or symbol) passes the
    /// filter.
    pub fn should_scrape(&self, component: &str) -> Result<bool, EvalError> {
        let name = self
            .get(component)
            .ok_or_else(|| EvalError::UnboundIdentifier {
                kind: IdentifierKind::Component,
                name: component.to_string(),
                scope: None,
            })?
            .name();

        Ok(self.decisions()?.should_scrape(name).unwrap_or(true))
    }

    /// Value of a variable: the script's assignment or the default.
    pub fn variable(&self, name: &str) -> Result<&Value, EvalError> {
        let unbound = || EvalError::UnboundIdentifier {
            kind: IdentifierKind::Variable,
            name: name.to_string(),
            scope: None,
        };

        if self.variable_def(name).is_none() {
            return Err(unbound());
        }
        self.decisions()?.variable(name).ok_or_else(unbound)
    }

    /// Check the script against the declared schema without looking at any
    /// attribute value. Call it once all declarations are done.
    pub fn validate(&self) -> Result<(), EvalError> {
        self.interpreter.check(&self.context())
    }

    /// Human-readable listing of every component, attribute and variable.
    pub fn detail(&self) -> String {
        let mut lines = format!("Spider: {}\n", self.spider_name);

        if !self.components.is_empty() {
            lines.push_str("\nComponents:\n");
        }
        for component in &self.components {
            let symbol = component
                .symbol()
                .map(String::from)
                .unwrap_or_else(|| "-".to_string());
            lines.push_str(&format!("{} ({}):\n", component.name(), symbol));
            if !component.info().is_empty() {
                lines.push_str(&format!("    {}\n", component.info()));
            }
            for attribute in component.attributes() {
                let info = match attribute.info() {
                    "" => "(No info available)",
                    info => info,
                };
                lines.push_str(&format!("    {}:\n", attribute.name()));
                lines.push_str(&format!("        Info : {}\n", info));
            }
        }

        if !self.variables.is_empty() {
            lines.push_str("\nVariables:\n");
        }
        for variable in &self.variables {
            let info = match variable.info() {
                "" => "(No info available)",
                info => info,
            };
            lines.push_str(&format!("@{}:\n", variable.name()));
            lines.push_str(&format!("    Input type    : {}\n", variable.var_type().name()));
            lines.push_str(&format!("    Default value : {}\n", variable.default()));
            lines.push_str(&format!("    Info          : {}\n", info));
        }

        lines
    }
}
