use std::{cmp::Ordering, collections::BTreeMap, fmt};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    ast::{Clause, Comparator, Condition, Factor, Literal, Logic, Program, Term},
    schema::{Component, IdentifierKind, Variable},
    value::Value,
};

/// Read-only view of a spider's schema and its current attribute values.
///
/// Borrowed from the registry for the duration of one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub components: &'a [Component],
    pub variables: &'a [Variable],
}

impl<'a> EvalContext<'a> {
    pub fn new(components: &'a [Component], variables: &'a [Variable]) -> Self {
        EvalContext {
            components,
            variables,
        }
    }

    /// Find a component by name or symbol
    pub fn component(&self, key: &str) -> Option<&'a Component> {
        self.components.iter().find(|c| c.is_named(key))
    }

    pub fn variable(&self, name: &str) -> Option<&'a Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }
}

/// An attribute the script compares but the spider has not given a value
/// for the current item. The comparison is skipped, not failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedOperand {
    pub component: String,
    pub attribute: String,
}

impl fmt::Display for UnresolvedOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.attribute)
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decisions {
    /// Should-scrape flag of every declared component, by canonical name
    pub components: BTreeMap<String, bool>,

    /// Resolved value of every declared variable
    pub variables: BTreeMap<String, Value>,

    /// Attributes whose comparisons were skipped for lack of a value
    pub unresolved: Vec<UnresolvedOperand>,
}

impl Decisions {
    pub fn should_scrape(&self, component: &str) -> Option<bool> {
        self.components.get(component).copied()
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Errors that can occur during evaluation. All of them are fatal for the
/// script: the operator has to fix it or the spider its schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Script names a component, attribute or variable the spider never declared
    #[error("Undefined {kind} '{name}'{}", in_component(.scope))]
    UnboundIdentifier {
        kind: IdentifierKind,
        name: String,
        /// Component whose block the name appeared in, for attributes
        scope: Option<String>,
    },

    /// Assigned literal does not fit the variable's declared type
    #[error("Cannot assign {value} to the {expected} variable '@{variable}': {reason}")]
    TypeCoercion {
        variable: String,
        value: String,
        expected: String,
        reason: String,
    },

    /// Comparator applied to values it cannot compare
    #[error("In the component '{component}', cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        component: String,
        op: Comparator,
        left: String,
        right: String,
    },
}

fn in_component(scope: &Option<String>) -> String {
    match scope {
        Some(component) => format!(" in the component '{}'", component),
        None => String::new(),
    }
}

/// Returns a type name and value for error messages
fn describe(v: &Value) -> String {
    match v {
        Value::String(s) => format!("string \"{}\"", s),
        other => format!("{} {}", other.type_name(), other),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Boolean(b) => Value::Boolean(*b),
    }
}

/// Partial value of a factor, term or condition. `None` when it depends on
/// an attribute that has no value yet.
type Outcome = Option<Value>;

/// Walks a parsed program against an [`EvalContext`].
///
/// The program is only borrowed: evaluating it any number of times never
/// changes it.
pub struct Evaluator<'a> {
    ctx: EvalContext<'a>,
    unresolved: Vec<UnresolvedOperand>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: EvalContext<'a>) -> Self {
        Evaluator {
            ctx,
            unresolved: vec![],
        }
    }

    /// Evaluates a program against the context's current values.
    ///
    /// # Returns
    ///
    /// The should-scrape flag of every declared component and the resolved
    /// value of every declared variable. Components without a filter block
    /// are kept; variables without an assignment take their default.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrape_filter::{Registry, Value, evaluator::Evaluator, parser::parse};
    ///
    /// let mut registry = Registry::new("", "demo").unwrap();
    /// registry.add_component("post", Some('p'), "A user post").unwrap();
    /// registry.add_component("comment", None, "A reply").unwrap();
    /// registry.add_attribute("post", "score", "Upvotes").unwrap();
    /// registry.set_attr_values("post", [("score", Value::from(60))]).unwrap();
    ///
    /// let program = parse("p { score > 50 }").unwrap();
    /// let decisions = Evaluator::new(registry.context()).evaluate(&program).unwrap();
    ///
    /// assert_eq!(decisions.should_scrape("post"), Some(true));
    /// assert_eq!(decisions.should_scrape("comment"), Some(true));
    /// ```
    pub fn evaluate(&mut self, program: &Program) -> Result<Decisions, EvalError> {
        self.unresolved.clear();
        trace!("Evaluating {} clause(s)", program.clauses.len());

        let mut decisions = Decisions::default();

        for clause in &program.clauses {
            match clause {
                Clause::Filter {
                    component,
                    condition,
                    ..
                } => {
                    let scope = self.resolve_component(component)?;
                    let keep = match self.eval_condition(condition, scope)? {
                        Some(value) => value.as_bool(),
                        None => {
                            debug!(
                                "No operand of the '{}' filter has a value; keeping the item",
                                scope.name()
                            );
                            true
                        }
                    };
                    // Several blocks for one component must all pass
                    decisions
                        .components
                        .entry(scope.name().to_string())
                        .and_modify(|flag| *flag &= keep)
                        .or_insert(keep);
                }
                Clause::Assign {
                    variable, value, ..
                } => {
                    let var = self.resolve_variable(variable)?;
                    let coerced = coerce_literal(var, value)?;
                    decisions.variables.insert(var.name().to_string(), coerced);
                }
            }
        }

        for component in self.ctx.components {
            decisions
                .components
                .entry(component.name().to_string())
                .or_insert(true);
        }
        for variable in self.ctx.variables {
            decisions
                .variables
                .entry(variable.name().to_string())
                .or_insert_with(|| variable.default().clone());
        }

        decisions.unresolved = std::mem::take(&mut self.unresolved);
        Ok(decisions)
    }

    /// Checks every name in the program against the schema, and every
    /// assignment against its variable's type, without looking at any
    /// attribute value.
    pub fn check(&self, program: &Program) -> Result<(), EvalError> {
        for clause in &program.clauses {
            match clause {
                Clause::Filter {
                    component,
                    condition,
                    ..
                } => {
                    let scope = self.resolve_component(component)?;
                    check_condition(condition, scope)?;
                }
                Clause::Assign {
                    variable, value, ..
                } => {
                    let var = self.resolve_variable(variable)?;
                    coerce_literal(var, value)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_component(&self, key: &str) -> Result<&'a Component, EvalError> {
        self.ctx
            .component(key)
            .ok_or_else(|| EvalError::UnboundIdentifier {
                kind: IdentifierKind::Component,
                name: key.to_string(),
                scope: None,
            })
    }

    fn resolve_variable(&self, name: &str) -> Result<&'a Variable, EvalError> {
        self.ctx
            .variable(name)
            .ok_or_else(|| EvalError::UnboundIdentifier {
                kind: IdentifierKind::Variable,
                name: name.to_string(),
                scope: None,
            })
    }

    /// Folds terms strictly left to right; `and` and `or` have the same
    /// precedence.
    fn eval_condition(
        &mut self,
        condition: &Condition,
        scope: &Component,
    ) -> Result<Outcome, EvalError> {
        let mut acc = self.eval_term(&condition.first, scope)?;

        for (logic, term) in &condition.rest {
            let right = self.eval_term(term, scope)?;
            acc = match (acc, right) {
                (Some(left), Some(right)) => Some(Value::Boolean(match logic {
                    Logic::And => left.as_bool() && right.as_bool(),
                    Logic::Or => left.as_bool() || right.as_bool(),
                })),
                (left, right) => {
                    debug!(
                        "An operand has no value assigned. Ignoring the '{}' operation in the component '{}'",
                        logic,
                        scope.name()
                    );
                    left.or(right)
                }
            };
        }

        Ok(acc)
    }

    /// Comparators chain pairwise (`a < b < c` is `a < b` and `b < c`),
    /// stopping at the first pair that fails. A leading `not` negates the
    /// chained result.
    fn eval_term(&mut self, term: &Term, scope: &Component) -> Result<Outcome, EvalError> {
        // Resolve every factor first so unknown attributes always surface
        let operands = term
            .factors()
            .map(|factor| self.eval_factor(factor, scope))
            .collect::<Result<Vec<_>, _>>()?;

        if term.chain.is_empty() {
            let value = operands.into_iter().next().flatten();
            return Ok(match term.negated {
                true => value.map(|v| Value::Boolean(!v.as_bool())),
                false => value,
            });
        }

        let mut chained: Option<bool> = None;
        for (i, (comparator, _)) in term.chain.iter().enumerate() {
            match (&operands[i], &operands[i + 1]) {
                (Some(left), Some(right)) => {
                    let passed = compare(*comparator, left, right, scope)?;
                    chained = Some(passed);
                    if !passed {
                        break;
                    }
                }
                _ => debug!(
                    "An operand has no value assigned. Ignoring the '{}' comparison in the component '{}'",
                    comparator,
                    scope.name()
                ),
            }
        }

        Ok(chained.map(|passed| Value::Boolean(passed != term.negated)))
    }

    fn eval_factor(&mut self, factor: &Factor, scope: &Component) -> Result<Outcome, EvalError> {
        match factor {
            Factor::Literal(literal) => Ok(Some(literal_value(literal))),
            Factor::Attribute(name) => {
                let attribute = scope.attribute(name).ok_or_else(|| unbound_attribute(name, scope))?;
                match attribute.value() {
                    Some(value) if !value.is_null() => Ok(Some(value.clone())),
                    _ => {
                        self.record_unresolved(scope, name);
                        Ok(None)
                    }
                }
            }
            Factor::Group(condition) => self.eval_condition(condition, scope),
        }
    }

    fn record_unresolved(&mut self, scope: &Component, attribute: &str) {
        let operand = UnresolvedOperand {
            component: scope.name().to_string(),
            attribute: attribute.to_string(),
        };
        if !self.unresolved.contains(&operand) {
            debug!("The attribute {} has no value assigned", operand);
            self.unresolved.push(operand);
        }
    }
}

fn unbound_attribute(name: &str, scope: &Component) -> EvalError {
    EvalError::UnboundIdentifier {
        kind: IdentifierKind::Attribute,
        name: name.to_string(),
        scope: Some(scope.name().to_string()),
    }
}

fn check_condition(condition: &Condition, scope: &Component) -> Result<(), EvalError> {
    for term in condition.terms() {
        for factor in term.factors() {
            match factor {
                Factor::Literal(_) => {}
                Factor::Attribute(name) => {
                    if scope.attribute(name).is_none() {
                        return Err(unbound_attribute(name, scope));
                    }
                }
                Factor::Group(inner) => check_condition(inner, scope)?,
            }
        }
    }
    Ok(())
}

fn coerce_literal(variable: &Variable, literal: &Literal) -> Result<Value, EvalError> {
    variable
        .var_type()
        .coerce(&literal_value(literal))
        .map_err(|reason| EvalError::TypeCoercion {
            variable: variable.name().to_string(),
            value: literal.to_string(),
            expected: variable.var_type().name().to_string(),
            reason,
        })
}

fn compare(
    op: Comparator,
    left: &Value,
    right: &Value,
    scope: &Component,
) -> Result<bool, EvalError> {
    let mismatch = || EvalError::TypeMismatch {
        component: scope.name().to_string(),
        op,
        left: describe(left),
        right: describe(right),
    };

    match op {
        Comparator::Equal => Ok(values_equal(left, right)),
        Comparator::NotEqual => Ok(!values_equal(left, right)),
        Comparator::In => contains(right, left).ok_or_else(mismatch),
        Comparator::NotIn => contains(right, left).map(|found| !found).ok_or_else(mismatch),
        Comparator::LessThan
        | Comparator::LessEqual
        | Comparator::GreaterThan
        | Comparator::GreaterEqual => {
            let ordering = ordering(left, right).ok_or_else(mismatch)?;
            Ok(ordering.is_some_and(|ord| match op {
                Comparator::LessThan => ord.is_lt(),
                Comparator::LessEqual => ord.is_le(),
                Comparator::GreaterThan => ord.is_gt(),
                _ => ord.is_ge(),
            }))
        }
    }
}

/// Exact comparison of an integer with a float
fn compare_mixed(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float past i64::MAX
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    let fraction = if float > whole {
        Ordering::Less
    } else if float < whole {
        Ordering::Greater
    } else {
        Ordering::Equal
    };
    Some(int.cmp(&(whole as i64)).then(fraction))
}

/// `None` when the two values cannot be ordered at all, `Some(None)` when
/// they are numbers but one of them is NaN.
fn ordering(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Some(a.partial_cmp(b)),
        (Value::Integer(a), Value::Float(b)) => Some(compare_mixed(*a, *b)),
        (Value::Float(a), Value::Integer(b)) => Some(compare_mixed(*b, *a).map(Ordering::reverse)),
        (Value::String(a), Value::String(b)) => Some(Some(a.cmp(b))),
        (Value::Boolean(a), Value::Boolean(b)) => Some(Some(a.cmp(b))),
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b) == Some(Ordering::Equal),
        (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a) == Some(Ordering::Equal),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => left == right,
    }
}

/// Substring test for strings, membership test for lists
fn contains(haystack: &Value, needle: &Value) -> Option<bool> {
    match (haystack, needle) {
        (Value::String(h), Value::String(n)) => Some(h.contains(n.as_str())),
        (Value::List(items), n) => Some(items.iter().any(|item| values_equal(item, n))),
        _ => None,
    }
}
