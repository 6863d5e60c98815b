use crate::common::value::AttributeValue;
use crate::error::{Error, Result};

use std::collections;

/// Placeholder names mapped to the values they stand for.
pub(crate) type Bindings = collections::HashMap<String, AttributeValue>;

/// Expression text paired with the values its `:placeholders` refer to.
///
/// Used for condition expressions on writes, filter expressions on queries
/// and scans, and update expressions.
///
/// ```rust
/// use keystone_client::common::expression::Expression;
///
/// let expression = Expression::new("age >= :min_age")
///     .with_binding(":min_age", 18);
/// assert!(expression.validate().is_ok());
///
/// let unbound = Expression::new("age >= :min_age");
/// assert!(unbound.validate().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    pub(crate) text: String,
    pub(crate) bindings: collections::HashMap<String, AttributeValue>,
}

impl Expression {
    /// Create an expression with no bindings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bindings: collections::HashMap::new(),
        }
    }

    /// Bind a placeholder; the leading `:` is added when missing.
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.bind(name, value.into());
        self
    }

    pub(crate) fn bind(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.bindings.insert(placeholder_name(name.into()), value);
    }

    /// The expression text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The placeholder bindings.
    pub fn bindings(&self) -> &collections::HashMap<String, AttributeValue> {
        &self.bindings
    }

    /// Every distinct `:placeholder` referenced by the text, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        placeholders(&self.text)
    }

    /// Fail if the text is blank, a placeholder is unbound or a bound value is invalid.
    pub fn validate(&self) -> Result<()> {
        validate_text("expression", &self.text, &self.bindings)?;
        validate_bindings(&self.bindings)
    }

    pub(crate) fn into_parts(self) -> (String, Bindings) {
        (self.text, self.bindings)
    }

    /// Join expressions with `operator`, pooling their bindings.
    ///
    /// Blank expressions are skipped.
    pub(crate) fn merge(operator: &str, expressions: Vec<Self>) -> Self {
        let mut merged = Self::default();
        for expression in expressions {
            merged.bindings.extend(expression.bindings);
            merged.text = join(merged.text, operator, expression.text);
        }
        merged
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

fn join(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

pub(crate) fn placeholder_name(name: String) -> String {
    if name.starts_with(':') {
        name
    } else {
        format!(":{name}")
    }
}

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Collect the distinct `:name` tokens of an expression text.
pub(crate) fn placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(':') {
        let candidate = &rest[start..];
        let length = candidate[1..]
            .find(|c: char| !is_placeholder_char(c))
            .unwrap_or(candidate.len() - 1);
        if length > 0 {
            let placeholder = &candidate[..=length];
            if !found.contains(&placeholder) {
                found.push(placeholder);
            }
        }
        rest = &candidate[length + 1..];
    }
    found
}

/// Fail if `text` references a placeholder missing from `bindings`.
pub(crate) fn check_bindings(text: &str, bindings: &Bindings) -> Result<()> {
    match placeholders(text)
        .into_iter()
        .find(|placeholder| !bindings.contains_key(*placeholder))
    {
        Some(placeholder) => Err(Error::validation(format!(
            "placeholder `{placeholder}` in `{text}` has no binding"
        ))),
        None => Ok(()),
    }
}

/// Fail if `text` is blank or references an unbound placeholder.
pub(crate) fn validate_text(what: &str, text: &str, bindings: &Bindings) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation(format!("{what} must not be empty")));
    }
    check_bindings(text, bindings)
}

/// Fail if any bound value nests too deep or holds a malformed number.
pub(crate) fn validate_bindings(bindings: &Bindings) -> Result<()> {
    for (name, value) in bindings {
        value
            .validate()
            .map_err(|error| Error::validation(format!("binding `{name}`: {error}")))?;
    }
    Ok(())
}

/// Add `incoming` to `bindings`, failing when a placeholder is already bound to another value.
pub(crate) fn merge_bindings(bindings: &mut Bindings, incoming: Bindings) -> Result<()> {
    for (name, value) in incoming {
        match bindings.get(&name) {
            Some(existing) if *existing != value => {
                return Err(Error::validation(format!(
                    "placeholder `{name}` is bound to conflicting values"
                )));
            }
            Some(_) => {}
            None => {
                bindings.insert(name, value);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::none("attribute_exists(email)", vec![])]
    #[case::single("age >= :min", vec![":min"])]
    #[case::several("age BETWEEN :lo AND :hi", vec![":lo", ":hi"])]
    #[case::repeated(":a = :a", vec![":a"])]
    #[case::function_argument("begins_with(email, :prefix)", vec![":prefix"])]
    #[case::underscore_and_digits("x = :value_1", vec![":value_1"])]
    #[case::bare_colon("a : b", vec![])]
    #[case::trailing_colon("a = :", vec![])]
    fn test_placeholders(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(placeholders(text), expected);
    }

    #[rstest]
    #[case::bound(
        Expression::new("age >= :min").with_binding(":min", 18),
        true
    )]
    #[case::bound_without_colon(
        Expression::new("age >= :min").with_binding("min", 18),
        true
    )]
    #[case::unbound(
        Expression::new("age >= :min AND age <= :max").with_binding(":min", 18),
        false
    )]
    #[case::no_placeholders(Expression::new("attribute_not_exists(pk)"), true)]
    #[case::unused_binding(
        Expression::new("attribute_exists(pk)").with_binding(":unused", 1),
        true
    )]
    #[case::blank(Expression::new("  "), false)]
    fn test_validate(#[case] expression: Expression, #[case] ok: bool) {
        assert_eq!(expression.validate().is_ok(), ok);
    }

    #[test]
    fn test_merge() {
        let merged = Expression::merge(
            " AND ",
            vec![
                Expression::new("a = :a").with_binding(":a", 1),
                Expression::default(),
                Expression::new("b = :b").with_binding(":b", 2),
            ],
        );
        assert_eq!(merged.text(), "a = :a AND b = :b");
        assert_eq!(merged.bindings().len(), 2);
    }

    #[test]
    fn test_merge_bindings_rejects_conflicts() {
        let mut bindings = Bindings::from([(":a".to_string(), AttributeValue::from(1))]);
        merge_bindings(
            &mut bindings,
            Bindings::from([
                (":a".to_string(), AttributeValue::from(1)),
                (":b".to_string(), AttributeValue::from(2)),
            ]),
        )
        .unwrap();
        assert_eq!(bindings.len(), 2);
        let conflict = Bindings::from([(":a".to_string(), AttributeValue::from(3))]);
        assert!(merge_bindings(&mut bindings, conflict).unwrap_err().is_validation());
    }
}
