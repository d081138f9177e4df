use crate::{ConfigError, FieldConfig};
use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// A single check applied to the value of a field.
///
/// Lengths are counted in UTF-16 code units, like the `maxlength` and
/// `minlength` attributes of an HTML input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum Rule {
    /// The value must not be empty.
    Required,
    /// The value must be at most this many UTF-16 code units long.
    MaxLength(usize),
    /// The value must be at least this many UTF-16 code units long.
    MinLength(usize),
}

impl Rule {
    /// The name of this rule, which is also the tag of the error
    /// message displayed when it fails.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength(_) => "maxlength",
            Rule::MinLength(_) => "minlength",
        }
    }

    /// Returns `true` if `value` passes this rule.
    ///
    /// ## Example
    /// ```
    /// use field_validation::Rule;
    ///
    /// assert!(!Rule::Required.check(""));
    /// assert!(Rule::MaxLength(3).check("abc"));
    /// assert!(!Rule::MinLength(4).check("abc"));
    /// // counts UTF-16 code units: one emoji is a surrogate pair
    /// assert!(Rule::MaxLength(2).check("日本"));
    /// assert!(!Rule::MaxLength(1).check("😀"));
    /// ```
    pub fn check(&self, value: &str) -> bool {
        match *self {
            Rule::Required => required(value),
            Rule::MaxLength(n) => maxlength(value, n),
            Rule::MinLength(n) => minlength(value, n),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required => write!(f, "{}", self.name()),
            Rule::MaxLength(n) | Rule::MinLength(n) => write!(f, "{}={}", self.name(), n),
        }
    }
}

/// `true` iff `value` is non-empty.
pub fn required(value: &str) -> bool {
    !value.is_empty()
}

/// `true` iff `value` is at most `n` UTF-16 code units long.
pub fn maxlength(value: &str, n: usize) -> bool {
    utf16_len(value) <= n
}

/// `true` iff `value` is at least `n` UTF-16 code units long.
pub fn minlength(value: &str, n: usize) -> bool {
    utf16_len(value) >= n
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// An ordered list of [Rule]s. Rules are evaluated, and their
/// failures reported, in the order they were added.
///
/// ## Example
/// ```
/// use field_validation::{Rule, RuleSet};
///
/// let rules = RuleSet::default();
/// assert_eq!(
///     vec![Rule::Required, Rule::MaxLength(8), Rule::MinLength(4)],
///     rules.iter().copied().collect::<Vec<_>>()
/// );
/// assert_eq!(vec!["required", "minlength"], rules.evaluate(""));
/// assert!(rules.evaluate("abcd").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(transparent))]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty `RuleSet`, which accepts every value.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// A factory method to append a rule to this set.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Iterate over the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// The number of rules in this set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if this set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The names of the rules that `value` fails, in declaration
    /// order.
    pub fn evaluate(&self, value: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| !rule.check(value))
            .map(Rule::name)
            .collect()
    }

    /// Read a rule set from the markup of a field.
    ///
    /// `Required` is included when the field carries the required
    /// marker or a `required` data attribute. `MaxLength` and
    /// `MinLength` are read from the `maxlength` and `minlength` data
    /// attributes. The resulting order is always required, maxlength,
    /// minlength.
    ///
    /// ## Example
    /// ```
    /// use field_validation::{ConfigError, FieldConfig, Rule, RuleSet};
    ///
    /// let config = FieldConfig::new(true)
    ///     .attribute("minlength", "2")
    ///     .attribute("placeholder", "name");
    /// let rules = RuleSet::from_config(&config).unwrap();
    /// assert_eq!(RuleSet::new().rule(Rule::Required).rule(Rule::MinLength(2)), rules);
    ///
    /// let config = FieldConfig::new(false).attribute("maxlength", "-1");
    /// assert_eq!(
    ///     Err(ConfigError::invalid_parameter("maxlength", "-1")),
    ///     RuleSet::from_config(&config)
    /// );
    /// ```
    pub fn from_config(config: &FieldConfig) -> Result<Self, ConfigError> {
        let mut rules = RuleSet::new();

        if config.required || config.attributes.contains_key("required") {
            rules = rules.rule(Rule::Required);
        }
        if let Some(n) = length_parameter(config, "maxlength")? {
            rules = rules.rule(Rule::MaxLength(n));
        }
        if let Some(n) = length_parameter(config, "minlength")? {
            rules = rules.rule(Rule::MinLength(n));
        }

        Ok(rules)
    }
}

fn length_parameter(config: &FieldConfig, rule: &'static str) -> Result<Option<usize>, ConfigError> {
    match config.attributes.get(rule) {
        Some(value) => usize::from_str(value.trim())
            .map(Some)
            .map_err(|_| ConfigError::invalid_parameter(rule, value.as_str())),
        None => Ok(None),
    }
}

/// The fixed rule set used when a field is bound without an explicit
/// configuration: required, at most 8 and at least 4 characters.
impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::new()
            .rule(Rule::Required)
            .rule(Rule::MaxLength(8))
            .rule(Rule::MinLength(4))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
