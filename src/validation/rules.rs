use serde::Serialize;

/// A single failed rule: which property, and what to tell the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub property_name: String,
    pub error_message: String,
}

/// Inspects one request type and reports every rule it breaks.
///
/// Implementations must be pure: the same input always yields the same
/// failures, in the same order.
pub trait Validator<R>: Send + Sync {
    fn validate(&self, instance: &R) -> Vec<ValidationFailure>;
}

/// Values that have an "empty" state besides being absent.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for i32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

trait Rule<T>: Send + Sync {
    fn evaluate(&self, instance: &T, prefix: &str, failures: &mut Vec<ValidationFailure>);
}

/// Ordered list of property rules for one type.
pub struct RuleSet<T> {
    rules: Vec<Box<dyn Rule<T>>>,
}

impl<T: 'static> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a property rule. Rules run in the order they were added.
    pub fn rule<V: 'static>(mut self, property: Property<T, V>) -> Self {
        self.rules.push(Box::new(property));
        self
    }

    pub fn evaluate(&self, instance: &T) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        self.evaluate_into(instance, "", &mut failures);
        failures
    }

    fn evaluate_into(&self, instance: &T, prefix: &str, failures: &mut Vec<ValidationFailure>) {
        for rule in &self.rules {
            rule.evaluate(instance, prefix, failures);
        }
    }
}

impl<T: 'static> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Validator<T> for RuleSet<T> {
    fn validate(&self, instance: &T) -> Vec<ValidationFailure> {
        self.evaluate(instance)
    }
}

type Selector<T, V> = Box<dyn Fn(&T) -> Option<&V> + Send + Sync>;
type Predicate<V> = Box<dyn Fn(Option<&V>) -> bool + Send + Sync>;

struct Check<V> {
    predicate: Predicate<V>,
    message: String,
}

/// Checks attached to one (optional) property of `T`.
///
/// Every check runs, in declaration order, and each failing check produces
/// its own failure. Child rules run only when the property is present, so a
/// missing parent never trips rules on its fields.
pub struct Property<T, V> {
    name: &'static str,
    selector: Selector<T, V>,
    checks: Vec<Check<V>>,
    children: Option<RuleSet<V>>,
}

impl<T: 'static, V: 'static> Property<T, V> {
    pub fn new<F>(name: &'static str, selector: F) -> Self
    where
        F: Fn(&T) -> Option<&V> + Send + Sync + 'static,
    {
        Self {
            name,
            selector: Box::new(selector),
            checks: Vec::new(),
            children: None,
        }
    }

    /// Fails when the property is absent.
    pub fn not_null(self) -> Self {
        let message = format!("'{}' must not be empty.", self.name);
        self.must(|value| value.is_some(), message)
    }

    /// Adds an arbitrary predicate with its failure message.
    pub fn must<P>(mut self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(Option<&V>) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Check {
            predicate: Box::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Replaces the message of the most recently added check only.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            last.message = message.into();
        }
        self
    }

    /// Rules scoped to the property's own fields, reported as `Parent.Child`.
    pub fn child_rules(mut self, rules: RuleSet<V>) -> Self {
        self.children = Some(rules);
        self
    }
}

impl<T: 'static, V: Blank + 'static> Property<T, V> {
    /// Fails when the property is absent or holds its blank value
    /// (whitespace-only text, zero).
    pub fn not_empty(self) -> Self {
        let message = format!("'{}' must not be empty.", self.name);
        self.must(|value| value.is_some_and(|v| !v.is_blank()), message)
    }
}

impl<T: 'static, V: AsRef<str> + 'static> Property<T, V> {
    /// Fails when the text is longer than `max` characters. Absent text passes.
    pub fn maximum_length(self, max: usize) -> Self {
        let message = format!(
            "The length of '{}' must be {} characters or fewer.",
            self.name, max
        );
        self.must(
            move |value| value.map_or(true, |v| v.as_ref().chars().count() <= max),
            message,
        )
    }
}

impl<T: 'static, V: 'static> Rule<T> for Property<T, V> {
    fn evaluate(&self, instance: &T, prefix: &str, failures: &mut Vec<ValidationFailure>) {
        let path = if prefix.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", prefix, self.name)
        };

        let value = (self.selector)(instance);
        for check in &self.checks {
            if !(check.predicate)(value) {
                failures.push(ValidationFailure {
                    property_name: path.clone(),
                    error_message: check.message.clone(),
                });
            }
        }

        if let (Some(children), Some(value)) = (&self.children, value) {
            children.evaluate_into(value, &path, failures);
        }
    }
}
