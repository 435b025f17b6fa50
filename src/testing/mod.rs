//! # Assertions & reports
//!
//! Assertions are evaluated against a captured [`HttpResponse`]. A mismatch
//! never aborts a scenario; it is recorded as a failed [`AssertionResult`]
//! so the report can list every difference at once.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::history::ExchangeEntry;
use crate::http::response::HttpResponse;

/// Target of an assertion within the HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum AssertionTarget {
    StatusCode,
    /// Dotted path into the JSON body, e.g. `category.id` or `tags[0].name`.
    JsonPath(String),
    /// Raw body text, compared after trimming whitespace.
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionOperator {
    Equals,
    IsArray,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assertion {
    pub target: AssertionTarget,
    pub operator: AssertionOperator,
    pub expected: Value,
}

impl Assertion {
    pub fn status(expected: u16) -> Self {
        Self {
            target: AssertionTarget::StatusCode,
            operator: AssertionOperator::Equals,
            expected: Value::from(expected),
        }
    }

    pub fn json_eq(path: &str, expected: impl Into<Value>) -> Self {
        Self {
            target: AssertionTarget::JsonPath(path.to_string()),
            operator: AssertionOperator::Equals,
            expected: expected.into(),
        }
    }

    pub fn json_array(path: &str) -> Self {
        Self {
            target: AssertionTarget::JsonPath(path.to_string()),
            operator: AssertionOperator::IsArray,
            expected: Value::Null,
        }
    }

    pub fn body_eq(expected: &str) -> Self {
        Self {
            target: AssertionTarget::Body,
            operator: AssertionOperator::Equals,
            expected: Value::String(expected.to_string()),
        }
    }

    pub fn evaluate(&self, response: &HttpResponse) -> AssertionResult {
        let actual = match &self.target {
            AssertionTarget::StatusCode => Some(Value::from(response.status)),
            AssertionTarget::Body => Some(Value::String(response.body.trim().to_string())),
            AssertionTarget::JsonPath(path) => serde_json::from_str::<Value>(&response.body)
                .ok()
                .and_then(|body| lookup(&body, path).cloned()),
        };

        let passed = match self.operator {
            AssertionOperator::IsArray => actual.as_ref().is_some_and(Value::is_array),
            AssertionOperator::Equals => actual
                .as_ref()
                .is_some_and(|actual| values_match(&self.expected, actual)),
        };

        let actual_text = actual
            .as_ref()
            .map(render)
            .unwrap_or_else(|| "<missing>".to_string());
        let message = if passed {
            String::new()
        } else {
            match self.operator {
                AssertionOperator::IsArray => format!("{}: expected an array, got {}", self.target, actual_text),
                AssertionOperator::Equals => format!(
                    "{}: expected {}, got {}",
                    self.target,
                    render(&self.expected),
                    actual_text
                ),
            }
        };

        AssertionResult {
            assertion: self.clone(),
            passed,
            actual: actual_text,
            message,
        }
    }
}

impl std::fmt::Display for AssertionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssertionTarget::StatusCode => write!(f, "status code"),
            AssertionTarget::JsonPath(path) => write!(f, "json `{path}`"),
            AssertionTarget::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssertionResult {
    pub assertion: Assertion,
    pub passed: bool,
    pub actual: String,
    pub message: String,
}

/// Resolve a dotted path with optional `[n]` indexes against a JSON value.
/// A path may start with an index, e.g. `[2].status` on an array body.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, indexes) = match segment.find('[') {
            Some(pos) => (&segment[..pos], &segment[pos..]),
            None => (segment, ""),
        };
        if !key.is_empty() {
            current = current.get(key)?;
        }
        let mut rest = indexes;
        while let Some(stripped) = rest.strip_prefix('[') {
            let close = stripped.find(']')?;
            let index: usize = stripped[..close].parse().ok()?;
            current = current.get(index)?;
            rest = &stripped[close + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    Some(current)
}

/// Equality with one coercion: a numeric expectation matches a string that
/// parses to the same integer. The delete endpoint reports the id that way.
fn values_match(expected: &Value, actual: &Value) -> bool {
    if expected == actual {
        return true;
    }
    match (expected.as_i64(), actual) {
        (Some(number), Value::String(text)) => text.trim().parse::<i64>() == Ok(number),
        _ => false,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{text}\""),
        other => other.to_string(),
    }
}

/// Outcome of a single scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub priority: u8,
    pub passed: bool,
    pub assertions: Vec<AssertionResult>,
    pub error: Option<String>,
    pub duration_ms: u128,
}

impl ScenarioOutcome {
    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| !a.passed)
    }
}

/// Summary report for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u128,
    pub outcomes: Vec<ScenarioOutcome>,
    pub exchanges: Vec<ExchangeEntry>,
}

impl RunReport {
    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn outcome(&self, scenario: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.scenario == scenario)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "pet-store scenarios against {}", self.base_url);
        for outcome in &self.outcomes {
            let mark = if outcome.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "  [{mark}] {:>2} {} ({} ms)",
                outcome.priority, outcome.scenario, outcome.duration_ms
            );
            if let Some(ref error) = outcome.error {
                let _ = writeln!(out, "         error: {error}");
            }
            for failed in outcome.failed_assertions() {
                let _ = writeln!(out, "         {}", failed.message);
            }
        }
        let _ = writeln!(
            out,
            "{} scenarios, {} passed, {} failed in {} ms",
            self.total, self.passed, self.failed, self.duration_ms
        );
        out
    }
}
