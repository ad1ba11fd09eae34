//! Defensive traversal of parsed command output.
//!
//! Records coming back from a device are loosely shaped: a field may be a
//! list on one platform and a string on another, or missing altogether.
//! [`SafeAccessor`] walks a [`Value`] by a path of keys and indices and
//! reports a broken path as `None` instead of panicking.

use std::fmt;

use serde_json::Value;

use crate::diagnostics::DiscoveryLog;

/// One step of a traversal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep<'a> {
    /// Look up a key in a JSON object.
    Key(&'a str),
    /// Index into a JSON array.
    Index(usize),
}

impl fmt::Display for PathStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{:?}", key),
            PathStep::Index(index) => write!(f, "{}", index),
        }
    }
}

impl<'a> From<&'a str> for PathStep<'a> {
    fn from(key: &'a str) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep<'_> {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// Why a step could not be taken.
fn step_failure(current: &Value, step: &PathStep<'_>) -> &'static str {
    match (current, step) {
        (Value::Object(_), PathStep::Key(_)) => "key not found",
        (Value::Array(_), PathStep::Index(_)) => "index out of range",
        _ => "value is not indexable by this step",
    }
}

fn take_step<'v>(current: &'v Value, step: &PathStep<'_>) -> Option<&'v Value> {
    match (current, step) {
        (Value::Object(map), PathStep::Key(key)) => map.get(*key),
        (Value::Array(items), PathStep::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Path-based lookups that never fail.
///
/// When a lookup is given a `log_path`, a broken path is reported as an
/// info message naming the path and the step where traversal stopped.
#[derive(Clone, Copy)]
pub struct SafeAccessor<'l> {
    log: &'l dyn DiscoveryLog,
}

impl<'l> SafeAccessor<'l> {
    pub fn new(log: &'l dyn DiscoveryLog) -> Self {
        Self { log }
    }

    /// Walk `source` along `path`.
    ///
    /// Returns the value at the end of the path, whatever its type, or
    /// `None` if any step hits a missing key, an out-of-range index or a
    /// value of the wrong shape. An empty path returns `source` itself.
    pub fn get<'v>(
        &self,
        source: &'v Value,
        path: &[PathStep<'_>],
        log_path: Option<&str>,
    ) -> Option<&'v Value> {
        let mut current = source;
        for step in path {
            match take_step(current, step) {
                Some(next) => current = next,
                None => {
                    if let Some(log_path) = log_path {
                        self.log.info(&format!(
                            "safe_get: {} failed at step {}: {}",
                            log_path,
                            step,
                            step_failure(current, step)
                        ));
                    }
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Like [`get`](Self::get) but falls back to `default`.
    pub fn get_or<'v>(
        &self,
        source: &'v Value,
        path: &[PathStep<'_>],
        default: &'v Value,
        log_path: Option<&str>,
    ) -> &'v Value {
        self.get(source, path, log_path).unwrap_or(default)
    }

    /// Look up a scalar and render it as text.
    ///
    /// Strings are returned as-is and numbers/booleans are formatted.
    /// `null`, empty strings, arrays and objects count as absent, so
    /// `a.or_else(|| b)` chains pick the first field that carries a value.
    pub fn text(
        &self,
        source: &Value,
        path: &[PathStep<'_>],
        log_path: Option<&str>,
    ) -> Option<String> {
        self.get(source, path, log_path).and_then(scalar_text)
    }
}

impl fmt::Debug for SafeAccessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeAccessor").finish_non_exhaustive()
    }
}

/// Render a scalar JSON value as text, treating blanks as absent.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::PathStep::{Index, Key};
    use super::*;
    use crate::diagnostics::{CapturedLog, Level};
    use serde_json::json;

    fn sample() -> Value {
        json!([{
            "hostname": "R1",
            "hardware": ["CSR1000V", "ISR4331"],
            "nested": {"list": [{"deep": 42}]},
            "empty": "",
            "nothing": null
        }])
    }

    #[test]
    fn test_existing_path_matches_direct_traversal() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = sample();

        let found = access.get(&source, &[Index(0), Key("hardware"), Index(1)], None);
        assert_eq!(found, Some(&source[0]["hardware"][1]));

        let deep = access.get(
            &source,
            &[Index(0), Key("nested"), Key("list"), Index(0), Key("deep")],
            None,
        );
        assert_eq!(deep, Some(&json!(42)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_empty_path_returns_source() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = json!("plain");
        assert_eq!(access.get(&source, &[], None), Some(&source));
    }

    #[test]
    fn test_broken_paths_return_default() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = sample();
        let sentinel = json!({"sentinel": true});

        let broken: Vec<Vec<PathStep<'_>>> = vec![
            vec![Index(1)],                            // out of range
            vec![Key("hostname")],                     // key on an array
            vec![Index(0), Key("missing")],            // missing key
            vec![Index(0), Key("hostname"), Index(0)], // index into a string
            vec![Index(0), Key("hardware"), Key("x")], // key on an array
            vec![Index(0), Key("nothing"), Key("x")],  // step through null
        ];

        for path in &broken {
            for default in [Value::Null, json!(0), sentinel.clone()] {
                assert_eq!(access.get_or(&source, path, &default, None), &default);
            }
        }
    }

    #[test]
    fn test_found_value_may_be_any_type() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = sample();
        let found = access.get(&source, &[Index(0), Key("nothing")], None);
        assert_eq!(found, Some(&Value::Null));
    }

    #[test]
    fn test_failure_logged_only_with_log_path() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = sample();

        assert!(access.get(&source, &[Index(5)], None).is_none());
        assert!(log.is_empty());

        assert!(access.get(&source, &[Index(5)], Some("raw[5]")).is_none());
        let messages = log.messages(Level::Info);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("raw[5]"));
        assert!(messages[0].contains("index out of range"));
    }

    #[test]
    fn test_text_treats_blank_as_absent() {
        let log = CapturedLog::new();
        let access = SafeAccessor::new(&log);
        let source = sample();

        assert_eq!(
            access.text(&source, &[Index(0), Key("hostname")], None),
            Some("R1".to_string())
        );
        assert_eq!(access.text(&source, &[Index(0), Key("empty")], None), None);
        assert_eq!(access.text(&source, &[Index(0), Key("nothing")], None), None);
        assert_eq!(access.text(&source, &[Index(0), Key("hardware")], None), None);
        assert_eq!(
            access.text(&source, &[Index(0), Key("nested"), Key("list"), Index(0), Key("deep")], None),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_path_step_display() {
        assert_eq!(PathStep::from("hardware").to_string(), "\"hardware\"");
        assert_eq!(PathStep::from(3usize).to_string(), "3");
    }
}
