use lazy_static::lazy_static;
use regex::{Captures, Regex};

// Interpolation rules follow POSIX parameter expansion:
// https://pubs.opengroup.org/onlinepubs/000095399/basedefs/xbd_chap08.html

lazy_static! {
  static ref ENV_VAR_REGEX: Regex = Regex::new(
    r"(?x)
    \$\$|
    \$\{([[:word:].]+)(?:(:?-|:?\?)([^}]*))?\}",
  )
  // @expected: static pattern, covered by tests
  .unwrap();
}

pub type Warnings = Vec<String>;
pub type Errors = Vec<String>;

/// Source of environment values used while interpolating the input config.
pub trait EnvLookup {
  fn get_var(&self, key: &str) -> Option<String>;
}

impl<F> EnvLookup for F
where
  F: Fn(&str) -> Option<String>,
{
  fn get_var(&self, key: &str) -> Option<String> {
    self(key)
  }
}

/// Replaces `${VAR}`, `${VAR:-default}`, `${VAR-default}`, `${VAR:?message}` and
/// `${VAR?message}` in `input`. `$$` produces a literal `$`. A bare `$VAR` is left untouched.
///
/// Unknown variables without a modifier are replaced with an empty string and reported as
/// warnings. Violated `?` modifiers are reported as errors.
pub fn interpolate(input: &str, env: impl EnvLookup) -> Result<(String, Warnings), Errors> {
  let mut errors = Vec::new();
  let mut warnings = Vec::new();

  let interpolated = ENV_VAR_REGEX
    .replace_all(input, |caps: &Captures| {
      let name = match caps.get(1) {
        Some(m) => m.as_str(),
        None => return "$".to_string(),
      };
      let modifier = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
      let fallback = caps
        .get(3)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
      let value = env.get_var(name);

      match modifier {
        ":-" => match value {
          Some(v) if !v.is_empty() => v,
          _ => fallback,
        },
        "-" => value.unwrap_or(fallback),
        ":?" => match value {
          Some(v) if !v.is_empty() => v,
          _ => {
            errors.push(format!(
              "non-empty env var required in config. name = {:?}, error = {:?}",
              name, fallback
            ));
            String::new()
          }
        },
        "?" => value.unwrap_or_else(|| {
          errors.push(format!(
            "missing env var required in config. name = {:?}, error = {:?}",
            name, fallback
          ));
          String::new()
        }),
        _ => value.unwrap_or_else(|| {
          warnings.push(format!("unknown env var in config. name = {:?}", name));
          String::new()
        }),
      }
    })
    .into_owned();

  if errors.is_empty() {
    Ok((interpolated, warnings))
  } else {
    Err(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn substitutes_known_variables() {
    let (out, warnings) = interpolate(
      r#"{"user": "${DB_USER}", "password": "${DB_PASSWORD}"}"#,
      env(&[("DB_USER", "admin"), ("DB_PASSWORD", "secret")]),
    )
    .unwrap();
    assert_eq!(out, r#"{"user": "admin", "password": "secret"}"#);
    assert!(warnings.is_empty());
  }

  #[test]
  fn bare_dollar_signs_are_kept() {
    let (out, warnings) = interpolate(
      r#"{"password": "pa$word", "label": "cost $5", "tail": "$"}"#,
      env(&[("word", "oops")]),
    )
    .unwrap();
    assert_eq!(out, r#"{"password": "pa$word", "label": "cost $5", "tail": "$"}"#);
    assert!(warnings.is_empty());
  }

  #[test]
  fn applies_defaults() {
    let (out, _) = interpolate(
      "${MISSING:-postgres:16} ${EMPTY:-fallback} ${EMPTY-kept}",
      env(&[("EMPTY", "")]),
    )
    .unwrap();
    assert_eq!(out, "postgres:16 fallback ");
  }

  #[test]
  fn unknown_variable_is_a_warning() {
    let (out, warnings) = interpolate("image: ${NOPE}", env(&[])).unwrap();
    assert_eq!(out, "image: ");
    assert_eq!(warnings.len(), 1);
  }

  #[test]
  fn required_variable_is_an_error() {
    let errors = interpolate("${TOKEN:?token is required} ${OTHER?also}", env(&[])).unwrap_err();
    assert_eq!(errors.len(), 2);
  }

  #[test]
  fn double_dollar_escapes() {
    let (out, warnings) = interpolate("pa$$word", env(&[])).unwrap();
    assert_eq!(out, "pa$word");
    assert!(warnings.is_empty());
  }
}
