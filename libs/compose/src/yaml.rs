use serde::Serialize;
use serde_yaml::{Mapping, Value};

const INDENT: usize = 2;

/// Serializes `value` as block-style YAML.
///
/// Keys keep their insertion order and sequences are indented under their key. Strings made of
/// trimmed, non-empty lines ending with a newline (see `FoldedScalar`) are written as folded
/// (`>`) block scalars, so a multi-line shell command reads back as a single line.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
  let value = serde_yaml::to_value(value)?;
  let mut out = String::new();

  match &value {
    Value::Mapping(mapping) if !mapping.is_empty() => write_mapping(&mut out, mapping, 0)?,
    other => {
      write_value(&mut out, other, 0)?;
      out = out.trim_start().to_string();
    }
  }

  Ok(out)
}

fn push_indent(out: &mut String, indent: usize) {
  out.extend(std::iter::repeat(' ').take(indent));
}

fn scalar(value: &Value) -> Result<String, serde_yaml::Error> {
  let rendered = serde_yaml::to_string(value)?;
  Ok(rendered.trim_end_matches('\n').to_string())
}

fn is_foldable(value: &str) -> bool {
  value.ends_with('\n')
    && value
      .lines()
      .all(|line| !line.is_empty() && line.trim() == line)
}

fn quoted(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\t' => out.push_str("\\t"),
      '\r' => out.push_str("\\r"),
      c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

fn write_mapping(out: &mut String, mapping: &Mapping, indent: usize) -> Result<(), serde_yaml::Error> {
  for (key, value) in mapping {
    push_indent(out, indent);
    out.push_str(&scalar(key)?);
    out.push(':');
    write_value(out, value, indent)?;
  }

  Ok(())
}

fn write_sequence(out: &mut String, sequence: &[Value], indent: usize) -> Result<(), serde_yaml::Error> {
  for item in sequence {
    push_indent(out, indent);
    out.push('-');

    match item {
      Value::Mapping(mapping) if !mapping.is_empty() => {
        let mut nested = String::new();
        write_mapping(&mut nested, mapping, indent + INDENT)?;
        out.push(' ');
        out.push_str(&nested[indent + INDENT..]);
      }
      other => write_value(out, other, indent)?,
    }
  }

  Ok(())
}

/// Writes the part following `key:` or `-`, including the trailing newline.
fn write_value(out: &mut String, value: &Value, indent: usize) -> Result<(), serde_yaml::Error> {
  match value {
    Value::Mapping(mapping) if mapping.is_empty() => out.push_str(" {}\n"),
    Value::Mapping(mapping) => {
      out.push('\n');
      write_mapping(out, mapping, indent + INDENT)?;
    }
    Value::Sequence(sequence) if sequence.is_empty() => out.push_str(" []\n"),
    Value::Sequence(sequence) => {
      out.push('\n');
      write_sequence(out, sequence, indent + INDENT)?;
    }
    Value::String(string) if is_foldable(string) => {
      out.push_str(" >\n");
      for line in string.lines() {
        push_indent(out, indent + INDENT);
        out.push_str(line);
        out.push('\n');
      }
    }
    Value::String(string) if string.contains('\n') => {
      out.push(' ');
      out.push_str(&quoted(string));
      out.push('\n');
    }
    Value::Tagged(tagged) => write_value(out, &tagged.value, indent)?,
    other => {
      out.push(' ');
      out.push_str(&scalar(other)?);
      out.push('\n');
    }
  }

  Ok(())
}
