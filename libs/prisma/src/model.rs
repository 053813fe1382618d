use std::fmt;

use crate::types::ScalarType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArity {
  Required,
  Optional,
  List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
  Scalar(ScalarType),
  Model(String),
}

impl FieldType {
  /// Name of the referenced model, for relation fields.
  pub fn model_name(&self) -> Option<&str> {
    match self {
      FieldType::Model(name) => Some(name.as_str()),
      FieldType::Scalar(_) => None,
    }
  }
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldType::Scalar(scalar) => write!(f, "{}", scalar),
      FieldType::Model(name) => f.write_str(name),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
  Cascade,
  SetNull,
}

impl fmt::Display for ReferentialAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReferentialAction::Cascade => f.write_str("Cascade"),
      ReferentialAction::SetNull => f.write_str("SetNull"),
    }
  }
}

/// The `@relation(...)` attribute of a relation field.
///
/// The side holding `fields`/`references` owns the foreign key; the other side is the
/// back-reference and only carries the relation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
  pub name: String,
  pub fields: Vec<String>,
  pub references: Vec<String>,
  pub on_delete: Option<ReferentialAction>,
}

impl Relation {
  pub fn back_reference(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fields: Vec::new(),
      references: Vec::new(),
      on_delete: None,
    }
  }

  pub fn foreign_key(
    name: impl Into<String>,
    field: impl Into<String>,
    on_delete: ReferentialAction,
  ) -> Self {
    Self {
      name: name.into(),
      fields: vec![field.into()],
      references: vec!["id".to_string()],
      on_delete: Some(on_delete),
    }
  }

  pub fn owns_foreign_key(&self) -> bool {
    !self.fields.is_empty()
  }
}

impl fmt::Display for Relation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "@relation(\"{}\"", self.name)?;

    if self.owns_foreign_key() {
      write!(
        f,
        ", fields: [{}], references: [{}]",
        self.fields.join(", "),
        self.references.join(", ")
      )?;
    }

    if let Some(action) = self.on_delete {
      write!(f, ", onDelete: {}", action)?;
    }

    f.write_str(")")
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelField {
  pub name: String,
  pub ty: FieldType,
  pub arity: FieldArity,
  pub attributes: Vec<String>,
  pub relation: Option<Relation>,
  pub comment: Option<String>,
}

impl ModelField {
  pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
    Self {
      name: name.into(),
      ty: FieldType::Scalar(scalar),
      arity: FieldArity::Required,
      attributes: Vec::new(),
      relation: None,
      comment: None,
    }
  }

  pub fn relation(
    name: impl Into<String>,
    model: impl Into<String>,
    arity: FieldArity,
    relation: Relation,
  ) -> Self {
    Self {
      name: name.into(),
      ty: FieldType::Model(model.into()),
      arity,
      attributes: Vec::new(),
      relation: Some(relation),
      comment: None,
    }
  }

  pub fn optional(mut self) -> Self {
    self.arity = FieldArity::Optional;
    self
  }

  pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
    self.attributes.push(attribute.into());
    self
  }

  pub fn comment(mut self, comment: impl Into<String>) -> Self {
    self.comment = Some(comment.into());
    self
  }
}

impl fmt::Display for ModelField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let modifier = match self.arity {
      FieldArity::Required => "",
      FieldArity::Optional => "?",
      FieldArity::List => "[]",
    };
    write!(f, "  {} {}{}", self.name, self.ty, modifier)?;

    for attribute in &self.attributes {
      write!(f, " {}", attribute)?;
    }

    if let Some(relation) = &self.relation {
      write!(f, " {}", relation)?;
    }

    if let Some(comment) = &self.comment {
      write!(f, " // {}", comment)?;
    }

    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
  pub name: String,
  pub fields: Vec<ModelField>,
}

impl Model {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fields: Vec::new(),
    }
  }

  pub fn field(mut self, field: ModelField) -> Self {
    self.fields.push(field);
    self
  }

  pub fn push(&mut self, field: ModelField) {
    self.fields.push(field);
  }

  pub fn get(&self, name: &str) -> Option<&ModelField> {
    self.fields.iter().find(|f| f.name == name)
  }

  pub fn field_names(&self) -> Vec<&str> {
    self.fields.iter().map(|f| f.name.as_str()).collect()
  }
}

impl fmt::Display for Model {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "model {} {{", self.name)?;
    for field in &self.fields {
      writeln!(f, "{}", field)?;
    }
    writeln!(f, "}}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_scalar_fields() {
    let field = ModelField::scalar("speed", ScalarType::Float).optional();
    assert_eq!(field.to_string(), "  speed Float?");

    let field = ModelField::scalar("odp", ScalarType::String).attribute("@unique");
    assert_eq!(field.to_string(), "  odp String @unique");

    let field = ModelField::scalar("status", ScalarType::Int)
      .attribute("@default(0)")
      .comment("0 ready");
    assert_eq!(field.to_string(), "  status Int @default(0) // 0 ready");
  }

  #[test]
  fn renders_relations() {
    let forward = ModelField::relation(
      "task",
      "task",
      FieldArity::Required,
      Relation::foreign_key("task_extra_rel", "id", ReferentialAction::Cascade),
    );
    assert_eq!(
      forward.to_string(),
      r#"  task task @relation("task_extra_rel", fields: [id], references: [id], onDelete: Cascade)"#
    );

    let back = ModelField::relation(
      "task_extra",
      "task_extra",
      FieldArity::List,
      Relation::back_reference("task_extra_rel"),
    );
    assert_eq!(
      back.to_string(),
      r#"  task_extra task_extra[] @relation("task_extra_rel")"#
    );
  }

  #[test]
  fn renders_model_block() {
    let model = Model::new("job_card_press")
      .field(ModelField::scalar("id", ScalarType::BigInt).attribute("@id"))
      .field(ModelField::scalar("temperature", ScalarType::Float).optional());

    assert_eq!(
      model.to_string(),
      "model job_card_press {\n  id BigInt @id\n  temperature Float?\n}\n"
    );
    assert_eq!(model.field_names(), vec!["id", "temperature"]);
    assert!(model.get("temperature").is_some());
  }
}
