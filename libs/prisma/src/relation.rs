use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
  error::{RelationSide, SchemaError},
  model::Model,
};

/// One side of a named relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEnd {
  pub model: String,
  pub field: String,
  pub target: String,
}

impl RelationEnd {
  fn qualified(&self) -> String {
    format!("{}.{}", self.model, self.field)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationPair {
  pub forward: Option<RelationEnd>,
  pub back: Option<RelationEnd>,
}

/// Every named relation of a schema, keyed by relation name.
///
/// Relations are declared on both models; the table makes sure each name is used by exactly one
/// forward field and one back-reference, and that the two point at each other.
#[derive(Debug, Default)]
pub struct RelationTable {
  relations: IndexMap<String, RelationPair>,
}

impl RelationTable {
  pub fn from_models<'a>(models: impl IntoIterator<Item = &'a Model>) -> Result<Self, SchemaError> {
    let models: Vec<&Model> = models.into_iter().collect();
    let mut known = HashSet::with_capacity(models.len());

    for model in &models {
      if !known.insert(model.name.as_str()) {
        return Err(SchemaError::DuplicateModel(model.name.clone()));
      }
    }

    let mut table = RelationTable::default();

    for model in &models {
      for field in &model.fields {
        let (relation, target) = match (&field.relation, field.ty.model_name()) {
          (Some(relation), Some(target)) => (relation, target),
          _ => continue,
        };

        if !known.contains(target) {
          return Err(SchemaError::UnknownRelationTarget {
            name: relation.name.clone(),
            field: format!("{}.{}", model.name, field.name),
            target: target.to_string(),
          });
        }

        let end = RelationEnd {
          model: model.name.clone(),
          field: field.name.clone(),
          target: target.to_string(),
        };
        let side = match relation.owns_foreign_key() {
          true => RelationSide::Forward,
          false => RelationSide::Back,
        };

        table.insert(&relation.name, side, end)?;
      }
    }

    table.validate()?;

    Ok(table)
  }

  fn insert(&mut self, name: &str, side: RelationSide, end: RelationEnd) -> Result<(), SchemaError> {
    let pair = self.relations.entry(name.to_string()).or_default();
    let slot = match side {
      RelationSide::Forward => &mut pair.forward,
      RelationSide::Back => &mut pair.back,
    };

    if let Some(existing) = slot {
      return Err(SchemaError::DuplicateRelation {
        name: name.to_string(),
        side,
        first: existing.qualified(),
        second: end.qualified(),
      });
    }

    *slot = Some(end);

    Ok(())
  }

  fn validate(&self) -> Result<(), SchemaError> {
    for (name, pair) in &self.relations {
      match (&pair.forward, &pair.back) {
        (Some(forward), Some(back)) => {
          if forward.target != back.model || back.target != forward.model {
            return Err(SchemaError::MismatchedRelation {
              name: name.clone(),
              forward: forward.qualified(),
              back: back.qualified(),
            });
          }
        }
        (None, _) => {
          return Err(SchemaError::UnpairedRelation {
            name: name.clone(),
            missing: RelationSide::Forward,
          })
        }
        (_, None) => {
          return Err(SchemaError::UnpairedRelation {
            name: name.clone(),
            missing: RelationSide::Back,
          })
        }
      }
    }

    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&RelationPair> {
    self.relations.get(name)
  }

  pub fn len(&self) -> usize {
    self.relations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.relations.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    model::{FieldArity, ModelField, ReferentialAction, Relation},
    types::ScalarType,
  };

  fn parent_with_child(child_relation: &str, back_relation: &str) -> Vec<Model> {
    vec![
      Model::new("task")
        .field(ModelField::scalar("id", ScalarType::Int).attribute("@id"))
        .field(ModelField::relation(
          "task_a",
          "task_a",
          FieldArity::List,
          Relation::back_reference(back_relation),
        )),
      Model::new("task_a")
        .field(ModelField::scalar("id", ScalarType::Int).attribute("@id"))
        .field(ModelField::relation(
          "task",
          "task",
          FieldArity::Required,
          Relation::foreign_key(child_relation, "id", ReferentialAction::Cascade),
        )),
    ]
  }

  #[test]
  fn pairs_forward_and_back_sides() {
    let models = parent_with_child("task_a_rel", "task_a_rel");
    let table = RelationTable::from_models(&models).unwrap();

    assert_eq!(table.len(), 1);
    let pair = table.get("task_a_rel").unwrap();
    assert_eq!(pair.forward.as_ref().unwrap().model, "task_a");
    assert_eq!(pair.back.as_ref().unwrap().model, "task");
  }

  #[test]
  fn rejects_unpaired_relations() {
    let models = parent_with_child("task_a_rel", "task_b_rel");
    let err = RelationTable::from_models(&models).unwrap_err();

    assert!(matches!(
      err,
      SchemaError::UnpairedRelation {
        missing: RelationSide::Forward,
        ..
      } | SchemaError::UnpairedRelation {
        missing: RelationSide::Back,
        ..
      }
    ));
  }

  #[test]
  fn rejects_a_name_used_twice_on_the_same_side() {
    let mut models = parent_with_child("task_a_rel", "task_a_rel");
    models[0].push(ModelField::relation(
      "other",
      "task_a",
      FieldArity::List,
      Relation::back_reference("task_a_rel"),
    ));

    let err = RelationTable::from_models(&models).unwrap_err();
    match err {
      SchemaError::DuplicateRelation {
        name, side, second, ..
      } => {
        assert_eq!(name, "task_a_rel");
        assert_eq!(side, RelationSide::Back);
        assert_eq!(second, "task.other");
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn rejects_unknown_targets() {
    let mut models = parent_with_child("task_a_rel", "task_a_rel");
    models[1].push(ModelField::relation(
      "ghost",
      "ghost",
      FieldArity::Optional,
      Relation::back_reference("ghost_rel"),
    ));

    assert!(matches!(
      RelationTable::from_models(&models),
      Err(SchemaError::UnknownRelationTarget { target, .. }) if target == "ghost"
    ));
  }

  #[test]
  fn rejects_duplicate_models() {
    let models = vec![Model::new("task"), Model::new("task")];
    assert!(matches!(
      RelationTable::from_models(&models),
      Err(SchemaError::DuplicateModel(name)) if name == "task"
    ));
  }

  #[test]
  fn rejects_sides_that_do_not_point_at_each_other() {
    let mut models = parent_with_child("task_a_rel", "task_a_rel");
    models.push(Model::new("task_b").field(ModelField::relation(
      "task_a",
      "task_a",
      FieldArity::List,
      Relation::back_reference("task_b_rel"),
    )));
    models[1].push(ModelField::relation(
      "task_b",
      "task",
      FieldArity::Optional,
      Relation::foreign_key("task_b_rel", "id", ReferentialAction::SetNull),
    ));

    assert!(matches!(
      RelationTable::from_models(&models),
      Err(SchemaError::MismatchedRelation { name, .. }) if name == "task_b_rel"
    ));
  }
}
