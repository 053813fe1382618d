use deploygen_config::ProductLine;

/// Names used for the generated models and relations of one product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorProfile {
  /// Root model every instance model hangs off.
  pub metadata_model: String,
  pub instance_prefix: String,
  pub child_prefix: String,
  /// Field of the main model referencing the metadata model.
  pub metadata_fk_field: String,
  pub metadata_relation: String,
  /// Main model field emitted as a required `@unique` column.
  pub unique_field: String,
}

impl GeneratorProfile {
  pub fn for_product_line(product_line: ProductLine) -> Self {
    match product_line {
      ProductLine::JobCard => Self::with_names("job_card", "task_"),
      ProductLine::Recipe => Self::with_names("recipe", "job_"),
    }
  }

  fn with_names(root: &str, child_prefix: &str) -> Self {
    Self {
      metadata_model: format!("{}_metadata", root),
      instance_prefix: format!("{}_", root),
      child_prefix: child_prefix.to_string(),
      metadata_fk_field: format!("{}_id", root),
      metadata_relation: format!("{}_rel", root),
      unique_field: "odp".to_string(),
    }
  }

  pub fn instance_model_name(&self, directory_name: &str) -> String {
    format!("{}{}", self.instance_prefix, directory_name)
  }

  pub fn child_model_name(&self, source_key: &str) -> String {
    format!("{}{}", self.child_prefix, source_key)
  }
}

impl Default for GeneratorProfile {
  fn default() -> Self {
    Self::for_product_line(ProductLine::default())
  }
}

/// Relation name pairing a generated model with its parent.
pub fn relation_name(model_name: &str) -> String {
  format!("{}_rel", model_name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn job_card_names() {
    let profile = GeneratorProfile::for_product_line(ProductLine::JobCard);
    assert_eq!(profile.metadata_model, "job_card_metadata");
    assert_eq!(profile.metadata_fk_field, "job_card_id");
    assert_eq!(profile.metadata_relation, "job_card_rel");
    assert_eq!(profile.instance_model_name("press_1"), "job_card_press_1");
    assert_eq!(profile.child_model_name("quality"), "task_quality");
    assert_eq!(profile, GeneratorProfile::default());
  }

  #[test]
  fn recipe_names() {
    let profile = GeneratorProfile::for_product_line(ProductLine::Recipe);
    assert_eq!(profile.metadata_model, "recipe_metadata");
    assert_eq!(profile.metadata_fk_field, "recipe_id");
    assert_eq!(profile.instance_model_name("oven"), "recipe_oven");
    assert_eq!(profile.child_model_name("quality"), "job_quality");
  }
}
