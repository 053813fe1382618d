use std::fs;

use clap::Parser;
use deploygen::{cli::Cli, run};

fn cli(args: &[&str]) -> Cli {
  Cli::try_parse_from(std::iter::once("deploygen").chain(args.iter().copied())).unwrap()
}

fn write_input_config(root: &std::path::Path, config: serde_json::Value) {
  let dir = root.join("input_config");
  fs::create_dir_all(&dir).unwrap();
  fs::write(dir.join("config.json"), serde_json::to_string_pretty(&config).unwrap()).unwrap();
}

#[test]
fn all_runs_sync_prisma_and_compose() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().to_str().unwrap();

  write_input_config(
    dir.path(),
    serde_json::json!({
      "product_line": "recipe",
      "config_fe_be": {
        "image_name_fe_job": "tasker_app",
        "config_content": {
          "sources": [
            { "source": "recipe_step", "generic_fields": true, "fields": { "odp": { "type": "String" } } }
          ]
        }
      },
      "rw_configs": {}
    }),
  );

  run(&cli(&["all", "acme", "--root", root])).unwrap();

  assert!(dir.path().join("config_fe_be/config.json").is_file());

  let schema = fs::read_to_string(dir.path().join("prisma_schema/schema.prisma")).unwrap();
  assert!(schema.contains("model recipe_metadata {"));
  assert!(schema.contains("model recipe_step {"));

  let compose = fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap();
  assert!(compose.contains("image: acme/tasker_app"));
}

#[test]
fn cli_product_line_wins_over_the_input_config() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().to_str().unwrap();

  write_input_config(
    dir.path(),
    serde_json::json!({
      "product_line": "recipe",
      "config_fe_be": {
        "config_content": {
          "sources": [
            { "source": "task", "generic_fields": true, "fields": { "odp": { "type": "String" } } }
          ]
        }
      }
    }),
  );

  run(&cli(&["sync", "--root", root])).unwrap();
  run(&cli(&["prisma", "--root", root, "--product-line", "job_card"])).unwrap();

  let schema = fs::read_to_string(dir.path().join("prisma_schema/schema.prisma")).unwrap();
  assert!(schema.contains("model job_card_metadata {"));
}

#[test]
fn compose_without_input_config_fails() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().to_str().unwrap();

  let err = run(&cli(&["compose", "acme", "--root", root])).unwrap_err();
  assert!(format!("{:#}", err).contains("failed to load input config"));
  assert!(!dir.path().join("docker-compose.yml").exists());
}

#[test]
fn dollar_signs_reach_the_generated_files_unchanged() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().to_str().unwrap();
  let content = serde_json::json!({ "label": "cost $5", "sources": [] });

  write_input_config(
    dir.path(),
    serde_json::json!({
      "db_config": { "user": "postgres", "password": "pa$word", "database": "tasks" },
      "config_fe_be": { "config_content": content.clone() }
    }),
  );

  run(&cli(&["sync", "--root", root])).unwrap();
  run(&cli(&["compose", "acme", "--root", root])).unwrap();

  let written: serde_json::Value =
    serde_json::from_str(&fs::read_to_string(dir.path().join("config_fe_be/config.json")).unwrap())
      .unwrap();
  assert_eq!(written, content);

  let compose: serde_yaml::Value =
    serde_yaml::from_str(&fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap()).unwrap();
  assert_eq!(
    compose["services"]["postgres_db"]["environment"]["POSTGRES_PASSWORD"].as_str(),
    Some("pa$word")
  );
}
