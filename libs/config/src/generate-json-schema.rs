use deploygen_config::InputConfig;
use schemars::schema_for;

const SCHEMA_PATH: &str = "libs/config/deploygen.schema.json";

pub fn main() -> std::io::Result<()> {
  println!("⚙️ Generating JSON schema for deploygen input config...");
  let schema = schema_for!(InputConfig);
  let as_string = serde_json::to_string_pretty(&schema)?;
  println!("✏️ Writing to: {}", SCHEMA_PATH);
  std::fs::write(SCHEMA_PATH, as_string)?;
  println!("✅ Done");

  Ok(())
}
