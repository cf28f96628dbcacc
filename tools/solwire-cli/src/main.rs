use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use serde_json::json;
use solwire_layout::programs::test_program;
use solwire_layout::{decode, encode, SchemaSet, SizeTable};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod json;

#[derive(Parser)]
#[command(author, version, about = "Fixed-layout account and instruction codec")]
struct Cli {
    /// JSON array of schemas. Defaults to the bundled test-program layouts.
    #[arg(long, global = true)]
    schemas: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the loaded registry with per-variant sizes.
    Schemas,
    /// Print the encoded size of a type or one of its variants.
    Size {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Encode a JSON value and print it as base64.
    Encode {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        value: String,
    },
    /// Decode base64 data and print the value as JSON.
    Decode {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        data: String,
        /// Decode back-to-back records until the data is used up.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let set = load_schemas(cli.schemas.as_deref())?;
    let output = run(&set, cli.command)?;
    println!("{output}");
    Ok(())
}

fn load_schemas(path: Option<&Path>) -> Result<SchemaSet> {
    let Some(path) = path else {
        return Ok(test_program::schema_set()?);
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let set = SchemaSet::from_json_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), types = set.len(), "loaded schemas");
    Ok(set)
}

fn run(set: &SchemaSet, command: Command) -> Result<String> {
    match command {
        Command::Schemas => {
            let table = SizeTable::build(set);
            let mut types = Vec::with_capacity(set.len());
            for schema in set.iter() {
                let name = schema.name();
                let mut entry = json!({
                    "schema": schema,
                    "size": table.size_of(name, None)?,
                });
                if let solwire_layout::Schema::Enum(e) = schema {
                    let mut sizes = serde_json::Map::new();
                    for v in &e.variants {
                        sizes.insert(v.name.clone(), table.size_of(name, Some(&v.name))?.into());
                    }
                    entry["variant_sizes"] = sizes.into();
                }
                types.push(entry);
            }
            Ok(serde_json::to_string_pretty(&types)?)
        }
        Command::Size { type_name, variant } => {
            let size = SizeTable::build(set).size_of(&type_name, variant.as_deref())?;
            Ok(size.to_string())
        }
        Command::Encode { type_name, value } => {
            let schema = set.get(&type_name)?;
            let input: serde_json::Value = serde_json::from_str(&value).context("parse --value")?;
            let value = json::value_from_json(schema, &input)?;
            let bytes = encode(schema, &value)?;
            Ok(STANDARD.encode(bytes))
        }
        Command::Decode {
            type_name,
            data,
            all,
        } => {
            let schema = set.get(&type_name)?;
            let bytes = STANDARD.decode(data.trim()).context("decode --data as base64")?;
            let mut values = Vec::new();
            let mut rest = bytes.as_slice();
            loop {
                let (value, next) = decode(schema, rest)?;
                if all && next.len() == rest.len() {
                    bail!("`{type_name}` is zero bytes wide; cannot decode it repeatedly");
                }
                values.push(json::value_to_json(&value));
                rest = next;
                if !all || rest.is_empty() {
                    break;
                }
            }
            if all {
                return Ok(serde_json::to_string_pretty(&values)?);
            }
            let Some(value) = values.pop() else {
                bail!("nothing decoded");
            };
            Ok(serde_json::to_string_pretty(&json!({
                "value": value,
                "remainder": STANDARD.encode(rest),
            }))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> SchemaSet {
        test_program::schema_set().unwrap()
    }

    fn encode_cmd(type_name: &str, value: &str) -> Command {
        Command::Encode {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        let cli = Cli::try_parse_from([
            "solwire",
            "decode",
            "--type",
            "TestProgramState",
            "--data",
            "AA==",
            "--all",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Decode { all: true, .. }));
    }

    #[test]
    fn encode_then_decode() {
        let set = bundled();
        let out = run(
            &set,
            encode_cmd(
                "TestProgramInstruction",
                r#"{"variant": "IncrementNumber", "fields": {"amount": 1337}}"#,
            ),
        )
        .unwrap();
        assert_eq!(out, STANDARD.encode([0x01u8, 0x39, 0x05, 0, 0, 0, 0, 0, 0]));

        let decoded = run(
            &set,
            Command::Decode {
                type_name: "TestProgramInstruction".into(),
                data: format!("{out}\n"),
                all: false,
            },
        )
        .unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(
            decoded,
            json!({"value": {"variant": "IncrementNumber", "fields": {"amount": 1337}}, "remainder": ""})
        );
    }

    #[test]
    fn decode_all_records() {
        let set = bundled();
        let data = STANDARD.encode([0x00u8, 0x00, 0x02, 0x01, 0x02, 0, 0, 0, 0, 0, 0, 0]);
        let out = run(
            &set,
            Command::Decode {
                type_name: "TestProgramInstruction".into(),
                data,
                all: true,
            },
        )
        .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            out,
            json!([
                {"variant": "HelloWorld"},
                {"variant": "HelloWorld"},
                {"variant": "RecurseThenIncrementNumber", "fields": {"call_depth": 1, "amount": 2}}
            ])
        );
    }

    #[test]
    fn sizes() {
        let set = bundled();
        let size = |variant: Option<&str>| {
            run(
                &set,
                Command::Size {
                    type_name: "TestProgramInstruction".into(),
                    variant: variant.map(str::to_owned),
                },
            )
            .unwrap()
        };
        assert_eq!(size(Some("HelloWorld")), "1");
        assert_eq!(size(Some("IncrementNumber")), "9");
        assert_eq!(size(None), "10");

        let listing: serde_json::Value =
            serde_json::from_str(&run(&set, Command::Schemas).unwrap()).unwrap();
        assert_eq!(listing[0]["variant_sizes"]["RecurseThenIncrementNumber"], 10);
        assert_eq!(listing[1]["size"], 16);
    }

    #[test]
    fn errors_surface() {
        let set = bundled();
        assert!(run(&set, encode_cmd("Missing", "{}")).is_err());
        assert!(run(&set, encode_cmd("TestProgramInstruction", r#""Nope""#)).is_err());
        let truncated = run(
            &set,
            Command::Decode {
                type_name: "TestProgramState".into(),
                data: STANDARD.encode([0u8; 15]),
                all: false,
            },
        )
        .unwrap_err();
        assert!(truncated.to_string().contains("TestProgramState"));
    }

    #[test]
    fn decode_all_rejects_zero_width_type() {
        let set = SchemaSet::from_json_str(r#"[{"kind": "struct", "name": "Empty", "fields": []}]"#)
            .unwrap();
        let decode_empty = |all: bool| {
            run(
                &set,
                Command::Decode {
                    type_name: "Empty".into(),
                    data: STANDARD.encode([0u8]),
                    all,
                },
            )
        };
        let err = decode_empty(true).unwrap_err();
        assert!(err.to_string().contains("zero bytes wide"));

        let single: serde_json::Value = serde_json::from_str(&decode_empty(false).unwrap()).unwrap();
        assert_eq!(single, json!({"value": {}, "remainder": "AA=="}));
    }

    #[test]
    fn schemas_file() {
        let dir = std::env::temp_dir().join(format!("solwire-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schemas.json");
        fs::write(&path, bundled().to_json_string_pretty().unwrap()).unwrap();
        assert_eq!(load_schemas(Some(path.as_path())).unwrap(), bundled());
        fs::write(&path, "[{\"kind\": \"union\"}]").unwrap();
        assert!(load_schemas(Some(path.as_path())).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
