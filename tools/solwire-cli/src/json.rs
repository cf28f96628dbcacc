//! JSON form of layout values.
//!
//! Structs are objects keyed by field name. Enum values are either the bare
//! variant name (`"HelloWorld"`) or `{"variant": .., "fields": {..}}`.
//! Integers that fit in a `u64` are JSON numbers; wider `u128` values are
//! decimal strings, which are also accepted on input for any width.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Map, Value as Json};
use solwire_layout::{EnumValue, FieldDef, Primitive, Schema, StructValue, Value};

pub fn value_from_json(schema: &Schema, json: &Json) -> Result<Value> {
    match schema {
        Schema::Struct(s) => {
            let object = json
                .as_object()
                .with_context(|| format!("`{}` expects a JSON object", s.name))?;
            Ok(fields_from_json(&s.name, &s.fields, object)?.into())
        }
        Schema::Enum(e) => {
            let (variant, fields) = match json {
                Json::String(name) => (name.as_str(), None),
                Json::Object(object) => {
                    let name = object
                        .get("variant")
                        .and_then(Json::as_str)
                        .with_context(|| format!("`{}` expects a `variant` name", e.name))?;
                    (name, object.get("fields"))
                }
                _ => bail!("`{}` expects a variant name or object", e.name),
            };
            let (_, def) = e.find_variant(variant)?;
            let payload = match (&def.payload, fields) {
                (Some(defs), Some(fields)) => {
                    let object = fields
                        .as_object()
                        .with_context(|| format!("`{variant}` fields must be an object"))?;
                    Some(fields_from_json(variant, defs, object)?)
                }
                (Some(_), None) => Some(StructValue::new()),
                (None, Some(_)) => bail!("variant `{variant}` carries no fields"),
                (None, None) => None,
            };
            Ok(EnumValue {
                variant: variant.to_owned(),
                payload,
            }
            .into())
        }
    }
}

/// Fields absent from `object` are left out so the encoder reports them.
fn fields_from_json(owner: &str, defs: &[FieldDef], object: &Map<String, Json>) -> Result<StructValue> {
    if let Some(extra) = object.keys().find(|k| !defs.iter().any(|d| &d.name == *k)) {
        bail!("`{owner}` has no field `{extra}`");
    }
    let mut out = StructValue::with_capacity(defs.len());
    for def in defs {
        if let Some(json) = object.get(&def.name) {
            let raw = integer_from_json(json).with_context(|| format!("field `{owner}.{}`", def.name))?;
            let value = Primitive::from_u128(def.ty, raw)
                .ok_or_else(|| anyhow!("field `{owner}.{}`: {raw} does not fit in {}", def.name, def.ty))?;
            out.push(def.name.clone(), value);
        }
    }
    Ok(out)
}

fn integer_from_json(json: &Json) -> Result<u128> {
    match json {
        Json::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| anyhow!("{n} is not an unsigned integer")),
        Json::String(s) => s
            .parse::<u128>()
            .with_context(|| format!("`{s}` is not an unsigned integer")),
        other => bail!("expected an integer, found {other}"),
    }
}

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Struct(s) => fields_to_json(s),
        Value::Enum(e) => match &e.payload {
            None => json!({ "variant": e.variant }),
            Some(payload) => json!({ "variant": e.variant, "fields": fields_to_json(payload) }),
        },
    }
}

fn fields_to_json(s: &StructValue) -> Json {
    let object = s
        .fields
        .iter()
        .map(|(name, value)| (name.clone(), primitive_to_json(*value)))
        .collect();
    Json::Object(object)
}

fn primitive_to_json(value: Primitive) -> Json {
    let raw = value.as_u128();
    match u64::try_from(raw) {
        Ok(n) => Json::from(n),
        Err(_) => Json::String(raw.to_string()),
    }
}
