use solwire_buffers::Writer;
use tracing::{debug, trace};

use crate::schema::{EnumSchema, FieldDef, Schema, StructSchema};
use crate::size_table::{fields_size, variant_size};
use crate::value::{EnumValue, Primitive, StructValue, Value};
use crate::LayoutError;

/// Encodes `value` into a buffer allocated once at its exact size.
pub fn encode(schema: &Schema, value: &Value) -> Result<Vec<u8>, LayoutError> {
    let size = encoded_len(schema, value)?;
    let mut encoder = LayoutEncoder::with_capacity(size);
    encoder.write_value(schema, value)?;
    debug_assert_eq!(encoder.writer.len(), size);
    trace!(type_name = schema.name(), size, "encoded value");
    Ok(encoder.writer.flush())
}

/// Appends the encoding of `value` to `writer`.
///
/// Values are fully checked before anything is written, so on error nothing
/// is appended. Several records can be packed into one buffer back to back.
pub fn encode_into(
    schema: &Schema,
    value: &Value,
    writer: &mut Writer,
) -> Result<(), LayoutError> {
    let size = encoded_len(schema, value)?;
    writer.ensure_capacity(size);
    let mut encoder = LayoutEncoder {
        writer: std::mem::take(writer),
    };
    let result = encoder.write_value(schema, value);
    *writer = encoder.writer;
    result
}

/// Length `encode` would produce for this particular value.
///
/// Only the variant is taken from `value`; field contents are not checked.
pub fn encoded_len(schema: &Schema, value: &Value) -> Result<usize, LayoutError> {
    match (schema, value) {
        (Schema::Struct(s), Value::Struct(_)) => Ok(fields_size(&s.fields)),
        (Schema::Enum(e), Value::Enum(v)) => e
            .find_variant(&v.variant)
            .map(|(_, def)| variant_size(def)),
        _ => Err(kind_mismatch(schema)),
    }
}

/// Layout encoder writing into an owned [`Writer`].
pub struct LayoutEncoder {
    pub writer: Writer,
}

impl Default for LayoutEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: Writer::with_capacity(capacity),
        }
    }

    /// Encodes one value and returns the bytes, leaving the encoder empty.
    pub fn encode(&mut self, schema: &Schema, value: &Value) -> Result<Vec<u8>, LayoutError> {
        self.writer.reset();
        self.write_value(schema, value)?;
        Ok(self.writer.flush())
    }

    pub fn write_value(&mut self, schema: &Schema, value: &Value) -> Result<(), LayoutError> {
        match (schema, value) {
            (Schema::Struct(s), Value::Struct(v)) => self.write_struct(s, v),
            (Schema::Enum(e), Value::Enum(v)) => self.write_enum(e, v),
            _ => Err(kind_mismatch(schema)),
        }
    }

    pub fn write_struct(
        &mut self,
        schema: &StructSchema,
        value: &StructValue,
    ) -> Result<(), LayoutError> {
        self.write_fields(&schema.name, &schema.fields, value)
    }

    pub fn write_enum(
        &mut self,
        schema: &EnumSchema,
        value: &EnumValue,
    ) -> Result<(), LayoutError> {
        let (tag, variant) = schema.find_variant(&value.variant).inspect_err(|err| {
            debug!(type_name = %schema.name, %err, "cannot encode enum");
        })?;
        match (&variant.payload, &value.payload) {
            (None, None) => {
                self.writer.u8(tag);
                Ok(())
            }
            (Some(fields), Some(payload)) => {
                let owner = format!("{}::{}", schema.name, variant.name);
                check_fields(&owner, fields, payload)?;
                self.writer.u8(tag);
                self.write_checked_fields(fields, payload);
                Ok(())
            }
            (None, Some(_)) => Err(LayoutError::UnexpectedPayload {
                type_name: schema.name.clone(),
                variant: variant.name.clone(),
            }),
            (Some(_), None) => Err(LayoutError::MissingPayload {
                type_name: schema.name.clone(),
                variant: variant.name.clone(),
            }),
        }
    }

    /// Writes `value` field by field in declaration order.
    ///
    /// All fields are checked before the first byte is written.
    fn write_fields(
        &mut self,
        owner: &str,
        fields: &[FieldDef],
        value: &StructValue,
    ) -> Result<(), LayoutError> {
        check_fields(owner, fields, value)?;
        self.write_checked_fields(fields, value);
        Ok(())
    }

    fn write_checked_fields(&mut self, fields: &[FieldDef], value: &StructValue) {
        for field in fields {
            if let Some(p) = value.get(&field.name) {
                self.write_primitive(p);
            }
        }
    }

    #[inline]
    pub fn write_primitive(&mut self, value: Primitive) {
        match value {
            Primitive::U8(v) => self.writer.u8(v),
            Primitive::U16(v) => self.writer.u16(v),
            Primitive::U32(v) => self.writer.u32(v),
            Primitive::U64(v) => self.writer.u64(v),
            Primitive::U128(v) => self.writer.u128(v),
        }
    }
}

fn check_fields(owner: &str, fields: &[FieldDef], value: &StructValue) -> Result<(), LayoutError> {
    for field in fields {
        let found = value.get(&field.name).ok_or_else(|| LayoutError::MissingField {
            type_name: owner.to_owned(),
            field: field.name.clone(),
        })?;
        if found.field_type() != field.ty {
            return Err(LayoutError::FieldTypeMismatch {
                type_name: owner.to_owned(),
                field: field.name.clone(),
                expected: field.ty,
                found: found.field_type(),
            });
        }
    }
    if let Some((extra, _)) = value
        .fields
        .iter()
        .find(|(name, _)| !fields.iter().any(|f| &f.name == name))
    {
        return Err(LayoutError::UnknownField {
            type_name: owner.to_owned(),
            field: extra.clone(),
        });
    }
    Ok(())
}

fn kind_mismatch(schema: &Schema) -> LayoutError {
    LayoutError::KindMismatch {
        type_name: schema.name().to_owned(),
        expected: schema.kind(),
    }
}
