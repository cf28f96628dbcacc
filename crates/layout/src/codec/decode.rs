use solwire_buffers::{BufferError, Reader};
use tracing::{debug, trace};

use crate::schema::{EnumSchema, FieldDef, FieldType, Schema, StructSchema};
use crate::size_table::{fields_size, DISCRIMINANT_SIZE};
use crate::value::{EnumValue, Primitive, StructValue, Value};
use crate::LayoutError;

/// Decodes one value from the front of `data`.
///
/// Returns the value and the unconsumed suffix of `data` (a sub-slice, not a
/// copy), so back-to-back records decode by feeding the remainder back in.
pub fn decode<'a>(schema: &Schema, data: &'a [u8]) -> Result<(Value, &'a [u8]), LayoutError> {
    let mut decoder = LayoutDecoder::new(data);
    let value = decoder.read_value(schema).inspect_err(|err| {
        debug!(type_name = schema.name(), len = data.len(), %err, "decode failed");
    })?;
    let rest = decoder.reader.remainder();
    trace!(
        type_name = schema.name(),
        consumed = data.len() - rest.len(),
        remaining = rest.len(),
        "decoded value"
    );
    Ok((value, rest))
}

/// Like [`decode`] but requires `data` to hold exactly one value.
pub fn decode_exact(schema: &Schema, data: &[u8]) -> Result<Value, LayoutError> {
    let (value, rest) = decode(schema, data)?;
    if !rest.is_empty() {
        return Err(LayoutError::TrailingBytes {
            type_name: schema.name().to_owned(),
            remaining: rest.len(),
        });
    }
    Ok(value)
}

/// Layout decoder reading from a borrowed byte slice.
///
/// Every read checks the full length of the struct or variant before
/// materialising any field, so a failed read never yields a partial value
/// and leaves the cursor at the start of the record.
pub struct LayoutDecoder<'a> {
    pub reader: Reader<'a>,
}

impl<'a> LayoutDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    /// Resets the decoder with a new byte slice to decode from.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.reader.reset(data);
    }

    /// Unconsumed suffix of the input.
    pub fn remainder(&self) -> &'a [u8] {
        self.reader.remainder()
    }

    pub fn read_value(&mut self, schema: &Schema) -> Result<Value, LayoutError> {
        match schema {
            Schema::Struct(s) => self.read_struct(s).map(Value::Struct),
            Schema::Enum(e) => self.read_enum(e).map(Value::Enum),
        }
    }

    pub fn read_struct(&mut self, schema: &StructSchema) -> Result<StructValue, LayoutError> {
        let needed = fields_size(&schema.fields);
        self.reader
            .ensure(needed)
            .map_err(|err| truncated(&schema.name, 0, err))?;
        self.read_fields(&schema.name, &schema.fields)
    }

    pub fn read_enum(&mut self, schema: &EnumSchema) -> Result<EnumValue, LayoutError> {
        let tag = self
            .reader
            .peek()
            .map_err(|err| truncated(&schema.name, 0, err))?;
        let variant = schema
            .variant_at(tag)
            .ok_or_else(|| LayoutError::UnknownDiscriminant {
                type_name: schema.name.clone(),
                tag,
            })?;
        let payload_size = variant.payload.as_deref().map_or(0, fields_size);
        self.reader
            .ensure(DISCRIMINANT_SIZE + payload_size)
            .map_err(|err| truncated(&schema.name, 0, err))?;
        self.reader
            .skip(DISCRIMINANT_SIZE)
            .map_err(|err| truncated(&schema.name, 0, err))?;
        let payload = match &variant.payload {
            None => None,
            Some(fields) => Some(self.read_fields(&schema.name, fields)?),
        };
        Ok(EnumValue {
            variant: variant.name.clone(),
            payload,
        })
    }

    fn read_fields(
        &mut self,
        owner: &str,
        fields: &[FieldDef],
    ) -> Result<StructValue, LayoutError> {
        let mut value = StructValue::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            let p = self
                .read_primitive(field.ty)
                .map_err(|err| truncated(owner, fields_size(&fields[..i]), err))?;
            value.fields.push((field.name.clone(), p));
        }
        Ok(value)
    }

    #[inline]
    pub fn read_primitive(&mut self, ty: FieldType) -> Result<Primitive, BufferError> {
        Ok(match ty {
            FieldType::U8 => Primitive::U8(self.reader.u8()?),
            FieldType::U16 => Primitive::U16(self.reader.u16()?),
            FieldType::U32 => Primitive::U32(self.reader.u32()?),
            FieldType::U64 => Primitive::U64(self.reader.u64()?),
            FieldType::U128 => Primitive::U128(self.reader.u128()?),
        })
    }
}

/// Maps a short read to `TruncatedInput`, counting from the record start.
fn truncated(type_name: &str, already_read: usize, err: BufferError) -> LayoutError {
    match err {
        BufferError::EndOfBuffer { needed, available } => LayoutError::TruncatedInput {
            type_name: type_name.to_owned(),
            needed: already_read + needed,
            available: already_read + available,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction() -> Schema {
        EnumSchema::new("Instruction")
            .unit("HelloWorld")
            .variant("IncrementNumber", [("amount", FieldType::U64)])
            .into()
    }

    #[test]
    fn decodes_unit_variant() {
        let (value, rest) = decode(&instruction(), &[0x00]).unwrap();
        assert_eq!(value, Value::from(EnumValue::unit("HelloWorld")));
        assert!(rest.is_empty());
    }

    #[test]
    fn decodes_payload_variant() {
        let data = [0x01, 0x39, 0x05, 0, 0, 0, 0, 0, 0];
        let (value, rest) = decode(&instruction(), &data).unwrap();
        assert_eq!(
            value,
            Value::from(EnumValue::with_payload(
                "IncrementNumber",
                StructValue::new().with("amount", 1337u64)
            ))
        );
        assert!(rest.is_empty());
    }

    #[test]
    fn remainder_is_the_unconsumed_suffix() {
        let data = [0x00, 0xaa, 0xbb];
        let (_, rest) = decode(&instruction(), &data).unwrap();
        assert_eq!(rest, &[0xaa, 0xbb]);
        assert_eq!(rest.as_ptr(), data[1..].as_ptr());
    }

    #[test]
    fn unknown_discriminant() {
        assert_eq!(
            decode(&instruction(), &[0x02]).unwrap_err(),
            LayoutError::UnknownDiscriminant {
                type_name: "Instruction".into(),
                tag: 2
            }
        );
    }

    #[test]
    fn truncated_payload() {
        assert_eq!(
            decode(&instruction(), &[0x01, 0x39, 0x05]).unwrap_err(),
            LayoutError::TruncatedInput {
                type_name: "Instruction".into(),
                needed: 9,
                available: 3
            }
        );
        assert_eq!(
            decode(&instruction(), &[]).unwrap_err(),
            LayoutError::TruncatedInput {
                type_name: "Instruction".into(),
                needed: 1,
                available: 0
            }
        );
    }

    #[test]
    fn truncated_struct_leaves_cursor() {
        let schema = StructSchema::new("Pair")
            .field("a", FieldType::U32)
            .field("b", FieldType::U32);
        let data = [1, 0, 0, 0, 2, 0];
        let mut decoder = LayoutDecoder::new(&data);
        assert_eq!(
            decoder.read_struct(&schema).unwrap_err(),
            LayoutError::TruncatedInput {
                type_name: "Pair".into(),
                needed: 8,
                available: 6
            }
        );
        assert_eq!(decoder.remainder().len(), 6);
    }

    #[test]
    fn decoder_reset_switches_input() {
        let first = [0x00, 0xff];
        let second = [0x01, 7, 0, 0, 0, 0, 0, 0, 0];
        let schema = instruction();
        let mut decoder = LayoutDecoder::new(&first);
        decoder.read_value(&schema).unwrap();
        assert_eq!(decoder.remainder(), &[0xff]);

        decoder.reset(&second);
        assert_eq!(
            decoder.read_value(&schema).unwrap(),
            Value::from(EnumValue::with_payload(
                "IncrementNumber",
                StructValue::new().with("amount", 7u64)
            ))
        );
        assert!(decoder.remainder().is_empty());
    }

    #[test]
    fn decode_exact_rejects_trailing_bytes() {
        assert_eq!(
            decode_exact(&instruction(), &[0x00, 0x00]).unwrap_err(),
            LayoutError::TrailingBytes {
                type_name: "Instruction".into(),
                remaining: 1
            }
        );
    }
}
