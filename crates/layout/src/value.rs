//! Dynamic values matching a [`Schema`](crate::Schema).

use crate::schema::FieldType;
use crate::LayoutError;

/// A fixed-width unsigned integer tagged with its declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
}

impl Primitive {
    pub fn field_type(self) -> FieldType {
        match self {
            Primitive::U8(_) => FieldType::U8,
            Primitive::U16(_) => FieldType::U16,
            Primitive::U32(_) => FieldType::U32,
            Primitive::U64(_) => FieldType::U64,
            Primitive::U128(_) => FieldType::U128,
        }
    }

    pub fn as_u128(self) -> u128 {
        match self {
            Primitive::U8(v) => v as u128,
            Primitive::U16(v) => v as u128,
            Primitive::U32(v) => v as u128,
            Primitive::U64(v) => v as u128,
            Primitive::U128(v) => v,
        }
    }

    /// Narrows `raw` to `ty`, or `None` if it does not fit.
    pub fn from_u128(ty: FieldType, raw: u128) -> Option<Primitive> {
        Some(match ty {
            FieldType::U8 => Primitive::U8(u8::try_from(raw).ok()?),
            FieldType::U16 => Primitive::U16(u16::try_from(raw).ok()?),
            FieldType::U32 => Primitive::U32(u32::try_from(raw).ok()?),
            FieldType::U64 => Primitive::U64(u64::try_from(raw).ok()?),
            FieldType::U128 => Primitive::U128(raw),
        })
    }
}

/// Rust integer types that map onto exactly one [`FieldType`].
pub trait PrimitiveType: Sized + Copy {
    const FIELD_TYPE: FieldType;

    fn from_primitive(p: Primitive) -> Option<Self>;
}

macro_rules! primitive_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PrimitiveType for $ty {
                const FIELD_TYPE: FieldType = FieldType::$variant;

                fn from_primitive(p: Primitive) -> Option<Self> {
                    match p {
                        Primitive::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Primitive {
                fn from(v: $ty) -> Self {
                    Primitive::$variant(v)
                }
            }
        )*
    };
}

primitive_type! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
}

/// Field values of a struct or variant payload, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructValue {
    pub fields: Vec<(String, Primitive)>,
}

impl StructValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Primitive>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Primitive>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<Primitive> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads field `name` as `T`, failing if it is absent or has another width.
    pub fn require<T: PrimitiveType>(&self, type_name: &str, name: &str) -> Result<T, LayoutError> {
        let value = self.get(name).ok_or_else(|| LayoutError::MissingField {
            type_name: type_name.to_owned(),
            field: name.to_owned(),
        })?;
        T::from_primitive(value).ok_or_else(|| LayoutError::FieldTypeMismatch {
            type_name: type_name.to_owned(),
            field: name.to_owned(),
            expected: T::FIELD_TYPE,
            found: value.field_type(),
        })
    }
}

/// A tagged-union value: the variant name plus its payload, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub variant: String,
    pub payload: Option<StructValue>,
}

impl EnumValue {
    pub fn unit(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            payload: None,
        }
    }

    pub fn with_payload(variant: impl Into<String>, payload: StructValue) -> Self {
        Self {
            variant: variant.into(),
            payload: Some(payload),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Struct(StructValue),
    Enum(EnumValue),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Struct(_) => "struct",
            Value::Enum(_) => "enum",
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            Value::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            Value::Struct(_) => None,
        }
    }

    pub fn into_struct(self, type_name: &str) -> Result<StructValue, LayoutError> {
        match self {
            Value::Struct(s) => Ok(s),
            Value::Enum(_) => Err(LayoutError::KindMismatch {
                type_name: type_name.to_owned(),
                expected: "struct",
            }),
        }
    }

    pub fn into_enum(self, type_name: &str) -> Result<EnumValue, LayoutError> {
        match self {
            Value::Enum(e) => Ok(e),
            Value::Struct(_) => Err(LayoutError::KindMismatch {
                type_name: type_name.to_owned(),
                expected: "enum",
            }),
        }
    }
}

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Self {
        Value::Struct(s)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}
