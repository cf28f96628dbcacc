//! Instruction and account layouts of the debugger's test program.
//!
//! The program accepts three instructions. `IncrementNumber` adds `amount`
//! to `property1` and twice `amount` to `property2` of the state account;
//! `RecurseThenIncrementNumber` re-invokes the program with `call_depth - 1`
//! until the depth reaches zero, then increments.

use crate::codec::decode_exact;
use crate::schema::{EnumSchema, FieldType, Schema, SchemaSet, StructSchema};
use crate::typed::Layout;
use crate::value::{EnumValue, StructValue, Value};
use crate::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestProgramInstruction {
    HelloWorld,
    /// Accounts expected:
    ///
    /// 0. `[writable]` test state account, owned by the program.
    IncrementNumber { amount: u64 },
    /// Accounts expected:
    ///
    /// 0. `[writable]` test state account, forwarded to the nested call.
    RecurseThenIncrementNumber { call_depth: u8, amount: u64 },
}

impl TestProgramInstruction {
    pub const TYPE_NAME: &'static str = "TestProgramInstruction";

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::HelloWorld => "HelloWorld",
            Self::IncrementNumber { .. } => "IncrementNumber",
            Self::RecurseThenIncrementNumber { .. } => "RecurseThenIncrementNumber",
        }
    }

    /// Parses instruction data, which must hold exactly one instruction.
    pub fn unpack(input: &[u8]) -> Result<Self, LayoutError> {
        Self::from_value(decode_exact(&Self::schema(), input)?)
    }

    /// The instruction a recursion step invokes next, if any.
    pub fn next_hop(&self) -> Option<Self> {
        match *self {
            Self::RecurseThenIncrementNumber {
                call_depth: 0,
                amount,
            } => Some(Self::IncrementNumber { amount }),
            Self::RecurseThenIncrementNumber { call_depth, amount } => {
                Some(Self::RecurseThenIncrementNumber {
                    call_depth: call_depth - 1,
                    amount,
                })
            }
            Self::HelloWorld | Self::IncrementNumber { .. } => None,
        }
    }
}

impl Layout for TestProgramInstruction {
    fn schema() -> Schema {
        EnumSchema::new(Self::TYPE_NAME)
            .unit("HelloWorld")
            .variant("IncrementNumber", [("amount", FieldType::U64)])
            .variant(
                "RecurseThenIncrementNumber",
                [("call_depth", FieldType::U8), ("amount", FieldType::U64)],
            )
            .into()
    }

    fn to_value(&self) -> Value {
        let name = self.variant_name();
        let value = match *self {
            Self::HelloWorld => EnumValue::unit(name),
            Self::IncrementNumber { amount } => {
                EnumValue::with_payload(name, StructValue::new().with("amount", amount))
            }
            Self::RecurseThenIncrementNumber { call_depth, amount } => EnumValue::with_payload(
                name,
                StructValue::new()
                    .with("call_depth", call_depth)
                    .with("amount", amount),
            ),
        };
        value.into()
    }

    fn from_value(value: Value) -> Result<Self, LayoutError> {
        let EnumValue { variant, payload } = value.into_enum(Self::TYPE_NAME)?;
        match variant.as_str() {
            "HelloWorld" => Ok(Self::HelloWorld),
            "IncrementNumber" => {
                let p = require_payload(payload, &variant)?;
                Ok(Self::IncrementNumber {
                    amount: p.require(Self::TYPE_NAME, "amount")?,
                })
            }
            "RecurseThenIncrementNumber" => {
                let p = require_payload(payload, &variant)?;
                Ok(Self::RecurseThenIncrementNumber {
                    call_depth: p.require(Self::TYPE_NAME, "call_depth")?,
                    amount: p.require(Self::TYPE_NAME, "amount")?,
                })
            }
            other => Err(LayoutError::UnknownVariant {
                type_name: Self::TYPE_NAME.to_owned(),
                variant: other.to_owned(),
            }),
        }
    }
}

fn require_payload(payload: Option<StructValue>, variant: &str) -> Result<StructValue, LayoutError> {
    payload.ok_or_else(|| LayoutError::MissingPayload {
        type_name: TestProgramInstruction::TYPE_NAME.to_owned(),
        variant: variant.to_owned(),
    })
}

/// Account data of the test state account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestProgramState {
    pub property1: u64,
    pub property2: u64,
}

impl TestProgramState {
    pub const TYPE_NAME: &'static str = "TestProgramState";
    /// Account data length.
    pub const LEN: usize = 16;

    /// State after an `IncrementNumber { amount }`, or `None` on overflow.
    pub fn apply_increment(&self, amount: u64) -> Option<Self> {
        Some(Self {
            property1: self.property1.checked_add(amount)?,
            property2: self.property2.checked_add(amount.checked_mul(2)?)?,
        })
    }
}

impl Layout for TestProgramState {
    fn schema() -> Schema {
        StructSchema::new(Self::TYPE_NAME)
            .field("property1", FieldType::U64)
            .field("property2", FieldType::U64)
            .into()
    }

    fn to_value(&self) -> Value {
        StructValue::new()
            .with("property1", self.property1)
            .with("property2", self.property2)
            .into()
    }

    fn from_value(value: Value) -> Result<Self, LayoutError> {
        let s = value.into_struct(Self::TYPE_NAME)?;
        Ok(Self {
            property1: s.require(Self::TYPE_NAME, "property1")?,
            property2: s.require(Self::TYPE_NAME, "property2")?,
        })
    }
}

/// Registry holding both test-program layouts.
pub fn schema_set() -> Result<SchemaSet, LayoutError> {
    SchemaSet::from_schemas([TestProgramInstruction::schema(), TestProgramState::schema()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_typed, encode_typed, size_of_typed};

    #[test]
    fn wire_examples() {
        assert_eq!(
            encode_typed(&TestProgramInstruction::HelloWorld).unwrap(),
            vec![0x00]
        );
        assert_eq!(
            encode_typed(&TestProgramInstruction::IncrementNumber { amount: 1337 }).unwrap(),
            vec![0x01, 0x39, 0x05, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode_typed(&TestProgramInstruction::RecurseThenIncrementNumber {
                call_depth: 3,
                amount: 1
            })
            .unwrap(),
            vec![0x02, 0x03, 0x01, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn unpack_requires_exact_length() {
        assert_eq!(
            TestProgramInstruction::unpack(&[0x01, 0x39, 0x05, 0, 0, 0, 0, 0, 0]),
            Ok(TestProgramInstruction::IncrementNumber { amount: 1337 })
        );
        assert!(matches!(
            TestProgramInstruction::unpack(&[0x00, 0x00]),
            Err(LayoutError::TrailingBytes { remaining: 1, .. })
        ));
        assert!(matches!(
            TestProgramInstruction::unpack(&[0x03]),
            Err(LayoutError::UnknownDiscriminant { tag: 3, .. })
        ));
    }

    #[test]
    fn next_hop_counts_down_to_increment() {
        let mut ix = TestProgramInstruction::RecurseThenIncrementNumber {
            call_depth: 2,
            amount: 5,
        };
        let mut hops = Vec::new();
        while let Some(next) = ix.next_hop() {
            hops.push(next);
            ix = next;
        }
        assert_eq!(
            hops,
            vec![
                TestProgramInstruction::RecurseThenIncrementNumber {
                    call_depth: 1,
                    amount: 5
                },
                TestProgramInstruction::RecurseThenIncrementNumber {
                    call_depth: 0,
                    amount: 5
                },
                TestProgramInstruction::IncrementNumber { amount: 5 },
            ]
        );
    }

    #[test]
    fn state_account_layout() {
        assert_eq!(size_of_typed::<TestProgramState>(None), Ok(TestProgramState::LEN));
        let state = TestProgramState {
            property1: 1,
            property2: 2,
        };
        let bytes = encode_typed(&state).unwrap();
        assert_eq!(bytes.len(), TestProgramState::LEN);
        assert_eq!(&bytes[..8], &1u64.to_le_bytes());
        let (back, rest) = decode_typed::<TestProgramState>(&bytes).unwrap();
        assert_eq!(back, state);
        assert!(rest.is_empty());
    }

    #[test]
    fn apply_increment() {
        let state = TestProgramState::default().apply_increment(10).unwrap();
        assert_eq!(
            state,
            TestProgramState {
                property1: 10,
                property2: 20
            }
        );
        assert_eq!(
            TestProgramState {
                property1: u64::MAX,
                property2: 0
            }
            .apply_increment(1),
            None
        );
    }

    #[test]
    fn bundled_schema_set() {
        let set = schema_set().unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(TestProgramInstruction::TYPE_NAME));
        assert!(set.contains(TestProgramState::TYPE_NAME));
    }
}
