use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A divisor, or the operand of a division, was zero.
    #[error("zero divisor")]
    ZeroDivisor,
}
