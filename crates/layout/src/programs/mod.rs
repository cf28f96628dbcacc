//! Layouts of known on-chain programs.

pub mod test_program;
