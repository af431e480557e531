/// Numeric conversion helpers.
///
/// Integer-to-real promotion and the printed form of real numbers.
pub mod num;
/// String literal helpers.
pub mod text;
