/// The runtime `Value` type: numbers, text, booleans and the absent value.
pub mod core;
