pub mod brackets;
pub mod income_tax;
