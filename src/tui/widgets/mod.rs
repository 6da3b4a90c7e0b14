pub mod cards;
pub mod spinner;
