pub mod behavior;
pub mod product;
