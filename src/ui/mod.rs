pub mod charts;
pub mod export;
pub mod maps;
pub mod overview;
pub mod panels;

pub use surgical_scope::data::model::thousands;
