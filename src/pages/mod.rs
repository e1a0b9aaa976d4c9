pub mod catalog;
pub mod lineage;
pub mod model;
pub mod not_found;
