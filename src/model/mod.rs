pub mod report;
pub mod type_map;
