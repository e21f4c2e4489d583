pub mod csv;
pub mod glob;
pub mod parquet;
