pub mod prediction_types;
pub mod record_types;
pub mod table_types;
