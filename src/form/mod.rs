pub mod configuration;
pub mod value;

pub use configuration::Configuration;
pub use value::FieldValue;
