//! Ancillary data: the named KPI properties plus operator-defined custom
//! properties, carried as one JSON object string in the configuration.

pub mod codec;
pub mod custom;
pub mod record;

pub use codec::{assemble, decode, encode, encode_fields, split, SplitAncillary};
pub use custom::{CustomProperties, CustomProperty, MAX_CUSTOM_PROPERTIES};
pub use record::AncillaryRecord;

#[derive(Debug, thiserror::Error)]
pub enum AncillaryError {
    #[error("ancillary data is not a JSON object of properties: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}
