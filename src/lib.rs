pub mod ancillary;
pub mod app;
pub mod config;
pub mod form;
pub mod launch;
pub mod link;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod wizard;
