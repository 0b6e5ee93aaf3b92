//! Normalization of Spanish real-estate listing rows into typed, flat records.

pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod projection;
pub mod report;
pub mod sources;

pub use error::{ParseError, ParseResult};
pub use models::{Address, BasicFeatures, Building, EnergyCertificate, Listing, RawRow, Status};
pub use projection::{FlatRow, FlatSchema, Scalar};
