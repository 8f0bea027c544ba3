pub mod encode;
pub mod error;
pub mod form;
pub mod schema;

pub use encode::{FeatureVector, encode, encode_form};
pub use error::ValidationError;
pub use form::{Contract, CustomerForm, CustomerProfile, InternetService};
pub use schema::{FEATURE_COUNT, Feature, feature_schema};
