use crate::inventory::ActivityKey;
use thiserror::Error;

/// Errors raised by an activity store while resolving activities or their exchanges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Activity '{0}' not found in the database")]
    ActivityNotFound(ActivityKey),

    #[error("Exchange of activity '{activity}' references unknown input '{input}'")]
    DanglingExchange {
        activity: ActivityKey,
        input: ActivityKey,
    },

    #[error("Activity '{0}' is defined more than once")]
    DuplicateActivity(ActivityKey),

    #[error("Failed to parse database JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read database file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to convert custom data into a database: {0}")]
    Conversion(String),
}

/// Errors raised by an LCA evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    #[error("Impact assessment method '{0}' is not known to the backend")]
    UnknownMethod(String),

    #[error("Activity '{0}' is not part of the technosphere matrix")]
    NotInMatrix(ActivityKey),

    #[error("The technosphere matrix is singular and cannot be solved")]
    SingularMatrix,

    #[error("Invalid uncertainty parameters on exchange '{input}' -> '{output}': {message}")]
    InvalidDistribution {
        input: ActivityKey,
        output: ActivityKey,
        message: String,
    },

    #[error("The evaluator was built without distributions and cannot draw samples")]
    NotStochastic,

    #[error("Impact has not been computed yet; call compute_inventory and compute_impact first")]
    NotComputed,
}

/// Errors that can occur while traversing a supply chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    #[error("Activity store failure: {0}")]
    Store(#[from] StoreError),

    #[error("LCA evaluation failure: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// Errors that can occur while turning a traversal into renderable Sankey data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("The traversal result contains no flows")]
    EmptyResult,

    #[error("The reference flow score is {0}; flows cannot be normalized against it")]
    DegenerateReferenceScore(f64),

    #[error("Color gradient '{0}' is not registered")]
    UnknownGradient(String),

    #[error("Failed to serialize figure: {0}")]
    Serialization(String),
}

/// Errors that can occur when converting a custom user format into a `DatabaseDefinition`.
#[derive(Error, Debug, Clone)]
pub enum DatabaseConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
