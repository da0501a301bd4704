//! Defines [`EcoError`], representing all errors returned by this crate.

use arrow_schema::ArrowError;
use std::borrow::Cow;
use std::fmt::Debug;
use thiserror::Error;

use crate::crs::Crs;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EcoError {
    /// A named column does not exist in the frame.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// The operation needs an active geometry column but none is set.
    #[error("No active geometry column is set on this frame")]
    NoGeometryColumn,

    /// Reprojection was requested on a frame without a CRS.
    #[error("Cannot transform naive geometries. Please set a crs on the object first.")]
    UndefinedCrs,

    /// Two frames (or a frame and a requested CRS) disagree on their CRS.
    #[error("CRS mismatch: {left} != {right}")]
    CrsMismatch { left: String, right: String },

    /// No reader or writer is registered for this file extension.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// No transformation is available between these two CRS.
    #[error("Unsupported transform from {from} to {to}")]
    UnsupportedTransform { from: Crs, to: Crs },

    /// Incorrect type was passed to an operation.
    #[error("Incorrect type passed to operation: {0}")]
    IncorrectType(Cow<'static, str>),

    /// General error.
    #[error("General error: {0}")]
    General(String),

    /// Drawing or encoding a map image failed.
    #[error("Render error: {0}")]
    Render(String),

    /// [ArrowError]
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// [geozero::error::GeozeroError]
    #[error(transparent)]
    GeozeroError(#[from] geozero::error::GeozeroError),

    /// [geojson::Error]
    #[error(transparent)]
    GeoJsonError(#[from] geojson::Error),

    /// [proj::ProjError]
    #[cfg(feature = "proj")]
    #[error(transparent)]
    ProjError(#[from] proj::ProjError),

    /// [proj::ProjCreateError]
    #[cfg(feature = "proj")]
    #[error(transparent)]
    ProjCreateError(#[from] proj::ProjCreateError),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, EcoError>;

impl From<EcoError> for ArrowError {
    fn from(err: EcoError) -> Self {
        match err {
            EcoError::Arrow(err) => err,
            _ => ArrowError::ExternalError(Box::new(err)),
        }
    }
}
