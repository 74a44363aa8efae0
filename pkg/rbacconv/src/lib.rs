//! Bidirectional conversion between legacy authorization objects and RBAC.
//!
//! Conversion is lossless except where the models genuinely disagree:
//! rules with attribute restrictions are dropped, mixed resource/URL rules
//! are split, and the System/non-System subject distinction is rebuilt
//! from name shape on the way back.

pub mod annotations;
pub mod compare;
pub mod error;
pub mod normalize;
pub mod objects;
pub mod roleref;
pub mod rules;
pub mod scheme;
pub mod subjects;

pub use error::ConversionError;
