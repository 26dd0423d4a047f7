//! retrofx Parameter Model
//!
//! This crate defines the control-parameter model shared by the retrofx
//! synthesizer and its consumers (editors, exporters, playback glue):
//!
//! - [`Param`] - a closed enumeration of the 32 named control slots
//! - [`ParameterSet`] - bounded, lockable storage for one value per slot
//! - [`EffectParams`] - the flat public record with "unset" sentinels,
//!   used to overlay caller intent onto a template and to snapshot the
//!   effective parameters of a generated clip
//! - [`EffectKind`] - the closed set of effect categories
//!
//! Every value written into a [`ParameterSet`] is clamped into the slot's
//! inclusive `[min, max]` range, so downstream code never sees an
//! out-of-range parameter.

pub mod effect;
pub mod error;
pub mod param;

// Re-export commonly used types at the crate root
pub use effect::{EffectKind, EffectParams};
pub use error::ParamError;
pub use param::{info, Param, ParamInfo, ParameterSet};
