//! Common types and utilities shared by the ensemble plotting crates.

pub mod error;
pub mod frame;
pub mod grid;
pub mod mask;
pub mod template;
pub mod time;

pub use error::{OceanError, OceanResult};
pub use frame::{plan_frames, FrameDescriptor, MemberLayout};
pub use grid::{GeoExtent, GridField, Mesh};
pub use mask::{apply_rules, effective_range, EffectiveRange, FieldStats, MaskRule, RangeSource};
pub use template::Template;
pub use time::{day_indices, Timestep};
