//! Frame model and the vision capabilities the recognizer consumes.
//!
//! The hand-landmark detector and the letter classifier are opaque backends
//! behind [`HandLocalizer`] and [`Classifier`]; everything else here is pure
//! pixel bookkeeping.

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod frame;
pub mod landmarks;
pub mod localizer;
pub mod region;
pub mod signature;

pub use catalog::{LetterInfo, ASL_CATEGORY};
pub use classifier::{Classifier, MockClassifier, Prediction, RankedLabel, StabilityInfo};
pub use error::VisionError;
pub use frame::{Frame, RawFrame};
pub use landmarks::{normalize_hands, Landmark, LandmarkSet, LANDMARK_COUNT};
pub use localizer::{HandLocalizer, HandPresence, LocalizerOptions, MockHandLocalizer};
pub use region::{BoundingBox, Region, RegionExtractor, RegionSize};
pub use signature::{NearDuplicateFilter, Signature};
