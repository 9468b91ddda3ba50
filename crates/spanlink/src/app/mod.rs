//! Application layer: the segmentation engine, validation, presentation, and the session that
//! ties them together.

pub mod answer;
pub mod palette;
pub mod params;
pub mod preview;
pub mod report;
pub mod review;
pub mod segmentation;
pub mod session;
pub mod source;
pub mod validation;
