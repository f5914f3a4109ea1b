pub mod crop_widget;

pub use crop_widget::{CropWidget, crop_widget};

// Re-export types from cropbox-types for convenience
pub use cropbox_types::types::{CropRegion, CropSelection, DragHandle};
