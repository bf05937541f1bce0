//! Non-destructive image editor: adjustment and crop state, the reducer that
//! drives it, and the session that recomposites after every change.

pub mod adjust;
pub mod crop;
mod event;
mod reducer;
mod session;
mod state;

pub use adjust::{AdjustmentKind, Adjustments};
pub use crop::{compute_target_dimensions, pan_from_drag, CropRatio};
pub use event::EditorEvent;
pub use reducer::reduce;
pub use session::{Dispatch, EditedImage, EditorSession};
pub use state::{DragState, EditorMode, EditorState, SourceImage, Zoom, ZOOM_MAX, ZOOM_MIN};
