pub mod camera;
pub mod history;
pub mod id;
pub mod layout;
pub mod model;
pub mod resize;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM, Point, Rect};
pub use history::{HISTORY_CAP, History, Snapshot};
pub use id::NodeId;
pub use model::*;
pub use resize::{apply_resize, transfer_column_width};
