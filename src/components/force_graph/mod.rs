mod component;
mod raster;
mod render;
mod state;
mod surface;
mod types;

pub use component::ForceGraphCanvas;
pub use raster::{RasterPlan, raster_plan, rasterize_png};
pub use state::{ForceGraphState, ViewTransform};
pub use surface::SurfaceHandle;
pub use types::{
	Details, EdgeInfo, EdgeSnapshot, GraphSnapshot, NodeInfo, NodeSnapshot, Point, Selection,
	SnapshotElements, SurfaceEvent,
};
