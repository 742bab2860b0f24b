pub mod assign;
pub mod config;
pub mod error;
pub mod filter;
pub mod geom;
pub mod interp;
pub mod line3d;
pub mod match_lines;
pub mod merge;
pub mod point_set;
pub mod triangulate;

pub use assign::{assign_points_to_lines, LineAssignment};
pub use config::{DetectorConfig, MergeConfig, MergeStageConfig};
pub use error::{LineError, Result};
pub use filter::filter_short_lines as filter_short;
pub use interp::point2d_to_3d;
pub use line3d::Line3D;
pub use match_lines::{match_lines, LineMatches};
pub use merge::{merge_lines, merge_pipeline};
pub use point_set::{PointMatch, PointSet};
pub use triangulate::{line3d_from_endpoints, triangulate_stereo, triangulate_two_frame, CameraModel, Plane3D};
