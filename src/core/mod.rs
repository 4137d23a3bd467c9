pub mod chart;
pub mod export_config;
pub mod geometry;
pub mod session;
pub mod team;
pub mod types;

pub use chart::{ChartCategory, ChartDescriptor, ChartKind, ChartRegistry};
pub use export_config::{ExportConfig, ExportConfigEntry};
pub use geometry::PageGeometry;
pub use session::SessionMetadata;
pub use types::{ChartId, DriverId, RenderId};
