pub mod handlers;
pub mod mount;
pub mod pipeline;
pub mod rasterizer;
pub mod standalone;
pub mod styles;

use thiserror::Error;

use crate::session::SessionError;

pub use pipeline::{ExportPipeline, ExportSettings, ExportState};
pub use rasterizer::{CommandRasterizer, RasterError};
pub use styles::DirStylesheetSource;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already in progress")]
    Busy,

    #[error("Could not capture the template: {0}")]
    Template(#[from] SessionError),

    #[error("Could not mount the export document: {0}")]
    Mount(#[source] std::io::Error),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("Export task stopped unexpectedly: {0}")]
    Task(#[from] tokio::task::JoinError),
}
