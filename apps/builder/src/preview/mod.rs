// View Synchronizer: projects snapshots onto the preview document.

pub mod sections;
pub mod sync;

pub use sync::project;
