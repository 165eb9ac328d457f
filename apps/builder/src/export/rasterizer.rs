//! Rasterizer — turns the mounted standalone document into a saved PDF.
//!
//! The pipeline only sees the `Rasterizer` trait; `ExportPipeline` holds an
//! `Arc<dyn Rasterizer>` chosen at startup. The default backend shells out to a
//! wkhtmltopdf-compatible command.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to launch rasterizer '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Rasterizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Rasterizer I/O error: {0}")]
    Io(#[from] io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageFormat {
    A4,
}

impl PageFormat {
    pub fn name(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Portrait,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageOptions {
    pub format: &'static str,
    /// 0.0 – 1.0
    pub quality: f32,
}

/// How the page is rendered to pixels before it is placed on PDF pages.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasOptions {
    pub scale: u32,
    pub use_cors: bool,
    pub allow_taint: bool,
    pub letter_rendering: bool,
    pub window_width_px: u32,
    pub window_height_px: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RasterOptions {
    pub filename: String,
    /// Top, right, bottom, left.
    pub margin_mm: [u32; 4],
    pub image: ImageOptions,
    pub canvas: CanvasOptions,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub output_dir: PathBuf,
}

impl RasterOptions {
    /// The fixed export configuration: A4 portrait, 10mm margins, 2x raster scale.
    pub fn a4_portrait(filename: String, output_dir: PathBuf) -> Self {
        Self {
            filename,
            margin_mm: [10, 10, 10, 10],
            image: ImageOptions {
                format: "jpeg",
                quality: 0.95,
            },
            canvas: CanvasOptions {
                scale: 2,
                use_cors: true,
                allow_taint: true,
                letter_rendering: true,
                window_width_px: 794,
                window_height_px: 1123,
            },
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            output_dir,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }
}

/// The mounted document and the id of the template root inside it.
#[derive(Debug, Clone)]
pub struct RasterTarget {
    pub document_path: PathBuf,
    pub root_id: String,
}

#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: Bytes,
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(
        &self,
        target: &RasterTarget,
        options: &RasterOptions,
    ) -> Result<SavedDocument, RasterError>;
}

// ────────────────────────────────────────────────────────────────────────────
// CommandRasterizer — default backend
// ────────────────────────────────────────────────────────────────────────────

pub struct CommandRasterizer {
    program: String,
}

impl CommandRasterizer {
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(
        &self,
        target: &RasterTarget,
        options: &RasterOptions,
    ) -> Result<SavedDocument, RasterError> {
        tokio::fs::create_dir_all(&options.output_dir).await?;
        let output = options.output_path();
        let args = command_args(&target.document_path, &output, options);
        debug!(
            "Rasterizing #{} with {} {:?}",
            target.root_id, self.program, args
        );

        let result = tokio::process::Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RasterError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RasterError::Failed {
                status: result.status.to_string(),
                stderr: truncate(stderr.trim(), 500).to_string(),
            });
        }

        let bytes = tokio::fs::read(&output).await?;
        info!("Saved {} ({} bytes)", output.display(), bytes.len());

        Ok(SavedDocument {
            filename: options.filename.clone(),
            path: output,
            bytes: Bytes::from(bytes),
        })
    }
}

/// wkhtmltopdf-style arguments for the fixed options.
pub fn command_args(input: &Path, output: &Path, options: &RasterOptions) -> Vec<String> {
    let [top, right, bottom, left] = options.margin_mm;
    let quality = (options.image.quality * 100.0).round() as u32;
    let dpi = 96 * options.canvas.scale;

    let mut args = vec![
        "--quiet".to_string(),
        "--page-size".to_string(),
        options.page_format.name().to_string(),
        "--orientation".to_string(),
        options.orientation.name().to_string(),
        "--margin-top".to_string(),
        format!("{top}mm"),
        "--margin-right".to_string(),
        format!("{right}mm"),
        "--margin-bottom".to_string(),
        format!("{bottom}mm"),
        "--margin-left".to_string(),
        format!("{left}mm"),
        "--image-quality".to_string(),
        quality.to_string(),
        "--dpi".to_string(),
        dpi.to_string(),
        "--viewport-size".to_string(),
        format!(
            "{}x{}",
            options.canvas.window_width_px, options.canvas.window_height_px
        ),
    ];
    if options.canvas.allow_taint || options.canvas.use_cors {
        args.push("--enable-local-file-access".to_string());
    }
    args.push(input.display().to_string());
    args.push(output.display().to_string());
    args
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
