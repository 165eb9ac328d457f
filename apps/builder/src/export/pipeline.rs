//! Export pipeline — one export at a time, from live preview to saved PDF.
//!
//! Flow:
//!   1. Claim the busy flag (a second request while one is running is rejected),
//!      then hand the rest to its own task so a dropped request cannot stop it halfway
//!   2. Under the session lock: refresh the snapshot, validate leniently, show the
//!      loading overlay, capture the visible template root
//!   3. Without the lock: collect CSS, build the standalone document, mount it,
//!      let it settle, rasterize, unmount
//!   4. Under the lock again: hide the overlay, then record the export or raise the
//!      failure notice

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::export::mount::OffscreenMount;
use crate::export::rasterizer::{RasterOptions, RasterTarget, Rasterizer, SavedDocument};
use crate::export::standalone::build_document;
use crate::export::styles::{collect_styles, StylesheetSource};
use crate::export::ExportError;
use crate::session::{ExportCapture, Session, EXPORT_FAILED_NOTICE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    Idle,
    Exporting,
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub settle_delay: Duration,
    pub local_stylesheets: Vec<String>,
    pub output_dir: PathBuf,
}

impl ExportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settle_delay: config.settle_delay,
            local_stylesheets: config.local_stylesheets.clone(),
            output_dir: config.output_dir.clone(),
        }
    }
}

pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    styles: Arc<dyn StylesheetSource>,
    settings: ExportSettings,
    busy: AtomicBool,
}

/// Releases the busy flag on every exit path of the export task.
struct BusyGuard(Arc<ExportPipeline>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        styles: Arc<dyn StylesheetSource>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            rasterizer,
            styles,
            settings,
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ExportState {
        if self.busy.load(Ordering::Acquire) {
            ExportState::Exporting
        } else {
            ExportState::Idle
        }
    }

    /// Runs one export to completion. The work happens on a spawned task, so the
    /// overlay is cleared and the outcome recorded even if the caller goes away.
    pub async fn export(
        self: &Arc<Self>,
        session: Arc<Mutex<Session>>,
    ) -> Result<SavedDocument, ExportError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ExportError::Busy);
        }
        let guard = BusyGuard(self.clone());

        let task = tokio::spawn(async move { guard.0.run(&session).await });
        task.await?
    }

    async fn run(&self, session: &Mutex<Session>) -> Result<SavedDocument, ExportError> {
        let capture = {
            let mut session = session.lock().await;
            session.refresh()?;
            let validation = session.validate();
            if !validation.passed {
                warn!(
                    "Exporting with invalid fields: {:?}",
                    validation.invalid.iter().map(|f| f.name()).collect::<Vec<_>>()
                );
            }
            session.set_busy(true)?;
            match session.capture_export() {
                Ok(capture) => capture,
                Err(e) => {
                    finish(&mut session, Err(&e.to_string()));
                    return Err(e.into());
                }
            }
        };

        let result = self.render(&capture).await;

        let mut session = session.lock().await;
        match &result {
            Ok(saved) => finish(&mut session, Ok(saved)),
            Err(e) => finish(&mut session, Err(&e.to_string())),
        }
        result
    }

    async fn render(&self, capture: &ExportCapture) -> Result<SavedDocument, ExportError> {
        let filename = export_filename(&capture.first_name, &capture.last_name);
        info!("Exporting {} as {filename}", capture.root_id);

        let css = collect_styles(self.styles.as_ref(), &self.settings.local_stylesheets).await;
        let html = build_document(&capture.root_html, &css);

        let mount = OffscreenMount::mount(&html)
            .await
            .map_err(ExportError::Mount)?;
        tokio::time::sleep(self.settings.settle_delay).await;

        let target = RasterTarget {
            document_path: mount.document_path(),
            root_id: capture.root_id.clone(),
        };
        let options = RasterOptions::a4_portrait(filename, self.settings.output_dir.clone());
        let result = self.rasterizer.rasterize(&target, &options).await;

        mount.unmount();
        Ok(result?)
    }
}

fn finish(session: &mut Session, outcome: Result<&SavedDocument, &str>) {
    if let Err(e) = session.set_busy(false) {
        warn!("Could not clear loading indicator: {e}");
    }
    match outcome {
        Ok(saved) => session.record_export(saved.filename.clone(), saved.path.clone()),
        Err(message) => {
            error!("PDF export failed: {message}");
            session.set_notice(EXPORT_FAILED_NOTICE);
        }
    }
}

/// `<first>_<last>.pdf`, each part falling back to `Resume` when empty. Characters
/// that are unsafe in a path or a Content-Disposition header become `_`.
pub fn export_filename(first_name: &str, last_name: &str) -> String {
    let part = |s: &str| {
        let s = s.trim();
        let s = if s.is_empty() { "Resume" } else { s };
        s.chars()
            .map(|c| match c {
                '/' | '\\' | '"' | ':' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect::<String>()
    };
    format!("{}_{}.pdf", part(first_name), part(last_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Notify;

    use crate::dom::Display;
    use crate::export::rasterizer::RasterError;
    use crate::export::styles::{Stylesheet, StylesheetError};
    use crate::form::schema::FormField;
    use crate::templates::TemplateId;

    #[derive(Default)]
    struct Seen {
        html: String,
        root_id: String,
        mount: Option<PathBuf>,
    }

    struct FakeRasterizer {
        fail: bool,
        seen: Arc<StdMutex<Seen>>,
        started: Option<Arc<Notify>>,
        release: Option<Arc<Notify>>,
    }

    impl FakeRasterizer {
        fn new(fail: bool) -> (Self, Arc<StdMutex<Seen>>) {
            let seen = Arc::new(StdMutex::new(Seen::default()));
            let raster = Self {
                fail,
                seen: seen.clone(),
                started: None,
                release: None,
            };
            (raster, seen)
        }
    }

    #[async_trait]
    impl Rasterizer for FakeRasterizer {
        async fn rasterize(
            &self,
            target: &RasterTarget,
            options: &RasterOptions,
        ) -> Result<SavedDocument, RasterError> {
            {
                let mut seen = self.seen.lock().unwrap();
                seen.html = std::fs::read_to_string(&target.document_path)?;
                seen.root_id = target.root_id.clone();
                seen.mount = target.document_path.parent().map(Path::to_path_buf);
            }
            if let Some(started) = &self.started {
                started.notify_one();
            }
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self.fail {
                return Err(RasterError::Failed {
                    status: "exit status: 1".into(),
                    stderr: "boom".into(),
                });
            }
            Ok(SavedDocument {
                filename: options.filename.clone(),
                path: options.output_path(),
                bytes: Bytes::from_static(b"%PDF-1.4"),
            })
        }
    }

    struct FakeStyles;

    #[async_trait]
    impl StylesheetSource for FakeStyles {
        async fn stylesheets(&self) -> Result<Vec<Stylesheet>, StylesheetError> {
            Ok(vec![
                Stylesheet {
                    href: Some("file:///static/css/style.css".into()),
                    rules: Ok(vec![".rule-from-local { color: red; }".into()]),
                },
                Stylesheet {
                    href: Some("https://cdn.example.com/fa.css".into()),
                    rules: Err(StylesheetError::RulesUnavailable("fa.css".into())),
                },
            ])
        }

        async fn fetch_text(&self, href: &str) -> Result<String, StylesheetError> {
            if href.ends_with("style.css") {
                Ok(".raw-local-text { margin: 0; }".into())
            } else {
                Err(StylesheetError::UnsupportedHref(href.into()))
            }
        }
    }

    fn settings() -> ExportSettings {
        ExportSettings {
            settle_delay: Duration::from_millis(500),
            local_stylesheets: vec!["style.css".into()],
            output_dir: PathBuf::from("/tmp/resume-exports"),
        }
    }

    fn pipeline(rasterizer: FakeRasterizer) -> Arc<ExportPipeline> {
        Arc::new(ExportPipeline::new(
            Arc::new(rasterizer),
            Arc::new(FakeStyles),
            settings(),
        ))
    }

    fn session() -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Session::new().unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_success() {
        let (raster, seen) = FakeRasterizer::new(false);
        let pipeline = pipeline(raster);
        let session = session();
        session
            .lock()
            .await
            .input(FormField::FirstName, "Sarah".into())
            .unwrap();
        session
            .lock()
            .await
            .input(FormField::LastName, "Johnson".into())
            .unwrap();

        let saved = pipeline.export(session.clone()).await.unwrap();
        assert_eq!(saved.filename, "Sarah_Johnson.pdf");
        assert_eq!(&saved.bytes[..], b"%PDF-1.4");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.root_id, "template-modern");
        assert!(seen.html.contains("<div id=\"template-modern\""));
        assert!(seen.html.contains(".raw-local-text { margin: 0; }"));
        assert!(seen.html.contains(".rule-from-local { color: red; }"));
        assert!(seen.html.contains("Sarah Johnson"));

        let session = session.lock().await;
        assert!(!session.is_busy());
        assert!(session.notice().is_none());
        let record = session.view().last_export.unwrap();
        assert_eq!(record.filename, "Sarah_Johnson.pdf");
        assert_eq!(
            record.path,
            PathBuf::from("/tmp/resume-exports/Sarah_Johnson.pdf")
        );
        assert_eq!(pipeline.state(), ExportState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_export_clears_busy_and_raises_notice() {
        let (raster, _) = FakeRasterizer::new(true);
        let pipeline = pipeline(raster);
        let session = session();

        let err = pipeline.export(session.clone()).await.unwrap_err();
        assert!(matches!(err, ExportError::Raster(_)));

        let session = session.lock().await;
        assert!(!session.is_busy());
        assert_eq!(session.notice(), Some(EXPORT_FAILED_NOTICE));
        assert!(session.view().last_export.is_none());
        assert_eq!(pipeline.state(), ExportState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_is_removed_after_export() {
        let (raster, seen) = FakeRasterizer::new(true);
        let pipeline = pipeline(raster);
        let session = session();

        let _ = pipeline.export(session.clone()).await;
        let mount = seen.lock().unwrap().mount.clone().unwrap();
        assert!(!mount.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_export_while_running_is_rejected() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let (mut raster, _) = FakeRasterizer::new(false);
        raster.started = Some(started.clone());
        raster.release = Some(release.clone());

        let pipeline = pipeline(raster);
        let session = session();

        let first = {
            let pipeline = pipeline.clone();
            let session = session.clone();
            tokio::spawn(async move { pipeline.export(session).await })
        };
        started.notified().await;

        assert_eq!(pipeline.state(), ExportState::Exporting);
        assert!(session.lock().await.is_busy());
        let second = pipeline.export(session.clone()).await;
        assert!(matches!(second, Err(ExportError::Busy)));

        release.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!session.lock().await.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_caller_still_finishes_export() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let (mut raster, _) = FakeRasterizer::new(false);
        raster.started = Some(started.clone());
        raster.release = Some(release.clone());

        let pipeline = pipeline(raster);
        let session = session();

        let caller = {
            let pipeline = pipeline.clone();
            let session = session.clone();
            tokio::spawn(async move { pipeline.export(session).await })
        };
        started.notified().await;
        assert!(session.lock().await.is_busy());

        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        release.notify_one();
        while pipeline.state() != ExportState::Idle {
            tokio::task::yield_now().await;
        }

        let session = session.lock().await;
        assert!(!session.is_busy());
        assert!(session.notice().is_none());
        assert_eq!(
            session.view().last_export.unwrap().filename,
            "John_Doe.pdf"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exports_active_template() {
        let (raster, seen) = FakeRasterizer::new(false);
        let pipeline = pipeline(raster);
        let session = session();
        session.lock().await.activate(TemplateId::Creative).unwrap();

        pipeline.export(session.clone()).await.unwrap();
        assert_eq!(seen.lock().unwrap().root_id, "template-creative");
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_first_root_when_none_visible() {
        let (raster, seen) = FakeRasterizer::new(false);
        let pipeline = pipeline(raster);
        let session = session();
        {
            let mut session = session.lock().await;
            let roots: Vec<_> = session.bindings().roots().map(|(_, n)| n).collect();
            for root in roots {
                session
                    .document_mut()
                    .set_display(root, Display::None)
                    .unwrap();
            }
        }

        pipeline.export(session.clone()).await.unwrap();
        assert_eq!(seen.lock().unwrap().root_id, "template-modern");
    }

    #[tokio::test(start_paused = true)]
    async fn test_filename_uses_collected_fallbacks() {
        let (raster, _) = FakeRasterizer::new(false);
        let pipeline = pipeline(raster);
        let session = session();
        session
            .lock()
            .await
            .input(FormField::LastName, "Lee".into())
            .unwrap();

        let saved = pipeline.export(session.clone()).await.unwrap();
        assert_eq!(saved.filename, "John_Lee.pdf");
    }

    #[test]
    fn test_export_filename_sanitizes() {
        assert_eq!(export_filename("Ana", "O'Neil"), "Ana_O'Neil.pdf");
        assert_eq!(export_filename("", "  "), "Resume_Resume.pdf");
        assert_eq!(export_filename("a/b", "c\"d"), "a_b_c_d.pdf");
    }
}
