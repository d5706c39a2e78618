use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::error::{ExportError, RenderError};
use crate::core::models::SessionView;
use crate::utils::qrcode::{QrCodeRenderer, QrSurface, RasterFormat, RenderOptions, SurfaceRenderer};

/// Typed text, about-panel flag and the QR surface rendered for the text.
/// Every text change re-renders synchronously, so the stored surface always
/// belongs to the latest revision.
pub struct QrSession {
    text: String,
    about_visible: bool,
    surface: Option<Arc<QrSurface>>,
    revision: u64,
    notice: Option<String>,
    options: RenderOptions,
    renderer: Arc<dyn SurfaceRenderer>,
}

impl QrSession {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_renderer(options, Arc::new(QrCodeRenderer))
    }

    pub fn with_renderer(options: RenderOptions, renderer: Arc<dyn SurfaceRenderer>) -> Self {
        Self {
            text: String::new(),
            about_visible: false,
            surface: None,
            revision: 0,
            notice: None,
            options,
            renderer,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn about_visible(&self) -> bool {
        self.about_visible
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn surface(&self) -> Option<&Arc<QrSurface>> {
        self.surface.as_ref()
    }

    pub fn exports_enabled(&self) -> bool {
        self.surface.is_some()
    }

    /// Replaces the text and swaps in a surface rendered for it.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
        self.revision += 1;
        self.surface = None;
        self.notice = None;

        if self.text.is_empty() {
            debug!(revision = self.revision, "Input cleared, no QR surface");
            return;
        }

        match self.renderer.render(&self.text, &self.options) {
            Ok(image) => {
                debug!(
                    revision = self.revision,
                    chars = self.text.chars().count(),
                    "Rendered QR surface {}x{}",
                    image.width(),
                    image.height()
                );
                self.surface = Some(Arc::new(QrSurface::new(self.text.clone(), self.revision, image)));
            }
            Err(e) => {
                warn!(revision = self.revision, "Failed to render QR code: {}", e);
                self.notice = Some(match e {
                    RenderError::DataTooLong(_) => {
                        "That text is too long to fit in a QR code.".to_string()
                    }
                    RenderError::Encoding(_) => "Could not draw a QR code for that text.".to_string(),
                });
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn toggle_about(&mut self) {
        self.about_visible = !self.about_visible;
    }

    /// Hands out the current surface for export.
    pub fn capture(&self) -> Result<Arc<QrSurface>, ExportError> {
        self.surface.clone().ok_or(ExportError::NoSurface)
    }

    /// Like [`capture`](Self::capture), but refuses if the caller last saw a different revision.
    pub fn capture_at(&self, revision: u64) -> Result<Arc<QrSurface>, ExportError> {
        if revision != self.revision {
            return Err(ExportError::StaleSurface {
                requested: revision,
                current: self.revision,
            });
        }
        self.capture()
    }

    pub fn view(&self) -> SessionView {
        let qr_data_url = self.surface.as_ref().and_then(|surface| {
            surface
                .to_data_url(RasterFormat::Png)
                .map_err(|e| warn!("Failed to encode QR preview: {}", e))
                .ok()
        });

        SessionView {
            text: self.text.clone(),
            about_visible: self.about_visible,
            exports_enabled: self.exports_enabled(),
            placeholder: self.text.is_empty(),
            revision: self.revision,
            qr_data_url,
            notice: self.notice.clone(),
        }
    }
}

impl Default for QrSession {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl SurfaceRenderer for CountingRenderer {
        fn render(&self, _text: &str, options: &RenderOptions) -> Result<RgbImage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RgbImage::new(options.size, options.size))
        }
    }

    #[test]
    fn test_initial_state_shows_placeholder() {
        let session = QrSession::default();
        let view = session.view();

        assert_eq!(view.text, "");
        assert!(view.placeholder);
        assert!(!view.exports_enabled);
        assert!(view.qr_data_url.is_none());
        assert!(!view.about_visible);
        assert!(matches!(session.capture(), Err(ExportError::NoSurface)));
    }

    #[test]
    fn test_set_text_renders_surface_for_that_text() {
        let mut session = QrSession::default();
        session.set_text("https://example.com");

        let surface = session.capture().unwrap();
        assert_eq!(surface.text(), "https://example.com");
        assert_eq!(surface.revision(), session.revision());
        assert_eq!(surface.width(), 220);

        let view = session.view();
        assert!(view.exports_enabled);
        assert!(!view.placeholder);
        assert!(view.qr_data_url.unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_text_change_replaces_surface() {
        let mut session = QrSession::default();
        session.set_text("first");
        let first = session.capture().unwrap();

        session.set_text("second");
        let second = session.capture().unwrap();

        assert_eq!(second.text(), "second");
        assert!(second.revision() > first.revision());
    }

    #[test]
    fn test_clear_resets_text_and_surface() {
        let mut session = QrSession::default();
        session.set_text("something");
        session.clear();

        assert_eq!(session.text(), "");
        assert!(!session.exports_enabled());
        assert!(session.surface().is_none());
    }

    #[test]
    fn test_empty_text_skips_renderer() {
        let renderer = Arc::new(CountingRenderer { calls: AtomicUsize::new(0) });
        let mut session = QrSession::with_renderer(RenderOptions::default(), renderer.clone());

        session.set_text("");
        session.set_text("a");
        session.clear();

        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_toggle_about_twice_is_identity() {
        let mut session = QrSession::default();
        session.set_text("keep me");
        let before = session.about_visible();

        session.toggle_about();
        assert_ne!(session.about_visible(), before);
        session.toggle_about();
        assert_eq!(session.about_visible(), before);
        assert_eq!(session.text(), "keep me");
    }

    #[test]
    fn test_stale_revision_is_refused() {
        let mut session = QrSession::default();
        session.set_text("old");
        let seen = session.revision();
        session.set_text("new");

        match session.capture_at(seen) {
            Err(ExportError::StaleSurface { requested, current }) => {
                assert_eq!(requested, seen);
                assert_eq!(current, session.revision());
            }
            other => panic!("expected stale surface, got {:?}", other.map(|s| s.revision())),
        }
        assert_eq!(session.capture_at(session.revision()).unwrap().text(), "new");
    }

    #[test]
    fn test_overlong_text_disables_export_with_notice() {
        let mut session = QrSession::default();
        session.set_text("x".repeat(8000));

        assert!(!session.exports_enabled());
        assert!(session.notice().unwrap().contains("too long"));

        session.set_text("short");
        assert!(session.exports_enabled());
        assert!(session.notice().is_none());
    }
}
