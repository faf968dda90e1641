use super::{UserEvent, build_webview};
use crate::chart::ChartDocument;
use crate::controller::Presenter;
use crate::error::ChartError;
use anyhow::{Context, Result};
use tao::dpi::LogicalSize;
use tao::event_loop::{EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder, WindowId};
use tracing::info;
use wry::{WebView, WebViewBuilder};

pub const VIEWER_TITLE: &str = "Interactive Chart";

/// Hands documents to the event loop, which owns window creation.
pub struct WebViewPresenter {
    proxy: EventLoopProxy<UserEvent>,
}

impl WebViewPresenter {
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self { proxy }
    }
}

impl Presenter for WebViewPresenter {
    fn display(&mut self, doc: ChartDocument) -> Result<(), ChartError> {
        self.proxy
            .send_event(UserEvent::Show(doc))
            .map_err(|_| ChartError::RenderFailure("viewer event loop is closed".into()))
    }
}

/// The single open chart window. Field order matters: the webview must drop
/// before its window.
pub struct ViewerWindow {
    _webview: WebView,
    window: Window,
}

impl ViewerWindow {
    pub fn open(target: &EventLoopWindowTarget<UserEvent>, doc: &ChartDocument) -> Result<Self> {
        let window = WindowBuilder::new()
            .with_title(VIEWER_TITLE)
            .with_inner_size(LogicalSize::new(1024.0, 720.0))
            .build(target)
            .context("Failed to open viewer window")?;

        let webview = build_webview(WebViewBuilder::new().with_html(doc.html()), &window)
            .with_context(|| format!("Failed to render {:?}", doc.title))?;

        info!("Viewer open: {}", doc.title);
        Ok(Self {
            _webview: webview,
            window,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }
}
