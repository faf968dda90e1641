//! Window shell: one form window, at most one chart viewer, one event loop.

pub mod form;
pub mod ipc;
pub mod viewer;

use crate::chart::{ChartBuilder, ChartDocument};
use crate::config::AppConfig;
use crate::controller::{Command, InputController, UiState};
use crate::error::ChartError;
use crate::models::Period;
use crate::source::MarketDataSource;
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, error, info, warn};
use wry::{WebView, WebViewBuilder};

use self::form::{alert_script, form_html, set_busy_script};
use self::viewer::{ViewerWindow, WebViewPresenter};

#[derive(Debug)]
pub enum UserEvent {
    /// A button press decoded from the form.
    Command(Command),
    /// The form sent something undecodable.
    Rejected(String),
    /// A finished chart for the viewer.
    Show(ChartDocument),
}

pub(crate) fn build_webview<'a>(builder: WebViewBuilder<'a>, window: &'a Window) -> Result<WebView> {
    #[cfg(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    ))]
    let webview = builder.build(window);

    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "ios",
        target_os = "android"
    )))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| anyhow!("Window has no GTK container"))?;
        builder.build_gtk(vbox)
    };

    webview.map_err(|e| anyhow!("Failed to build webview: {}", e))
}

// ── Application context ───────────────────────────────────────────────────────

/// Everything the event loop owns: the controller and both windows.
struct App {
    controller: InputController<WebViewPresenter>,
    // webview before window so it drops first
    form_view: WebView,
    form_window: Window,
    viewer: Option<ViewerWindow>,
}

impl App {
    fn on_event(
        &mut self,
        event: Event<'_, UserEvent>,
        target: &EventLoopWindowTarget<UserEvent>,
        control_flow: &mut ControlFlow,
    ) {
        match event {
            Event::UserEvent(UserEvent::Command(cmd)) => {
                if let Some(alert) = self.controller.handle(cmd) {
                    self.eval(&alert_script(&alert));
                }
                if self.controller.state() == UiState::Idle {
                    self.eval(&set_busy_script(false));
                }
            }

            Event::UserEvent(UserEvent::Rejected(reason)) => {
                warn!("Ignoring form message: {}", reason);
                if self.controller.state() == UiState::Idle {
                    self.eval(&set_busy_script(false));
                }
            }

            Event::UserEvent(UserEvent::Show(doc)) => match ViewerWindow::open(target, &doc) {
                Ok(v) => self.viewer = Some(v),
                Err(e) => {
                    error!("{:#}", e);
                    self.controller.viewer_dismissed();
                    let alert = ChartError::RenderFailure(format!("{:#}", e)).alert();
                    self.eval(&alert_script(&alert));
                    self.eval(&set_busy_script(false));
                }
            },

            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if self.viewer.as_ref().is_some_and(|v| v.id() == window_id) {
                    self.viewer = None;
                    self.controller.viewer_dismissed();
                    self.eval(&set_busy_script(false));
                } else if window_id == self.form_window.id() {
                    info!("Main window closed, exiting");
                    *control_flow = ControlFlow::Exit;
                }
            }

            _ => {}
        }
    }

    fn eval(&self, script: &str) {
        if let Err(e) = self.form_view.evaluate_script(script) {
            warn!("Form script failed: {}", e);
        }
    }
}

// ── Entry ─────────────────────────────────────────────────────────────────────

/// Build the form window and enter the event loop. Does not return.
pub fn run(config: &AppConfig, source: Arc<dyn MarketDataSource>, period: Period) -> Result<()> {
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let form_window = WindowBuilder::new()
        .with_title(&config.window.title)
        .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
        .build(&event_loop)
        .context("Failed to open main window")?;

    let ipc_proxy = proxy.clone();
    let builder = WebViewBuilder::new()
        .with_html(form_html(&config.window.title))
        .with_ipc_handler(move |req: wry::http::Request<String>| {
            let event = match ipc::decode(req.body()) {
                Ok(cmd) => {
                    debug!("Form command: {:?}", cmd);
                    UserEvent::Command(cmd)
                }
                Err(e) => UserEvent::Rejected(format!("{:#}", e)),
            };
            if ipc_proxy.send_event(event).is_err() {
                warn!("Event loop closed; dropping form message");
            }
        });
    let form_view = build_webview(builder, &form_window)?;

    let controller = InputController::new(
        source,
        ChartBuilder::new(config.chart.plotly_js_url.clone()),
        WebViewPresenter::new(proxy),
        period,
    )?;

    let mut app = App {
        controller,
        form_view,
        form_window,
        viewer: None,
    };

    info!("{} ready (period {})", config.window.title, period);
    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;
        app.on_event(event, target, control_flow);
    })
}
