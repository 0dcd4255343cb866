//! Browser host: `<canvas>`, `requestAnimationFrame` and `matchMedia`.
//!
//! From JavaScript:
//!
//! ```ignore
//! import init, { mount_backdrop } from "./driftlight.js";
//! await init();
//! const backdrop = mount_backdrop("particles");   // undefined if no canvas
//! // later
//! backdrop?.teardown();
//! ```
//!
//! A missing canvas or 2D context fails closed: nothing is scheduled and
//! no exception reaches the page.

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::motion::{MotionSource, REDUCED_MOTION_QUERY};
use crate::mount::{mount, Mounted};
use crate::scheduler::{FrameHandle, FrameHost};
use crate::subscription::{Listener, Subscription};
use crate::surface::{DrawingSurface, Rgba};
use crate::viewport::{Viewport, ViewportSource};
use glam::Vec2;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MediaQueryList, Window};

/// Register `listener` for `event` on `target`; the subscription removes it.
fn listen(target: EventTarget, event: &'static str, mut listener: Listener) -> Subscription {
    let closure = Closure::<dyn FnMut()>::new(move || listener());
    if let Err(e) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        warn!(event, error = ?e, "failed to add event listener");
        return Subscription::detached();
    }

    Subscription::new(move || {
        let _ = target
            .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        drop(closure);
    })
}

// ============================================================================
// Canvas surface
// ============================================================================

/// 2D canvas drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Find `<canvas id=...>` in the document and take its 2D context.
    pub fn from_element_id(window: &Window, id: &str) -> Result<Self, EngineError> {
        let unavailable = |why: String| EngineError::SurfaceUnavailable(why);

        let document = window
            .document()
            .ok_or_else(|| unavailable("window has no document".to_string()))?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| unavailable(format!("no element with id `{}`", id)))?;
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| unavailable(format!("element `{}` is not a canvas", id)))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| unavailable(format!("canvas `{}` has no 2d context", id)))?;

        Ok(Self { canvas, ctx })
    }
}

impl DrawingSurface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }
}

// ============================================================================
// requestAnimationFrame host
// ============================================================================

/// Slot holding the JS callback that forwards frames to the engine.
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Frame host backed by `requestAnimationFrame`.
pub struct AnimationFrameHost {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrameHost {
    fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameHost for AnimationFrameHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

// ============================================================================
// Viewport and motion sources
// ============================================================================

/// `window.innerWidth/innerHeight` plus the `resize` event.
pub struct WindowViewport {
    window: Window,
}

impl ViewportSource for WindowViewport {
    fn size(&self) -> Viewport {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            read(self.window.inner_width()) as f32,
            read(self.window.inner_height()) as f32,
        )
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        listen(self.window.clone().into(), "resize", listener)
    }
}

/// `matchMedia("(prefers-reduced-motion: reduce)")` plus its `change` event.
///
/// Browsers without `matchMedia` are treated as allowing motion.
pub struct MediaMotion {
    query: Option<MediaQueryList>,
}

impl MediaMotion {
    fn new(window: &Window) -> Self {
        Self {
            query: window.match_media(REDUCED_MOTION_QUERY).ok().flatten(),
        }
    }
}

impl MotionSource for MediaMotion {
    fn reduced_motion(&self) -> bool {
        self.query.as_ref().is_some_and(MediaQueryList::matches)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        match &self.query {
            Some(query) => listen(query.clone().into(), "change", listener),
            None => Subscription::detached(),
        }
    }
}

// ============================================================================
// JS entry point
// ============================================================================

/// A mounted backdrop, returned to JavaScript.
#[wasm_bindgen]
pub struct Backdrop {
    mounted: Option<Mounted<CanvasSurface, AnimationFrameHost>>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Whether a frame is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.engine().borrow().is_running())
    }

    /// Measured accepted frames per second.
    pub fn fps(&self) -> f64 {
        self.mounted
            .as_ref()
            .map_or(0.0, |m| m.engine().borrow().throttle().fps())
    }

    /// Remove all listeners, cancel the pending frame and blank the canvas.
    pub fn teardown(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            let engine = mounted.teardown();
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.host_mut().callback.borrow_mut().take();
            };
        }
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Start the backdrop on `<canvas id={canvas_id}>`.
///
/// `config_toml` optionally overrides [`EngineConfig`] fields. Returns
/// `undefined` when the canvas is unavailable or the config is invalid; the
/// reason goes to the browser console as well as to `tracing`.
#[wasm_bindgen]
pub fn mount_backdrop(canvas_id: &str, config_toml: Option<String>) -> Option<Backdrop> {
    console_error_panic_hook::set_once();

    match try_mount(canvas_id, config_toml.as_deref()) {
        Ok(backdrop) => Some(backdrop),
        Err(e) => {
            warn!(canvas_id, error = %e, "particle backdrop not started");
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "particle backdrop not started on #{}: {}",
                canvas_id, e
            )));
            None
        }
    }
}

fn try_mount(canvas_id: &str, config_toml: Option<&str>) -> Result<Backdrop, EngineError> {
    let window = web_sys::window()
        .ok_or_else(|| EngineError::SurfaceUnavailable("no global window".to_string()))?;
    let config = match config_toml {
        Some(source) => EngineConfig::from_toml_str(source)?,
        None => EngineConfig::default(),
    };

    let surface = CanvasSurface::from_element_id(&window, canvas_id)?;
    let callback: FrameCallback = Rc::new(RefCell::new(None));

    let engine = Engine::builder()
        .with_config(config)
        .with_surface(surface)
        .with_frame_host(AnimationFrameHost::new(window.clone(), Rc::clone(&callback)))
        .with_viewport(Rc::new(WindowViewport {
            window: window.clone(),
        }))
        .with_motion(Rc::new(MediaMotion::new(&window)))
        .build()?;

    let mounted = mount(engine);
    let weak = Rc::downgrade(mounted.engine());
    *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if let Some(engine) = weak.upgrade() {
            engine.borrow_mut().on_frame(timestamp);
        }
    }));
    mounted.start();

    Ok(Backdrop {
        mounted: Some(mounted),
    })
}
