//! Browser entry point.
//!
//! Wires DOM events and `requestAnimationFrame` to a
//! [`CursorEffectController`] driving a [`DomPresenter`]. Every listener is
//! kept as a [`Listener`] that detaches itself on drop, so `destroy()`
//! leaves nothing registered.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{error, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, MouseEvent, Window};

use crate::config::CursorConfig;
use crate::controller::CursorEffectController;
use crate::dom::DomPresenter;
use crate::error::{CursorError, DomResultExt, Result};
use crate::geometry::{Point, Rect};
use crate::style::{HoverCategory, PointerStyleKind};

type SharedController = Rc<RefCell<CursorEffectController<DomPresenter, StdRng>>>;

/// Initialize panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    info!("[CrystalCursor] WASM module initialized");

    #[cfg(feature = "autostart")]
    autostart();
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn scroll_offset(window: &Window) -> Point {
    Point::new(
        window.scroll_x().unwrap_or(0.0),
        window.scroll_y().unwrap_or(0.0),
    )
}

fn client_point(event: &Event) -> Option<Point> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|e| Point::new(e.client_x() as f64, e.client_y() as f64))
}

/// `true` unless the host reports `(hover: none)`, i.e. a touch-only device.
fn supports_hover(window: &Window) -> bool {
    !window
        .match_media("(hover: none)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

/// Run `f` against the controller unless it is already borrowed (a re-entrant
/// event); such events are dropped.
fn with_controller<F>(controller: &SharedController, f: F)
where
    F: FnOnce(&mut CursorEffectController<DomPresenter, StdRng>),
{
    match controller.try_borrow_mut() {
        Ok(mut c) => f(&mut c),
        Err(_) => trace!("[CrystalCursor] Controller busy, event dropped"),
    }
}

/// An event listener that is removed when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .dom_context(event)?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            warn!("[CrystalCursor] Failed to detach {} listener: {:?}", self.event, e);
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop.
struct RenderLoop {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl RenderLoop {
    fn start(window: &Window, controller: SharedController) -> Result<Self> {
        let handle = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next_handle = handle.clone();
        let next_callback = callback.clone();
        let frame_window = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            with_controller(&controller, |c| c.tick(now_ms()));

            if let Some(cb) = next_callback.borrow().as_ref() {
                match frame_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => error!("[CrystalCursor] requestAnimationFrame failed: {:?}", e),
                }
            }
        }));

        let first = {
            let cb = callback.borrow();
            let cb = cb
                .as_ref()
                .ok_or_else(|| CursorError::dom("render loop", "callback missing"))?;
            window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .dom_context("requestAnimationFrame")?
        };
        handle.set(Some(first));

        Ok(Self {
            window: window.clone(),
            handle,
            callback,
        })
    }

    fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!("[CrystalCursor] cancelAnimationFrame failed: {:?}", e);
            }
        }
        // Breaks the closure's reference cycle through `callback`
        self.callback.borrow_mut().take();
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A live cursor: controller, render loop and every DOM listener.
struct Installed {
    controller: SharedController,
    render_loop: RenderLoop,
    listeners: Vec<Listener>,
}

impl Installed {
    fn install(config: CursorConfig) -> Result<Option<Self>> {
        let window = web_sys::window().ok_or(CursorError::NoWindow)?;
        let document = window.document().ok_or(CursorError::NoDocument)?;

        let hover = supports_hover(&window);
        let body_document = document.clone();
        let Some(controller) = CursorEffectController::install(
            hover,
            config,
            move || DomPresenter::new(body_document),
            StdRng::from_entropy(),
        )?
        else {
            return Ok(None);
        };
        let controller = Rc::new(RefCell::new(controller));

        let mut listeners = Self::document_listeners(&window, &document, &controller)?;
        for category in HoverCategory::ALL {
            listeners.extend(Self::hover_listeners(&window, &document, &controller, category)?);
        }
        info!(
            "[CrystalCursor] Installed with {} listeners",
            listeners.len()
        );

        let render_loop = RenderLoop::start(&window, controller.clone())?;
        Ok(Some(Self {
            controller,
            render_loop,
            listeners,
        }))
    }

    fn document_listeners(
        window: &Window,
        document: &Document,
        controller: &SharedController,
    ) -> Result<Vec<Listener>> {
        let target: &EventTarget = document.as_ref();
        let mut listeners = Vec::with_capacity(5);

        let c = controller.clone();
        listeners.push(Listener::attach(target, "mousemove", move |event| {
            if let Some(at) = client_point(&event) {
                with_controller(&c, |c| c.pointer_move(now_ms(), at));
            }
        })?);

        let c = controller.clone();
        listeners.push(Listener::attach(target, "mouseenter", move |_| {
            with_controller(&c, |c| c.document_enter());
        })?);

        let c = controller.clone();
        listeners.push(Listener::attach(target, "mouseleave", move |_| {
            with_controller(&c, |c| c.document_leave());
        })?);

        let c = controller.clone();
        let w = window.clone();
        listeners.push(Listener::attach(target, "mousedown", move |event| {
            if let Some(at) = client_point(&event) {
                let scroll = scroll_offset(&w);
                with_controller(&c, |c| c.pointer_down(now_ms(), at, scroll));
            }
        })?);

        let c = controller.clone();
        listeners.push(Listener::attach(target, "mouseup", move |_| {
            with_controller(&c, |c| c.pointer_up());
        })?);

        Ok(listeners)
    }

    /// Enter/leave listeners on every element matching `category`. No matches
    /// means no listeners.
    fn hover_listeners(
        window: &Window,
        document: &Document,
        controller: &SharedController,
        category: HoverCategory,
    ) -> Result<Vec<Listener>> {
        let nodes = document
            .query_selector_all(category.selector())
            .dom_context(category.selector())?;
        let mut listeners = Vec::with_capacity(nodes.length() as usize * 2);

        for i in 0..nodes.length() {
            let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let target: &EventTarget = element.as_ref();

            let c = controller.clone();
            let w = window.clone();
            let hovered = element.clone();
            listeners.push(Listener::attach(target, "mouseenter", move |_| {
                let bounds = hovered.get_bounding_client_rect();
                let rect = Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height());
                let scroll = scroll_offset(&w);
                with_controller(&c, |c| c.hover_enter(now_ms(), category, rect, scroll));
            })?);

            let c = controller.clone();
            listeners.push(Listener::attach(target, "mouseleave", move |_| {
                with_controller(&c, |c| c.hover_leave(category));
            })?);
        }
        Ok(listeners)
    }

    fn destroy(&mut self) {
        self.render_loop.stop();
        self.listeners.clear();
        with_controller(&self.controller, |c| c.destroy());
    }
}

impl Drop for Installed {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// JavaScript handle to an installed cursor.
#[wasm_bindgen]
pub struct CrystalCursor {
    inner: Option<Installed>,
}

#[wasm_bindgen]
impl CrystalCursor {
    /// Install a cursor. `config` is an optional partial `CursorConfig`.
    /// On touch-only devices this installs nothing.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<CrystalCursor, JsValue> {
        let config = CursorConfig::from_js(config)?;
        Ok(CrystalCursor {
            inner: Installed::install(config)?,
        })
    }

    /// Whether the cursor is active (false on touch-only devices or after
    /// `destroy()`).
    #[wasm_bindgen(getter)]
    pub fn installed(&self) -> bool {
        self.inner.is_some()
    }

    /// Switch the pointer glyph by key; unknown keys select `normal`.
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&self, kind: &str) -> std::result::Result<(), JsValue> {
        let installed = self.inner.as_ref().ok_or(CursorError::Destroyed)?;
        let mut controller = installed
            .controller
            .try_borrow_mut()
            .map_err(|_| CursorError::dom("setPointer", "controller busy"))?;
        controller.ensure_alive()?;
        controller.set_pointer(PointerStyleKind::from_key(kind));
        Ok(())
    }

    /// Stop the render loop, detach every listener and remove every node.
    pub fn destroy(&mut self) {
        if let Some(installed) = self.inner.take() {
            drop(installed);
            info!("[CrystalCursor] Cursor removed");
        }
    }
}

#[cfg(feature = "autostart")]
thread_local! {
    static AUTO_CURSOR: RefCell<Option<CrystalCursor>> = const { RefCell::new(None) };
}

/// Install a default cursor and tear it down on page unload.
#[cfg(feature = "autostart")]
fn autostart() {
    let cursor = match CrystalCursor::new(JsValue::UNDEFINED) {
        Ok(cursor) => cursor,
        Err(e) => {
            error!("[CrystalCursor] Autostart failed: {:?}", e);
            return;
        }
    };
    if !cursor.installed() {
        return;
    }
    AUTO_CURSOR.with(|slot| *slot.borrow_mut() = Some(cursor));

    let Some(window) = web_sys::window() else {
        return;
    };
    let on_unload = Closure::<dyn FnMut(Event)>::new(move |_| {
        AUTO_CURSOR.with(|slot| {
            if let Some(mut cursor) = slot.borrow_mut().take() {
                cursor.destroy();
            }
        });
    });
    if let Err(e) = window
        .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
    {
        error!("[CrystalCursor] Failed to register beforeunload: {:?}", e);
    }
    // Lives for the page's lifetime
    on_unload.forget();
}
