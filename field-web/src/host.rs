//! Wiring between the page and a [`FieldAnimator`].
//!
//! Everything runs on the browser's main thread. The animator sits in a
//! `RefCell` shared by the frame callback and the event listeners; each
//! of them borrows it only for the duration of one callback.

use std::{cell::RefCell, rc::Rc};

use field_core::{
    animator::{FieldAnimator, FieldEvent},
    config::{FieldConfig, Preset},
    error::FieldError,
    pointer::PointerState,
    surface::Layout,
};
use glam::Vec2;
use wasm_bindgen::{JsCast, convert::FromWasmAbi, prelude::*};
use web_sys as web;

use crate::{canvas::WebCanvas, seed_from_unit_pair};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// State shared by the frame callback and all listeners of one canvas.
struct Runtime {
    window: web::Window,
    document: web::Document,
    canvas: WebCanvas,
    animator: RefCell<FieldAnimator>,
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Runtime {
    /// Seconds on the same clock as `requestAnimationFrame` timestamps.
    fn now(&self) -> f64 {
        self.window.performance().map_or(0.0, |p| p.now()) / 1000.0
    }

    fn layout(&self) -> Layout {
        layout_of(&self.window, self.canvas.element())
    }

    /// Converts client coordinates into canvas-local ones.
    fn local(&self, client_x: i32, client_y: i32) -> Vec2 {
        let rect = self.canvas.element().get_bounding_client_rect();
        PointerState::local_from_client(
            Vec2::new(client_x as f32, client_y as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
        )
    }

    fn handle(&self, event: FieldEvent) -> bool {
        let now = self.now();
        self.animator.borrow_mut().handle(event, now)
    }

    /// Asks for one more frame; the callback re-requests itself while running.
    ///
    /// A callback queued before the page was hidden stays parked until it
    /// is shown again, so nothing is queued while one is outstanding.
    fn request_frame(&self) {
        let frame = self.frame.borrow();
        let Some(callback) = frame.as_ref() else {
            return;
        };
        if !self.animator.borrow_mut().request_frame() {
            return;
        }
        if let Err(e) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            log::warn!("requestAnimationFrame failed: {e:?}");
            self.animator.borrow_mut().cancel_frame_request();
        }
    }
}

fn layout_of(window: &web::Window, canvas: &web::HtmlCanvasElement) -> Layout {
    let rect = canvas.get_bounding_client_rect();
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Layout::new(
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(dim(window.inner_width()), dim(window.inner_height())),
        window.device_pixel_ratio() as f32,
    )
}

fn listen<E>(
    target: &web::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn to_js(e: FieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle returned to JavaScript for inspecting a running field.
#[wasm_bindgen]
pub struct FieldHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl FieldHandle {
    /// The configuration in use, as pretty-printed JSON.
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.runtime.animator.borrow().config().to_json().map_err(to_js)
    }

    pub fn particle_count(&self) -> usize {
        self.runtime.animator.borrow().particles().len()
    }

    pub fn is_running(&self) -> bool {
        self.runtime.animator.borrow().is_running()
    }

    pub fn frame_count(&self) -> f64 {
        self.runtime.animator.borrow().frames() as f64
    }
}

/// Starts a field with a built-in preset (`"hero"` or `"ambient"`).
///
/// Returns `undefined` if there is no canvas with that id.
#[wasm_bindgen]
pub fn start_field(canvas_id: &str, preset: &str) -> Result<Option<FieldHandle>, JsValue> {
    let preset = Preset::from_name(preset).map_err(to_js)?;
    attach(canvas_id, preset.config())
}

/// Starts a field with a JSON configuration; missing keys take the hero
/// preset's values.
#[wasm_bindgen]
pub fn start_field_with_config(
    canvas_id: &str,
    json: &str,
) -> Result<Option<FieldHandle>, JsValue> {
    let cfg = FieldConfig::from_json(json).map_err(to_js)?;
    attach(canvas_id, cfg)
}

fn attach(canvas_id: &str, cfg: FieldConfig) -> Result<Option<FieldHandle>, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(element) = document
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        log::debug!("no canvas #{canvas_id}, particle field not started");
        return Ok(None);
    };
    let Some(ctx) = element
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<web::CanvasRenderingContext2d>().ok())
    else {
        log::warn!("canvas #{canvas_id} has no 2d context, particle field not started");
        return Ok(None);
    };

    let layout = layout_of(&window, &element);
    let seed = seed_from_unit_pair(js_sys::Math::random(), js_sys::Math::random());
    let Some(animator) = FieldAnimator::init_seeded(cfg, Some(layout), seed) else {
        return Ok(None);
    };

    let runtime = Rc::new(Runtime {
        window,
        document,
        canvas: WebCanvas::new(element, ctx),
        animator: RefCell::new(animator),
        frame: RefCell::new(None),
    });

    install_frame_callback(&runtime);
    install_listeners(&runtime)?;

    if !runtime.document.hidden() {
        runtime.request_frame();
    } else {
        runtime.handle(FieldEvent::VisibilityChanged(false));
    }

    Ok(Some(FieldHandle { runtime }))
}

fn install_frame_callback(runtime: &Rc<Runtime>) {
    let rt = Rc::clone(runtime);
    let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        let mut canvas = rt.canvas.clone();
        // Bind first so the borrow ends before `request_frame` borrows again.
        let again = rt
            .animator
            .borrow_mut()
            .frame(timestamp / 1000.0, &mut canvas);
        if again {
            rt.request_frame();
        }
    });
    *runtime.frame.borrow_mut() = Some(callback);
}

fn install_listeners(runtime: &Rc<Runtime>) -> Result<(), JsValue> {
    let canvas: &web::EventTarget = runtime.canvas.element().as_ref();

    let rt = Rc::clone(runtime);
    listen(canvas, "mousemove", move |e: web::MouseEvent| {
        let local = rt.local(e.client_x(), e.client_y());
        rt.handle(FieldEvent::PointerMoved(local));
    })?;

    let rt = Rc::clone(runtime);
    listen(canvas, "mouseleave", move |_: web::MouseEvent| {
        rt.handle(FieldEvent::PointerLeft);
    })?;

    let rt = Rc::clone(runtime);
    listen(canvas, "touchmove", move |e: web::TouchEvent| {
        if let Some(touch) = e.touches().get(0) {
            let local = rt.local(touch.client_x(), touch.client_y());
            rt.handle(FieldEvent::PointerMoved(local));
        }
    })?;

    let rt = Rc::clone(runtime);
    listen(canvas, "touchend", move |_: web::TouchEvent| {
        rt.handle(FieldEvent::PointerLeft);
    })?;

    let rt = Rc::clone(runtime);
    listen(runtime.window.as_ref(), "resize", move |_: web::Event| {
        let layout = rt.layout();
        rt.handle(FieldEvent::Resized(layout));
    })?;

    let rt = Rc::clone(runtime);
    listen(
        runtime.document.as_ref(),
        "visibilitychange",
        move |_: web::Event| {
            let visible = !rt.document.hidden();
            if rt.handle(FieldEvent::VisibilityChanged(visible)) {
                rt.request_frame();
            }
        },
    )?;

    Ok(())
}
