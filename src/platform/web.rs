//! Browser adapter (canvas 2D + DOM buttons)

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlButtonElement, HtmlCanvasElement, MouseEvent,
    TouchEvent,
};

use super::{PRESS_FLASH_MS, css_color, press_feedback};
use crate::controls::{ControlGroup, ControlId, ControlView};
use crate::game::{Game, HostEvent, UiHost};
use crate::renderer::{Color, Stroke, Surface};
use crate::settings::Settings;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Canvas 2D context as a drawing surface
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(&css_color(stroke.color));
        self.ctx.set_line_width(stroke.width as f64);
        match stroke.glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&css_color(glow.color));
                self.ctx.set_shadow_blur(glow.blur as f64);
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.save();
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        self.ctx.restore();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.ctx.save();
        self.apply_stroke(&stroke);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn stroke_polygon(&mut self, points: &[Vec2], stroke: Stroke) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.save();
        self.apply_stroke(&stroke);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.ctx.save();
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.set_font(&format!("{}px Arial, sans-serif", size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
        self.ctx.restore();
    }
}

const CONTROL_STYLE: &str = "\
#controls .panel { display: flex; flex-direction: column; gap: 4px; background: #2a2a2a; \
padding: 4px; border-radius: 4px; border: 1px solid #00ff00; box-shadow: 0 0 5px #00ff00; }
#controls .panel-title { font-size: 10px; text-align: center; color: #00ff00; }
#controls button { background: #555; color: #fff; border: 2px solid #00ff00; border-radius: 4px; \
font-size: 10px; padding: 4px; font-family: monospace; cursor: pointer; }
#controls button:disabled { opacity: 0.5; cursor: not-allowed; }
#controls button.active { box-shadow: 0 0 10px #00ff00; }
#controls button.clicked { box-shadow: 0 0 15px #00ff00; }
#controls button.denied { border-color: #ff0000; box-shadow: 0 0 10px #ff0000; }
";

/// Buttons under `#controls`, looked up by control key
pub struct DomControls {
    document: Document,
}

impl DomControls {
    /// Create the control panels. Missing `#controls` leaves the game
    /// playable without buttons.
    pub fn inject(document: Document) -> Result<Self, JsValue> {
        let Some(root) = document.get_element_by_id("controls") else {
            log::warn!("#controls not found; on-screen controls disabled");
            return Ok(Self { document });
        };
        let style = document.create_element("style")?;
        style.set_text_content(Some(CONTROL_STYLE));
        root.append_child(&style)?;
        for (group, title) in [(ControlGroup::Tools, "Tools"), (ControlGroup::Actions, "Actions")] {
            let panel = document.create_element("div")?;
            panel.set_class_name("panel");
            let heading = document.create_element("div")?;
            heading.set_class_name("panel-title");
            heading.set_text_content(Some(title));
            panel.append_child(&heading)?;
            for id in ControlId::ALL.into_iter().filter(|id| id.group() == group) {
                let button = document.create_element("button")?;
                button.set_id(id.key());
                button.set_text_content(Some(id.name()));
                panel.append_child(&button)?;
            }
            root.append_child(&panel)?;
        }
        Ok(Self { document })
    }

    /// Add `class` to a control for a moment
    fn flash(&self, id: ControlId, class: &'static str) {
        let Some(element) = self.document.get_element_by_id(id.key()) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let _ = element.class_list().add_1(class);
        let closure = Closure::once(move || {
            let _ = element.class_list().remove_1(class);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            PRESS_FLASH_MS,
        );
        closure.forget();
    }
}

impl UiHost for DomControls {
    fn show_control(&mut self, view: &ControlView) -> bool {
        let Some(element) = self.document.get_element_by_id(view.id.key()) else {
            return false;
        };
        element.set_text_content(Some(&view.label));
        if let Some(button) = element.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(!view.enabled);
        }
        let _ = element.class_list().toggle_with_force("active", view.active);
        true
    }
}

struct App {
    game: Game,
    surface: CanvasSurface,
    controls: DomControls,
}

impl App {
    fn dispatch(&mut self, event: HostEvent) {
        let now = now_ms();
        let result = self.game.handle(event, now);
        match event {
            HostEvent::Press(id) => {
                if let Some(class) = press_feedback(&result) {
                    self.controls.flash(id, class);
                }
            }
            // Resizing the backing store wipes the canvas; the frame loop
            // stops drawing once the game is over
            HostEvent::Resize { .. } if self.game.is_over() => {
                self.game.redraw(now, &mut self.surface);
            }
            _ => {}
        }
        self.game.sync_controls(&mut self.controls);
    }

    fn frame(&mut self) {
        self.game.frame(now_ms(), &mut self.surface);
        // Spawns, kills and wave changes all move the economy
        if !self.game.drain_events().is_empty() {
            self.game.sync_controls(&mut self.controls);
        }
    }
}

/// Start the game on `#canvas`
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Sat Defense starting...");

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("no #canvas element"))?
        .dyn_into()?;

    let (width, height) = fit_canvas(&canvas);
    let settings = Settings {
        canvas_width: width,
        canvas_height: height,
        ..Settings::load()
    };

    let app = Rc::new(RefCell::new(App {
        game: Game::new(&settings),
        surface: CanvasSurface::new(&canvas)?,
        controls: DomControls::inject(document.clone())?,
    }));
    {
        let mut app = app.borrow_mut();
        let App { game, controls, .. } = &mut *app;
        game.sync_controls(controls);
    }

    setup_canvas_input(&canvas, app.clone())?;
    setup_buttons(&document, app.clone())?;
    setup_resize(&canvas, app.clone())?;
    request_animation_frame(app);

    log::info!("Sat Defense running!");
    Ok(())
}

/// Match the backing store to the displayed size
fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
    let width = canvas.client_width().max(1) as u32;
    let height = canvas.client_height().max(1) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width as f32, height as f32)
}

fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
    let touch = event.touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some((
        touch.client_x() as f32 - rect.left() as f32,
        touch.client_y() as f32 - rect.top() as f32,
    ))
}

fn setup_canvas_input(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Mouse move
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
            app.borrow_mut().dispatch(HostEvent::Aim { x, y });
        });
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Click
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
            app.borrow_mut().dispatch(HostEvent::Place { x, y });
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch move
    {
        let app = app.clone();
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some((x, y)) = touch_point(&target, &event) {
                app.borrow_mut().dispatch(HostEvent::Aim { x, y });
            }
        });
        canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch start
    {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some((x, y)) = touch_point(&target, &event) {
                app.borrow_mut().dispatch(HostEvent::Place { x, y });
            }
        });
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    for id in ControlId::ALL {
        let Some(button) = document.get_element_by_id(id.key()) else {
            log::warn!("Button #{} not found", id.key());
            continue;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            app.borrow_mut().dispatch(HostEvent::Press(id));
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let canvas = canvas.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let (width, height) = fit_canvas(&canvas);
        app.borrow_mut()
            .dispatch(HostEvent::Resize { width, height });
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        app.borrow_mut().frame();
        request_animation_frame(app);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
