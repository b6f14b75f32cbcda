/// Platonic Web - WASM front end for the Platonic solids viewer
///
/// `mount` builds the main canvas, one icon per solid inside the container
/// element, the hover tooltip and the pointer listeners, then drives every
/// view from a single `requestAnimationFrame` loop.

use platonic_core::navigation::query_param;
use platonic_core::{FrameDriver, Renderer, SceneConfig, SceneSession};
use std::cell::RefCell;
use std::rc::Rc;
use platonic_core::Tooltip;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window};

pub mod canvas;

pub use canvas::CanvasRenderer;

/// Container element that receives the icons
pub const CONTAINER_ID: &str = "solidos-container";

struct App {
    session: SceneSession,
    driver: FrameDriver,
    canvas: HtmlCanvasElement,
    main: CanvasRenderer,
    icons: Vec<CanvasRenderer>,
    tooltip: HtmlElement,
}

impl App {
    fn frame(&mut self) {
        self.driver
            .tick(&mut self.session, &mut self.main, &mut self.icons);
    }

    fn sync_tooltip(&self) -> Result<(), JsValue> {
        let tooltip = self.session.tooltip();
        let style = self.tooltip.style();
        for (property, value) in tooltip_style(tooltip) {
            style.set_property(property, &value)?;
        }
        if tooltip.visible {
            self.tooltip.set_text_content(Some(&tooltip.text));
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.main.resize(width, height);
        self.session.resize(width as f32, height as f32);
    }
}

/// CSS properties that place the tooltip element, or hide it
fn tooltip_style(tooltip: &Tooltip) -> Vec<(&'static str, String)> {
    if tooltip.visible {
        vec![
            ("left", format!("{}px", tooltip.x)),
            ("top", format!("{}px", tooltip.y)),
            ("display", "block".to_string()),
        ]
    } else {
        vec![("display", "none".to_string())]
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

fn inner_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(800.0);
    let height = window.inner_height()?.as_f64().unwrap_or(600.0);
    Ok((width as u32, height as u32))
}

fn create_canvas(document: &Document, width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

fn request_animation_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Parse a JSON scene configuration, or use the defaults
fn load_config(config_json: Option<String>) -> Result<SceneConfig, JsValue> {
    match config_json {
        Some(text) => SceneConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(SceneConfig::default()),
    }
}

/// Build the scene into the page and start the frame loop
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<(), JsValue> {
    let config = load_config(config_json)?;
    let window = window()?;
    let document = document(&window)?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{CONTAINER_ID}")))?;

    let (width, height) = inner_size(&window)?;
    let canvas = create_canvas(&document, width, height)?;
    body.append_child(&canvas)?;
    let main = CanvasRenderer::new(&canvas)?;

    let tooltip = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()?;
    tooltip.set_id("tooltip");
    tooltip.style().set_property("position", "absolute")?;
    tooltip.style().set_property("display", "none")?;
    body.append_child(&tooltip)?;

    let session = SceneSession::new(config, width as f32, height as f32);

    let mut icons = Vec::with_capacity(session.icons().len());
    for index in 0..session.icons().len() {
        let icon = &session.icons()[index];
        let holder = document.create_element("div")?;
        holder.class_list().add_1("icon-container")?;
        let icon_canvas = create_canvas(&document, icon.size, icon.size)?;
        holder.append_child(&icon_canvas)?;
        container.append_child(&holder)?;
        icons.push(CanvasRenderer::new(&icon_canvas)?);

        let url = icon.link().to_url();
        let target = window.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            // Popup blockers are the page's concern
            let _ = target.open_with_url_and_target(&url, "_blank");
        });
        holder.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    info!(icons = icons.len(), width, height, "mounted scene");

    let app = Rc::new(RefCell::new(App {
        session,
        driver: FrameDriver::new(),
        canvas: canvas.clone(),
        main,
        icons,
        tooltip,
    }));

    // Hover and drag
    {
        let app = Rc::clone(&app);
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut app = app.borrow_mut();
            app.session
                .pointer_move(event.client_x() as f32, event.client_y() as f32);
            if let Err(err) = app.sync_tooltip() {
                warn!(error = ?err, "failed to update tooltip");
            }
        });
        window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
    }
    {
        let app = Rc::clone(&app);
        let on_down = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            app.borrow_mut()
                .session
                .pointer_down(event.client_x() as f32, event.client_y() as f32);
        });
        canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
        on_down.forget();
    }
    {
        let app = Rc::clone(&app);
        let on_up = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            app.borrow_mut().session.pointer_up();
        });
        window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
        on_up.forget();
    }
    {
        let app = Rc::clone(&app);
        let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
            event.prevent_default();
            let steps = if event.delta_y() < 0.0 { 1.0 } else { -1.0 };
            app.borrow_mut().session.zoom(steps);
        });
        canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
        on_wheel.forget();
    }
    {
        let app = Rc::clone(&app);
        let target = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Ok((width, height)) = inner_size(&target) {
                app.borrow_mut().resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();
    }

    // One loop for the main view and every icon
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let target = window.clone();
    *callback.borrow_mut() = Some(Closure::new(move || {
        app.borrow_mut().frame();
        if let Some(cb) = next.borrow().as_ref() {
            let _ = request_animation_frame(&target, cb);
        }
    }));
    if let Some(cb) = callback.borrow().as_ref() {
        request_animation_frame(&window, cb)?;
    }

    Ok(())
}

/// Render the solid named in the page's query string onto `canvas_id`
#[wasm_bindgen]
pub fn mount_detail(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    let config = load_config(config_json)?;
    let window = window()?;
    let document = document(&window)?;
    let search = window.location().search()?;
    let name = query_param(&search, &config.icons.param)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;

    let session = SceneSession::new(config, canvas.width() as f32, canvas.height() as f32);
    let icon = session
        .icons()
        .iter()
        .find(|icon| icon.name == name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown solid {name:?}")))?;

    let mut camera = icon.camera.clone();
    camera.set_viewport(canvas.width() as f32, canvas.height() as f32);
    let mut renderer = CanvasRenderer::new(&canvas)?;
    renderer.render(&icon.environment, &icon.objects(), &camera);

    info!(solid = %name, "rendered detail view");
    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&JsValue::from_str("platonic-web loaded"));
    Ok(())
}
