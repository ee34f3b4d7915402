//! Seesaw entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_scene {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DomRect, HtmlElement};

    use seesaw::anim::{Prop, Target, TweenFacility};
    use seesaw::sim::{SceneEvent, Shape, ShapeId, TrackProbe};
    use seesaw::{SceneConfig, SetupError, Stage, fit_scale};

    /// Elements the scene renders into
    struct Dom {
        layout: HtmlElement,
        beam: HtmlElement,
        layer: HtmlElement,
    }

    impl Dom {
        fn lookup() -> Result<Self, SetupError> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or(SetupError::NoWindow)?;
            let find = |id: &'static str| -> Result<HtmlElement, SetupError> {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                    .ok_or(SetupError::MissingElement(id))
            };
            Ok(Self {
                layout: find("layout")?,
                beam: find("seesaw-rot")?,
                layer: find("shape-layer")?,
            })
        }
    }

    /// Edge check against rendered bounding boxes
    struct DomProbe<'a> {
        layer: DomRect,
        padding: f64,
        elements: &'a HashMap<ShapeId, HtmlElement>,
    }

    impl TrackProbe for DomProbe<'_> {
        fn is_off_track(&self, shape: &Shape) -> bool {
            let Some(el) = self.elements.get(&shape.id) else {
                return false;
            };
            let r = el.get_bounding_client_rect();
            r.right() < self.layer.left() + self.padding
                || r.left() > self.layer.right() - self.padding
        }
    }

    /// Host instance holding the stage and its elements
    struct Host {
        stage: Stage,
        dom: Dom,
        elements: HashMap<ShapeId, HtmlElement>,
        last_time: f64,
    }

    impl Host {
        fn apply_scale(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let scale = fit_scale(w as f32, h as f32);
            let _ = self.dom.layout.style().set_property(
                "transform",
                &format!("translate(-50%, -50%) scale({})", scale),
            );
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let probe = DomProbe {
                layer: self.dom.layer.get_bounding_client_rect(),
                padding: self.stage.scene().config().edge_padding as f64,
                elements: &self.elements,
            };
            self.stage.frame(dt, &probe);

            for event in self.stage.drain_events() {
                self.apply_event(event);
            }
        }

        fn apply_event(&mut self, event: SceneEvent) {
            match event {
                SceneEvent::Cleared => {
                    self.dom.layer.set_inner_html("");
                    self.elements.clear();
                }
                SceneEvent::Spawned(shape) => match create_element(&shape) {
                    Ok(el) => {
                        let _ = self.dom.layer.append_child(&el);
                        self.elements.insert(shape.id, el);
                    }
                    Err(e) => log::warn!("Failed to create element for {:?}: {:?}", shape.id, e),
                },
                SceneEvent::Removed(id) => {
                    if let Some(el) = self.elements.remove(&id) {
                        el.remove();
                    }
                }
                SceneEvent::Landed(_) | SceneEvent::Evicted(_) => {}
            }
        }

        /// Copy animated values onto element styles
        fn render(&self) {
            let tl = self.stage.timeline();
            let beam = tl.value(Target::Beam, Prop::Rotation);
            let _ = self
                .dom
                .beam
                .style()
                .set_property("transform", &format!("rotate({}deg)", beam));

            for (id, el) in &self.elements {
                let target = Target::Shape(*id);
                let style = el.style();
                let _ = style.set_property(
                    "transform",
                    &format!(
                        "translate({}px, {}px) rotate({}deg)",
                        tl.value(target, Prop::X),
                        tl.value(target, Prop::Y),
                        tl.value(target, Prop::Rotation)
                    ),
                );
                let _ = style.set_property("opacity", &tl.value(target, Prop::Opacity).to_string());
            }
        }
    }

    fn create_element(shape: &Shape) -> Result<HtmlElement, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.class_list()
            .add_3("shape", shape.kind.as_str(), shape.size_class.as_str())?;

        let style = el.style();
        style.set_property("width", &format!("{}px", shape.size.x))?;
        style.set_property("height", &format!("{}px", shape.size.y))?;
        style.set_property("left", &format!("{}%", shape.anchor_percent))?;
        style.set_property("opacity", "0")?;

        if let Some(label) = &shape.label {
            el.class_list().add_1("has-label")?;
            let span = document.create_element("span")?;
            span.class_list().add_1("shape-label")?;
            span.set_text_content(Some(label));
            el.append_child(&span)?;
        }
        Ok(el)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let dom = match Dom::lookup() {
            Ok(dom) => dom,
            Err(e) => {
                log::warn!("Seesaw not started: {}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host {
            stage: Stage::new(SceneConfig::load(), seed),
            dom,
            elements: HashMap::new(),
            last_time: 0.0,
        }));
        log::info!("Seesaw initialized with seed: {}", seed);

        host.borrow().apply_scale();
        setup_resize(host.clone());
        request_animation_frame(host);
    }

    fn setup_resize(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            host.borrow().apply_scale();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            h.update(time);
            h.render();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_scene::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use seesaw::sim::LayerBounds;
    use seesaw::{SceneConfig, Stage};

    env_logger::init();
    log::info!("Seesaw (native) starting...");
    log::info!("Native mode runs the simulation headless - run with `trunk serve` for the web version");

    // Usage: seesaw [config.json] [seed]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| SceneConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Failed to load {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => SceneConfig::load(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let bounds = LayerBounds::new(config.layer_width, config.edge_padding);
    let mut stage = Stage::new(config, seed);

    const FPS: u32 = 60;
    const SECONDS: u32 = 60;
    for _ in 0..FPS * SECONDS {
        stage.frame(1.0 / FPS as f32, &bounds);
        stage.drain_events();
    }

    let scene = stage.scene();
    println!("seed {} after {}s:", stage.seed(), SECONDS);
    println!("  spawned   {}", scene.spawner().spawned());
    println!("  resting   {}", scene.registry().len());
    println!("  falling   {}", scene.falling().len());
    println!("  removed   {}", scene.removed_count());
    println!("  torque    {:+.2}", scene.torque());
    println!("  angle     {:+.2} deg", scene.angle());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
