//! Browser bindings for blobcluster
//!
//! Drives a [`Controller`] from `requestAnimationFrame`, draws every frame
//! into a canvas and a retained SVG layer, and wires the play/pause button.

mod canvas2d;
mod svg_layer;

use blobcluster_sim::{Controller, Playback, SimulationConfig};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement};

pub use canvas2d::Canvas2DRenderer;
pub use svg_layer::SvgLayer;

/// Initialize WASM panic hook for better error messages
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Parse the embedded page configuration
pub fn parse_config(json: &str) -> Result<SimulationConfig, String> {
    let config: SimulationConfig =
        serde_json::from_str(json).map_err(|e| format!("invalid config: {e}"))?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Map a `Math.random()` draw onto a 53-bit seed
pub fn seed_from_unit(value: f64) -> u64 {
    (value.clamp(0.0, 1.0) * (1u64 << 53) as f64) as u64
}

/// Animation time that stands still while the simulation is paused
#[derive(Debug, Default)]
struct FrameClock {
    started_at: Option<f64>,
    paused_since: Option<f64>,
}

impl FrameClock {
    /// Milliseconds of unpaused time since the first frame, or `None` while
    /// paused
    fn elapsed(&mut self, now_ms: f64, paused: bool) -> Option<f64> {
        let started_at = self.started_at.get_or_insert(now_ms);
        if paused {
            self.paused_since.get_or_insert(now_ms);
            return None;
        }
        if let Some(since) = self.paused_since.take() {
            *started_at += now_ms - since;
        }
        Some(now_ms - *started_at)
    }
}

/// Node held by the pointer. Pressing only pins it; the layout reheats once
/// the pointer actually moves.
#[derive(Debug, Default)]
struct PointerDrag {
    index: Option<usize>,
}

impl PointerDrag {
    fn down(&mut self, controller: &mut Controller, x: f64, y: f64) -> bool {
        if controller.is_paused() {
            return false;
        }
        self.index = controller.node_at(x, y);
        if let Some(index) = self.index {
            controller.drag_start(index);
        }
        self.index.is_some()
    }

    fn moved(&mut self, controller: &mut Controller, x: f64, y: f64) {
        if let Some(index) = self.index {
            controller.drag_to(index, x, y);
        }
    }

    fn release(&mut self, controller: &mut Controller) {
        if let Some(index) = self.index.take() {
            controller.drag_end(index);
        }
    }
}

/// Page root and toggle button classes
struct Controls {
    root: Option<Element>,
    button: Element,
}

impl Controls {
    fn apply(&self, playback: &Playback) -> Result<(), JsValue> {
        if let Some(root) = &self.root {
            let classes = root.class_list();
            classes.remove_2("play-sim", "pause-sim")?;
            classes.add_1(playback.root_class())?;
        }
        if let Some(icon) = self.button.query_selector("i")? {
            let classes = icon.class_list();
            classes.remove_2("fa-pause", "fa-play")?;
            classes.add_1(playback.icon_class())?;
        }
        Ok(())
    }
}

/// One visualization bound to a canvas, an SVG element and a toggle button
#[wasm_bindgen]
pub struct Visualization {
    controller: Controller,
    raster: Canvas2DRenderer,
    shapes: SvgLayer,
    controls: Controls,
    clock: FrameClock,
    elapsed_ms: f64,
    drag: PointerDrag,
}

#[wasm_bindgen]
impl Visualization {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        svg: Element,
        button: Element,
        config_json: &str,
    ) -> Result<Visualization, JsValue> {
        let config = parse_config(config_json).map_err(|e| JsValue::from_str(&e))?;
        let seed = config
            .seed
            .unwrap_or_else(|| seed_from_unit(js_sys::Math::random()));
        let controller =
            Controller::new(&config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut raster = Canvas2DRenderer::new(canvas).map_err(|e| JsValue::from_str(&e))?;
        raster.resize(config.width.ceil() as u32, config.height.ceil() as u32);

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let controls = Controls {
            root: document.document_element(),
            button,
        };
        controls.apply(controller.playback())?;

        web_sys::console::log_1(&JsValue::from_str(&format!(
            "blobcluster: {} nodes in {} clusters, seed {seed}",
            config.nodes, config.clusters
        )));

        Ok(Self {
            controller,
            raster,
            shapes: SvgLayer::new(document, svg),
            controls,
            clock: FrameClock::default(),
            elapsed_ms: 0.0,
            drag: PointerDrag::default(),
        })
    }

    /// Advance and draw one animation frame. Returns whether anything was drawn.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let Some(elapsed_ms) = self.clock.elapsed(now_ms, self.controller.is_paused()) else {
            return false;
        };
        self.elapsed_ms = elapsed_ms;

        let moved = self.controller.advance();
        let growing = self.elapsed_ms
            <= self
                .controller
                .grow_in()
                .finished_at(self.controller.state().nodes.len());
        if moved || growing {
            self.controller
                .draw(&mut self.shapes, &mut self.raster, self.elapsed_ms);
        }
        moved || growing
    }

    /// Flip play/pause. Returns the new paused flag.
    pub fn toggle(&mut self) -> Result<bool, JsValue> {
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "paused? {}",
            self.controller.is_paused()
        )));
        let paused = self.controller.toggle();
        if paused {
            self.drag.release(&mut self.controller);
        }
        self.controls.apply(self.controller.playback())?;
        // Marks live on the vector layer only; the raster keeps its last frame
        self.controller
            .draw_shapes(&mut self.shapes, self.elapsed_ms);
        Ok(paused)
    }

    pub fn is_paused(&self) -> bool {
        self.controller.is_paused()
    }

    /// Pin the topmost node under the pointer, if any
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.drag.down(&mut self.controller, x, y)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.drag.moved(&mut self.controller, x, y);
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64) {
        self.drag.release(&mut self.controller);
    }
}
