//! Retained SVG layer
//!
//! Keeps one `<circle>` element per node id inside the page's `<svg>`, and a
//! `<text>` label next to each marked node.

use std::collections::HashMap;

use blobcluster_sim::{Shape, ShapeSink};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub struct SvgLayer {
    document: Document,
    root: Element,
    circles: HashMap<usize, Element>,
    labels: HashMap<usize, Element>,
}

impl SvgLayer {
    pub fn new(document: Document, root: Element) -> Self {
        Self {
            document,
            root,
            circles: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    fn create(&self, tag: &str) -> Result<Element, JsValue> {
        let element = self.document.create_element_ns(Some(SVG_NS), tag)?;
        self.root.append_child(&element)?;
        Ok(element)
    }

    fn try_update(&mut self, shape: &Shape) -> Result<(), JsValue> {
        if !self.circles.contains_key(&shape.id) {
            let circle = self.create("circle")?;
            circle.set_attribute("id", &format!("blob-{}", shape.id))?;
            self.circles.insert(shape.id, circle);
        }
        let (cx, cy) = (shape.cx.to_string(), shape.cy.to_string());
        if let Some(circle) = self.circles.get(&shape.id) {
            circle.set_attribute("cx", &cx)?;
            circle.set_attribute("cy", &cy)?;
            circle.set_attribute("r", &shape.r.to_string())?;
            circle.set_attribute("class", &shape.class_attr())?;
        }

        if shape.marked {
            if !self.labels.contains_key(&shape.id) {
                let text = self.create("text")?;
                text.set_attribute("class", "label")?;
                text.set_attribute("dy", ".35em")?;
                text.set_text_content(Some(&shape.label()));
                self.labels.insert(shape.id, text);
            }
            if let Some(text) = self.labels.get(&shape.id) {
                text.set_attribute("x", &cx)?;
                text.set_attribute("y", &cy)?;
            }
        } else if let Some(text) = self.labels.remove(&shape.id) {
            text.remove();
        }
        Ok(())
    }
}

impl ShapeSink for SvgLayer {
    fn update(&mut self, shape: &Shape) {
        if let Err(e) = self.try_update(shape) {
            web_sys::console::warn_2(&JsValue::from_str("svg update failed:"), &e);
        }
    }
}
