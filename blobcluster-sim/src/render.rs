//! Rendering sinks
//!
//! A frame is captured as one [`Shape`] per node and pushed into two layers:
//! a retained vector layer that keeps one element per node, and a raster
//! layer that is cleared and repainted every frame.

use crate::color::Rgb;
use crate::playback::{MARK_CLASS, MarkerClass};

/// Everything a sink needs to draw one node
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: usize,
    pub cx: f64,
    pub cy: f64,
    /// Drawn radius, including the grow-in transition
    pub r: f64,
    pub class: MarkerClass,
    pub marked: bool,
    pub fill: Rgb,
}

impl Shape {
    /// Full class attribute, e.g. `blob red show-when-paused`
    pub fn class_attr(&self) -> String {
        let mut attr = format!("blob {}", self.class.as_str());
        if self.marked {
            attr.push(' ');
            attr.push_str(MARK_CLASS);
        }
        attr
    }

    /// Label revealed on marked shapes
    pub fn label(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Retained vector layer: one persistent element per node
pub trait ShapeSink {
    /// Create or update the element for `shape.id`
    fn update(&mut self, shape: &Shape);
}

/// Pixel layer repainted from scratch every frame
pub trait RasterSink {
    fn clear(&mut self);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb);
}

/// Push a frame into a vector layer
pub fn draw_shapes<S: ShapeSink + ?Sized>(sink: &mut S, shapes: &[Shape]) {
    for shape in shapes {
        sink.update(shape);
    }
}

/// Clear a raster layer and paint a frame into it
pub fn draw_raster<R: RasterSink + ?Sized>(sink: &mut R, shapes: &[Shape]) {
    sink.clear();
    for shape in shapes {
        sink.fill_circle(shape.cx, shape.cy, shape.r, shape.fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl ShapeSink for Recorder {
        fn update(&mut self, shape: &Shape) {
            self.ops.push(format!("shape {} {}", shape.id, shape.class_attr()));
        }
    }

    impl RasterSink for Recorder {
        fn clear(&mut self) {
            self.ops.push("clear".to_string());
        }

        fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb) {
            self.ops.push(format!("fill {cx} {cy} {r} {fill}"));
        }
    }

    fn shape(id: usize, marked: bool) -> Shape {
        Shape {
            id,
            cx: 1.0,
            cy: 2.0,
            r: 3.0,
            class: MarkerClass::for_cluster(id),
            marked,
            fill: Rgb::new(255, 0, 0),
        }
    }

    #[test]
    fn class_attr_includes_mark() {
        assert_eq!(shape(0, false).class_attr(), "blob red");
        assert_eq!(shape(1, true).class_attr(), "blob blue show-when-paused");
        assert_eq!(shape(7, true).label(), "#7");
    }

    #[test]
    fn raster_clears_before_painting() {
        let mut recorder = Recorder::default();
        draw_raster(&mut recorder, &[shape(0, false), shape(1, false)]);
        assert_eq!(
            recorder.ops,
            vec!["clear", "fill 1 2 3 #ff0000", "fill 1 2 3 #ff0000"]
        );
    }

    #[test]
    fn shapes_update_in_order() {
        let mut recorder = Recorder::default();
        draw_shapes(&mut recorder, &[shape(0, false), shape(1, true)]);
        assert_eq!(
            recorder.ops,
            vec!["shape 0 blob red", "shape 1 blob blue show-when-paused"]
        );
    }
}
