//! Item geometry: handles and ports.
//!
//! Element items have four corner handles (NW, NE, SE, SW) derived from
//! `width` and `height`, and four ports along their sides. Line items have
//! one handle per point; the first is the head and the last is the tail.
//! Each segment between consecutive points is a port.

use crate::{
    element::Element,
    geometry::Point,
    modeling::{HandleEnd, ItemShape, Value},
};

pub const DEFAULT_WIDTH: f64 = 100.0;
pub const DEFAULT_HEIGHT: f64 = 50.0;

/// Points of a newly created line item.
pub fn default_points() -> Vec<Point> {
    vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
}

/// A draggable point of an item, in item coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pos: Point,
    connectable: bool,
}

impl Handle {
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Only line ends can be connected to other items.
    pub fn is_connectable(&self) -> bool {
        self.connectable
    }
}

/// A segment of an item that handles can be glued to, in item coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    start: Point,
    end: Point,
}

impl Port {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns the point of the port closest to `pos` and its distance.
    pub fn glue(&self, pos: Point) -> (Point, f64) {
        let glued = pos.project_on_segment(self.start, self.end);
        (glued, glued.distance(pos))
    }
}

impl Element {
    /// Width and height of an element item.
    pub fn size(&self) -> (f64, f64) {
        (
            self.real("width").unwrap_or(DEFAULT_WIDTH),
            self.real("height").unwrap_or(DEFAULT_HEIGHT),
        )
    }

    /// Points of a line item.
    pub fn line_points(&self) -> Vec<Point> {
        match self.value("points").and_then(Value::as_points) {
            Some(points) if !points.is_empty() => points.to_vec(),
            _ => default_points(),
        }
    }

    /// The handles of a presentation item; empty for other elements.
    pub fn handles(&self) -> Vec<Handle> {
        match self.class().item_shape() {
            Some(ItemShape::Element) => self
                .corners()
                .into_iter()
                .map(|pos| Handle {
                    pos,
                    connectable: false,
                })
                .collect(),
            Some(ItemShape::Line) => {
                let points = self.line_points();
                let last = points.len() - 1;
                points
                    .into_iter()
                    .enumerate()
                    .map(|(index, pos)| Handle {
                        pos,
                        connectable: index == 0 || index == last,
                    })
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// The ports of a presentation item; empty for other elements.
    pub fn ports(&self) -> Vec<Port> {
        match self.class().item_shape() {
            Some(ItemShape::Element) => {
                let corners = self.corners();
                (0..corners.len())
                    .map(|index| Port::new(corners[index], corners[(index + 1) % corners.len()]))
                    .collect()
            }
            Some(ItemShape::Line) => self
                .line_points()
                .windows(2)
                .map(|pair| Port::new(pair[0], pair[1]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Index of the head or tail handle of a line item.
    pub fn end_handle(&self, end: HandleEnd) -> Option<usize> {
        if self.class().item_shape() != Some(ItemShape::Line) {
            return None;
        }
        match end {
            HandleEnd::Head => Some(0),
            HandleEnd::Tail => Some(self.line_points().len() - 1),
        }
    }

    fn corners(&self) -> [Point; 4] {
        let (width, height) = self.size();
        [
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ]
    }
}
