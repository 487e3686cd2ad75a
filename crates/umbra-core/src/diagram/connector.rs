//! Gluing handles onto ports.

use std::rc::Rc;

use log::debug;

use crate::{
    connections::{ConnectionCallback, ConnectionInfo},
    error::ModelError,
    factory::ElementFactory,
    geometry::Point,
    identifier::Id,
    modeling::ItemShape,
};

/// Where a point lands when glued onto an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glue {
    port: usize,
    point: Point,
    distance: f64,
}

impl Glue {
    /// Index of the closest port.
    pub fn port(&self) -> usize {
        self.port
    }

    /// The glued point, in canvas coordinates.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Canvas distance between the original point and the glued one.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl ElementFactory {
    /// Canvas position of a handle.
    pub fn handle_position(&self, item: &Id, handle: usize) -> Result<Point, ModelError> {
        let element = self
            .get(item)
            .ok_or_else(|| ModelError::UnknownElement(item.clone()))?;
        let local = element
            .handles()
            .get(handle)
            .map(|h| h.pos())
            .ok_or_else(|| ModelError::UnknownHandle {
                item: item.clone(),
                handle,
            })?;
        Ok(self.matrix_i2c(item).transform_point(local))
    }

    /// Moves a line handle to a canvas position.
    pub fn set_handle_position(
        &mut self,
        item: &Id,
        handle: usize,
        canvas: Point,
    ) -> Result<(), ModelError> {
        let element = self
            .get(item)
            .ok_or_else(|| ModelError::UnknownElement(item.clone()))?;
        let not_movable = || ModelError::HandleNotMovable {
            item: item.clone(),
            handle,
        };
        if element.class().item_shape() != Some(ItemShape::Line) {
            return Err(not_movable());
        }
        let mut points = element.line_points();
        if handle >= points.len() {
            return Err(ModelError::UnknownHandle {
                item: item.clone(),
                handle,
            });
        }
        let c2i = self.matrix_i2c(item).invert().ok_or_else(not_movable)?;
        points[handle] = c2i.transform_point(canvas);
        self.set_points(item, points);
        Ok(())
    }

    /// Finds the port of `target` closest to a canvas point.
    ///
    /// Distances are compared in canvas coordinates; on a tie the port with
    /// the lowest index wins.
    pub fn glue(&self, target: &Id, canvas: Point) -> Option<Glue> {
        let element = self.get(target)?;
        let i2c = self.matrix_i2c(target);
        let local = i2c.invert()?.transform_point(canvas);

        element
            .ports()
            .iter()
            .enumerate()
            .map(|(port, p)| {
                let (glued, _) = p.glue(local);
                let point = i2c.transform_point(glued);
                Glue {
                    port,
                    point,
                    distance: point.distance(canvas),
                }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Glues a canvas point onto one given port of `target`.
    pub fn glue_on_port(&self, target: &Id, port: usize, canvas: Point) -> Option<Point> {
        let element = self.get(target)?;
        let i2c = self.matrix_i2c(target);
        let local = i2c.invert()?.transform_point(canvas);
        let (glued, _) = element.ports().get(port)?.glue(local);
        Some(i2c.transform_point(glued))
    }
}

/// Disconnect callback that detaches the line item from its subject.
pub fn detach_subject() -> ConnectionCallback {
    Rc::new(|factory: &mut ElementFactory, info: &ConnectionInfo| {
        let Some(subject) = factory
            .get(info.item())
            .and_then(|item| item.single("subject"))
            .cloned()
        else {
            return;
        };
        debug!(item:% = info.item(), subject:%; "Detaching subject of disconnected item");
        if let Err(err) = factory.unlink(info.item(), "subject", &subject) {
            debug!(err:%; "Could not detach subject");
        }
    })
}
