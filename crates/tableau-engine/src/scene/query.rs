use crate::collision::{self, Shape};
use crate::coords::Rect;
use crate::instance::{Instance, InstanceId};

use super::Scene;

impl Scene {
    /// Instance behind `id` unless it is gone or marked for destruction.
    fn live(&self, id: InstanceId) -> Option<&Instance> {
        self.objects.get(id).filter(|i| !i.destroying)
    }

    /// Whether two live instances' collision shapes overlap.
    pub fn overlaps(&self, a: InstanceId, b: InstanceId) -> bool {
        let (Some(a), Some(b)) = (self.live(a), self.live(b)) else {
            return false;
        };
        match (a.collision(), b.collision()) {
            (Some(sa), Some(sb)) => collision::collide(&sa, &sb),
            _ => false,
        }
    }

    /// Whether the mouse pointer (in scene space) is over the instance.
    pub fn mouse_over(&self, id: InstanceId) -> bool {
        let Some(shape) = self.live(id).and_then(Instance::collision) else {
            return false;
        };
        collision::collide(&Shape::Point(self.mouse_position()), &shape)
    }

    /// Whether the instance touches an obstacle painted on its layer's
    /// canvas.
    pub fn overlaps_background(&mut self, id: InstanceId) -> bool {
        let Some(inst) = self.objects.get(id).filter(|i| !i.destroying) else {
            return false;
        };
        let Some(shape) = inst.collision() else {
            return false;
        };
        match self.layers.get_mut(inst.layer) {
            Some(layer) => layer.collide_canvas(&shape),
            None => false,
        }
    }

    /// Whether the instance's bounding box lies entirely outside the scene.
    pub fn outside_playfield(&self, id: InstanceId) -> bool {
        let Some(bounds) = self.instance_box(id) else {
            return false;
        };
        !bounds.overlaps(Rect::new(0, 0, self.width, self.height))
    }

    /// Bounding box of the instance's collision shape.
    pub fn instance_box(&self, id: InstanceId) -> Option<Rect> {
        self.live(id)?.collision().map(|s| s.bounds())
    }

    /// Whether `(x, y)` hits an obstacle on any layer's canvas. Points
    /// outside the scene never hit.
    pub fn test_background_collision(&mut self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x > self.width || y > self.height {
            return false;
        }
        self.layers.iter_mut().any(|l| l.test_background_collision(x, y))
    }
}
