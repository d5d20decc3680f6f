use glam::Vec3;
use shimmer_render::RenderView;
use std::collections::VecDeque;

/// Narrow contract the frame loop calls once per tick.
pub trait InputController {
    /// Advance controller state from whatever device input arrived since the
    /// previous frame.
    fn update(&mut self);
}

/// Orbits the camera around the scene origin at a fixed radius.
///
/// Only azimuth orbiting is enabled; zoom and pan stay off, matching the
/// scene's presentation. Pointer drags are buffered and consumed on the next
/// `update()`, so input delivery never interleaves with rendering.
#[derive(Debug)]
pub struct OrbitController {
    azimuth: f32,
    radius: f32,
    drag_sensitivity: f32,
    pending_drags: VecDeque<f32>,
}

impl OrbitController {
    /// Create a controller for a camera at `radius` from the target.
    /// Constructed once the renderer's output surface exists.
    pub fn new(radius: f32) -> Self {
        Self {
            azimuth: 0.0,
            radius,
            drag_sensitivity: 0.005,
            pending_drags: VecDeque::new(),
        }
    }

    /// Buffer a horizontal pointer drag, in device units.
    pub fn queue_drag(&mut self, dx: f32) {
        self.pending_drags.push_back(dx);
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Current camera view derived from the orbit state.
    pub fn view(&self) -> RenderView {
        RenderView {
            eye: Vec3::new(
                self.radius * self.azimuth.sin(),
                0.0,
                self.radius * self.azimuth.cos(),
            ),
            ..RenderView::default()
        }
    }
}

impl InputController for OrbitController {
    fn update(&mut self) {
        let mut moved = false;
        while let Some(dx) = self.pending_drags.pop_front() {
            self.azimuth += dx * self.drag_sensitivity;
            moved = true;
        }
        if moved {
            tracing::trace!(azimuth = self.azimuth, "orbit updated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_update_keeps_view() {
        let mut orbit = OrbitController::new(400.0);
        orbit.update();
        assert_eq!(orbit.azimuth(), 0.0);
        assert_eq!(orbit.view().eye, Vec3::new(0.0, 0.0, 400.0));
    }

    #[test]
    fn drags_are_consumed_on_update() {
        let mut orbit = OrbitController::new(400.0);
        orbit.queue_drag(100.0);
        orbit.queue_drag(100.0);
        assert_eq!(orbit.azimuth(), 0.0);

        orbit.update();
        assert!((orbit.azimuth() - 1.0).abs() < 1e-6);

        // Queue is drained; a second update is a no-op.
        orbit.update();
        assert!((orbit.azimuth() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn eye_stays_on_the_orbit_radius() {
        let mut orbit = OrbitController::new(400.0);
        orbit.queue_drag(250.0);
        orbit.update();
        let eye = orbit.view().eye;
        assert!((eye.length() - 400.0).abs() < 1e-3);
    }
}
