use glam::Vec3;
use shimmer_common::Color;
use shimmer_scene::TextGeometry;
use std::time::Duration;

use crate::uniforms::ThinFilmUniforms;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 400.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

/// Read-only view of everything the renderer needs for one frame.
#[derive(Debug)]
pub struct SceneFrame<'a> {
    /// The attached derived resource, if the initial build has happened.
    pub geometry: Option<&'a TextGeometry>,
    pub uniforms: &'a ThinFilmUniforms,
    /// Container spin in radians, integrated from the spin-rate parameter.
    pub spin_angle: f32,
    pub light_color: Color,
    pub view: &'a RenderView,
}

/// Renderer-agnostic interface. The renderer owns its output resources and
/// never mutates the scene.
pub trait Renderer {
    type Output;

    /// Draw one frame from the given scene view.
    fn render(&mut self, frame: &SceneFrame<'_>, delta: Duration) -> Self::Output;
}

/// Debug text renderer: one human-readable line per frame.
///
/// Useful for headless runs, logging, and exercising the render interface in
/// tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &SceneFrame<'_>, delta: Duration) -> String {
        self.frames += 1;
        let (message, vertices) = match frame.geometry {
            Some(geo) => (geo.message(), geo.vertex_count()),
            None => ("<none>", 0),
        };
        format!(
            "frame {} dt={:>6.2}ms spin={:.3} text=\"{}\" verts={} film(t={:.0} n={:.2} p={:.2})",
            self.frames,
            delta.as_secs_f64() * 1000.0,
            frame.spin_angle,
            message,
            vertices,
            frame.uniforms.thickness,
            frame.uniforms.film_index,
            frame.uniforms.polarization,
        )
    }
}
