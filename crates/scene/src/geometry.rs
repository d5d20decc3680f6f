use glam::Vec3;
use shimmer_assets::GlyphSet;
use shimmer_common::ResourceId;

/// Extrusion settings captured as a snapshot when a rebuild is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudeSettings {
    /// Glyph scale in world units per em.
    pub size: f32,
    /// Extrusion depth along -z.
    pub height: f32,
    /// Subdivisions per outline edge.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            size: 100.0,
            height: 50.0,
            curve_segments: 8,
            bevel_enabled: true,
            bevel_thickness: 3.0,
            bevel_size: 3.0,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

/// Errors from geometry construction and disposal.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("glyph '{0}' is not present in the glyph set")]
    MissingGlyph(char),
    #[error("resource {0:?} was already disposed")]
    AlreadyDisposed(ResourceId),
}

/// CPU-side vertex and index buffers for one built mesh.
#[derive(Debug, Default)]
pub struct GeometryBuffers {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// An extruded-text mesh: the derived resource of this scene.
///
/// Built from a snapshot of the message and extrusion settings plus the
/// fixed glyph set. Buffers are freed exactly once via `dispose`.
#[derive(Debug)]
pub struct TextGeometry {
    id: ResourceId,
    message: String,
    settings: ExtrudeSettings,
    buffers: Option<GeometryBuffers>,
    bounds: (Vec3, Vec3),
}

impl TextGeometry {
    /// Extrude `message` using the glyph outlines.
    ///
    /// Every non-space character must be present in the glyph set. A space
    /// without an outline advances the pen by half an em. The result is
    /// recentered on its bounding box.
    pub fn build(
        message: &str,
        glyphs: &GlyphSet,
        settings: &ExtrudeSettings,
    ) -> Result<Self, GeometryError> {
        let scale = settings.size / glyphs.units_per_em;
        let segments = settings.curve_segments.max(1) as usize;
        let mut buffers = GeometryBuffers::default();
        let mut pen = 0.0f32;

        for ch in message.chars() {
            let Some(glyph) = glyphs.get(ch) else {
                if ch == ' ' {
                    pen += settings.size * 0.5;
                    continue;
                }
                return Err(GeometryError::MissingGlyph(ch));
            };

            for contour in &glyph.contours {
                if contour.len() < 3 {
                    continue;
                }
                extrude_contour(&mut buffers, contour, pen, scale, segments, settings);
            }
            pen += glyph.advance * scale;
        }

        let bounds = bounding_box(&buffers.positions);
        recenter(&mut buffers.positions, bounds);

        tracing::debug!(
            message,
            vertices = buffers.positions.len(),
            indices = buffers.indices.len(),
            "text geometry built"
        );

        Ok(Self {
            id: ResourceId::new(),
            message: message.to_string(),
            settings: settings.clone(),
            buffers: Some(buffers),
            bounds,
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn settings(&self) -> &ExtrudeSettings {
        &self.settings
    }

    pub fn vertex_count(&self) -> usize {
        self.buffers.as_ref().map_or(0, |b| b.positions.len())
    }

    pub fn index_count(&self) -> usize {
        self.buffers.as_ref().map_or(0, |b| b.indices.len())
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.bounds
    }

    pub fn is_disposed(&self) -> bool {
        self.buffers.is_none()
    }

    /// Free the buffers. Must happen exactly once per instance.
    pub fn dispose(&mut self) -> Result<(), GeometryError> {
        if self.buffers.take().is_none() {
            return Err(GeometryError::AlreadyDisposed(self.id));
        }
        tracing::debug!(id = ?self.id, "text geometry disposed");
        Ok(())
    }
}

/// Extrude one closed contour through the bevel/body depth profile.
fn extrude_contour(
    buffers: &mut GeometryBuffers,
    contour: &[[f32; 2]],
    pen: f32,
    scale: f32,
    segments: usize,
    settings: &ExtrudeSettings,
) {
    // Resample the outline: each edge subdivided into `segments` pieces.
    let mut ring = Vec::with_capacity(contour.len() * segments);
    for i in 0..contour.len() {
        let a = contour[i];
        let b = contour[(i + 1) % contour.len()];
        for s in 0..segments {
            let t = s as f32 / segments as f32;
            let x = pen + (a[0] + (b[0] - a[0]) * t) * scale;
            let y = (a[1] + (b[1] - a[1]) * t) * scale;
            ring.push([x, y]);
        }
    }
    let ring_len = ring.len();

    let centroid = {
        let (sx, sy) = ring
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p[0], sy + p[1]));
        [sx / ring_len as f32, sy / ring_len as f32]
    };

    // Depth profile: (z, inflate) pairs front to back. Bevel rings taper the
    // inflation toward the caps.
    let mut profile = Vec::new();
    let body_inflate;
    if settings.bevel_enabled {
        let steps = settings.bevel_segments.max(1);
        body_inflate = settings.bevel_offset + settings.bevel_size;
        for k in 0..steps {
            let t = k as f32 / steps as f32;
            profile.push((
                settings.bevel_thickness * (1.0 - t),
                settings.bevel_offset + settings.bevel_size * t,
            ));
        }
    } else {
        body_inflate = 0.0;
    }
    profile.push((0.0, body_inflate));
    profile.push((-settings.height, body_inflate));
    if settings.bevel_enabled {
        let steps = settings.bevel_segments.max(1);
        for k in 1..=steps {
            let t = k as f32 / steps as f32;
            profile.push((
                -settings.height - settings.bevel_thickness * t,
                settings.bevel_offset + settings.bevel_size * (1.0 - t),
            ));
        }
    }

    let base = buffers.positions.len() as u32;
    for &(z, inflate) in &profile {
        for p in &ring {
            let dx = p[0] - centroid[0];
            let dy = p[1] - centroid[1];
            let len = (dx * dx + dy * dy).sqrt().max(1e-6);
            buffers.positions.push([
                p[0] + dx / len * inflate,
                p[1] + dy / len * inflate,
                z,
            ]);
        }
    }

    // Side quads between consecutive rings.
    let ring_len = ring_len as u32;
    for r in 0..(profile.len() as u32 - 1) {
        for i in 0..ring_len {
            let a = base + r * ring_len + i;
            let b = base + r * ring_len + (i + 1) % ring_len;
            let c = base + (r + 1) * ring_len + i;
            let d = base + (r + 1) * ring_len + (i + 1) % ring_len;
            buffers.indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    // Cap fans on the outermost front and back rings.
    let back_base = base + (profile.len() as u32 - 1) * ring_len;
    for i in 1..ring_len - 1 {
        buffers
            .indices
            .extend_from_slice(&[base, base + i, base + i + 1]);
        buffers
            .indices
            .extend_from_slice(&[back_base, back_base + i + 1, back_base + i]);
    }
}

fn bounding_box(positions: &[[f32; 3]]) -> (Vec3, Vec3) {
    if positions.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for p in positions {
        let v = Vec3::from_array(*p);
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn recenter(positions: &mut [[f32; 3]], bounds: (Vec3, Vec3)) {
    let center = (bounds.0 + bounds.1) * 0.5;
    for p in positions.iter_mut() {
        p[0] -= center.x;
        p[1] -= center.y;
        p[2] -= center.z;
    }
}
