use std::time::Duration;

use shimmer_assets::{AssetBundle, AssetError, AssetSlot};
use shimmer_common::{Color, ResourceId};
use shimmer_frame::ContinuousState;
use shimmer_params::{
    BindingMode, BindingSet, NumericRange, ParamError, ParamHandle, ParamValue, ParameterRegistry,
};
use shimmer_render::{SceneFrame, ShaderSources, ThinFilmUniforms, UniformKey};
use shimmer_scene::{
    Container, ExtrudeSettings, LifecycleManager, ReplaceOutcome, SceneError, TextGeometry,
};

/// Fixed glyph scale of the scene, in world units per em.
const GLYPH_SIZE: f32 = 100.0;

/// Direct-write destinations for control edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkTarget {
    /// A thin-film shader input.
    Uniform(UniformKey),
    /// Rate of the container spin.
    SpinRate,
    /// Color of the scene light.
    LightColor,
    /// The rebuildable text mesh. Only meaningful for Rebuild bindings.
    TextMesh,
}

/// Errors from the edit path.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("value {value:?} cannot be delivered to sink {sink:?}")]
    Delivery { sink: SinkTarget, value: ParamValue },
}

/// Handles for every registered scene parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamHandles {
    pub message: ParamHandle,
    pub height: ParamHandle,
    pub curve_segments: ParamHandle,
    pub bevel_enabled: ParamHandle,
    pub bevel_thickness: ParamHandle,
    pub bevel_size: ParamHandle,
    pub bevel_offset: ParamHandle,
    pub bevel_segments: ParamHandle,
    pub film_thickness: ParamHandle,
    pub film_index: ParamHandle,
    pub film_polarization: ParamHandle,
    pub spin_rate: ParamHandle,
    pub light_color: ParamHandle,
}

/// The live scene: parameters, bindings, derived-resource lifecycle, and
/// time-integrated state, built from the startup asset bundle.
///
/// All of it runs on one logical thread; completions, edits, and frame
/// ticks each run to completion before the next begins, so no locking is
/// needed anywhere below this type.
pub struct SceneRuntime {
    registry: ParameterRegistry,
    bindings: BindingSet<SinkTarget>,
    container: Container<TextGeometry>,
    lifecycle: LifecycleManager,
    uniforms: ThinFilmUniforms,
    shaders: ShaderSources,
    spin: ContinuousState,
    light_color: Color,
    glyphs: shimmer_assets::GlyphSet,
    handles: ParamHandles,
}

impl SceneRuntime {
    /// Initialize the scene from the finished asset bundle: register the
    /// parameters with their demo defaults, wire the bindings, and build the
    /// initial geometry.
    pub fn new(bundle: AssetBundle) -> Result<Self, EditError> {
        let env_id = bundle
            .id(AssetSlot::EnvMap)
            .ok_or(AssetError::MissingSlot(AssetSlot::EnvMap))?;
        let (fragment, vertex, glyphs, _env_map) = bundle.into_parts();

        let mut registry = ParameterRegistry::new();
        let handles = ParamHandles {
            message: registry.register("message", ParamValue::Text("lil-gui".into()))?,
            height: registry.register_number("height", 50.0, NumericRange::new(0.0, 200.0))?,
            curve_segments: registry.register_int(
                "curve_segments",
                8,
                NumericRange::with_step(1.0, 12.0, 1.0),
            )?,
            bevel_enabled: registry.register("bevel_enabled", ParamValue::Bool(true))?,
            bevel_thickness: registry.register_number(
                "bevel_thickness",
                3.0,
                NumericRange::new(-10.0, 10.0),
            )?,
            bevel_size: registry.register_number("bevel_size", 3.0, NumericRange::new(0.0, 10.0))?,
            bevel_offset: registry.register_number(
                "bevel_offset",
                0.0,
                NumericRange::new(-5.0, 5.0),
            )?,
            bevel_segments: registry.register_int(
                "bevel_segments",
                4,
                NumericRange::with_step(1.0, 5.0, 1.0),
            )?,
            film_thickness: registry.register_number(
                "film_thickness",
                880.0,
                NumericRange::new(100.0, 2000.0),
            )?,
            film_index: registry.register_number("film_index", 1.75, NumericRange::new(1.0, 2.0))?,
            film_polarization: registry.register_number(
                "film_polarization",
                1.5,
                NumericRange::new(0.0, 2.0),
            )?,
            spin_rate: registry.register_number("spin_rate", 0.15, NumericRange::new(0.0, 1.0))?,
            light_color: registry
                .register("light_color", ParamValue::Color(Color::from_hex(0xe5c8ff)))?,
        };

        // Binding order matches the control panel: geometry edits first,
        // then the direct material/motion/light writes.
        let mut bindings = BindingSet::new();
        for handle in [
            handles.message,
            handles.height,
            handles.curve_segments,
            handles.bevel_enabled,
            handles.bevel_thickness,
            handles.bevel_size,
            handles.bevel_offset,
            handles.bevel_segments,
        ] {
            bindings.bind(handle, BindingMode::Rebuild, SinkTarget::TextMesh);
        }
        bindings.bind(
            handles.film_thickness,
            BindingMode::Direct,
            SinkTarget::Uniform(UniformKey::Thickness),
        );
        bindings.bind(
            handles.film_index,
            BindingMode::Direct,
            SinkTarget::Uniform(UniformKey::FilmIndex),
        );
        bindings.bind(
            handles.film_polarization,
            BindingMode::Direct,
            SinkTarget::Uniform(UniformKey::Polarization),
        );
        bindings.bind(handles.spin_rate, BindingMode::Direct, SinkTarget::SpinRate);
        bindings.bind(
            handles.light_color,
            BindingMode::Direct,
            SinkTarget::LightColor,
        );

        let mut runtime = Self {
            registry,
            bindings,
            container: Container::new(),
            lifecycle: LifecycleManager::new(),
            uniforms: ThinFilmUniforms::new(env_id),
            shaders: ShaderSources { vertex, fragment },
            spin: ContinuousState::new(0.15),
            light_color: Color::from_hex(0xe5c8ff),
            glyphs,
            handles,
        };

        runtime.rebuild()?;
        tracing::info!("scene initialized");
        Ok(runtime)
    }

    /// The single edit path. Stores the value through the registry, then
    /// dispatches every binding of the parameter in registration order.
    pub fn set_value(
        &mut self,
        handle: ParamHandle,
        value: ParamValue,
    ) -> Result<ParamValue, EditError> {
        let stored = self.registry.set_value(handle, value)?;

        let routes: Vec<(BindingMode, SinkTarget)> = self
            .bindings
            .for_param(handle)
            .map(|b| (b.mode, b.sink))
            .collect();

        for (mode, sink) in routes {
            match mode {
                BindingMode::Direct => self.apply_direct(sink, &stored)?,
                BindingMode::Rebuild => {
                    self.rebuild()?;
                }
            }
        }

        Ok(stored)
    }

    fn apply_direct(&mut self, sink: SinkTarget, value: &ParamValue) -> Result<(), EditError> {
        let mismatch = || EditError::Delivery {
            sink,
            value: value.clone(),
        };
        match sink {
            SinkTarget::Uniform(key) => {
                let v = value.as_f32().ok_or_else(mismatch)?;
                self.uniforms.set(key, v);
            }
            SinkTarget::SpinRate => {
                let v = value.as_f32().ok_or_else(mismatch)?;
                self.spin.set_rate(v);
            }
            SinkTarget::LightColor => {
                let c = value.as_color().ok_or_else(mismatch)?;
                self.light_color = c;
            }
            // A Direct write to the mesh is a wiring bug.
            SinkTarget::TextMesh => return Err(mismatch()),
        }
        tracing::debug!(?sink, ?value, "direct write applied");
        Ok(())
    }

    /// Rebuild the text geometry from the latest parameter snapshot and swap
    /// it in. One call per Rebuild-bound edit.
    fn rebuild(&mut self) -> Result<ReplaceOutcome, EditError> {
        let (message, settings) = self.geometry_snapshot()?;
        let glyphs = &self.glyphs;
        let outcome = self.lifecycle.replace(&mut self.container, move || {
            TextGeometry::build(&message, glyphs, &settings).map_err(SceneError::from)
        })?;
        Ok(outcome)
    }

    /// Read the message and extrusion settings out of the registry.
    fn geometry_snapshot(&self) -> Result<(String, ExtrudeSettings), EditError> {
        let message = self.read_text(self.handles.message)?.to_string();
        let settings = ExtrudeSettings {
            size: GLYPH_SIZE,
            height: self.read_f32(self.handles.height)?,
            curve_segments: self.read_f32(self.handles.curve_segments)? as u32,
            bevel_enabled: self.read_bool(self.handles.bevel_enabled)?,
            bevel_thickness: self.read_f32(self.handles.bevel_thickness)?,
            bevel_size: self.read_f32(self.handles.bevel_size)?,
            bevel_offset: self.read_f32(self.handles.bevel_offset)?,
            bevel_segments: self.read_f32(self.handles.bevel_segments)? as u32,
        };
        Ok((message, settings))
    }

    /// Advance time-integrated state by the measured frame delta.
    pub fn tick(&mut self, delta: Duration) {
        self.spin.advance(delta);
    }

    /// The read-only view the renderer consumes this frame.
    pub fn frame<'a>(&'a self, view: &'a shimmer_render::RenderView) -> SceneFrame<'a> {
        SceneFrame {
            geometry: self.lifecycle.current(&self.container),
            uniforms: &self.uniforms,
            spin_angle: self.spin.value(),
            light_color: self.light_color,
            view,
        }
    }

    /// Orderly teardown: detach and dispose the current geometry.
    pub fn shutdown(&mut self) -> Result<Option<ResourceId>, EditError> {
        let disposed = self.lifecycle.dispose_current(&mut self.container)?;
        tracing::info!(?disposed, "scene shut down");
        Ok(disposed)
    }

    pub fn handles(&self) -> &ParamHandles {
        &self.handles
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn uniforms(&self) -> &ThinFilmUniforms {
        &self.uniforms
    }

    pub fn shaders(&self) -> &ShaderSources {
        &self.shaders
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin.value()
    }

    pub fn light_color(&self) -> Color {
        self.light_color
    }

    pub fn current_geometry(&self) -> Option<&TextGeometry> {
        self.lifecycle.current(&self.container)
    }

    /// Number of resources currently attached to the container.
    pub fn attached_count(&self) -> usize {
        self.container.len()
    }

    pub fn rebuilds(&self) -> u64 {
        self.lifecycle.rebuilds()
    }

    pub fn disposals(&self) -> u64 {
        self.lifecycle.disposals()
    }

    fn read_text(&self, handle: ParamHandle) -> Result<&str, EditError> {
        let value = self.registry.get(handle)?;
        value.as_text().ok_or_else(|| EditError::Delivery {
            sink: SinkTarget::TextMesh,
            value: value.clone(),
        })
    }

    fn read_f32(&self, handle: ParamHandle) -> Result<f32, EditError> {
        let value = self.registry.get(handle)?;
        value.as_f32().ok_or_else(|| EditError::Delivery {
            sink: SinkTarget::TextMesh,
            value: value.clone(),
        })
    }

    fn read_bool(&self, handle: ParamHandle) -> Result<bool, EditError> {
        let value = self.registry.get(handle)?;
        value.as_bool().ok_or_else(|| EditError::Delivery {
            sink: SinkTarget::TextMesh,
            value: value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shimmer_assets::{
        AssetSlot, FilterMode, Glyph, GlyphSet, LoadedAsset, StartupLoads, Texture,
    };

    /// Square-outline glyphs for every character in `chars`.
    fn glyphs_for(chars: &str) -> GlyphSet {
        let mut set = GlyphSet::new("test", 1000.0);
        for ch in chars.chars() {
            set.insert(
                ch,
                Glyph {
                    advance: 600.0,
                    contours: vec![vec![
                        [0.0, 0.0],
                        [500.0, 0.0],
                        [500.0, 700.0],
                        [0.0, 700.0],
                    ]],
                },
            );
        }
        set
    }

    fn env_map() -> Texture {
        Texture {
            width: 2,
            height: 2,
            rgba: vec![128; 16],
            filter: FilterMode::Nearest,
        }
    }

    /// Drive the startup loads to completion and build the runtime.
    fn runtime() -> SceneRuntime {
        let mut loads = StartupLoads::new();
        loads
            .complete(AssetSlot::FragmentShader, LoadedAsset::text("fs"))
            .unwrap();
        loads
            .complete(AssetSlot::VertexShader, LoadedAsset::text("vs"))
            .unwrap();
        loads
            .complete(
                AssetSlot::GlyphSet,
                LoadedAsset::glyphs(glyphs_for("lig-ushmerowd")),
            )
            .unwrap();
        let bundle = loads
            .complete(AssetSlot::EnvMap, LoadedAsset::texture(env_map()))
            .unwrap()
            .expect("all four loads complete");
        SceneRuntime::new(bundle).unwrap()
    }

    #[test]
    fn initialization_builds_one_geometry_from_defaults() {
        let runtime = runtime();
        assert_eq!(runtime.attached_count(), 1);
        assert_eq!(runtime.rebuilds(), 1);

        let geo = runtime.current_geometry().unwrap();
        assert_eq!(geo.message(), "lil-gui");
        assert_eq!(geo.settings().height, 50.0);
        assert_eq!(geo.settings().curve_segments, 8);
        assert!(geo.vertex_count() > 0);
    }

    #[test]
    fn direct_edit_writes_uniform_without_rebuild() {
        let mut runtime = runtime();
        let handle = runtime.handles().film_thickness;

        let stored = runtime
            .set_value(handle, ParamValue::Float(1200.0))
            .unwrap();
        assert_eq!(stored, ParamValue::Float(1200.0));
        assert_eq!(runtime.uniforms().thickness, 1200.0);
        assert_eq!(runtime.rebuilds(), 1);
    }

    #[test]
    fn direct_edit_is_clamped_before_delivery() {
        let mut runtime = runtime();
        let handle = runtime.handles().film_thickness;

        let stored = runtime
            .set_value(handle, ParamValue::Float(99999.0))
            .unwrap();
        // The sink observes exactly the stored (clamped) value.
        assert_eq!(stored, ParamValue::Float(2000.0));
        assert_eq!(runtime.uniforms().thickness, 2000.0);
    }

    #[test]
    fn spin_rate_edit_applies_from_next_tick() {
        let mut runtime = runtime();
        runtime.tick(Duration::from_millis(100));
        let before = runtime.spin_angle();
        assert!((before - 0.15 * 0.1).abs() < 1e-6);

        runtime
            .set_value(runtime.handles().spin_rate, ParamValue::Float(1.0))
            .unwrap();
        runtime.tick(Duration::from_millis(100));
        assert!((runtime.spin_angle() - (before + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn light_color_edit_is_direct() {
        let mut runtime = runtime();
        runtime
            .set_value(
                runtime.handles().light_color,
                ParamValue::Color(Color::from_hex(0xff0000)),
            )
            .unwrap();
        assert_eq!(runtime.light_color().to_array(), [1.0, 0.0, 0.0]);
        assert_eq!(runtime.rebuilds(), 1);
    }

    #[test]
    fn message_edit_swaps_geometry_once() {
        let mut runtime = runtime();
        let old_id = runtime.current_geometry().unwrap().id();

        runtime
            .set_value(
                runtime.handles().message,
                ParamValue::Text("shimmer".into()),
            )
            .unwrap();

        assert_eq!(runtime.rebuilds(), 2);
        assert_eq!(runtime.disposals(), 1);
        assert_eq!(runtime.attached_count(), 1);

        let geo = runtime.current_geometry().unwrap();
        assert_eq!(geo.message(), "shimmer");
        assert_ne!(geo.id(), old_id);
    }

    #[test]
    fn ten_rapid_rebuild_edits_keep_exactly_one_attached() {
        let mut runtime = runtime();
        let handle = runtime.handles().height;

        for i in 1..=10 {
            runtime
                .set_value(handle, ParamValue::Float(i as f32 * 10.0))
                .unwrap();
            assert_eq!(runtime.attached_count(), 1);
        }
        assert_eq!(runtime.rebuilds(), 11);
        assert_eq!(runtime.disposals(), 10);
    }

    #[test]
    fn fan_out_delivers_to_every_binding_of_the_parameter() {
        let mut runtime = runtime();
        let handle = runtime.handles().film_thickness;

        // Fan the parameter out to a second uniform and a rebuild, behind the
        // stock thickness binding.
        runtime.bindings.bind(
            handle,
            BindingMode::Direct,
            SinkTarget::Uniform(UniformKey::OuterIndex),
        );
        runtime
            .bindings
            .bind(handle, BindingMode::Rebuild, SinkTarget::TextMesh);

        let stored = runtime
            .set_value(handle, ParamValue::Float(1500.0))
            .unwrap();
        assert_eq!(stored, ParamValue::Float(1500.0));

        // Every Direct sink observed the stored value, and the one Rebuild
        // binding produced exactly one replace.
        assert_eq!(runtime.uniforms().thickness, 1500.0);
        assert_eq!(runtime.uniforms().outer_index, 1500.0);
        assert_eq!(runtime.rebuilds(), 2);
        assert_eq!(runtime.disposals(), 1);
        assert_eq!(runtime.attached_count(), 1);
    }

    #[test]
    fn quantized_edit_rebuilds_with_the_stored_value() {
        let mut runtime = runtime();
        runtime
            .set_value(runtime.handles().curve_segments, ParamValue::Int(99))
            .unwrap();
        let geo = runtime.current_geometry().unwrap();
        assert_eq!(geo.settings().curve_segments, 12);
    }

    #[test]
    fn type_mismatch_changes_nothing() {
        let mut runtime = runtime();
        let err = runtime.set_value(runtime.handles().message, ParamValue::Float(1.0));
        assert!(matches!(err, Err(EditError::Param(_))));
        assert_eq!(runtime.rebuilds(), 1);
        assert_eq!(runtime.current_geometry().unwrap().message(), "lil-gui");
    }

    #[test]
    fn failed_rebuild_keeps_previous_geometry_attached() {
        let mut runtime = runtime();
        let old_id = runtime.current_geometry().unwrap().id();

        // '?' has no outline in the glyph set, so the build fails after the
        // registry stored the new message.
        let err = runtime.set_value(runtime.handles().message, ParamValue::Text("?".into()));
        assert!(matches!(err, Err(EditError::Scene(_))));

        assert_eq!(runtime.attached_count(), 1);
        let geo = runtime.current_geometry().unwrap();
        assert_eq!(geo.id(), old_id);
        assert_eq!(geo.message(), "lil-gui");
        assert!(!geo.is_disposed());
        assert_eq!(runtime.disposals(), 0);
    }

    #[test]
    fn shutdown_disposes_the_current_geometry() {
        let mut runtime = runtime();
        let disposed = runtime.shutdown().unwrap();
        assert!(disposed.is_some());
        assert_eq!(runtime.attached_count(), 0);
        assert!(runtime.current_geometry().is_none());
    }

    #[test]
    fn end_to_end_from_barrier_to_edit() {
        // Register 4 assets; the barrier must not fire before the 4th.
        let mut loads = StartupLoads::new();
        assert!(loads
            .complete(AssetSlot::FragmentShader, LoadedAsset::text("fs"))
            .unwrap()
            .is_none());
        assert!(loads
            .complete(AssetSlot::VertexShader, LoadedAsset::text("vs"))
            .unwrap()
            .is_none());
        assert!(loads
            .complete(
                AssetSlot::GlyphSet,
                LoadedAsset::glyphs(glyphs_for("lig-ushmerowd"))
            )
            .unwrap()
            .is_none());
        assert!(!loads.is_ready());

        let bundle = loads
            .complete(AssetSlot::EnvMap, LoadedAsset::texture(env_map()))
            .unwrap()
            .expect("ready fires exactly on the fourth signal");

        // Initial build from defaults.
        let mut runtime = SceneRuntime::new(bundle).unwrap();
        assert_eq!(runtime.attached_count(), 1);
        assert_eq!(runtime.current_geometry().unwrap().message(), "lil-gui");

        // One message edit: exactly one replace, old disposed, one attached.
        let old_id = runtime.current_geometry().unwrap().id();
        runtime
            .set_value(runtime.handles().message, ParamValue::Text("glow".into()))
            .unwrap();
        assert_eq!(runtime.rebuilds(), 2);
        assert_eq!(runtime.disposals(), 1);
        assert_eq!(runtime.attached_count(), 1);
        let geo = runtime.current_geometry().unwrap();
        assert_ne!(geo.id(), old_id);
        assert_eq!(geo.message(), "glow");
    }
}
