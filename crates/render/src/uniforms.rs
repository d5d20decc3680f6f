use shimmer_assets::AssetId;

/// The shader source pair loaded at startup. Owned by the material, never
/// recompiled on edits.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Addressable thin-film uniform fields for Direct bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKey {
    Thickness,
    OuterIndex,
    FilmIndex,
    InnerIndex,
    Polarization,
}

/// Thin-film interference shader inputs.
///
/// These are live mutable fields consumed by the renderer every frame;
/// Direct-bound controls write straight into them.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinFilmUniforms {
    pub thickness: f32,
    pub outer_index: f32,
    pub film_index: f32,
    pub inner_index: f32,
    pub polarization: f32,
    /// Environment map sampled by the shader; fixed after startup.
    pub env_map: AssetId,
}

impl ThinFilmUniforms {
    /// Demo defaults, with the environment map handed in from the bundle.
    pub fn new(env_map: AssetId) -> Self {
        Self {
            thickness: 880.0,
            outer_index: 1.0,
            film_index: 1.75,
            inner_index: 1.0,
            polarization: 1.5,
            env_map,
        }
    }

    pub fn set(&mut self, key: UniformKey, value: f32) {
        tracing::debug!(?key, value, "uniform written");
        match key {
            UniformKey::Thickness => self.thickness = value,
            UniformKey::OuterIndex => self.outer_index = value,
            UniformKey::FilmIndex => self.film_index = value,
            UniformKey::InnerIndex => self.inner_index = value,
            UniformKey::Polarization => self.polarization = value,
        }
    }

    pub fn get(&self, key: UniformKey) -> f32 {
        match key {
            UniformKey::Thickness => self.thickness,
            UniformKey::OuterIndex => self.outer_index,
            UniformKey::FilmIndex => self.film_index,
            UniformKey::InnerIndex => self.inner_index,
            UniformKey::Polarization => self.polarization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_material() {
        let uniforms = ThinFilmUniforms::new(AssetId(1));
        assert_eq!(uniforms.thickness, 880.0);
        assert_eq!(uniforms.film_index, 1.75);
        assert_eq!(uniforms.polarization, 1.5);
        assert_eq!(uniforms.outer_index, 1.0);
        assert_eq!(uniforms.inner_index, 1.0);
    }

    #[test]
    fn set_and_get_round_trip_each_key() {
        let mut uniforms = ThinFilmUniforms::new(AssetId(1));
        for (i, key) in [
            UniformKey::Thickness,
            UniformKey::OuterIndex,
            UniformKey::FilmIndex,
            UniformKey::InnerIndex,
            UniformKey::Polarization,
        ]
        .into_iter()
        .enumerate()
        {
            uniforms.set(key, i as f32 + 0.5);
            assert_eq!(uniforms.get(key), i as f32 + 0.5);
        }
    }
}
