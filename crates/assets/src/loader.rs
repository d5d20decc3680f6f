use std::path::Path;

use crate::barrier::{AssetBarrier, BarrierState};
use crate::bundle::{
    AssetBundle, AssetError, AssetSlot, AssetStaging, FilterMode, GlyphSet, LoadedAsset, Texture,
};

/// Narrow loader contract: resolve one path into a loaded payload.
///
/// Loaders own their parsing; the rest of the pipeline only sees
/// [`LoadedAsset`] values.
pub trait AssetLoader {
    fn load(&mut self, path: &Path) -> Result<LoadedAsset, AssetError>;
}

/// Loads a raw UTF-8 text payload (shader sources).
#[derive(Debug, Default)]
pub struct TextLoader;

impl AssetLoader for TextLoader {
    fn load(&mut self, path: &Path) -> Result<LoadedAsset, AssetError> {
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "text asset loaded");
        Ok(LoadedAsset::text(source))
    }
}

/// Loads and parses a glyph-outline description from JSON.
#[derive(Debug, Default)]
pub struct GlyphSetLoader;

impl AssetLoader for GlyphSetLoader {
    fn load(&mut self, path: &Path) -> Result<LoadedAsset, AssetError> {
        let json = std::fs::read_to_string(path)?;
        let set = GlyphSet::from_json(&json)?;
        tracing::debug!(path = %path.display(), glyphs = set.len(), "glyph set loaded");
        Ok(LoadedAsset::glyphs(set))
    }
}

/// Decodes a PNG into an RGBA texture with the configured sampling filter.
#[derive(Debug, Default)]
pub struct TextureLoader {
    pub filter: FilterMode,
}

impl TextureLoader {
    pub fn with_filter(filter: FilterMode) -> Self {
        Self { filter }
    }
}

impl AssetLoader for TextureLoader {
    fn load(&mut self, path: &Path) -> Result<LoadedAsset, AssetError> {
        let bytes = std::fs::read(path)?;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let texture = Texture {
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
            filter: self.filter,
        };
        tracing::debug!(
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            filter = ?texture.filter,
            "texture loaded"
        );
        Ok(LoadedAsset::texture(texture))
    }
}

/// Drives the fixed startup load set: staging plus barrier.
///
/// Each resolved load is delivered through [`StartupLoads::complete`], in any
/// order. The call that completes the set returns the sealed bundle, exactly
/// once. This replaces closure-captured loading state with an explicit value
/// handed to initialization.
#[derive(Debug)]
pub struct StartupLoads {
    staging: AssetStaging,
    barrier: AssetBarrier,
}

impl StartupLoads {
    /// Expect one completion per slot in [`AssetSlot::ALL`].
    pub fn new() -> Self {
        Self {
            staging: AssetStaging::new(),
            barrier: AssetBarrier::new(AssetSlot::ALL.len() as u32),
        }
    }

    /// Deliver one resolved load. Returns `Some(bundle)` on the completing
    /// call. A payload for an occupied slot or of the wrong kind is rejected
    /// without signaling the barrier.
    pub fn complete(
        &mut self,
        slot: AssetSlot,
        asset: LoadedAsset,
    ) -> Result<Option<AssetBundle>, AssetError> {
        self.staging.store(slot, asset)?;
        match self.barrier.signal()? {
            BarrierState::Ready => {
                let staging = std::mem::take(&mut self.staging);
                Ok(Some(staging.finish()?))
            }
            BarrierState::Pending { .. } => Ok(None),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.barrier.is_ready()
    }

    pub fn received(&self) -> u32 {
        self.barrier.received()
    }
}

impl Default for StartupLoads {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Glyph;
    use std::io::Write;

    fn glyphs() -> GlyphSet {
        let mut set = GlyphSet::new("test", 1000.0);
        set.insert(
            'x',
            Glyph {
                advance: 500.0,
                contours: vec![vec![[0.0, 0.0], [400.0, 0.0], [400.0, 600.0], [0.0, 600.0]]],
            },
        );
        set
    }

    fn texture() -> Texture {
        Texture {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
            filter: FilterMode::Linear,
        }
    }

    #[test]
    fn text_loader_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "uniform float thickness;").unwrap();

        let asset = TextLoader.load(file.path()).unwrap();
        match asset.payload {
            crate::AssetPayload::Text(src) => assert!(src.contains("thickness")),
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn glyph_loader_parses_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"family":"demo","units_per_em":1000.0,"glyphs":{{"u":{{"advance":500.0,"contours":[[[0,0],[100,0],[100,100]]]}}}}}}"#
        )
        .unwrap();

        let asset = GlyphSetLoader.load(file.path()).unwrap();
        match asset.payload {
            crate::AssetPayload::Glyphs(set) => assert!(set.contains('u')),
            other => panic!("expected glyph payload, got {other:?}"),
        }
    }

    #[test]
    fn glyph_loader_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            GlyphSetLoader.load(file.path()),
            Err(AssetError::Json(_))
        ));
    }

    #[test]
    fn texture_loader_reports_bad_png() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert!(matches!(
            TextureLoader::default().load(file.path()),
            Err(AssetError::Image(_))
        ));
    }

    #[test]
    fn loads_complete_in_any_order() {
        let mut loads = StartupLoads::new();
        assert!(loads
            .complete(AssetSlot::EnvMap, LoadedAsset::texture(texture()))
            .unwrap()
            .is_none());
        assert!(loads
            .complete(AssetSlot::GlyphSet, LoadedAsset::glyphs(glyphs()))
            .unwrap()
            .is_none());
        assert!(loads
            .complete(AssetSlot::VertexShader, LoadedAsset::text("vs"))
            .unwrap()
            .is_none());
        assert!(!loads.is_ready());

        let bundle = loads
            .complete(AssetSlot::FragmentShader, LoadedAsset::text("fs"))
            .unwrap()
            .expect("fourth completion seals the bundle");
        assert!(loads.is_ready());
        assert_eq!(bundle.vertex_shader(), "vs");
    }

    #[test]
    fn wrong_kind_does_not_signal() {
        let mut loads = StartupLoads::new();
        let err = loads.complete(AssetSlot::GlyphSet, LoadedAsset::text("oops"));
        assert!(matches!(err, Err(AssetError::KindMismatch { .. })));
        assert_eq!(loads.received(), 0);
    }

    #[test]
    fn duplicate_slot_does_not_signal() {
        let mut loads = StartupLoads::new();
        loads
            .complete(AssetSlot::VertexShader, LoadedAsset::text("vs"))
            .unwrap();
        let err = loads.complete(AssetSlot::VertexShader, LoadedAsset::text("vs2"));
        assert!(matches!(err, Err(AssetError::SlotOccupied(_))));
        assert_eq!(loads.received(), 1);
    }
}
