use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::barrier::BarrierError;

/// Content-addressed asset ID computed from the payload data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let result = hasher.finalize();
        let mut id = [0u8; 8];
        id.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(id))
    }
}

/// Texture sampling filter, chosen at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Linear,
    Nearest,
}

/// The fixed set of startup asset slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetSlot {
    FragmentShader,
    VertexShader,
    GlyphSet,
    EnvMap,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 4] = [
        AssetSlot::FragmentShader,
        AssetSlot::VertexShader,
        AssetSlot::GlyphSet,
        AssetSlot::EnvMap,
    ];

    /// Payload kind this slot accepts.
    pub fn expected_kind(self) -> &'static str {
        match self {
            AssetSlot::FragmentShader | AssetSlot::VertexShader => "text",
            AssetSlot::GlyphSet => "glyphs",
            AssetSlot::EnvMap => "texture",
        }
    }
}

/// One glyph outline: advance width plus closed contours in font units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub advance: f32,
    pub contours: Vec<Vec<[f32; 2]>>,
}

/// Parsed glyph-outline description for one font family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphSet {
    pub family: String,
    pub units_per_em: f32,
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphSet {
    pub fn new(family: impl Into<String>, units_per_em: f32) -> Self {
        Self {
            family: family.into(),
            units_per_em,
            glyphs: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Decoded RGBA image plus its sampling mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub filter: FilterMode,
}

/// A loaded payload, one of the three kinds the slots accept.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPayload {
    Text(String),
    Glyphs(GlyphSet),
    Texture(Texture),
}

impl AssetPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            AssetPayload::Text(_) => "text",
            AssetPayload::Glyphs(_) => "glyphs",
            AssetPayload::Texture(_) => "texture",
        }
    }
}

/// A payload together with its content-addressed id.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub id: AssetId,
    pub payload: AssetPayload,
}

impl LoadedAsset {
    pub fn text(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            id: AssetId::from_bytes(source.as_bytes()),
            payload: AssetPayload::Text(source),
        }
    }

    pub fn glyphs(set: GlyphSet) -> Self {
        Self {
            id: hash_glyph_set(&set),
            payload: AssetPayload::Glyphs(set),
        }
    }

    pub fn texture(texture: Texture) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(texture.width.to_le_bytes());
        hasher.update(texture.height.to_le_bytes());
        hasher.update(&texture.rgba);
        let result = hasher.finalize();
        let mut id = [0u8; 8];
        id.copy_from_slice(&result[..8]);
        Self {
            id: AssetId(u64::from_le_bytes(id)),
            payload: AssetPayload::Texture(texture),
        }
    }
}

fn hash_glyph_set(set: &GlyphSet) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(set.family.as_bytes());
    hasher.update(set.units_per_em.to_le_bytes());
    // BTreeMap iteration is ordered, so the digest is deterministic.
    for (ch, glyph) in &set.glyphs {
        hasher.update((*ch as u32).to_le_bytes());
        hasher.update(glyph.advance.to_le_bytes());
        for contour in &glyph.contours {
            for point in contour {
                hasher.update(point[0].to_le_bytes());
                hasher.update(point[1].to_le_bytes());
            }
        }
    }
    let result = hasher.finalize();
    let mut id = [0u8; 8];
    id.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(id))
}

/// Errors from asset loading and staging.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glyph set parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("slot {0:?} already holds a payload")]
    SlotOccupied(AssetSlot),
    #[error("slot {slot:?} expects a {expected} payload, got {got}")]
    KindMismatch {
        slot: AssetSlot,
        expected: &'static str,
        got: &'static str,
    },
    #[error("slot {0:?} never resolved")]
    MissingSlot(AssetSlot),
    #[error(transparent)]
    Barrier(#[from] BarrierError),
}

/// Mutable staging area that collects payloads while loads resolve.
///
/// Slots fill in arbitrary order, each at most once. `finish` seals the
/// staging into an immutable bundle.
#[derive(Debug, Default)]
pub struct AssetStaging {
    slots: BTreeMap<AssetSlot, LoadedAsset>,
}

impl AssetStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved payload. Occupied slots and mismatched payload
    /// kinds are caller errors.
    pub fn store(&mut self, slot: AssetSlot, asset: LoadedAsset) -> Result<(), AssetError> {
        if self.slots.contains_key(&slot) {
            return Err(AssetError::SlotOccupied(slot));
        }
        if asset.payload.kind() != slot.expected_kind() {
            return Err(AssetError::KindMismatch {
                slot,
                expected: slot.expected_kind(),
                got: asset.payload.kind(),
            });
        }
        tracing::debug!(?slot, id = asset.id.0, "asset staged");
        self.slots.insert(slot, asset);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Seal the staging into an immutable bundle. Every slot must have
    /// resolved.
    pub fn finish(mut self) -> Result<AssetBundle, AssetError> {
        let mut ids = BTreeMap::new();
        for slot in AssetSlot::ALL {
            let asset = self.slots.get(&slot).ok_or(AssetError::MissingSlot(slot))?;
            ids.insert(slot, asset.id);
        }

        let take = |slots: &mut BTreeMap<AssetSlot, LoadedAsset>, slot| {
            slots.remove(&slot).map(|a| a.payload)
        };

        // Kind checks happened at store time, so these matches are total.
        let fragment_shader = match take(&mut self.slots, AssetSlot::FragmentShader) {
            Some(AssetPayload::Text(s)) => s,
            _ => return Err(AssetError::MissingSlot(AssetSlot::FragmentShader)),
        };
        let vertex_shader = match take(&mut self.slots, AssetSlot::VertexShader) {
            Some(AssetPayload::Text(s)) => s,
            _ => return Err(AssetError::MissingSlot(AssetSlot::VertexShader)),
        };
        let glyphs = match take(&mut self.slots, AssetSlot::GlyphSet) {
            Some(AssetPayload::Glyphs(g)) => g,
            _ => return Err(AssetError::MissingSlot(AssetSlot::GlyphSet)),
        };
        let env_map = match take(&mut self.slots, AssetSlot::EnvMap) {
            Some(AssetPayload::Texture(t)) => t,
            _ => return Err(AssetError::MissingSlot(AssetSlot::EnvMap)),
        };

        Ok(AssetBundle {
            fragment_shader,
            vertex_shader,
            glyphs,
            env_map,
            ids,
        })
    }
}

/// The complete, immutable set of startup assets.
///
/// Constructed once the barrier fires and passed explicitly into scene
/// initialization. Loaded payloads are never mutated afterwards.
#[derive(Debug)]
pub struct AssetBundle {
    fragment_shader: String,
    vertex_shader: String,
    glyphs: GlyphSet,
    env_map: Texture,
    ids: BTreeMap<AssetSlot, AssetId>,
}

impl AssetBundle {
    pub fn fragment_shader(&self) -> &str {
        &self.fragment_shader
    }

    pub fn vertex_shader(&self) -> &str {
        &self.vertex_shader
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn env_map(&self) -> &Texture {
        &self.env_map
    }

    pub fn id(&self, slot: AssetSlot) -> Option<AssetId> {
        self.ids.get(&slot).copied()
    }

    /// Split the bundle into its parts for consumers that take ownership.
    pub fn into_parts(self) -> (String, String, GlyphSet, Texture) {
        (
            self.fragment_shader,
            self.vertex_shader,
            self.glyphs,
            self.env_map,
        )
    }
}
