//! Asset collaborator
//!
//! Images and fonts are requested by logical path. A missing or unreadable
//! asset is always fatal to whoever asked for it; there are no placeholders.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Every resource the game knows how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKey {
    PlayerSheet,
    ObstacleSheet,
    NightBackground,
    DuskBackground,
    Font,
}

impl AssetKey {
    /// Logical path relative to the asset root
    pub fn path(&self) -> &'static str {
        match self {
            AssetKey::PlayerSheet => "images/player.png",
            AssetKey::ObstacleSheet => "images/pipes/pipes.png",
            AssetKey::NightBackground => "images/backgrounds/night.png",
            AssetKey::DuskBackground => "images/backgrounds/dusk.png",
            AssetKey::Font => "fonts/pixelify-sans.ttf",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(&'static str),
    #[error("failed to read {path}: {source}")]
    Io {
        path: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a PNG image")]
    InvalidImage(&'static str),
    #[error("{0} is not a TrueType/OpenType font")]
    InvalidFont(&'static str),
}

/// A decoded-enough image: its native size plus the raw encoded bytes
/// for whichever backend ends up uploading it.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub key: AssetKey,
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

/// Font face, loaded once at startup and handed to the overlay renderer
#[derive(Debug, Clone)]
pub struct FontFace {
    pub bytes: Arc<[u8]>,
}

/// Source of named assets (filesystem, embedded, test fixtures)
pub trait AssetSource {
    /// Raw bytes for a key
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or cannot be read.
    fn read(&self, key: AssetKey) -> Result<Arc<[u8]>, AssetError>;

    /// Load an image and read its native dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or is not a PNG.
    fn sprite(&self, key: AssetKey) -> Result<SpriteSheet, AssetError> {
        let bytes = self.read(key)?;
        let (width, height) = png_dimensions(&bytes).ok_or(AssetError::InvalidImage(key.path()))?;
        log::debug!("Loaded {} ({}x{})", key.path(), width, height);
        Ok(SpriteSheet {
            key,
            width,
            height,
            bytes,
        })
    }

    /// Load a font face
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or has no font signature.
    fn font(&self, key: AssetKey) -> Result<FontFace, AssetError> {
        let bytes = self.read(key)?;
        if !is_font(&bytes) {
            return Err(AssetError::InvalidFont(key.path()));
        }
        log::debug!("Loaded font {} ({} bytes)", key.path(), bytes.len());
        Ok(FontFace { bytes })
    }
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Width and height from the IHDR chunk, which must come first
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn is_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

/// Smallest byte string `png_dimensions` accepts: signature plus IHDR
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(33);
    bytes.extend_from_slice(&PNG_SIGNATURE);
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    // bit depth, colour type (RGBA), compression, filter, interlace, CRC
    bytes.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

/// Assets read from a directory tree laid out by `AssetKey::path`
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn read(&self, key: AssetKey) -> Result<Arc<[u8]>, AssetError> {
        let path = key.path();
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AssetError::NotFound(path)),
            Err(source) => Err(AssetError::Io { path, source }),
        }
    }
}

/// Assets held in memory (embedded at build time or built by a test)
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    entries: HashMap<AssetKey, Arc<[u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header-only images sized for a world of `width` x `height` and an
    /// empty TrueType face; enough for headless runs.
    pub fn headless(width: u32, height: u32) -> Self {
        let mut assets = Self::new();
        assets.insert(AssetKey::PlayerSheet, png_header(16 * 4, 16));
        assets.insert(AssetKey::ObstacleSheet, png_header(32, 32));
        assets.insert(AssetKey::NightBackground, png_header(width, height));
        assets.insert(AssetKey::DuskBackground, png_header(width, height));
        assets.insert(AssetKey::Font, vec![0x00, 0x01, 0x00, 0x00]);
        assets
    }

    pub fn insert(&mut self, key: AssetKey, bytes: impl Into<Arc<[u8]>>) {
        self.entries.insert(key, bytes.into());
    }

    pub fn remove(&mut self, key: AssetKey) {
        self.entries.remove(&key);
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, key: AssetKey) -> Result<Arc<[u8]>, AssetError> {
        self.entries
            .get(&key)
            .cloned()
            .ok_or(AssetError::NotFound(key.path()))
    }
}
