//! Sprite animation registry, one bundle per life stage.
//!
//! Frames are opaque handles (an id plus a pixel span). This module only
//! selects and indexes them; decoding is left to the display driver.
//!
//! Pixel spans are raw RGB565, little endian, `w * h` pixels, with
//! [`StageAssets::key`] as the transparent colour.

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;

use crate::components::lifestage::LifeStage;

/// Creature sprite width in pixels.
pub const CREATURE_W: u16 = 90;
/// Creature sprite height in pixels.
pub const CREATURE_H: u16 = 90;
/// RGB565 magenta, used as the transparent colour key.
pub const COLOR_KEY: u16 = 0xF81F;

/// Opaque reference to one frame of pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRef {
    pub id: Arc<str>,
    pub pixels: Arc<[u8]>,
}

impl FrameRef {
    pub fn new(id: impl Into<Arc<str>>, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: id.into(),
            pixels: pixels.into(),
        }
    }

    /// Read pixel `i` as an RGB565 value, if the span is long enough.
    pub fn rgb565(&self, i: usize) -> Option<u16> {
        let lo = *self.pixels.get(i * 2)?;
        let hi = *self.pixels.get(i * 2 + 1)?;
        Some(u16::from_le_bytes([lo, hi]))
    }
}

/// Immutable, named sequence of frames with wraparound indexing.
///
/// An empty asset is valid; [`AnimationAsset::frame`] then returns `None`
/// for every index.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAsset {
    pub name: Arc<str>,
    frames: Arc<[FrameRef]>,
}

impl AnimationAsset {
    pub fn new(name: impl Into<Arc<str>>, frames: Vec<FrameRef>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into(),
        }
    }

    pub fn empty(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index mod count`, or `None` for an empty asset.
    pub fn frame(&self, index: usize) -> Option<&FrameRef> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(index % self.frames.len())
    }
}

/// Everything the renderer needs for one life stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageAssets {
    pub w: u16,
    pub h: u16,
    /// Transparent colour key of the frames.
    pub key: u16,
    pub walk: AnimationAsset,
}

/// Errors raised while loading sprite frames from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read sprite directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read frame {path}: {source}")]
    ReadFrame {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("frame {path} has {actual} bytes, expected {expected}")]
    FrameSize {
        path: String,
        actual: usize,
        expected: usize,
    },
}

/// Central registry of per-stage sprite bundles.
#[derive(Resource, Debug, Clone)]
pub struct AnimationStore {
    junior: StageAssets,
    adult: StageAssets,
    senior: StageAssets,
}

impl AnimationStore {
    pub fn new(junior: StageAssets, adult: StageAssets, senior: StageAssets) -> Self {
        Self {
            junior,
            adult,
            senior,
        }
    }

    /// The bundle for `stage`. Total over the closed [`LifeStage`] enum.
    pub fn select(&self, stage: LifeStage) -> &StageAssets {
        match stage {
            LifeStage::Junior => &self.junior,
            LifeStage::Adult => &self.adult,
            LifeStage::Senior => &self.senior,
        }
    }

    /// Select by raw stage index; unknown indices fall back to the junior
    /// bundle (logged, see [`LifeStage::from_index`]).
    pub fn select_index(&self, index: u8) -> &StageAssets {
        self.select(LifeStage::from_index(index))
    }

    /// Generated frames for every stage, for running without sprite files.
    ///
    /// Each stage gets `frames` frames of a coloured body that bobs up and
    /// down on a transparent background.
    pub fn placeholder(frames: usize) -> Self {
        let bundle = |stage: LifeStage, rgb: u16| StageAssets {
            w: CREATURE_W,
            h: CREATURE_H,
            key: COLOR_KEY,
            walk: AnimationAsset::new(
                format!("{stage}_walk"),
                (0..frames)
                    .map(|i| placeholder_frame(stage, i, rgb))
                    .collect(),
            ),
        };
        Self::new(
            bundle(LifeStage::Junior, 0x87E0),
            bundle(LifeStage::Adult, 0x2589),
            bundle(LifeStage::Senior, 0x8410),
        )
    }

    /// Load `<stage>_walk_*.rgb565` files from `dir`, sorted by file name.
    ///
    /// A stage with no matching files gets an empty walk asset.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let expected = CREATURE_W as usize * CREATURE_H as usize * 2;

        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .map_err(|source| AssetError::ReadDir {
                path: dir.display().to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "rgb565"))
            .collect();
        entries.sort();

        let load_stage = |stage: LifeStage| -> Result<StageAssets, AssetError> {
            let prefix = format!("{stage}_walk_");
            let mut frames = Vec::new();
            for path in entries.iter() {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !stem.starts_with(&prefix) {
                    continue;
                }
                let bytes = std::fs::read(path).map_err(|source| AssetError::ReadFrame {
                    path: path.display().to_string(),
                    source,
                })?;
                if bytes.len() != expected {
                    return Err(AssetError::FrameSize {
                        path: path.display().to_string(),
                        actual: bytes.len(),
                        expected,
                    });
                }
                frames.push(FrameRef::new(stem, bytes));
            }
            log::info!("loaded {} {stage} walk frames from {}", frames.len(), dir.display());
            Ok(StageAssets {
                w: CREATURE_W,
                h: CREATURE_H,
                key: COLOR_KEY,
                walk: AnimationAsset::new(format!("{stage}_walk"), frames),
            })
        };

        Ok(Self::new(
            load_stage(LifeStage::Junior)?,
            load_stage(LifeStage::Adult)?,
            load_stage(LifeStage::Senior)?,
        ))
    }
}

fn placeholder_frame(stage: LifeStage, index: usize, body: u16) -> FrameRef {
    let w = CREATURE_W as i32;
    let h = CREATURE_H as i32;
    let bob = [0, 2, 4, 2][index % 4];
    let (cx, cy) = (w / 2, h / 2 + bob);
    let radius = match stage {
        LifeStage::Junior => 24,
        LifeStage::Adult => 34,
        LifeStage::Senior => 32,
    };

    let mut pixels = Vec::with_capacity((w * h * 2) as usize);
    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = (x - cx, y - cy);
            let color = if dx * dx + dy * dy <= radius * radius {
                body
            } else {
                COLOR_KEY
            };
            pixels.extend_from_slice(&color.to_le_bytes());
        }
    }
    FrameRef::new(format!("{stage}_walk_{index:02}"), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<FrameRef> {
        (0..n)
            .map(|i| FrameRef::new(format!("f{i}"), vec![i as u8, 0]))
            .collect()
    }

    #[test]
    fn frame_wraps_around() {
        let asset = AnimationAsset::new("walk", frames(3));
        for idx in 0..20 {
            let frame = asset.frame(idx).unwrap();
            assert_eq!(&*frame.id, format!("f{}", idx % 3));
        }
        assert_eq!(&*asset.frame(usize::MAX).unwrap().id, "f0");
    }

    #[test]
    fn empty_asset_never_indexes() {
        let asset = AnimationAsset::empty("walk");
        assert_eq!(asset.count(), 0);
        for idx in [0, 1, 7, usize::MAX] {
            assert!(asset.frame(idx).is_none());
        }
    }

    #[test]
    fn select_matches_stage() {
        let store = AnimationStore::placeholder(4);
        assert_eq!(&*store.select(LifeStage::Junior).walk.name, "junior_walk");
        assert_eq!(&*store.select(LifeStage::Adult).walk.name, "adult_walk");
        assert_eq!(&*store.select(LifeStage::Senior).walk.name, "senior_walk");
        assert_eq!(store.select(LifeStage::Senior).walk.count(), 4);
    }

    #[test]
    fn unknown_index_selects_junior() {
        let store = AnimationStore::placeholder(2);
        assert_eq!(store.select_index(9), store.select(LifeStage::Junior));
        assert_eq!(store.select_index(1), store.select(LifeStage::Adult));
    }

    #[test]
    fn placeholder_frames_are_full_size() {
        let store = AnimationStore::placeholder(1);
        let assets = store.select(LifeStage::Adult);
        let frame = assets.walk.frame(0).unwrap();
        assert_eq!(frame.pixels.len(), 90 * 90 * 2);
        assert_eq!(frame.rgb565(0), Some(COLOR_KEY));
        assert_eq!(frame.rgb565(45 * 90 + 45), Some(0x2589));
        assert_eq!(frame.rgb565(90 * 90), None);
    }

    #[test]
    fn load_dir_reports_missing_directory() {
        let err = AnimationStore::load_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, AssetError::ReadDir { .. }));
    }

    #[test]
    fn load_dir_reads_sorted_frames_per_stage() {
        let dir = std::env::temp_dir().join(format!("jurassiclife-sprites-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let frame = vec![0u8; 90 * 90 * 2];
        std::fs::write(dir.join("adult_walk_02.rgb565"), &frame).unwrap();
        std::fs::write(dir.join("adult_walk_01.rgb565"), &frame).unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let store = AnimationStore::load_dir(&dir).unwrap();
        let adult = &store.select(LifeStage::Adult).walk;
        assert_eq!(adult.count(), 2);
        assert_eq!(&*adult.frame(0).unwrap().id, "adult_walk_01");
        assert!(store.select(LifeStage::Junior).walk.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
