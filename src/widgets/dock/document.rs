//! Document/scene collaborator seen from the timeline dock.
//!
//! The dock never owns scenes or keyframes; it only asks the document to
//! move the playhead, look up neighbouring keyframes and flip flags.

/// Opaque document model the dock drives.
pub trait Document {
    fn has_active_scene(&self) -> bool;

    fn active_scene_frame(&self) -> i32;

    fn set_active_scene_frame(&mut self, frame: i32);

    fn inc_active_scene_frame(&mut self) {
        let frame = self.active_scene_frame();
        self.set_active_scene_frame(frame + 1);
    }

    fn dec_active_scene_frame(&mut self) {
        let frame = self.active_scene_frame();
        self.set_active_scene_frame(frame - 1);
    }

    /// Closest keyframe strictly before `frame` in the active scene.
    fn prev_key_frame(&self, frame: i32) -> Option<i32>;

    /// Closest keyframe strictly after `frame` in the active scene.
    fn next_key_frame(&self, frame: i32) -> Option<i32>;

    fn local_pivot(&self) -> bool;

    /// Implementations update every scene's pivot and record the change as a
    /// finished user action.
    fn set_local_pivot(&mut self, local: bool);

    /// Resolution fraction of the active scene, None without a scene.
    fn resolution_fraction(&self) -> Option<f64>;

    fn set_resolution_fraction(&mut self, fraction: f64);
}

/// In-memory document with a single scene, used by the standalone binaries.
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryDocument {
    scene: Option<InMemoryScene>,
    local_pivot: bool,
    /// Finished user actions (undo checkpoints in a real document)
    pub actions: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct InMemoryScene {
    frame: i32,
    keys: Vec<i32>,
    resolution: f64,
    pivot_updates: usize,
}

impl InMemoryDocument {
    /// Document without an active scene.
    pub fn empty() -> Self {
        Self {
            scene: None,
            local_pivot: false,
            actions: 0,
        }
    }

    /// Document with one active scene keyed at `keys` (any order, duplicates dropped).
    pub fn with_scene(mut keys: Vec<i32>) -> Self {
        keys.sort_unstable();
        keys.dedup();
        Self {
            scene: Some(InMemoryScene {
                frame: 0,
                keys,
                resolution: 1.0,
                pivot_updates: 0,
            }),
            local_pivot: false,
            actions: 0,
        }
    }

    /// How many times the scene recomputed its pivot.
    pub fn pivot_updates(&self) -> usize {
        self.scene.as_ref().map(|s| s.pivot_updates).unwrap_or(0)
    }
}

impl Document for InMemoryDocument {
    fn has_active_scene(&self) -> bool {
        self.scene.is_some()
    }

    fn active_scene_frame(&self) -> i32 {
        self.scene.as_ref().map(|s| s.frame).unwrap_or(0)
    }

    fn set_active_scene_frame(&mut self, frame: i32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.frame = frame;
        }
    }

    fn prev_key_frame(&self, frame: i32) -> Option<i32> {
        let scene = self.scene.as_ref()?;
        scene.keys.iter().rev().find(|k| **k < frame).copied()
    }

    fn next_key_frame(&self, frame: i32) -> Option<i32> {
        let scene = self.scene.as_ref()?;
        scene.keys.iter().find(|k| **k > frame).copied()
    }

    fn local_pivot(&self) -> bool {
        self.local_pivot
    }

    fn set_local_pivot(&mut self, local: bool) {
        self.local_pivot = local;
        if let Some(scene) = self.scene.as_mut() {
            scene.pivot_updates += 1;
        }
        self.actions += 1;
    }

    fn resolution_fraction(&self) -> Option<f64> {
        self.scene.as_ref().map(|s| s.resolution)
    }

    fn set_resolution_fraction(&mut self, fraction: f64) {
        if let Some(scene) = self.scene.as_mut() {
            scene.resolution = fraction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_lookup_is_strict() {
        let doc = InMemoryDocument::with_scene(vec![20, 5, 10, 10]);
        assert_eq!(doc.prev_key_frame(10), Some(5));
        assert_eq!(doc.next_key_frame(10), Some(20));
        assert_eq!(doc.prev_key_frame(5), None);
        assert_eq!(doc.next_key_frame(20), None);
    }

    #[test]
    fn test_empty_document_ignores_scene_writes() {
        let mut doc = InMemoryDocument::empty();
        doc.set_active_scene_frame(7);
        doc.inc_active_scene_frame();
        doc.set_resolution_fraction(0.5);
        assert_eq!(doc.active_scene_frame(), 0);
        assert_eq!(doc.resolution_fraction(), None);
        assert_eq!(doc.next_key_frame(0), None);
    }

    #[test]
    fn test_local_pivot_updates_scene_and_records_action() {
        let mut doc = InMemoryDocument::with_scene(vec![]);
        doc.set_local_pivot(true);
        assert!(doc.local_pivot());
        assert_eq!(doc.pivot_updates(), 1);
        assert_eq!(doc.actions, 1);
    }
}
