//! Scene geometry answered from the current layout snapshot

use sn_camera::{CameraError, SceneQuery};
use sn_core::{Aabb, WorldPose};
use sn_layout::LayoutSnapshot;

/// [`SceneQuery`] over a [`LayoutSnapshot`]. Uses target transforms, so
/// answers describe where items end up rather than where they are
/// mid-animation.
pub struct LayoutScene<'a> {
    snapshot: Option<&'a LayoutSnapshot>,
}

impl<'a> LayoutScene<'a> {
    pub fn new(snapshot: Option<&'a LayoutSnapshot>) -> Self {
        Self { snapshot }
    }

    fn snapshot(&self) -> Result<&'a LayoutSnapshot, CameraError> {
        self.snapshot
            .ok_or_else(|| CameraError::GeometryUnavailable("no layout computed".to_string()))
    }

    fn check_index(&self, index: usize) -> Result<&'a LayoutSnapshot, CameraError> {
        let snapshot = self.snapshot()?;
        if index >= snapshot.len() {
            return Err(CameraError::ItemOutOfRange {
                index,
                count: snapshot.len(),
            });
        }
        Ok(snapshot)
    }
}

impl SceneQuery for LayoutScene<'_> {
    fn item_count(&self) -> usize {
        self.snapshot.map(LayoutSnapshot::len).unwrap_or(0)
    }

    fn item_bounds(&self, index: usize) -> Result<Aabb, CameraError> {
        let bounds = self
            .check_index(index)?
            .item_bounds(index)
            .ok_or(CameraError::ItemOutOfRange {
                index,
                count: self.item_count(),
            })?;
        if !bounds.is_finite() {
            return Err(CameraError::NonFiniteGeometry(index));
        }
        Ok(bounds)
    }

    fn item_pose(&self, index: usize) -> Result<WorldPose, CameraError> {
        let pose = self
            .check_index(index)?
            .world_pose(index)
            .ok_or(CameraError::ItemOutOfRange {
                index,
                count: self.item_count(),
            })?;
        if !pose.is_finite() {
            return Err(CameraError::NonFiniteGeometry(index));
        }
        Ok(pose)
    }

    fn overview_bounds(&self) -> Option<Aabb> {
        self.snapshot
            .and_then(LayoutSnapshot::overview_bounds)
            .filter(Aabb::is_finite)
    }

    fn focus_bounds(&self, _index: usize) -> Option<Aabb> {
        self.snapshot
            .and_then(LayoutSnapshot::focus_bounds)
            .filter(Aabb::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_core::{Category, ContentIndex, NavigationState};
    use sn_layout::{compute_snapshot, LayoutContext, PillarPositioner, Viewport};

    #[test]
    fn test_answers_from_snapshot() {
        let index = ContentIndex::build(
            &[Category::new("a").with_items(["a1".to_string(), "a2".to_string()])],
            1,
        );
        let state = NavigationState::at(index.get(0).expect("item"));
        let ctx = LayoutContext::from_index(&index, &state, Viewport::default());
        let snapshot = compute_snapshot(&PillarPositioner::default(), &ctx);
        let scene = LayoutScene::new(Some(&snapshot));

        assert_eq!(scene.item_count(), 2);
        assert!(scene.item_pose(1).is_ok());
        assert!(scene.item_bounds(0).expect("bounds").is_finite());
        assert_eq!(
            scene.item_bounds(2),
            Err(CameraError::ItemOutOfRange { index: 2, count: 2 })
        );
        assert!(scene.overview_bounds().is_some());
        assert!(scene.focus_bounds(0).is_none());
    }

    #[test]
    fn test_missing_snapshot() {
        let scene = LayoutScene::new(None);
        assert_eq!(scene.item_count(), 0);
        assert!(matches!(
            scene.item_pose(0),
            Err(CameraError::GeometryUnavailable(_))
        ));
        assert!(scene.overview_bounds().is_none());
    }
}
