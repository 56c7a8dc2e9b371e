//! Rebuildable R-tree index over current asset footprints.
//!
//! Mutations (`add_asset`, `remove_asset`, `clear`) only mark the index
//! dirty; the R-tree itself is rebuilt lazily on the next query via an
//! explicit [`rebuild`](SpatialIndex::rebuild). Assets are kept in insertion
//! order so every query and audit is deterministic.

use rstar::{RTree, RTreeObject, AABB};

use crate::asset::Asset;

/// R-tree entry: an asset id with its axis-aligned envelope.
#[derive(Clone, Debug)]
struct IndexedFootprint {
    /// Position of the asset in the insertion-ordered store.
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFootprint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A rebuildable range-query index over asset geometries.
///
/// Owned privately by one [`CollisionDetector`](super::CollisionDetector);
/// never shared and never mutated reactively from elsewhere.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    assets: Vec<Asset>,
    tree: RTree<IndexedFootprint>,
    dirty: bool,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an asset, replacing any existing asset with the same id.
    ///
    /// Marks the index dirty; the tree is rebuilt on the next query.
    pub fn add_asset(&mut self, asset: Asset) {
        match self.assets.iter().position(|a| a.id == asset.id) {
            Some(slot) => self.assets[slot] = asset,
            None => self.assets.push(asset),
        }
        self.dirty = true;
    }

    /// Removes an asset by id, returning it if present.
    pub fn remove_asset(&mut self, id: &str) -> Option<Asset> {
        let slot = self.assets.iter().position(|a| a.id == id)?;
        self.dirty = true;
        Some(self.assets.remove(slot))
    }

    /// Removes all assets.
    pub fn clear(&mut self) {
        self.assets.clear();
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// All currently held assets, in insertion order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Whether a mutation has invalidated the tree since the last rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuilds the R-tree from the current asset set.
    pub fn rebuild(&mut self) {
        let entries: Vec<IndexedFootprint> = self
            .assets
            .iter()
            .enumerate()
            .map(|(slot, asset)| {
                let (min_x, min_y, max_x, max_y) = asset.bounds();
                IndexedFootprint {
                    slot,
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                }
            })
            .collect();
        self.tree = RTree::bulk_load(entries);
        self.dirty = false;
    }

    /// Returns the assets whose envelopes intersect the query box.
    ///
    /// Rebuilds lazily when dirty. Envelope intersection is a superset
    /// filter: exact geometric tests happen in the collision detector.
    /// Results come back in insertion order.
    pub fn query(&mut self, min: [f64; 2], max: [f64; 2]) -> Vec<&Asset> {
        if self.dirty {
            self.rebuild();
        }
        let query_box = AABB::from_corners(min, max);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_box)
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots.into_iter().map(|slot| &self.assets[slot]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    fn asset(id: &str, x: f64, y: f64) -> Asset {
        Asset::new(id, id.to_uppercase(), AssetKind::Building, 10.0, 10.0).at(x, y)
    }

    fn query_ids(index: &mut SpatialIndex, min: [f64; 2], max: [f64; 2]) -> Vec<String> {
        index
            .query(min, max)
            .into_iter()
            .map(|a| a.id.clone())
            .collect()
    }

    #[test]
    fn test_add_marks_dirty_and_query_rebuilds() {
        let mut index = SpatialIndex::new();
        index.add_asset(asset("a", 0.0, 0.0));
        assert!(index.is_dirty());

        let hits = query_ids(&mut index, [-10.0, -10.0], [10.0, 10.0]);
        assert_eq!(hits, vec!["a"]);
        assert!(!index.is_dirty());
    }

    #[test]
    fn test_query_reflects_removal() {
        let mut index = SpatialIndex::new();
        index.add_asset(asset("a", 0.0, 0.0));
        index.add_asset(asset("b", 100.0, 100.0));
        assert_eq!(index.len(), 2);

        assert!(index.remove_asset("a").is_some());
        let hits = query_ids(&mut index, [-10.0, -10.0], [10.0, 10.0]);
        assert!(hits.is_empty());

        let hits = query_ids(&mut index, [90.0, 90.0], [110.0, 110.0]);
        assert_eq!(hits, vec!["b"]);
    }

    #[test]
    fn test_add_same_id_replaces() {
        let mut index = SpatialIndex::new();
        index.add_asset(asset("a", 0.0, 0.0));
        index.add_asset(asset("a", 500.0, 500.0));
        assert_eq!(index.len(), 1);

        let hits = query_ids(&mut index, [490.0, 490.0], [510.0, 510.0]);
        assert_eq!(hits, vec!["a"]);
    }

    #[test]
    fn test_clear_empties_queries() {
        let mut index = SpatialIndex::new();
        index.add_asset(asset("a", 0.0, 0.0));
        index.clear();
        assert!(index.is_empty());
        assert!(query_ids(&mut index, [-1000.0, -1000.0], [1000.0, 1000.0]).is_empty());
    }

    #[test]
    fn test_query_excludes_distant_assets() {
        let mut index = SpatialIndex::new();
        index.add_asset(asset("near", 0.0, 0.0));
        index.add_asset(asset("far", 1000.0, 1000.0));

        let hits = query_ids(&mut index, [-20.0, -20.0], [20.0, 20.0]);
        assert_eq!(hits, vec!["near"]);
    }

    #[test]
    fn test_query_order_is_insertion_order() {
        let mut index = SpatialIndex::new();
        for id in ["c", "a", "b"] {
            index.add_asset(asset(id, 0.0, 0.0));
        }
        let hits = query_ids(&mut index, [-20.0, -20.0], [20.0, 20.0]);
        assert_eq!(hits, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rotated_asset_envelope() {
        let mut index = SpatialIndex::new();
        let wide = Asset::new("w", "W", AssetKind::Building, 10.0, 40.0)
            .at(0.0, 0.0)
            .with_rotation(90.0);
        index.add_asset(wide);

        // After rotation the 40 m dimension lies along x.
        let hits = query_ids(&mut index, [18.0, -2.0], [25.0, 2.0]);
        assert_eq!(hits, vec!["w"]);
        let hits = query_ids(&mut index, [-2.0, 18.0], [2.0, 25.0]);
        assert!(hits.is_empty());
    }
}
