//! k-d tree over fixed-dimension points.
//!
//! Flat array layout: nodes are stored in build order and refer to children
//! by index, so the whole tree is two allocations. Built by median split
//! along the widest axis of each subset. Nearest queries honor the
//! lowest-original-index tie-break for equidistant points.

use crate::util::dist2;

#[derive(Clone, Copy, Debug)]
struct Node<const N: usize> {
    point: [f32; N],
    /// Index of the point in the original input slice.
    index: u32,
    /// Split axis for this node's subtree.
    axis: u8,
    left: i32,
    right: i32,
}

/// Nearest hit: original point index and squared distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestHit {
    pub index: u32,
    pub dist2: f32,
}

/// Static k-d tree over `N`-dimensional points.
#[derive(Clone, Debug)]
pub struct KdTree<const N: usize> {
    nodes: Vec<Node<N>>,
}

impl<const N: usize> KdTree<N> {
    /// Build a tree over `points`. Returns `None` for an empty input.
    pub fn build(points: &[[f32; N]]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut items: Vec<(u32, [f32; N])> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u32, p))
            .collect();
        let mut nodes = Vec::with_capacity(points.len());
        Self::build_rec(&mut items, &mut nodes);
        Some(Self { nodes })
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true for a built tree).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build_rec(items: &mut [(u32, [f32; N])], nodes: &mut Vec<Node<N>>) -> i32 {
        if items.is_empty() {
            return -1;
        }
        let axis = Self::widest_axis(items);
        // Sorting by (coordinate, original index) keeps the build
        // deterministic when coordinates repeat.
        items.sort_unstable_by(|a, b| a.1[axis].total_cmp(&b.1[axis]).then(a.0.cmp(&b.0)));

        let mid = items.len() / 2;
        let (index, point) = items[mid];
        let id = nodes.len() as i32;
        nodes.push(Node {
            point,
            index,
            axis: axis as u8,
            left: -1,
            right: -1,
        });

        let (lo, rest) = items.split_at_mut(mid);
        let hi = &mut rest[1..];
        let left = Self::build_rec(lo, nodes);
        let right = Self::build_rec(hi, nodes);
        nodes[id as usize].left = left;
        nodes[id as usize].right = right;
        id
    }

    fn widest_axis(items: &[(u32, [f32; N])]) -> usize {
        let mut min = [f32::INFINITY; N];
        let mut max = [f32::NEG_INFINITY; N];
        for (_, p) in items {
            for i in 0..N {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        let mut axis = 0;
        let mut widest = max[0] - min[0];
        for i in 1..N {
            let extent = max[i] - min[i];
            if extent > widest {
                widest = extent;
                axis = i;
            }
        }
        axis
    }

    /// Nearest point to `query`, or `None` for an empty tree.
    pub fn nearest(&self, query: [f32; N]) -> Option<NearestHit> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best = NearestHit {
            index: u32::MAX,
            dist2: f32::INFINITY,
        };
        self.search(0, query, &mut best);
        Some(best)
    }

    fn search(&self, node: i32, query: [f32; N], best: &mut NearestHit) {
        if node < 0 {
            return;
        }
        let n = &self.nodes[node as usize];
        let d2 = dist2(n.point, query);
        if d2 < best.dist2 || (d2 == best.dist2 && n.index < best.index) {
            *best = NearestHit {
                index: n.index,
                dist2: d2,
            };
        }

        let axis = n.axis as usize;
        let delta = query[axis] - n.point[axis];
        let (near, far) = if delta < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };
        self.search(near, query, best);
        // The far side can still hold an equidistant lower-index point, so
        // prune only when the splitting plane is strictly farther.
        if delta * delta <= best.dist2 {
            self.search(far, query, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(KdTree::<3>::build(&[]).is_none());
    }

    #[test]
    fn test_single_point() {
        let tree = KdTree::build(&[[1.0, 2.0, 3.0]]).unwrap();
        let hit = tree.nearest([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.dist2, 14.0);
    }

    #[test]
    fn test_nearest_on_line() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let tree = KdTree::build(&points).unwrap();
        assert_eq!(tree.nearest([0.1, 0.0, 0.0]).unwrap().index, 0);
        assert_eq!(tree.nearest([1.2, 0.0, 0.0]).unwrap().index, 1);
        assert_eq!(tree.nearest([1.9, 0.0, 0.0]).unwrap().index, 2);
    }

    #[test]
    fn test_tie_break_lowest_index() {
        // Points 1 and 3 are coincident; the query is equidistant from both
        // and the lower index must win.
        let points = [[5.0, 5.0], [1.0, 0.0], [9.0, 9.0], [1.0, 0.0]];
        let tree = KdTree::build(&points).unwrap();
        assert_eq!(tree.nearest([1.0, 0.0]).unwrap().index, 1);

        // Symmetric pair around the query.
        let points = [[2.0, 0.0], [-2.0, 0.0]];
        let tree = KdTree::build(&points).unwrap();
        assert_eq!(tree.nearest([0.0, 0.0]).unwrap().index, 0);
    }

    #[test]
    fn test_matches_brute_force() {
        // Deterministic pseudo-random points via an LCG.
        let mut state = 0x2545f491u64;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f32 / (1u64 << 31) as f32) * 10.0 - 5.0
        };
        let points: Vec<[f32; 3]> = (0..500).map(|_| [next(), next(), next()]).collect();
        let queries: Vec<[f32; 3]> = (0..100).map(|_| [next(), next(), next()]).collect();

        let tree = KdTree::build(&points).unwrap();
        for q in &queries {
            let hit = tree.nearest(*q).unwrap();
            let mut best = (f32::INFINITY, usize::MAX);
            for (i, p) in points.iter().enumerate() {
                let d2 = crate::util::dist2(*p, *q);
                if d2 < best.0 {
                    best = (d2, i);
                }
            }
            assert_eq!(hit.index as usize, best.1);
            assert_eq!(hit.dist2, best.0);
        }
    }
}
