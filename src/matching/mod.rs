//! Nearest-source matching.
//!
//! Given the source coordinates of a weights document and the coordinates of
//! a target mesh's vertices, the engine finds for every target vertex the
//! source index minimizing Euclidean distance. Two strategies sit behind
//! [`NearestIndex`]: a brute-force scan and a k-d tree, selected by source
//! count and guaranteed to produce identical results, including the
//! lowest-source-index tie-break for equidistant candidates.

mod kdtree;

pub use kdtree::{KdTree, NearestHit};

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::util::{dist2, Error, Result};

/// Coordinate space used for the nearest-neighbor distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// 3D local-space vertex positions.
    #[default]
    Position,
    /// 2D active-UV-layer coordinates.
    Uv,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Uv => write!(f, "uv"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "position" | "pos" => Ok(Self::Position),
            "uv" => Ok(Self::Uv),
            other => Err(format!("unknown mapping mode '{}' (expected position|uv)", other)),
        }
    }
}

/// One resolved correspondence: the matched source record index and the
/// Euclidean distance to it (diagnostic only).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexMatch {
    pub source: usize,
    pub distance: f32,
}

/// Below this many source points a linear scan beats building a tree.
const TREE_MIN_SOURCES: usize = 256;

/// Nearest-source search over a fixed source point set.
///
/// Build with [`NearestIndex::build`] for automatic strategy selection, or
/// [`NearestIndex::scan`] / [`NearestIndex::tree`] to pin one. All
/// constructors reject an empty source set, so queries always find a match.
#[derive(Clone, Debug)]
pub enum NearestIndex<const N: usize> {
    Scan(Vec<[f32; N]>),
    Tree(KdTree<N>),
}

impl<const N: usize> NearestIndex<N> {
    /// Build with the strategy appropriate for the source count.
    pub fn build(sources: Vec<[f32; N]>) -> Result<Self> {
        if sources.len() < TREE_MIN_SOURCES {
            Self::scan(sources)
        } else {
            Self::tree(sources)
        }
    }

    /// Build the brute-force strategy.
    pub fn scan(sources: Vec<[f32; N]>) -> Result<Self> {
        Self::check_nonempty(sources.len())?;
        Ok(Self::Scan(sources))
    }

    /// Build the k-d tree strategy.
    pub fn tree(sources: Vec<[f32; N]>) -> Result<Self> {
        Self::check_nonempty(sources.len())?;
        match KdTree::build(&sources) {
            Some(tree) => Ok(Self::Tree(tree)),
            None => Err(Error::malformed("no source coordinates to match against")),
        }
    }

    fn check_nonempty(len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::malformed("no source coordinates to match against"));
        }
        Ok(())
    }

    /// Number of source points.
    pub fn len(&self) -> usize {
        match self {
            Self::Scan(points) => points.len(),
            Self::Tree(tree) => tree.len(),
        }
    }

    /// Check if the index is empty (never true; constructors reject it).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest source point to `query`. Equidistant candidates resolve to
    /// the lowest source index.
    pub fn nearest(&self, query: [f32; N]) -> VertexMatch {
        match self {
            Self::Scan(points) => {
                let mut best = VertexMatch {
                    source: 0,
                    distance: f32::INFINITY,
                };
                // Strict less-than keeps the first (lowest-index) candidate
                // on ties.
                for (i, p) in points.iter().enumerate() {
                    let d2 = dist2(*p, query);
                    if d2 < best.distance {
                        best = VertexMatch {
                            source: i,
                            distance: d2,
                        };
                    }
                }
                best.distance = best.distance.sqrt();
                best
            }
            Self::Tree(tree) => match tree.nearest(query) {
                Some(hit) => VertexMatch {
                    source: hit.index as usize,
                    distance: hit.dist2.sqrt(),
                },
                // Empty trees are rejected at construction.
                None => VertexMatch {
                    source: 0,
                    distance: f32::INFINITY,
                },
            },
        }
    }

    /// Match every target coordinate, in target order. Queries are pure and
    /// run in parallel; the output order is the input order.
    pub fn match_all(&self, targets: &[[f32; N]]) -> Vec<VertexMatch> {
        targets.par_iter().map(|&q| self.nearest(q)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("position".parse::<MatchMode>().unwrap(), MatchMode::Position);
        assert_eq!("UV".parse::<MatchMode>().unwrap(), MatchMode::Uv);
        assert!("nearest".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_empty_sources_rejected() {
        assert!(NearestIndex::<3>::build(Vec::new()).is_err());
        assert!(NearestIndex::<2>::scan(Vec::new()).is_err());
        assert!(NearestIndex::<2>::tree(Vec::new()).is_err());
    }

    #[test]
    fn test_scan_nearest() {
        let index = NearestIndex::scan(line()).unwrap();
        let m = index.nearest([1.9, 0.0, 0.0]);
        assert_eq!(m.source, 2);
        assert!((m.distance - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_match_all_order() {
        let index = NearestIndex::scan(line()).unwrap();
        let matches = index.match_all(&[[2.2, 0.0, 0.0], [0.1, 0.0, 0.0]]);
        assert_eq!(matches[0].source, 2);
        assert_eq!(matches[1].source, 0);
    }

    #[test]
    fn test_strategies_agree_with_ties() {
        // Coincident and symmetric points exercise the tie-break.
        let sources = vec![
            [1.0, 0.0],
            [-1.0, 0.0],
            [1.0, 0.0],
            [0.0, 3.0],
            [0.0, -3.0],
        ];
        let targets = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 2.9], [-0.5, 0.0]];

        let scan = NearestIndex::scan(sources.clone()).unwrap();
        let tree = NearestIndex::tree(sources).unwrap();
        for t in &targets {
            let a = scan.nearest(*t);
            let b = tree.nearest(*t);
            assert_eq!(a.source, b.source, "target {:?}", t);
        }
        // Equidistant from sources 0, 1 and 2: lowest index wins.
        assert_eq!(scan.nearest([0.0, 0.0]).source, 0);
        assert_eq!(tree.nearest([0.0, 0.0]).source, 0);
    }

    #[test]
    fn test_determinism() {
        let sources = line();
        let targets = vec![[0.4, 0.0, 0.0], [1.6, 0.0, 0.0], [0.5, 0.0, 0.0]];
        let index = NearestIndex::build(sources).unwrap();
        let a = index.match_all(&targets);
        let b = index.match_all(&targets);
        assert_eq!(a, b);
    }
}
