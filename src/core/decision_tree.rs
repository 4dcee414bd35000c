use super::constants::{LABEL_REVEAL_AT, LEVEL_REVEAL_SPAN, LEVEL_SPACING};
use super::ease::smoothstep;

const PULSE_PERIOD_FRAMES: u64 = 90;

/// Fixed leaf pairs: left sibling stays with people, right is handed off.
pub const LEAF_LABEL_PAIRS: [(&str, &str); 8] = [
    ("Intent", "Drafting"),
    ("Judgment", "Search"),
    ("Taste", "Formatting"),
    ("Accountability", "Testing"),
    ("Ethics", "Refactoring"),
    ("Priorities", "Summaries"),
    ("Trust", "Translation"),
    ("Vision", "Scheduling"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    Retained,
    Delegated,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafLabel {
    pub text: &'static str,
    pub kind: LeafKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeNode {
    pub level: usize,
    pub x: f32,
    pub y: f32,
    pub parent: Option<usize>,
    pub label: Option<LeafLabel>,
}

/// Binary tree laid out once for a canvas size, stored breadth-first.
#[derive(Clone, Debug)]
pub struct DecisionTree {
    depth: usize,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn build(depth: usize, width: f32, height: f32) -> Self {
        let top = height * 0.2;
        let level_h = height * 0.6 / depth.max(1) as f32;
        let mut nodes = Vec::with_capacity((1usize << (depth + 1)) - 1);
        let mut leaf_index = 0usize;
        for level in 0..=depth {
            let count = 1usize << level;
            let first = nodes.len();
            for k in 0..count {
                let x = width * (k as f32 + 0.5) / count as f32;
                let parent = if level == 0 {
                    None
                } else {
                    // Parent lies in the previous level, which starts at first - count/2.
                    Some(first - count / 2 + k / 2)
                };
                let label = if level == depth {
                    let (retained, delegated) = LEAF_LABEL_PAIRS[(leaf_index / 2) % LEAF_LABEL_PAIRS.len()];
                    let label = if leaf_index % 2 == 0 {
                        LeafLabel {
                            text: retained,
                            kind: LeafKind::Retained,
                        }
                    } else {
                        LeafLabel {
                            text: delegated,
                            kind: LeafKind::Delegated,
                        }
                    };
                    leaf_index += 1;
                    Some(label)
                } else {
                    None
                };
                nodes.push(TreeNode {
                    level,
                    x,
                    y: top + level as f32 * level_h,
                    parent,
                    label,
                });
            }
        }
        Self { depth, nodes }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Eased sub-progress of a level: starts once `local` crosses
    /// `level * LEVEL_SPACING` and completes `LEVEL_REVEAL_SPAN` later.
    pub fn level_reveal(level: usize, local: f32) -> f32 {
        let threshold = level as f32 * LEVEL_SPACING;
        smoothstep((local - threshold) / LEVEL_REVEAL_SPAN)
    }

    /// Visibility of a node; the edge from its parent draws to the same length.
    pub fn node_reveal(&self, node: usize, local: f32) -> f32 {
        self.nodes
            .get(node)
            .map(|n| Self::level_reveal(n.level, local))
            .unwrap_or(0.0)
    }

    pub fn label_visible(&self, node: usize, local: f32) -> bool {
        match self.nodes.get(node) {
            Some(n) if n.label.is_some() => self.node_reveal(node, local) >= LABEL_REVEAL_AT,
            _ => false,
        }
    }

    /// Position of the traveling highlight along a fully drawn edge, in [0,1).
    pub fn pulse_position(node: usize, frame: u64) -> f32 {
        ((frame + node as u64 * 7) % PULSE_PERIOD_FRAMES) as f32 / PULSE_PERIOD_FRAMES as f32
    }

    pub fn leaves(&self) -> impl Iterator<Item = (usize, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.label.is_some())
    }
}
