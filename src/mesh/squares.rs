//! Dual grid for marching squares
//!
//! Every grid cell becomes a [`ControlNode`] at the cell centre. Each control
//! node owns two midpoint nodes, half a cell to its right and half a cell
//! above it. A [`Square`] is the 2x2 block of control nodes plus the four
//! midpoints on its edges, and its configuration encodes which corners are
//! walls.

use crate::grid::Grid;
use crate::mesh::Vec3;

/// A mesh point. `vertex_index` is assigned the first time the mesher uses it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: Vec3,
    pub vertex_index: Option<usize>,
}

impl Node {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            vertex_index: None,
        }
    }
}

/// A grid-cell node with its wall flag and the two midpoints it owns
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlNode {
    pub node: Node,
    /// True for Wall cells
    pub active: bool,
    pub right: Node,
    pub above: Node,
}

impl ControlNode {
    pub fn new(position: Vec3, active: bool, square_size: f32) -> Self {
        Self {
            node: Node::new(position),
            active,
            right: Node::new(position + Vec3::RIGHT * (square_size / 2.0)),
            above: Node::new(position + Vec3::FORWARD * (square_size / 2.0)),
        }
    }
}

/// Which node of a control node a [`NodeRef`] points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Control,
    Right,
    Above,
}

/// Handle to a node stored in a [`SquareGrid`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub x: usize,
    pub y: usize,
    pub kind: NodeKind,
}

impl NodeRef {
    const fn control(x: usize, y: usize) -> Self {
        Self { x, y, kind: NodeKind::Control }
    }

    const fn right(x: usize, y: usize) -> Self {
        Self { x, y, kind: NodeKind::Right }
    }

    const fn above(x: usize, y: usize) -> Self {
        Self { x, y, kind: NodeKind::Above }
    }
}

/// Corner bit weights for the square configuration
pub const TOP_LEFT_BIT: u8 = 8;
pub const TOP_RIGHT_BIT: u8 = 4;
pub const BOTTOM_RIGHT_BIT: u8 = 2;
pub const BOTTOM_LEFT_BIT: u8 = 1;

/// One marching-squares cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub top_left: NodeRef,
    pub top_right: NodeRef,
    pub bottom_right: NodeRef,
    pub bottom_left: NodeRef,
    pub centre_top: NodeRef,
    pub centre_right: NodeRef,
    pub centre_bottom: NodeRef,
    pub centre_left: NodeRef,
    /// Sum of the bit weights of active corners (0-15)
    pub configuration: u8,
}

impl Square {
    /// Square whose bottom-left control node is at `(x, y)`.
    fn new(x: usize, y: usize, active: impl Fn(usize, usize) -> bool) -> Self {
        let configuration = configuration(
            active(x, y + 1),
            active(x + 1, y + 1),
            active(x + 1, y),
            active(x, y),
        );

        Self {
            top_left: NodeRef::control(x, y + 1),
            top_right: NodeRef::control(x + 1, y + 1),
            bottom_right: NodeRef::control(x + 1, y),
            bottom_left: NodeRef::control(x, y),
            centre_top: NodeRef::right(x, y + 1),
            centre_right: NodeRef::above(x + 1, y),
            centre_bottom: NodeRef::right(x, y),
            centre_left: NodeRef::above(x, y),
            configuration,
        }
    }

    /// Ordered point fan for this square's configuration.
    ///
    /// The fan is triangulated as `(p0, p1, p2), (p0, p2, p3), ...`.
    /// Configuration 0 has no points.
    pub fn points(&self) -> Vec<NodeRef> {
        match self.configuration {
            0 => Vec::new(),

            // One corner
            1 => vec![self.centre_left, self.centre_bottom, self.bottom_left],
            2 => vec![self.bottom_right, self.centre_bottom, self.centre_right],
            4 => vec![self.top_right, self.centre_right, self.centre_top],
            8 => vec![self.top_left, self.centre_top, self.centre_left],

            // Two corners
            3 => vec![self.centre_right, self.bottom_right, self.bottom_left, self.centre_left],
            6 => vec![self.centre_top, self.top_right, self.bottom_right, self.centre_bottom],
            9 => vec![self.top_left, self.centre_top, self.centre_bottom, self.bottom_left],
            12 => vec![self.top_left, self.top_right, self.centre_right, self.centre_left],
            // Opposite corners, joined through the middle
            5 => vec![
                self.centre_top,
                self.top_right,
                self.centre_right,
                self.centre_bottom,
                self.bottom_left,
                self.centre_left,
            ],
            10 => vec![
                self.top_left,
                self.centre_top,
                self.centre_right,
                self.bottom_right,
                self.centre_bottom,
                self.centre_left,
            ],

            // Three corners
            7 => vec![self.top_right, self.bottom_right, self.bottom_left, self.centre_left, self.centre_top],
            11 => vec![self.top_left, self.centre_top, self.centre_right, self.bottom_right, self.bottom_left],
            13 => vec![self.top_right, self.centre_right, self.centre_bottom, self.bottom_left, self.top_left],
            14 => vec![self.top_left, self.top_right, self.bottom_right, self.centre_bottom, self.centre_left],

            // All four
            _ => vec![self.top_left, self.top_right, self.bottom_right, self.bottom_left],
        }
    }

    pub fn corners(&self) -> [NodeRef; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Configuration from corner activity flags.
pub fn configuration(top_left: bool, top_right: bool, bottom_right: bool, bottom_left: bool) -> u8 {
    let mut config = 0;
    if top_left {
        config += TOP_LEFT_BIT;
    }
    if top_right {
        config += TOP_RIGHT_BIT;
    }
    if bottom_right {
        config += BOTTOM_RIGHT_BIT;
    }
    if bottom_left {
        config += BOTTOM_LEFT_BIT;
    }
    config
}

/// Control nodes for every grid cell and squares for every 2x2 block
#[derive(Clone, Debug)]
pub struct SquareGrid {
    pub nodes_x: usize,
    pub nodes_y: usize,
    control_nodes: Vec<ControlNode>,
    squares: Vec<Square>,
}

impl SquareGrid {
    /// Build the dual grid, centred on the origin in the XZ plane.
    pub fn new(grid: &Grid, square_size: f32) -> Self {
        let nodes_x = grid.width;
        let nodes_y = grid.height;
        let map_width = nodes_x as f32 * square_size;
        let map_height = nodes_y as f32 * square_size;

        let mut control_nodes = Vec::with_capacity(nodes_x * nodes_y);
        for y in 0..nodes_y {
            for x in 0..nodes_x {
                let position = Vec3::new(
                    -map_width / 2.0 + x as f32 * square_size + square_size / 2.0,
                    0.0,
                    -map_height / 2.0 + y as f32 * square_size + square_size / 2.0,
                );
                control_nodes.push(ControlNode::new(position, grid.get(x, y).is_wall(), square_size));
            }
        }

        let square_cols = nodes_x.saturating_sub(1);
        let square_rows = nodes_y.saturating_sub(1);
        let mut squares = Vec::with_capacity(square_cols * square_rows);
        let active = |x: usize, y: usize| grid.get(x, y).is_wall();
        // x-major, matching the order the mesher walks them
        for x in 0..square_cols {
            for y in 0..square_rows {
                squares.push(Square::new(x, y, active));
            }
        }

        Self {
            nodes_x,
            nodes_y,
            control_nodes,
            squares,
        }
    }

    /// Squares in x-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn control_node(&self, x: usize, y: usize) -> &ControlNode {
        &self.control_nodes[y * self.nodes_x + x]
    }

    pub fn node(&self, node: NodeRef) -> &Node {
        let control = self.control_node(node.x, node.y);
        match node.kind {
            NodeKind::Control => &control.node,
            NodeKind::Right => &control.right,
            NodeKind::Above => &control.above,
        }
    }

    pub fn node_mut(&mut self, node: NodeRef) -> &mut Node {
        let control = &mut self.control_nodes[node.y * self.nodes_x + node.x];
        match node.kind {
            NodeKind::Control => &mut control.node,
            NodeKind::Right => &mut control.right,
            NodeKind::Above => &mut control.above,
        }
    }
}
