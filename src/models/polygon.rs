use crate::errors::PhysicsError;
use crate::models::{Quaternion, Triangle, Vector3};

/// One node of a [`PolygonTree`]: its own faces plus indices of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonNode {
    pub triangles: Vec<Triangle>,
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    pub bounding_center: Vector3,
    pub bounding_radius: f64,
}

impl PolygonNode {
    fn new(triangles: Vec<Triangle>, parent: Option<usize>) -> Self {
        Self {
            triangles,
            children: Vec::new(),
            parent,
            bounding_center: Vector3::zero(),
            bounding_radius: 0.0,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena of polygon nodes with index-based child lists.
///
/// A child is always stored after its parent, so walking the arena backwards
/// visits children before parents. Bounding spheres enclose the node's own
/// faces and all of its descendants. An insertion only refreshes the new node
/// and its ancestors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonTree {
    nodes: Vec<PolygonNode>,
    roots: Vec<usize>,
}

impl PolygonTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree with a single root holding every triangle.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut tree = PolygonTree::new();
        tree.add_root(triangles);
        tree
    }

    pub fn add_root(&mut self, triangles: Vec<Triangle>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(PolygonNode::new(triangles, None));
        self.roots.push(index);
        self.refresh_ancestors(index);
        index
    }

    /// Adds a child polygon under `parent`.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::models::{PolygonTree, Triangle, Vector3};
    ///
    /// let face = Triangle::new(Vector3::zero(), Vector3::unit_x(), Vector3::unit_y());
    /// let mut tree = PolygonTree::new();
    /// let root = tree.add_root(Vec::new());
    /// let child = tree.add_child(root, vec![face]).unwrap();
    ///
    /// assert_eq!(tree.node(root).unwrap().children, vec![child]);
    /// assert!(tree.add_child(42, Vec::new()).is_err());
    /// ```
    pub fn add_child(&mut self, parent: usize, triangles: Vec<Triangle>) -> Result<usize, PhysicsError> {
        if parent >= self.nodes.len() {
            return Err(PhysicsError::IndexOutOfBounds(parent));
        }

        let index = self.nodes.len();
        self.nodes.push(PolygonNode::new(triangles, Some(parent)));
        self.nodes[parent].children.push(index);
        self.refresh_ancestors(index);
        Ok(index)
    }

    pub fn node(&self, index: usize) -> Option<&PolygonNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[PolygonNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|node| node.triangles.len()).sum()
    }

    /// Rebuilds every bounding sphere, children first.
    pub fn recompute_bounds(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            self.update_bounds(index);
        }
    }

    fn refresh_ancestors(&mut self, index: usize) {
        let mut current = Some(index);
        while let Some(index) = current {
            self.update_bounds(index);
            current = self.nodes[index].parent;
        }
    }

    /// Recomputes one node's sphere from its faces and its children's spheres.
    fn update_bounds(&mut self, index: usize) {
        let child_spheres: Vec<(Vector3, f64)> = self.nodes[index]
            .children
            .iter()
            .map(|&child| (self.nodes[child].bounding_center, self.nodes[child].bounding_radius))
            .collect();

        let node = &mut self.nodes[index];
        let vertices: Vec<Vector3> = node.triangles.iter().flat_map(|t| t.vertices).collect();

        let count = vertices.len() + child_spheres.len();
        if count == 0 {
            node.bounding_center = Vector3::zero();
            node.bounding_radius = 0.0;
            return;
        }

        let sum = vertices
            .iter()
            .copied()
            .chain(child_spheres.iter().map(|(center, _)| *center))
            .fold(Vector3::zero(), |acc, point| acc + point);
        let center = sum / count as f64;

        let vertex_reach = vertices.iter().map(|v| v.distance(&center)).fold(0.0, f64::max);
        let child_reach = child_spheres
            .iter()
            .map(|(child_center, child_radius)| child_center.distance(&center) + child_radius)
            .fold(0.0, f64::max);

        node.bounding_center = center;
        node.bounding_radius = vertex_reach.max(child_reach);
    }

    /// Copy of the tree with every face rotated by `orientation` and then
    /// translated by `position`.
    pub fn to_world(&self, position: &Vector3, orientation: &Quaternion) -> PolygonTree {
        let mut world = self.clone();
        for node in world.nodes.iter_mut() {
            for triangle in node.triangles.iter_mut() {
                *triangle = triangle.to_world(position, orientation);
            }
        }
        world.recompute_bounds();
        world
    }
}
