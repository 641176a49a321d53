use glam::{Mat4, Vec3};
use tracing::debug;

use tessel_assets::{AssetHandle, Mesh, TextureMaterial};
use tessel_core::Transform;

use crate::error::SceneError;
use crate::node::{Arena, NodeId};

/// A named object in the scene with an optional mesh and material.
///
/// Parent and children are handles into the owning [`Scene`]; they are
/// maintained by the scene and cannot be edited directly.
#[derive(Debug, Clone)]
pub struct GameObject {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<AssetHandle<Mesh>>,
    pub material: Option<AssetHandle<TextureMaterial>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl GameObject {
    fn new(name: String, position: Vec3) -> Self {
        Self {
            name,
            transform: Transform::from_position(position),
            mesh: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Parent handle, `None` for a root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Has both a mesh and a material, so the renderer can draw it.
    pub fn is_drawable(&self) -> bool {
        self.mesh.is_some() && self.material.is_some()
    }
}

/// One object to draw, with its world matrix resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Mat4,
    pub mesh: AssetHandle<Mesh>,
    pub material: AssetHandle<TextureMaterial>,
    /// Sequential per-frame slot for the object's constant buffer.
    pub slot: u32,
}

/// Owns every game object. Hierarchy links are stored as handles, so
/// dropping the scene (or despawning a subtree) never leaves dangling links.
pub struct Scene {
    nodes: Arena<GameObject>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Create a root object at `position`.
    pub fn spawn(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        let id = self.nodes.insert(GameObject::new(name.into(), position));
        debug!("Spawned game object {}", id);
        id
    }

    /// Remove an object and its whole subtree. Returns how many objects were removed.
    pub fn despawn(&mut self, id: NodeId) -> Result<usize, SceneError> {
        self.detach(id)?;

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.nodes.remove(current) {
                stack.extend(object.children);
                removed += 1;
            }
        }
        debug!("Despawned {} game objects under {}", removed, id);
        Ok(removed)
    }

    /// Get an object if the id is still live
    pub fn get(&self, id: NodeId) -> Option<&GameObject> {
        self.nodes.get(id)
    }

    /// Get an object mutably if the id is still live
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut GameObject> {
        self.nodes.get_mut(id)
    }

    /// Check if an id refers to a live object
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    fn object(&self, id: NodeId) -> Result<&GameObject, SceneError> {
        self.nodes.get(id).ok_or(SceneError::StaleNode(id))
    }

    fn object_mut(&mut self, id: NodeId) -> Result<&mut GameObject, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))
    }

    /// Parent of an object, `None` for roots and stale ids
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Children of an object in insertion order, empty for stale ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(object) => &object.children,
            None => &[],
        }
    }

    /// Objects without a parent, in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, object)| object.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Move `child` under `parent`, or make it a root with `None`.
    ///
    /// The child's local transform is kept, so its world placement follows
    /// the new parent.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        self.object(child)?;
        if let Some(parent) = parent {
            self.object(parent)?;
            if self.is_self_or_descendant(parent, child) {
                return Err(SceneError::Cycle { child, parent });
            }
        }

        self.detach(child)?;
        if let Some(parent) = parent {
            self.object_mut(parent)?.children.push(child);
            self.object_mut(child)?.parent = Some(parent);
        }
        Ok(())
    }

    /// Same as `set_parent(child, Some(parent))`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.set_parent(child, Some(parent))
    }

    /// Unlink `id` from its parent, making it a root.
    fn detach(&mut self, id: NodeId) -> Result<(), SceneError> {
        let Some(parent) = self.object_mut(id)?.parent.take() else {
            return Ok(());
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&c| c != id);
        }
        Ok(())
    }

    /// Whether `node` is `ancestor` itself or sits somewhere below it.
    fn is_self_or_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Attach a mesh to an object
    pub fn set_mesh(&mut self, id: NodeId, mesh: AssetHandle<Mesh>) -> Result<(), SceneError> {
        self.object_mut(id)?.mesh = Some(mesh);
        Ok(())
    }

    /// Attach a material to an object
    pub fn set_material(
        &mut self,
        id: NodeId,
        material: AssetHandle<TextureMaterial>,
    ) -> Result<(), SceneError> {
        self.object_mut(id)?.material = Some(material);
        Ok(())
    }

    /// Replace an object's local transform
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        self.object_mut(id)?.transform = transform;
        Ok(())
    }

    /// Multiply the object's local scale.
    pub fn scale(&mut self, id: NodeId, factor: Vec3) -> Result<(), SceneError> {
        self.object_mut(id)?.transform.scale_by(factor);
        Ok(())
    }

    /// Local-to-world matrix: the parent chain's transforms composed root first.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut matrix = self.object(id)?.transform.matrix();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let object = self.object(parent)?;
            matrix = object.transform.matrix() * matrix;
            current = object.parent;
        }
        Ok(matrix)
    }

    /// Drawable objects in depth-first order from each root, with world
    /// matrices and constant buffer slots assigned in that order.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let mut stack: Vec<(NodeId, Mat4)> = Vec::new();

        let roots: Vec<NodeId> = self.roots().collect();
        for root in roots.into_iter().rev() {
            stack.push((root, Mat4::IDENTITY));
        }

        while let Some((id, parent_world)) = stack.pop() {
            let Some(object) = self.nodes.get(id) else {
                continue;
            };
            let world = parent_world * object.transform.matrix();

            if let (Some(mesh), Some(material)) = (object.mesh, object.material) {
                items.push(DrawItem {
                    node: id,
                    world,
                    mesh,
                    material,
                    slot: items.len() as u32,
                });
            }

            for &child in object.children.iter().rev() {
                stack.push((child, world));
            }
        }

        items
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
