use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::LoadOptions;
use crate::error::AssetError;
use crate::handle::{next_asset_id, AssetHandle, AssetId};
use crate::loader;
use crate::material::TextureMaterial;
use crate::mesh::Mesh;

/// Owns loaded meshes and materials and hands out typed handles to them.
///
/// Loading the same resolved path twice returns the cached handle.
pub struct AssetServer {
    base_path: PathBuf,
    options: LoadOptions,
    meshes: HashMap<AssetId, Mesh>,
    materials: HashMap<AssetId, TextureMaterial>,
    path_to_mesh: HashMap<PathBuf, AssetHandle<Mesh>>,
    path_to_material: HashMap<PathBuf, AssetHandle<TextureMaterial>>,
}

impl AssetServer {
    /// Create a server with default load options
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_options(base_path, LoadOptions::default())
    }

    /// Create a server whose mesh loads use `options`.
    pub fn with_options(base_path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        let base_path = base_path.into();
        info!("AssetServer created with base path: {}", base_path.display());
        Self {
            base_path,
            options,
            meshes: HashMap::new(),
            materials: HashMap::new(),
            path_to_mesh: HashMap::new(),
            path_to_material: HashMap::new(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load an OBJ file and return a handle to its mesh.
    pub fn load_mesh(&mut self, path: &Path) -> Result<AssetHandle<Mesh>, AssetError> {
        let full_path = self.resolve(path);

        if let Some(&handle) = self.path_to_mesh.get(&full_path) {
            debug!("Mesh cache hit for {}", full_path.display());
            return Ok(handle);
        }

        if !full_path.exists() {
            return Err(AssetError::NotFound(full_path));
        }

        let mesh = loader::load_obj(&full_path, &self.options)?;
        info!(
            "Loaded mesh '{}' ({} vertices, {} triangles)",
            mesh.name(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let handle = self.add_mesh(mesh);
        self.path_to_mesh.insert(full_path, handle);
        Ok(handle)
    }

    /// Register a mesh that did not come from a file.
    pub fn add_mesh(&mut self, mesh: Mesh) -> AssetHandle<Mesh> {
        let handle = AssetHandle::new(next_asset_id());
        self.meshes.insert(handle.id(), mesh);
        handle
    }

    /// Drop a mesh. A later `load_mesh` of the same path reads the file again.
    pub fn unload_mesh(&mut self, handle: AssetHandle<Mesh>) -> Option<Mesh> {
        let mesh = self.meshes.remove(&handle.id())?;
        self.path_to_mesh.retain(|_, cached| *cached != handle);
        Some(mesh)
    }

    /// Register a texture material for the image at `path`.
    ///
    /// The image is not decoded; the file only has to exist.
    pub fn load_material(
        &mut self,
        path: &Path,
    ) -> Result<AssetHandle<TextureMaterial>, AssetError> {
        let full_path = self.resolve(path);

        if let Some(&handle) = self.path_to_material.get(&full_path) {
            return Ok(handle);
        }

        if !full_path.exists() {
            return Err(AssetError::NotFound(full_path));
        }

        let handle = AssetHandle::new(next_asset_id());
        self.materials
            .insert(handle.id(), TextureMaterial::new(full_path.clone()));
        self.path_to_material.insert(full_path, handle);
        Ok(handle)
    }

    /// Get a loaded mesh by handle
    pub fn get_mesh(&self, handle: AssetHandle<Mesh>) -> Option<&Mesh> {
        self.meshes.get(&handle.id())
    }

    /// Get a loaded material by handle
    pub fn get_material(&self, handle: AssetHandle<TextureMaterial>) -> Option<&TextureMaterial> {
        self.materials.get(&handle.id())
    }

    /// Check if a mesh is still loaded
    pub fn is_mesh_loaded(&self, handle: AssetHandle<Mesh>) -> bool {
        self.meshes.contains_key(&handle.id())
    }

    /// Number of meshes currently loaded
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Options applied to every OBJ load
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Directory relative asset paths are resolved against
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
