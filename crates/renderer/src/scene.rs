use std::fmt;

use uuid::Uuid;

/// Unique identifier handed out when an object joins a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Uuid);

impl ObjectId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fragment program shading a full-surface pass.
///
/// `fragment` is WGSL providing `fn shade(frag_coord: vec2<f32>) -> vec4<f32>`;
/// the uniform block is reachable as `stage` and the camera as `camera`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    pub label: String,
    pub fragment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub material: ShaderMaterial,
    pub visible: bool,
}

impl SceneObject {
    pub fn shader_pass(name: impl Into<String>, fragment: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            material: ShaderMaterial {
                label: name.clone(),
                fragment: fragment.into(),
            },
            name,
            visible: true,
        }
    }
}

/// Ordered collection of drawable objects; draw order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<(ObjectId, SceneObject)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId::new();
        tracing::debug!(%id, name = %object.name, "scene object added");
        self.objects.push((id, object));
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|(candidate, _)| *candidate == id)?;
        let (_, object) = self.objects.remove(index);
        tracing::debug!(%id, name = %object.name, "scene object removed");
        Some(object)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// First object carrying `name`, in draw order.
    pub fn object_by_name(&self, name: &str) -> Option<(ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, object)| (*id, object))
    }

    pub fn object_by_id(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, object)| object)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
