use std::collections::BTreeMap;

use crate::category::{MutationPolicy, UniformCategory};
use crate::value::UniformValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("unknown uniform parameter '{0}'")]
    UnknownParameter(String),
    #[error("uniform '{name}' is declared as {expected} but received a {found} value")]
    CategoryMismatch {
        name: String,
        expected: UniformCategory,
        found: UniformCategory,
    },
    #[error("uniform '{name}' ({category}) has no in-place setter for its stored value")]
    PolicyViolation {
        name: String,
        category: UniformCategory,
    },
    #[error("uniform parameter '{0}' declared more than once")]
    DuplicateParameter(String),
}

impl UniformError {
    /// Attaches the parameter name to errors raised before the entry was named.
    pub fn for_parameter(self, parameter: &str) -> Self {
        match self {
            UniformError::CategoryMismatch {
                expected, found, ..
            } => UniformError::CategoryMismatch {
                name: parameter.to_string(),
                expected,
                found,
            },
            UniformError::PolicyViolation { category, .. } => UniformError::PolicyViolation {
                name: parameter.to_string(),
                category,
            },
            other => other,
        }
    }
}

/// One declared parameter: a fixed category plus a value of that category.
#[derive(Debug, Clone)]
pub struct UniformEntry {
    category: UniformCategory,
    value: UniformValue,
}

impl UniformEntry {
    /// Declares an entry, rejecting values whose shape does not match.
    ///
    /// The returned error carries an empty name; see [`UniformError::for_parameter`].
    pub fn new(category: UniformCategory, value: impl Into<UniformValue>) -> Result<Self, UniformError> {
        let value = value.into();
        if value.category() != category {
            return Err(UniformError::CategoryMismatch {
                name: String::new(),
                expected: category,
                found: value.category(),
            });
        }
        Ok(Self { category, value })
    }

    /// Declares an entry whose category is taken from the value itself.
    pub fn of(value: impl Into<UniformValue>) -> Self {
        let value = value.into();
        Self {
            category: value.category(),
            value,
        }
    }

    pub fn category(&self) -> UniformCategory {
        self.category
    }

    pub fn value(&self) -> &UniformValue {
        &self.value
    }

    /// Applies `incoming` using the category's mutation policy.
    ///
    /// Either the whole update lands or nothing changes.
    fn apply(&mut self, name: &str, incoming: UniformValue) -> Result<(), UniformError> {
        if incoming.category() != self.category {
            return Err(UniformError::CategoryMismatch {
                name: name.to_string(),
                expected: self.category,
                found: incoming.category(),
            });
        }

        match self.category.policy() {
            MutationPolicy::Replace => {
                self.value = incoming;
                Ok(())
            }
            MutationPolicy::InPlace => match (&self.value, &incoming) {
                (UniformValue::Vector2(current), UniformValue::Vector2(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                (UniformValue::Vector3(current), UniformValue::Vector3(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                (UniformValue::Vector4(current), UniformValue::Vector4(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                (UniformValue::Color(current), UniformValue::Color(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                (UniformValue::Matrix3(current), UniformValue::Matrix3(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                (UniformValue::Matrix4(current), UniformValue::Matrix4(next)) => {
                    current.store(next.get());
                    Ok(())
                }
                _ => Err(UniformError::PolicyViolation {
                    name: name.to_string(),
                    category: self.category,
                }),
            },
        }
    }
}

/// Backing map handed to shader binding consumers.
pub type UniformMap = BTreeMap<String, UniformEntry>;

/// Fixed set of named, typed shader parameters.
#[derive(Debug, Clone, Default)]
pub struct UniformRegistry {
    entries: UniformMap,
}

impl UniformRegistry {
    pub fn new(entries: UniformMap) -> Self {
        Self { entries }
    }

    /// Builds a registry from `(name, entry)` pairs, rejecting duplicate names.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, UniformError>
    where
        I: IntoIterator<Item = (K, UniformEntry)>,
        K: Into<String>,
    {
        let mut map = UniformMap::new();
        for (name, entry) in entries {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(UniformError::DuplicateParameter(name));
            }
            map.insert(name, entry);
        }
        Ok(Self::new(map))
    }

    pub fn get(&self, name: &str) -> Result<&UniformValue, UniformError> {
        self.entry(name).map(UniformEntry::value)
    }

    pub fn entry(&self, name: &str) -> Result<&UniformEntry, UniformError> {
        self.entries
            .get(name)
            .ok_or_else(|| UniformError::UnknownParameter(name.to_string()))
    }

    /// Updates `name`, replacing or mutating in place depending on category.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| UniformError::UnknownParameter(name.to_string()))?;
        entry.apply(name, value.into())?;
        tracing::trace!(uniform = name, category = %entry.category, "uniform updated");
        Ok(())
    }

    /// The full backing map, by reference.
    ///
    /// Replace-policy entries may hold a different value after the next
    /// `set`; consumers should read through the map each frame.
    pub fn get_all(&self) -> &UniformMap {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::texture::Texture;
    use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

    fn registry() -> UniformRegistry {
        UniformRegistry::from_entries([
            ("u_time", UniformEntry::of(0.0_f32)),
            ("u_frame", UniformEntry::of(0_i32)),
            ("u_enabled", UniformEntry::of(false)),
            ("u_resolution", UniformEntry::of(Vec2::ZERO)),
            ("u_mouse", UniformEntry::of(Vec2::ZERO)),
            ("u_light", UniformEntry::of(Vec3::ZERO)),
            ("u_rect", UniformEntry::of(Vec4::ZERO)),
            ("u_tint", UniformEntry::of(Color::BLACK)),
            ("u_noise", UniformEntry::of(Texture::new("noise", 16, 16))),
            ("u_normal", UniformEntry::of(Mat3::IDENTITY)),
            ("u_model", UniformEntry::of(Mat4::IDENTITY)),
        ])
        .expect("registry")
    }

    #[test]
    fn set_then_get_round_trips_every_category() {
        let mut registry = registry();
        let texture = Texture::new("grain", 8, 8);
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let updates: Vec<(&str, UniformValue)> = vec![
            ("u_time", 2.5_f32.into()),
            ("u_frame", 7_i32.into()),
            ("u_enabled", true.into()),
            ("u_resolution", Vec2::new(800.0, 600.0).into()),
            ("u_light", Vec3::new(0.0, 1.0, 0.0).into()),
            ("u_rect", Vec4::new(1.0, 2.0, 3.0, 4.0).into()),
            ("u_tint", Color::from_hex(0x336699).into()),
            ("u_noise", texture.into()),
            ("u_normal", Mat3::from_diagonal(Vec3::splat(2.0)).into()),
            ("u_model", model.into()),
        ];
        for (name, value) in updates {
            registry.set(name, value.clone()).expect(name);
            assert_eq!(registry.get(name).expect(name), &value, "{name}");
        }
    }

    #[test]
    fn in_place_categories_keep_their_slot() {
        let mut registry = registry();
        let before = registry.get("u_mouse").unwrap().clone();
        registry.set("u_mouse", Vec2::new(0.25, 0.75)).unwrap();
        registry.set("u_mouse", Vec2::new(0.5, 0.5)).unwrap();
        let after = registry.get("u_mouse").unwrap();
        assert!(after.shares_storage(&before));
        assert_eq!(before.as_vec2(), Some(Vec2::new(0.5, 0.5)));

        let model = registry.get("u_model").unwrap().clone();
        registry.set("u_model", Mat4::from_scale(Vec3::splat(3.0))).unwrap();
        assert!(registry.get("u_model").unwrap().shares_storage(&model));
        assert_eq!(model.as_mat4(), Some(Mat4::from_scale(Vec3::splat(3.0))));

        let tint = registry.get("u_tint").unwrap().clone();
        registry.set("u_tint", Color::WHITE).unwrap();
        assert!(registry.get("u_tint").unwrap().shares_storage(&tint));
    }

    #[test]
    fn replace_categories_adopt_the_new_value() {
        let mut registry = registry();
        let original = registry.get("u_noise").unwrap().clone();
        let replacement = Texture::new("grain", 8, 8);
        registry.set("u_noise", replacement.clone()).unwrap();

        let stored = registry.get("u_noise").unwrap();
        assert!(stored.shares_storage(&UniformValue::Texture(replacement)));
        assert!(!stored.shares_storage(&original));
        assert_eq!(original.as_texture().map(|t| t.label()), Some("noise"));
    }

    #[test]
    fn mismatched_category_is_rejected_without_mutation() {
        let mut registry = registry();
        registry.set("u_mouse", Vec2::new(0.1, 0.2)).unwrap();

        let err = registry.set("u_mouse", Vec3::ONE).unwrap_err();
        assert_eq!(
            err,
            UniformError::CategoryMismatch {
                name: "u_mouse".into(),
                expected: UniformCategory::Vector2,
                found: UniformCategory::Vector3,
            }
        );
        assert_eq!(registry.get("u_mouse").unwrap().as_vec2(), Some(Vec2::new(0.1, 0.2)));

        let err = registry.set("u_time", 3_i32).unwrap_err();
        assert!(matches!(err, UniformError::CategoryMismatch { .. }));
        assert_eq!(registry.get("u_time").unwrap().as_scalar(), Some(0.0));
    }

    #[test]
    fn undeclared_names_are_unknown() {
        let mut registry = registry();
        assert_eq!(
            registry.get("u_missing").unwrap_err(),
            UniformError::UnknownParameter("u_missing".into())
        );
        assert_eq!(
            registry.set("u_missing", 1.0_f32).unwrap_err(),
            UniformError::UnknownParameter("u_missing".into())
        );
        assert!(!registry.contains("u_missing"));
    }

    #[test]
    fn entry_construction_validates_the_value() {
        assert!(UniformEntry::new(UniformCategory::Color, Color::WHITE).is_ok());
        let err = UniformEntry::new(UniformCategory::Vector2, 1.0_f32).unwrap_err();
        assert!(matches!(
            err,
            UniformError::CategoryMismatch {
                expected: UniformCategory::Vector2,
                found: UniformCategory::Scalar,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = UniformRegistry::from_entries([
            ("u_time", UniformEntry::of(0.0_f32)),
            ("u_time", UniformEntry::of(1.0_f32)),
        ])
        .unwrap_err();
        assert_eq!(err, UniformError::DuplicateParameter("u_time".into()));
    }

    #[test]
    fn get_all_exposes_the_backing_map() {
        let mut registry = registry();
        registry.set("u_time", 4.0_f32).unwrap();
        let all = registry.get_all();
        assert_eq!(all.len(), registry.len());
        assert_eq!(all["u_time"].value().as_scalar(), Some(4.0));
        assert_eq!(all["u_mouse"].category(), UniformCategory::Vector2);
    }
}
