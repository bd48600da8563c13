use std::fmt::Write as _;

use crate::category::UniformCategory;
use crate::registry::UniformMap;
use crate::value::UniformValue;

/// Block size granularity required for uniform buffer bindings.
const BLOCK_ALIGNMENT: usize = 16;

/// Placement of one uniform inside the packed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockField {
    pub name: String,
    pub category: UniformCategory,
    pub offset: usize,
}

/// std140 layout of every block-representable entry of a [`UniformMap`].
///
/// Fields follow the map's key order. Textures are skipped; they bind
/// through their own slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    fields: Vec<BlockField>,
    size: usize,
}

impl BlockLayout {
    pub fn for_map(map: &UniformMap) -> Self {
        let mut fields = Vec::with_capacity(map.len());
        let mut offset = 0;
        for (name, entry) in map {
            let Some((align, size)) = entry.category().std140_layout() else {
                tracing::trace!(uniform = %name, "texture uniform kept out of the packed block");
                continue;
            };
            offset = align_to(offset, align);
            fields.push(BlockField {
                name: name.clone(),
                category: entry.category(),
                offset,
            });
            offset += size;
        }

        let size = align_to(offset, BLOCK_ALIGNMENT).max(BLOCK_ALIGNMENT);
        Self { fields, size }
    }

    pub fn fields(&self) -> &[BlockField] {
        &self.fields
    }

    /// Total byte size, rounded up to 16.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True when `map` would produce this exact layout.
    pub fn matches(&self, map: &UniformMap) -> bool {
        let mut packed = map
            .iter()
            .filter(|(_, entry)| entry.category().std140_layout().is_some());
        self.fields.iter().all(|field| {
            packed
                .next()
                .is_some_and(|(name, entry)| *name == field.name && entry.category() == field.category)
        }) && packed.next().is_none()
    }

    /// Packs the current values of `map` into `out`, resizing it to [`Self::size`].
    ///
    /// Fields missing from `map` are left zeroed.
    pub fn write(&self, map: &UniformMap, out: &mut Vec<u8>) {
        out.clear();
        out.resize(self.size, 0);
        for field in &self.fields {
            if let Some(entry) = map.get(&field.name) {
                write_value(&mut out[field.offset..], entry.value());
            }
        }
    }

    /// WGSL declaration matching this layout.
    pub fn wgsl_struct(&self, struct_name: &str) -> String {
        let mut code = format!("struct {struct_name} {{\n");
        if self.fields.is_empty() {
            code.push_str("    _unused: vec4<f32>,\n");
        }
        for field in &self.fields {
            if let Some(ty) = field.category.wgsl_type() {
                let _ = writeln!(code, "    {}: {},", field.name, ty);
            }
        }
        code.push_str("};\n");
        code
    }
}

fn align_to(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

fn put(dst: &mut [u8], floats: &[f32]) {
    let bytes: &[u8] = bytemuck::cast_slice(floats);
    dst[..bytes.len()].copy_from_slice(bytes);
}

fn write_value(dst: &mut [u8], value: &UniformValue) {
    match value {
        UniformValue::Scalar(value) => put(dst, &[*value]),
        UniformValue::Integer(value) => dst[..4].copy_from_slice(bytemuck::bytes_of(value)),
        UniformValue::Boolean(value) => {
            dst[..4].copy_from_slice(bytemuck::bytes_of(&u32::from(*value)));
        }
        UniformValue::Vector2(slot) => put(dst, &slot.get().to_array()),
        UniformValue::Vector3(slot) => put(dst, &slot.get().to_array()),
        UniformValue::Vector4(slot) => put(dst, &slot.get().to_array()),
        UniformValue::Color(slot) => put(dst, &slot.get().to_array()),
        UniformValue::Matrix3(slot) => {
            // Each column occupies a 16-byte stride.
            let matrix = slot.get();
            for (index, column) in [matrix.x_axis, matrix.y_axis, matrix.z_axis]
                .into_iter()
                .enumerate()
            {
                put(&mut dst[index * 16..], &column.to_array());
            }
        }
        UniformValue::Matrix4(slot) => put(dst, &slot.get().to_cols_array()),
        UniformValue::Texture(_) => {}
    }
}
