//! Startup verification of host records against the WGSL declarations.
//!
//! Compile-time assertions pin every record to its expected device size. This
//! pass closes the loop: it reflects `shader_types.wgsl` with naga and checks
//! that the shader side still says the same thing. Failure is fatal; callers
//! must not render without a [`VerifiedContract`].

use naga::proc::{Alignment, Layouter};
use naga::{Binding, Handle, Module, Scalar, StructMember, Type, TypeInner};

use crate::error::{ContractError, Side};
use crate::layout::{GpuRecord, ScalarKind};
use crate::records::{FrameUniforms, InstanceUniforms, LayerUniforms, ShadowUniforms, Vertex};
use crate::slots::{
    self, BufferSlot, SamplerSlot, TextureSlot, SAMPLER_GROUP, TEXTURE_GROUP, UNIFORM_GROUP,
};

/// Device-side declarations of every record, vertex input, and binding.
pub const SHADER_TYPES_WGSL: &str = include_str!("shaders/shader_types.wgsl");

/// A resource global the shaders declare at a registry slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceGlobal {
    pub name: &'static str,
    pub group: u32,
    pub binding: u32,
    /// Struct type for uniform globals; `None` for textures and samplers.
    pub record: Option<&'static str>,
}

const fn uniform(name: &'static str, slot: BufferSlot, record: &'static str) -> DeviceGlobal {
    DeviceGlobal {
        name,
        group: UNIFORM_GROUP,
        binding: slot.index(),
        record: Some(record),
    }
}

const fn texture(name: &'static str, slot: TextureSlot) -> DeviceGlobal {
    DeviceGlobal {
        name,
        group: TEXTURE_GROUP,
        binding: slot.index(),
        record: None,
    }
}

const fn sampler(name: &'static str, slot: SamplerSlot) -> DeviceGlobal {
    DeviceGlobal {
        name,
        group: SAMPLER_GROUP,
        binding: slot.index(),
        record: None,
    }
}

/// Every resource global and the slot it must be bound at.
pub const DEVICE_GLOBALS: [DeviceGlobal; 10] = [
    uniform("frame_uniforms", BufferSlot::SharedUniforms, FrameUniforms::DEVICE_NAME),
    uniform("instance_uniforms", BufferSlot::InstanceUniforms, InstanceUniforms::DEVICE_NAME),
    uniform("layer_uniforms", BufferSlot::LayerUniforms, LayerUniforms::DEVICE_NAME),
    uniform("shadow_uniforms", BufferSlot::ShadowUniforms, ShadowUniforms::DEVICE_NAME),
    texture("luma_texture", TextureSlot::Luma),
    texture("chroma_texture", TextureSlot::Chroma),
    texture("mask_texture", TextureSlot::Mask),
    texture("shadow_map", TextureSlot::ShadowMap),
    sampler("color_sampler", SamplerSlot::Color),
    sampler("shadow_sampler", SamplerSlot::ShadowCompare),
];

/// Size and alignment of one verified record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    /// Non-padding fields matched by name.
    pub fields: usize,
}

/// Proof that the host records, slot registry, and shader declarations agree.
///
/// Only [`verify_contract`] and [`verify_contract_source`] construct this.
/// Binding helpers downstream take it by reference so an unverified process
/// cannot build pipelines from the contract.
#[derive(Debug, Clone)]
pub struct VerifiedContract {
    records: Vec<RecordSummary>,
    vertex_stride: usize,
}

impl VerifiedContract {
    pub fn records(&self) -> &[RecordSummary] {
        &self.records
    }

    pub fn vertex_stride(&self) -> usize {
        self.vertex_stride
    }
}

/// Verifies the contract against the bundled [`SHADER_TYPES_WGSL`].
pub fn verify_contract() -> Result<VerifiedContract, ContractError> {
    verify_contract_source(SHADER_TYPES_WGSL)
}

/// Verifies the contract against arbitrary WGSL declarations.
///
/// Pipelines that ship their own copy of the shared declarations should run
/// this on that copy.
pub fn verify_contract_source(source: &str) -> Result<VerifiedContract, ContractError> {
    let result = verify_inner(source);
    if let Err(err) = &result {
        log::error!("host/device contract violated: {err}");
    }
    result
}

fn verify_inner(source: &str) -> Result<VerifiedContract, ContractError> {
    slots::validate_registry()?;

    let device = DeviceReflection::parse(source)?;

    let records = vec![
        device.check_record::<FrameUniforms>()?,
        device.check_record::<InstanceUniforms>()?,
        device.check_record::<LayerUniforms>()?,
        device.check_record::<ShadowUniforms>()?,
    ];
    device.check_vertex_input()?;
    device.check_globals()?;

    log::info!(
        "host/device contract verified: {} uniform records, vertex stride {} bytes, {} bindings",
        records.len(),
        Vertex::STRIDE,
        DEVICE_GLOBALS.len()
    );

    Ok(VerifiedContract {
        records,
        vertex_stride: Vertex::STRIDE,
    })
}

/// Smallest multiple of the alignment that is at least one, i.e. the
/// alignment itself.
fn alignment_bytes(alignment: Alignment) -> usize {
    alignment.round_up(1) as usize
}

/// Host view of a naga scalar; only 32-bit numeric scalars cross the boundary.
fn host_kind(scalar: Scalar) -> Option<ScalarKind> {
    match (scalar.kind, scalar.width) {
        (naga::ScalarKind::Float, 4) => Some(ScalarKind::F32),
        (naga::ScalarKind::Uint, 4) => Some(ScalarKind::U32),
        (naga::ScalarKind::Sint, 4) => Some(ScalarKind::I32),
        _ => None,
    }
}

struct DeviceReflection {
    module: Module,
    layouter: Layouter,
}

impl DeviceReflection {
    fn parse(source: &str) -> Result<Self, ContractError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ContractError::ShaderParse(e.emit_to_string(source)))?;

        let mut layouter = Layouter::default();
        layouter
            .update(module.to_ctx())
            .map_err(|e| ContractError::DeviceLayout(e.to_string()))?;

        Ok(Self { module, layouter })
    }

    fn find_struct(
        &self,
        name: &'static str,
    ) -> Result<(Handle<Type>, &[StructMember]), ContractError> {
        self.module
            .types
            .iter()
            .find_map(|(handle, ty)| match &ty.inner {
                TypeInner::Struct { members, .. } if ty.name.as_deref() == Some(name) => {
                    Some((handle, members.as_slice()))
                }
                _ => None,
            })
            .ok_or(ContractError::MissingStruct { record: name })
    }

    /// Component scalar kind of a numeric type, looking through vectors,
    /// matrices, and arrays.
    fn scalar_kind(&self, ty: Handle<Type>) -> Option<ScalarKind> {
        match self.module.types[ty].inner {
            TypeInner::Scalar(scalar)
            | TypeInner::Vector { scalar, .. }
            | TypeInner::Matrix { scalar, .. } => host_kind(scalar),
            TypeInner::Array { base, .. } => self.scalar_kind(base),
            _ => None,
        }
    }

    fn check_record<T: GpuRecord>(&self) -> Result<RecordSummary, ContractError> {
        let record = T::DEVICE_NAME;
        let (handle, members) = self.find_struct(record)?;
        let layout = &self.layouter[handle];

        let device_size = layout.size as usize;
        if T::host_size() != device_size {
            return Err(ContractError::SizeMismatch {
                record,
                host: T::host_size(),
                device: device_size,
            });
        }

        let device_align = alignment_bytes(layout.alignment);
        if T::host_align() != device_align {
            return Err(ContractError::AlignMismatch {
                record,
                host: T::host_align(),
                device: device_align,
            });
        }

        let mut matched = 0;
        for member in members {
            let Some(name) = member.name.as_deref() else { continue };
            if name.starts_with('_') {
                continue;
            }

            let Some(field) = T::FIELDS.iter().find(|f| f.name == name) else {
                return Err(ContractError::MissingField {
                    record,
                    field: name.to_owned(),
                    missing_on: Side::Host,
                });
            };

            let offset = member.offset as usize;
            if field.offset != offset {
                return Err(ContractError::FieldOffset {
                    record,
                    field: name.to_owned(),
                    host: field.offset,
                    device: offset,
                });
            }

            let size = self.layouter[member.ty].size as usize;
            if field.size != size {
                return Err(ContractError::FieldSize {
                    record,
                    field: name.to_owned(),
                    host: field.size,
                    device: size,
                });
            }

            let kind = self.scalar_kind(member.ty);
            if kind != Some(field.kind) {
                return Err(ContractError::FieldType {
                    record,
                    field: name.to_owned(),
                    host: field.kind,
                    device: kind,
                });
            }

            matched += 1;
        }

        for field in T::FIELDS.iter().filter(|f| !f.is_padding()) {
            if !members.iter().any(|m| m.name.as_deref() == Some(field.name)) {
                return Err(ContractError::MissingField {
                    record,
                    field: field.name.to_owned(),
                    missing_on: Side::Device,
                });
            }
        }

        log::debug!("{record}: {device_size} bytes, align {device_align}, {matched} fields match");

        Ok(RecordSummary {
            name: record,
            size: device_size,
            align: device_align,
            fields: matched,
        })
    }

    fn check_vertex_input(&self) -> Result<(), ContractError> {
        let record = Vertex::DEVICE_NAME;
        let (_, members) = self.find_struct(record)?;

        for attr in &Vertex::ATTRIBUTES {
            let Some(member) = members.iter().find(|m| m.name.as_deref() == Some(attr.name))
            else {
                return Err(ContractError::MissingField {
                    record,
                    field: attr.name.to_owned(),
                    missing_on: Side::Device,
                });
            };

            let location = match &member.binding {
                Some(Binding::Location { location, .. }) => Some(*location),
                _ => None,
            };
            if location != Some(attr.slot.index()) {
                return Err(ContractError::AttributeLocation {
                    field: attr.name.to_owned(),
                    host: attr.slot.index(),
                    device: location,
                });
            }

            let size = self.layouter[member.ty].size as usize;
            if size != attr.format.size() {
                return Err(ContractError::FieldSize {
                    record,
                    field: attr.name.to_owned(),
                    host: attr.format.size(),
                    device: size,
                });
            }

            let kind = self.scalar_kind(member.ty);
            if kind != Some(attr.format.kind()) {
                return Err(ContractError::FieldType {
                    record,
                    field: attr.name.to_owned(),
                    host: attr.format.kind(),
                    device: kind,
                });
            }
        }

        // Any extra located input would read bytes the host never writes.
        for member in members {
            let Some(Binding::Location { .. }) = &member.binding else { continue };
            let name = member.name.as_deref().unwrap_or("<unnamed>");
            if !Vertex::ATTRIBUTES.iter().any(|a| a.name == name) {
                return Err(ContractError::MissingField {
                    record,
                    field: name.to_owned(),
                    missing_on: Side::Host,
                });
            }
        }

        log::debug!("{record}: {} attributes match", Vertex::ATTRIBUTES.len());
        Ok(())
    }

    fn check_globals(&self) -> Result<(), ContractError> {
        for expected in &DEVICE_GLOBALS {
            let var = self
                .module
                .global_variables
                .iter()
                .map(|(_, var)| var)
                .find(|var| var.name.as_deref() == Some(expected.name));

            let found = var
                .and_then(|var| var.binding.as_ref())
                .map(|rb| (rb.group, rb.binding));
            if found != Some((expected.group, expected.binding)) {
                return Err(ContractError::Binding {
                    global: expected.name,
                    expected: (expected.group, expected.binding),
                    found,
                });
            }

            if let (Some(var), Some(record)) = (var, expected.record) {
                let ty_name = self.module.types[var.ty].name.clone();
                if ty_name.as_deref() != Some(record) {
                    return Err(ContractError::GlobalType {
                        global: expected.name,
                        expected: record,
                        found: ty_name,
                    });
                }
            }
        }
        Ok(())
    }
}
