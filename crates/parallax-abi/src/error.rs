use std::fmt;

use crate::layout::ScalarKind;

/// Which side of the contract a declaration was expected on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Host,
    Device,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Host => f.write_str("host"),
            Side::Device => f.write_str("device"),
        }
    }
}

/// A host/device contract violation.
///
/// None of these are recoverable. They indicate a build or integration defect
/// and must stop the renderer before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The WGSL declarations did not parse.
    ShaderParse(String),
    /// naga could not compute type layouts for the declarations.
    DeviceLayout(String),
    /// A record or input struct has no device-side declaration.
    MissingStruct { record: &'static str },
    SizeMismatch {
        record: &'static str,
        host: usize,
        device: usize,
    },
    AlignMismatch {
        record: &'static str,
        host: usize,
        device: usize,
    },
    /// A named field exists on one side only.
    MissingField {
        record: &'static str,
        field: String,
        missing_on: Side,
    },
    FieldOffset {
        record: &'static str,
        field: String,
        host: usize,
        device: usize,
    },
    FieldSize {
        record: &'static str,
        field: String,
        host: usize,
        device: usize,
    },
    /// A field is read with a different scalar type on the device.
    FieldType {
        record: &'static str,
        field: String,
        host: ScalarKind,
        /// `None` when the device type has no 32-bit numeric scalar.
        device: Option<ScalarKind>,
    },
    /// A vertex input member sits at a different `@location` than its slot.
    AttributeLocation {
        field: String,
        host: u32,
        device: Option<u32>,
    },
    /// A resource global is missing or bound at the wrong group/binding.
    Binding {
        global: &'static str,
        expected: (u32, u32),
        found: Option<(u32, u32)>,
    },
    /// A uniform global is declared with a different struct than its slot carries.
    GlobalType {
        global: &'static str,
        expected: &'static str,
        found: Option<String>,
    },
    /// Two slots within one namespace share a numeric value.
    SlotCollision {
        namespace: &'static str,
        index: u32,
        first: &'static str,
        second: &'static str,
    },
    /// A namespace is not contiguous from zero.
    SlotGap {
        namespace: &'static str,
        missing: u32,
    },
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderParse(msg) => write!(f, "shader declarations failed to parse: {msg}"),
            Self::DeviceLayout(msg) => write!(f, "device layout computation failed: {msg}"),
            Self::MissingStruct { record } => {
                write!(f, "`{record}` has no device-side declaration")
            }
            Self::SizeMismatch { record, host, device } => write!(
                f,
                "`{record}` size mismatch: host {host} bytes, device {device} bytes"
            ),
            Self::AlignMismatch { record, host, device } => write!(
                f,
                "`{record}` alignment mismatch: host {host}, device {device}"
            ),
            Self::MissingField { record, field, missing_on } => {
                write!(f, "`{record}.{field}` is not declared on the {missing_on} side")
            }
            Self::FieldOffset { record, field, host, device } => write!(
                f,
                "`{record}.{field}` offset mismatch: host {host}, device {device}"
            ),
            Self::FieldSize { record, field, host, device } => write!(
                f,
                "`{record}.{field}` size mismatch: host {host} bytes, device {device} bytes"
            ),
            Self::FieldType { record, field, host, device } => match device {
                Some(device) => write!(
                    f,
                    "`{record}.{field}` type mismatch: host {host}, device {device}"
                ),
                None => write!(
                    f,
                    "`{record}.{field}` type mismatch: host {host}, device type is not a 32-bit scalar"
                ),
            },
            Self::AttributeLocation { field, host, device } => match device {
                Some(device) => write!(
                    f,
                    "vertex input `{field}` at @location({device}), expected @location({host})"
                ),
                None => write!(
                    f,
                    "vertex input `{field}` has no @location, expected @location({host})"
                ),
            },
            Self::Binding { global, expected, found } => {
                let (group, binding) = expected;
                match found {
                    Some((fg, fb)) => write!(
                        f,
                        "`{global}` bound at @group({fg}) @binding({fb}), \
                         expected @group({group}) @binding({binding})"
                    ),
                    None => write!(
                        f,
                        "`{global}` is not declared, expected @group({group}) @binding({binding})"
                    ),
                }
            }
            Self::GlobalType { global, expected, found } => match found {
                Some(found) => write!(f, "`{global}` has type `{found}`, expected `{expected}`"),
                None => write!(f, "`{global}` has an unnamed type, expected `{expected}`"),
            },
            Self::SlotCollision { namespace, index, first, second } => write!(
                f,
                "{namespace} slot {index} is assigned to both `{first}` and `{second}`"
            ),
            Self::SlotGap { namespace, missing } => write!(
                f,
                "{namespace} slots are not contiguous from zero: {missing} is unassigned"
            ),
        }
    }
}

impl std::error::Error for ContractError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_record_and_sizes() {
        let err = ContractError::SizeMismatch {
            record: "FrameUniforms",
            host: 192,
            device: 208,
        };
        assert_eq!(
            err.to_string(),
            "`FrameUniforms` size mismatch: host 192 bytes, device 208 bytes"
        );
    }

    #[test]
    fn display_binding_mismatch() {
        let err = ContractError::Binding {
            global: "frame_uniforms",
            expected: (0, 2),
            found: Some((0, 3)),
        };
        assert_eq!(
            err.to_string(),
            "`frame_uniforms` bound at @group(0) @binding(3), expected @group(0) @binding(2)"
        );
    }

    #[test]
    fn display_scalar_type_mismatch() {
        let err = ContractError::FieldType {
            record: "LayerUniforms",
            field: "mode".into(),
            host: ScalarKind::U32,
            device: Some(ScalarKind::F32),
        };
        assert_eq!(
            err.to_string(),
            "`LayerUniforms.mode` type mismatch: host u32, device f32"
        );
    }

    #[test]
    fn display_missing_field_names_side() {
        let err = ContractError::MissingField {
            record: "LayerUniforms",
            field: "mode".into(),
            missing_on: Side::Device,
        };
        assert_eq!(
            err.to_string(),
            "`LayerUniforms.mode` is not declared on the device side"
        );
    }
}
