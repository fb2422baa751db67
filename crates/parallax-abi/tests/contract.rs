//! Tampered shader declarations must be rejected with a precise error.

use parallax_abi::{verify_contract_source, ContractError, ScalarKind, Side, SHADER_TYPES_WGSL};

fn tamper(from: &str, to: &str) -> String {
    let patched = SHADER_TYPES_WGSL.replace(from, to);
    assert_ne!(patched, SHADER_TYPES_WGSL, "pattern {from:?} not found in shader source");
    patched
}

fn reject(source: &str) -> ContractError {
    verify_contract_source(source).expect_err("tampered declarations must not verify")
}

#[test]
fn bundled_source_verifies() {
    verify_contract_source(SHADER_TYPES_WGSL).unwrap();
}

#[test]
fn reordered_fields_are_rejected() {
    let src = tamper(
        "    material_shininess: f32,\n    time: f32,\n",
        "    time: f32,\n    material_shininess: f32,\n",
    );
    match reject(&src) {
        ContractError::FieldOffset { record, field, host, device } => {
            assert_eq!(record, "FrameUniforms");
            assert_eq!(field, "time");
            assert_eq!(host, 176);
            assert_eq!(device, 172);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn extra_trailing_padding_changes_size() {
    // A fourth pad float pushes the span past 192 and rounds up to 208.
    let src = tamper("    _pad2: f32,\n", "    _pad2: f32,\n    _pad3: f32,\n");
    assert_eq!(
        reject(&src),
        ContractError::SizeMismatch {
            record: "FrameUniforms",
            host: 192,
            device: 208,
        }
    );
}

#[test]
fn missing_struct_is_rejected() {
    let src = SHADER_TYPES_WGSL.replace("ShadowUniforms", "ShadowParams");
    assert_eq!(
        reject(&src),
        ContractError::MissingStruct {
            record: "ShadowUniforms"
        }
    );
}

#[test]
fn field_missing_on_device_is_rejected() {
    let src = tamper("    mode: u32,\n", "");
    assert_eq!(
        reject(&src),
        ContractError::MissingField {
            record: "LayerUniforms",
            field: "mode".into(),
            missing_on: Side::Device,
        }
    );
}

#[test]
fn field_unknown_to_host_is_rejected() {
    let src = tamper("    mode: u32,\n    _pad: f32,\n", "    mode: u32,\n    opacity: f32,\n");
    assert_eq!(
        reject(&src),
        ContractError::MissingField {
            record: "LayerUniforms",
            field: "opacity".into(),
            missing_on: Side::Host,
        }
    );
}

#[test]
fn widened_field_is_rejected() {
    // vec2<u32> is 8-byte aligned: it still starts at 72 but is 8 bytes wide,
    // which also grows the struct.
    let src = tamper("    mode: u32,\n", "    mode: vec2<u32>,\n");
    assert!(matches!(
        reject(&src),
        ContractError::SizeMismatch { record: "LayerUniforms", host: 80, .. }
    ));
}

#[test]
fn reinterpreted_scalar_is_rejected() {
    // Same offset and width; the shader would read the enumerant's bits as a float.
    let src = tamper("    mode: u32,\n", "    mode: f32,\n");
    assert_eq!(
        reject(&src),
        ContractError::FieldType {
            record: "LayerUniforms",
            field: "mode".into(),
            host: ScalarKind::U32,
            device: Some(ScalarKind::F32),
        }
    );
}

#[test]
fn signed_bias_is_rejected() {
    let src = tamper("    shadow_bias: f32,\n", "    shadow_bias: i32,\n");
    assert_eq!(
        reject(&src),
        ContractError::FieldType {
            record: "ShadowUniforms",
            field: "shadow_bias".into(),
            host: ScalarKind::F32,
            device: Some(ScalarKind::I32),
        }
    );
}

#[test]
fn wrong_uniform_binding_is_rejected() {
    let src = tamper(
        "@group(0) @binding(2) var<uniform> frame_uniforms",
        "@group(0) @binding(6) var<uniform> frame_uniforms",
    );
    assert_eq!(
        reject(&src),
        ContractError::Binding {
            global: "frame_uniforms",
            expected: (0, 2),
            found: Some((0, 6)),
        }
    );
}

#[test]
fn wrong_texture_group_is_rejected() {
    let src = tamper(
        "@group(1) @binding(2) var mask_texture",
        "@group(2) @binding(2) var mask_texture",
    );
    assert_eq!(
        reject(&src),
        ContractError::Binding {
            global: "mask_texture",
            expected: (1, 2),
            found: Some((2, 2)),
        }
    );
}

#[test]
fn uniform_with_wrong_record_is_rejected() {
    let src = tamper(
        "var<uniform> layer_uniforms: LayerUniforms;",
        "var<uniform> layer_uniforms: ShadowUniforms;",
    );
    assert_eq!(
        reject(&src),
        ContractError::GlobalType {
            global: "layer_uniforms",
            expected: "LayerUniforms",
            found: Some("ShadowUniforms".into()),
        }
    );
}

#[test]
fn vertex_location_drift_is_rejected() {
    let src = tamper(
        "@location(3) texture_index: u32,\n}\n\nstruct VertexOut",
        "@location(2) texture_index: u32,\n}\n\nstruct VertexOut",
    );
    assert_eq!(
        reject(&src),
        ContractError::AttributeLocation {
            field: "texture_index".into(),
            host: 3,
            device: Some(2),
        }
    );
}

#[test]
fn extra_vertex_input_is_rejected() {
    let src = tamper(
        "    @location(3) texture_index: u32,\n}\n\nstruct VertexOut",
        "    @location(3) texture_index: u32,\n    @location(2) normal: vec3<f32>,\n}\n\nstruct VertexOut",
    );
    assert_eq!(
        reject(&src),
        ContractError::MissingField {
            record: "VertexIn",
            field: "normal".into(),
            missing_on: Side::Host,
        }
    );
}

#[test]
fn unparsable_source_is_rejected() {
    let err = reject("struct FrameUniforms { view: mat4x4<f32>, ");
    assert!(matches!(err, ContractError::ShaderParse(_)), "got {err}");
}
