//! Verifies the host/device layout contract and prints a summary.
//!
//! Usage: `parallax-check [path/to/declarations.wgsl]`. Without an argument
//! the bundled declarations are checked. Exits non-zero on any mismatch.

use anyhow::{Context, Result};
use parallax_abi::{
    BufferSlot, SamplerSlot, SlotNamespace, TextureSlot, VertexAttribute, DEVICE_GLOBALS,
};
use parallax_engine::{bootstrap, EngineInit};

fn main() -> Result<()> {
    let mut init = EngineInit::default();
    if let Some(path) = std::env::args().nth(1) {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read shader declarations from {path}"))?;
        init.shader_source = Some(source);
    }

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║        PARALLAX CONTRACT CHECK         ║");
    println!("  ║   host records  ·  wgsl declarations   ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let contract = bootstrap(&init)?;

    println!("  RECORD              SIZE  ALIGN  FIELDS");
    for record in contract.records() {
        println!(
            "  {:<18} {:>5}  {:>5}  {:>6}",
            record.name, record.size, record.align, record.fields
        );
    }
    println!("  {:<18} {:>5}", "VertexIn (stride)", contract.vertex_stride());
    println!();

    print_namespace::<BufferSlot>();
    print_namespace::<TextureSlot>();
    print_namespace::<VertexAttribute>();
    print_namespace::<SamplerSlot>();

    println!("  BINDINGS");
    for global in &DEVICE_GLOBALS {
        println!(
            "    @group({}) @binding({})  {}",
            global.group, global.binding, global.name
        );
    }
    println!();
    println!("  Contract verified.");
    println!();

    Ok(())
}

fn print_namespace<S: SlotNamespace>() {
    let slots: Vec<String> = S::ALL
        .iter()
        .map(|s| format!("{}={}", s.label(), s.index()))
        .collect();
    println!("  {:<18} {}", S::NAMESPACE, slots.join("  "));
}
