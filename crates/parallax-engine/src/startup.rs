use anyhow::{Context, Result};
use parallax_abi::{verify_contract_source, VerifiedContract, SHADER_TYPES_WGSL};

use crate::logging::{init_logging, LoggingConfig};
use crate::ring::RingConfig;

/// Startup parameters for a renderer built on the contract.
#[derive(Debug, Clone, Default)]
pub struct EngineInit {
    pub logging: LoggingConfig,

    /// Ring sizing used for every per-frame uniform record.
    pub ring: RingConfig,

    /// WGSL declarations the pipelines were built with.
    ///
    /// `None` checks the bundled `SHADER_TYPES_WGSL`. Set this when shaders
    /// carry their own copy of the shared declarations.
    pub shader_source: Option<String>,
}

/// Installs logging, validates configuration, and verifies the contract.
///
/// An error here means the process must not render.
pub fn bootstrap(init: &EngineInit) -> Result<VerifiedContract> {
    init_logging(init.logging.clone());

    init.ring.validate().context("invalid ring configuration")?;

    let source = init.shader_source.as_deref().unwrap_or(SHADER_TYPES_WGSL);
    let contract = verify_contract_source(source)
        .context("host/device layout contract violated; refusing to render")?;

    for record in contract.records() {
        log::info!(
            "{:<18} {:>4} bytes  align {:>2}  {} fields",
            record.name,
            record.size,
            record.align,
            record.fields
        );
    }
    log::info!(
        "ring: {} frames in flight, {:.2} ms budget",
        init.ring.frames_in_flight,
        init.ring.frame_budget.as_secs_f64() * 1000.0
    );

    Ok(contract)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn quiet() -> EngineInit {
        EngineInit {
            logging: LoggingConfig {
                is_test: true,
                ..LoggingConfig::default()
            },
            ..EngineInit::default()
        }
    }

    #[test]
    fn default_init_verifies() {
        let contract = bootstrap(&quiet()).unwrap();
        assert_eq!(contract.records().len(), 4);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let mut init = quiet();
        init.ring.frame_budget = Duration::ZERO;
        let err = bootstrap(&init).unwrap_err();
        assert!(err.to_string().contains("ring configuration"));
    }

    #[test]
    fn drifted_declarations_refuse_to_render() {
        let mut init = quiet();
        init.shader_source = Some(SHADER_TYPES_WGSL.replace("@binding(5)", "@binding(7)"));
        let err = bootstrap(&init).unwrap_err();
        assert!(err.to_string().contains("refusing to render"));
        let cause = err.root_cause().to_string();
        assert!(cause.contains("shadow_uniforms"), "{cause}");
    }
}
