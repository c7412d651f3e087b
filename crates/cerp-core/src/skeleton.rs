//! # Fallback Contract Skeleton
//!
//! The fixed, well-formed contract substituted whenever extraction fails or
//! no extractor is configured. Callers of the extraction boundary always
//! receive a usable three-phase contract.

use crate::contract::{ActionItem, Contract, Phase, PhaseName};

/// Identifier carried by every fallback contract.
pub const FALLBACK_CONTRACT_ID: &str = "MOCK-001";

/// Build the fallback skeleton: one signature milestone in INITIATION and
/// empty EXECUTION and CLOSURE phases. All phases start PENDING.
pub fn fallback_contract() -> Contract {
    let mut contract = Contract::new(
        FALLBACK_CONTRACT_ID,
        vec!["Empresa A".to_string(), "Proveedor B".to_string()],
        vec![
            Phase::new(
                PhaseName::Initiation,
                "Preparación",
                vec![ActionItem::new(
                    "ACT-01",
                    "Firmar acta de inicio",
                    "Documento firmado por ambas partes",
                )],
            ),
            Phase::new(PhaseName::Execution, "Desarrollo", vec![]),
            Phase::new(PhaseName::Closure, "Finalización", vec![]),
        ],
    );
    contract.title = Some("Contrato de Servicio - Fallback".to_string());
    contract
}
