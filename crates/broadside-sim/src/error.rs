//! Errors surfaced by the simulation harness.

use broadside_core::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown entity {0:?}")]
    UnknownEntity(hecs::Entity),

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: hecs::Entity,
        component: &'static str,
    },

    #[error("no ship named {0:?}")]
    UnknownShip(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
