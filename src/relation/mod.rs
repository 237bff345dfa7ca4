//! Relations and constraint goals.
//!
//! Relations are plain functions returning goals; recursive relations build
//! their bodies lazily at solve time so that streams stay finite per step.
//! Constraint goals post attributed constraints into the state.

pub mod absento;
pub mod alphaeqo;
pub mod appendo;
pub mod conso;
pub mod copyterm;
pub mod diseq;
pub mod eq;
pub mod firsto;
pub mod fresho;
pub mod ground;
pub mod membero;
pub mod permuteo;
pub mod rembero;
pub mod resto;
pub mod reverso;
pub mod substo;
pub mod typeo;

pub use absento::absento;
pub use alphaeqo::alphaeqo;
pub use appendo::appendo;
pub use conso::conso;
pub use copyterm::copyterm;
pub use diseq::neq;
pub use eq::eq;
pub use firsto::firsto;
pub use fresho::fresho;
pub use ground::ground;
pub use membero::membero;
pub use permuteo::permuteo;
pub use rembero::rembero;
pub use resto::resto;
pub use reverso::reverso;
pub use substo::substo;
pub use typeo::{booleano, listo, numbero, stringo, symbolo};
