//! Effect module wrapping the external effects processor.
//!
//! The processor reads raw PCM on standard input and writes raw PCM on standard
//! output. It is invoked as `<binary> <effect> <pot1> <pot2> <pot3> <pot4>`;
//! effect names and control semantics belong entirely to the external program.

mod config;
mod error;
mod invoker;
mod traits;

pub use config::EffectConfig;
pub use error::EffectError;
pub use invoker::{EffectOutcome, ProcessEffectInvoker};
pub use traits::EffectProcessor;
