//! Build-time backend: resolved mappers as Rust source.

mod emitter;
mod naming;


pub use emitter::{Emitter, emit_all};
pub use naming::{NameTable, rust_ident, to_snake_case};
