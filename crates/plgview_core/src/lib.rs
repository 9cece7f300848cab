//! Out-of-process inspection of `plg` container values in raw target memory.

/// Memory access, type model, container decoders, catalog, formatter registry, and inspector.
pub mod plg;
