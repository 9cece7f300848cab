mod abi;
mod bytes;
mod catalog;
mod compression;
mod error;
mod inspect;
mod memory;
#[cfg(target_os = "linux")]
mod process;
mod provider;
mod registry;
mod sequence;
mod snapshot;
mod string;
#[cfg(test)]
mod test_support;
mod types;
mod value;
mod variant;

/// ABI layout descriptions and decode limits.
pub use abi::{AbiLayout, DecodeLimits, Endianness, SequenceLayoutSpec, StringLayoutSpec, VariantLayoutSpec};
/// Discriminant catalogs and validation reports.
pub use catalog::{CatalogCheck, CatalogMismatch, DiscriminantCatalog, plg_any_catalog};
/// Snapshot compression modes.
pub use compression::Compression;
/// Error and result types.
pub use error::{InspectError, Result};
/// Value-tree rendering.
pub use inspect::{ExpandOptions, Inspector, ValueNode};
/// Memory-read capability and the snapshot implementation.
pub use memory::{MemoryReader, MemoryRegion, SnapshotMemory};
/// Live-process memory reader.
#[cfg(target_os = "linux")]
pub use process::ProcessMemory;
/// Provider dispatch.
pub use provider::{ProviderKind, SyntheticProvider, Target};
/// Formatter registration.
pub use registry::{FormatterRegistry, Registration, SVAR, SummaryRegistration, TypeMatcher};
/// Sequence decoder.
pub use sequence::{SequenceDecoder, SequenceLayout};
/// Snapshot files and address literals.
pub use snapshot::{Snapshot, parse_address};
/// SSO string decoder.
pub use string::{StringContent, StringDecoder, StringLayout};
/// Type model and resolution.
pub use types::{BuiltinTypes, PrimitiveKind, TypeDesc, TypeResolver, TypeShape, canonical_name};
/// Host-native values.
pub use value::{Value, ValueObject, ValueSource};
/// Variant decoder.
pub use variant::{VariantDecoder, VariantLayout, VariantState, catalog_for};
