//! `nodeconf-builder` — the enrichment/build pipeline that turns a
//! partially-specified per-node configuration request into a fully resolved
//! per-config-file configuration set.
//!
//! Provides:
//! - Config-data key validation against the definitions tree
//! - Schema default filling (tarball-aware via definitions substitution)
//! - Unmanaged-file and install-type pruning
//! - The per-config-file enrichment registry (seed provider, transport
//!   naming, JVM options, workload flags, topology properties)
//! - On-disk file-path generation and configured-path recording
//! - Tarball path qualification
//! - The pipeline orchestrator (`build_config`)
//!
//! Schema loading, file rendering, and rollout orchestration live outside
//! this crate; see `nodeconf-model` for the input types.

pub mod defaults;
pub mod enrich;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod prune;
pub mod record;
pub mod validate;

// Re-export most-used items at crate root.
pub use defaults::fill_defaults;
pub use enrich::{enrich, resolve_install_directory, resolve_run_as};
pub use error::BuildError;
pub use paths::{generate_file_path, qualify_paths};
pub use pipeline::{build_config, BuildContext};
pub use prune::{prune_by_install_type, prune_unmanaged};
pub use record::record_configured_paths;
pub use validate::validate_config_keys;
