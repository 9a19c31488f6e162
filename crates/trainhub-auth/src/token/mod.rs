//! JWT claim structures, structural decoding, and workspace selection.

pub mod claims;
pub mod decoder;
pub mod workspace;

pub use claims::{SIMULATOR_MODULE, TokenClaims, WorkspaceBlock};
pub use decoder::TokenDecoder;
pub use workspace::{SelectedWorkspace, select_workspace};
