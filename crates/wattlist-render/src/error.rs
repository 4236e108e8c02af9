use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A required anchor marker is missing from the host template. Fatal:
    /// producing output against an incompatible template would silently
    /// drop data.
    #[error("anchor not found in host template: #{anchor}")]
    AnchorNotFound { anchor: String },
}
