#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `id` is kept as the raw caller-supplied string so malformed ids can be
    /// reported the same way as missing ones.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
