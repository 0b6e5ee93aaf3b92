/// Capability shared by every record parsed out of a single feature blob.
///
/// Parsing never fails: text that no rule recognizes is kept in the record's
/// fallback bucket (if it has one) and reported through `tracing`.
pub trait FromRawText: Sized {
    /// Build the record from `blob`, the raw text of column `field`
    fn from_raw_text(field: &str, blob: &str) -> Self;
}

/// Parse `blob` as the record kind `T`
pub fn classify<T: FromRawText>(field: &str, blob: &str) -> T {
    T::from_raw_text(field, blob)
}
