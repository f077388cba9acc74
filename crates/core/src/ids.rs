//! Document identifier.

/// A document identifier.
///
/// Callers supply these directly (there is no id-generation facility); they
/// must be non-negative and unique per [`crate::error::SearchError`]'s
/// `InvalidDocumentId` / `DuplicateDocumentId` variants.
pub type DocId = i64;
