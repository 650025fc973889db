//! Rowan language implementation
//!
//! Connects `SyntaxKind` to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Language marker for C-family syntax trees
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CLanguage;

impl Language for CLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::from_raw(raw.0).unwrap_or_else(|| {
            tracing::warn!("Unknown syntax kind: {}", raw.0);
            SyntaxKind::Error
        })
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
