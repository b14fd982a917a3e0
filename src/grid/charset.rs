//! Printable-character check for write payloads.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Whether `c` may be stored in a cell
///
/// Rejects control, format, surrogate, private-use and unassigned code
/// points, plus every separator category (spaces included).
pub fn is_printable(c: char) -> bool {
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
