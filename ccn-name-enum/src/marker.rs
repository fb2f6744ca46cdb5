//! The name enumeration marker component.

use ccn_name::{ContentName, NameComponent, NameError};

/// Byte value of the marker component that flags a name as a discovery query.
pub const NE_MARKER: u8 = 0xFE;

/// Returns the marker as a name component.
#[must_use]
pub fn marker() -> NameComponent {
    NameComponent::from_byte(NE_MARKER)
}

/// Returns true if `name` contains the marker.
#[must_use]
pub fn is_marked(name: &ContentName) -> bool {
    name.contains(&marker())
}

/// Returns `prefix` with the marker appended.
///
/// # Errors
///
/// Returns `NameError::TooManyComponents` if `prefix` is already full.
pub fn mark(prefix: &ContentName) -> Result<ContentName, NameError> {
    prefix.append(marker())
}

/// Returns the prefix before the marker, or `None` if `name` is unmarked.
#[must_use]
pub fn unmark(name: &ContentName) -> Option<ContentName> {
    let marker = marker();
    name.contains(&marker).then(|| name.cut(&marker))
}
