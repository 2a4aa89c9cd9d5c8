#![forbid(unsafe_code)]

//! Native change-event vocabulary shared by every widget.

/// Who caused a widget's value to change.
///
/// Widgets fire their native listeners for both origins, the way real
/// toolkits do. View registers only forward [`ChangeOrigin::User`], which is
/// what keeps a source → view push from echoing back into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOrigin {
    /// The user edited the widget.
    User,
    /// Application code set the value.
    Program,
}

impl ChangeOrigin {
    /// Whether the change came from the user.
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Handle returned when a listener is added to a multi-listener widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);
