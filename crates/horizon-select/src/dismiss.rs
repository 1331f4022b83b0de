//! Dismissal flags and reasons.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Which dismissal triggers a select honours while open.
///
/// These flags can be combined using bitwise OR operations.
///
/// ```
/// use horizon_select::DismissFlags;
///
/// let flags = DismissFlags::OUTSIDE_POINTER | DismissFlags::ESCAPE;
/// assert!(flags.close_on_escape());
/// assert!(!flags.close_on_focus_loss());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissFlags(u8);

impl DismissFlags {
    /// No automatic dismissal; only the trigger and commits close the panel.
    pub const NONE: DismissFlags = DismissFlags(0);

    /// Close on a pointer press outside the panel.
    pub const OUTSIDE_POINTER: DismissFlags = DismissFlags(1 << 0);

    /// Close on Escape while focus is inside the panel.
    pub const ESCAPE: DismissFlags = DismissFlags(1 << 1);

    /// Close when focus leaves both trigger and panel.
    pub const FOCUS_LOSS: DismissFlags = DismissFlags(1 << 2);

    /// Every trigger.
    pub const DEFAULT: DismissFlags =
        DismissFlags(Self::OUTSIDE_POINTER.0 | Self::ESCAPE.0 | Self::FOCUS_LOSS.0);

    pub fn has(&self, flag: DismissFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }

    pub fn close_on_outside_pointer(&self) -> bool {
        self.has(Self::OUTSIDE_POINTER)
    }

    pub fn close_on_escape(&self) -> bool {
        self.has(Self::ESCAPE)
    }

    pub fn close_on_focus_loss(&self) -> bool {
        self.has(Self::FOCUS_LOSS)
    }
}

impl Default for DismissFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for DismissFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DismissFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for DismissFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DismissFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DismissFlags(self.0 & rhs.0)
    }
}

/// Why an open session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// The trigger was toggled while open.
    TriggerToggle,
    /// An option was committed in single-selection mode.
    Commit,
    /// A pointer press landed outside the panel.
    OutsidePointer,
    /// Escape was pressed inside the panel.
    Escape,
    /// Focus left both trigger and panel.
    FocusLoss,
    /// The host closed the select explicitly.
    Programmatic,
    /// The controller was disposed while open.
    Disposed,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DismissReason::TriggerToggle => "trigger-toggle",
            DismissReason::Commit => "commit",
            DismissReason::OutsidePointer => "outside-pointer",
            DismissReason::Escape => "escape",
            DismissReason::FocusLoss => "focus-loss",
            DismissReason::Programmatic => "programmatic",
            DismissReason::Disposed => "disposed",
        };
        f.write_str(name)
    }
}
