//! Panel positioning.
//!
//! The controller asks a [`PositioningCoordinator`] where to put the panel
//! whenever trigger or panel geometry changes during an open session.
//! Positioning is best effort: without trigger geometry the panel stays open
//! with no placement.

use std::collections::BTreeMap;

use horizon_select_core::logging::targets;
use horizon_select_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Attribute key carrying the side and alignment actually used.
pub const PLACEMENT_ATTRIBUTE: &str = "data-placement";

/// Where the panel goes, plus presentation attributes describing it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    pub offset_x: f32,
    pub offset_y: f32,
    pub applied_attributes: BTreeMap<String, String>,
}

impl Placement {
    pub fn origin(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.applied_attributes.get(key).map(String::as_str)
    }
}

/// Computes panel placement from trigger and panel geometry.
pub trait PositioningCoordinator {
    fn compute_placement(&self, trigger: Rect, panel: Rect) -> Placement;
}

/// Preferred position of the panel relative to the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelPlacement {
    /// Centered below the trigger.
    Below,
    /// Centered above the trigger.
    Above,
    /// Below, left edges aligned.
    #[default]
    BelowAlignLeft,
    /// Below, right edges aligned.
    BelowAlignRight,
    /// Above, left edges aligned.
    AboveAlignLeft,
    /// Above, right edges aligned.
    AboveAlignRight,
}

impl PanelPlacement {
    fn is_below(&self) -> bool {
        matches!(
            self,
            PanelPlacement::Below | PanelPlacement::BelowAlignLeft | PanelPlacement::BelowAlignRight
        )
    }

    fn alignment(&self) -> &'static str {
        match self {
            PanelPlacement::Below | PanelPlacement::Above => "center",
            PanelPlacement::BelowAlignLeft | PanelPlacement::AboveAlignLeft => "start",
            PanelPlacement::BelowAlignRight | PanelPlacement::AboveAlignRight => "end",
        }
    }

    fn x(&self, trigger: Rect, panel: Size) -> f32 {
        match self {
            PanelPlacement::Below | PanelPlacement::Above => trigger.center().x - panel.width / 2.0,
            PanelPlacement::BelowAlignLeft | PanelPlacement::AboveAlignLeft => trigger.left(),
            PanelPlacement::BelowAlignRight | PanelPlacement::AboveAlignRight => {
                trigger.right() - panel.width
            }
        }
    }
}

/// Default coordinator: anchor the panel to the trigger, flipping to the
/// other side and shifting back inside `available_bounds` when it would
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchoredPlacement {
    pub placement: PanelPlacement,
    pub available_bounds: Option<Rect>,
    /// Vertical distance between trigger and panel.
    pub gap: f32,
}

impl AnchoredPlacement {
    pub fn new(placement: PanelPlacement) -> Self {
        Self {
            placement,
            available_bounds: None,
            gap: 0.0,
        }
    }

    pub fn with_available_bounds(mut self, bounds: Rect) -> Self {
        self.available_bounds = Some(bounds);
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    fn below_y(&self, trigger: Rect) -> f32 {
        trigger.bottom() + self.gap
    }

    fn above_y(&self, trigger: Rect, panel: Size) -> f32 {
        trigger.top() - self.gap - panel.height
    }
}

impl PositioningCoordinator for AnchoredPlacement {
    fn compute_placement(&self, trigger: Rect, panel: Rect) -> Placement {
        let size = panel.size;
        let mut below = self.placement.is_below();
        let mut x = self.placement.x(trigger, size);
        let mut y = if below {
            self.below_y(trigger)
        } else {
            self.above_y(trigger, size)
        };

        if let Some(bounds) = self.available_bounds {
            // Flip first, then shift what still overflows.
            if below && y + size.height > bounds.bottom() {
                let flipped = self.above_y(trigger, size);
                if flipped >= bounds.top() {
                    y = flipped;
                    below = false;
                }
            } else if !below && y < bounds.top() {
                let flipped = self.below_y(trigger);
                if flipped + size.height <= bounds.bottom() {
                    y = flipped;
                    below = true;
                }
            }

            if x < bounds.left() {
                x = bounds.left();
            } else if x + size.width > bounds.right() {
                x = (bounds.right() - size.width).max(bounds.left());
            }
            if y < bounds.top() {
                y = bounds.top();
            } else if y + size.height > bounds.bottom() {
                y = (bounds.bottom() - size.height).max(bounds.top());
            }
        }

        let side = if below { "bottom" } else { "top" };
        let mut applied_attributes = BTreeMap::new();
        applied_attributes.insert(
            PLACEMENT_ATTRIBUTE.to_string(),
            format!("{side}-{}", self.placement.alignment()),
        );

        tracing::trace!(target: targets::PLACEMENT, x, y, side, "computed panel placement");
        Placement {
            offset_x: x,
            offset_y: y,
            applied_attributes,
        }
    }
}
