/// How far the comment sheet has to be dragged down before letting go closes it.
pub const DISMISS_THRESHOLD: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Dismiss,
    SnapBack,
}

/// Tracks a vertical drag on the comment sheet. Positions are in pixels, growing downwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetDrag {
    start: Option<f32>,
    offset: f32,
}

impl SheetDrag {
    /// How far the sheet is currently pushed down.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn start(&mut self, y: f32) {
        self.start = Some(y);
        self.offset = 0.0;
    }

    /// Follows the finger. Dragging above the starting point keeps the sheet in place.
    pub fn move_to(&mut self, y: f32) -> f32 {
        if let Some(start) = self.start {
            self.offset = (y - start).max(0.0);
        }

        self.offset
    }

    pub fn release(&mut self) -> Release {
        let release = if self.start.is_some() && self.offset > DISMISS_THRESHOLD {
            Release::Dismiss
        } else {
            Release::SnapBack
        };

        self.start = None;
        if release == Release::SnapBack {
            self.offset = 0.0;
        }

        release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_drag_dismisses() {
        let mut drag = SheetDrag::default();

        drag.start(300.0);
        assert_eq!(drag.move_to(450.0), 150.0);
        assert_eq!(drag.release(), Release::Dismiss);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut drag = SheetDrag::default();

        drag.start(300.0);
        drag.move_to(420.0);
        assert_eq!(drag.release(), Release::SnapBack, "exactly the threshold is not enough");
        assert_eq!(drag.offset(), 0.0);
    }

    #[test]
    fn dragging_up_does_not_move_the_sheet() {
        let mut drag = SheetDrag::default();

        drag.start(300.0);
        assert_eq!(drag.move_to(100.0), 0.0);
        assert_eq!(drag.release(), Release::SnapBack);
    }

    #[test]
    fn moves_without_a_start_are_ignored() {
        let mut drag = SheetDrag::default();

        assert_eq!(drag.move_to(900.0), 0.0);
        assert_eq!(drag.release(), Release::SnapBack);
    }
}
