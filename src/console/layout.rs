//! Placement of the console window and its controls inside a container.

/// A rectangle in container cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// Fixed metrics of the console window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Margin kept around the window and between its controls.
    pub border: u16,
    /// Total window height.
    pub height: u16,
    /// Height of the input line.
    pub input_height: u16,
    /// Width the input line gives up on its right side.
    pub input_trim: u16,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            border: 1,
            height: 20,
            input_height: 1,
            input_trim: 2,
        }
    }
}

/// Resolved positions, all in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleLayout {
    pub window: Rect,
    pub page_pane: Rect,
    pub remote_pane: Rect,
    pub input: Rect,
}

impl ConsoleLayout {
    /// Docks the window to the bottom of a `width` x `height` container.
    ///
    /// The page pane takes the left third of the window and the remote pane
    /// the rest. Every size saturates at zero, so tiny containers collapse
    /// controls instead of overflowing.
    pub fn compute(metrics: &LayoutMetrics, width: u16, height: u16) -> Self {
        let border = metrics.border;

        let win_h = metrics.height.min(height.saturating_sub(2 * border));
        let win_w = width.saturating_sub(2 * border);
        let window = Rect::new(
            border,
            height.saturating_sub(border).saturating_sub(win_h),
            win_w,
            win_h,
        );

        let input_y = win_h
            .saturating_sub(2 * border)
            .saturating_sub(metrics.input_height);
        let input = Rect::new(
            border,
            input_y,
            win_w.saturating_sub(metrics.input_trim),
            metrics.input_height.min(win_h),
        );

        let output_h = input_y.saturating_sub(2 * border).max(1).min(input_y);
        let mid_w = win_w / 3;
        let page_pane = Rect::new(
            border,
            border,
            mid_w.saturating_sub(2 * border),
            output_h,
        );
        let remote_pane = Rect::new(
            mid_w,
            border,
            win_w.saturating_sub(mid_w).saturating_sub(border),
            output_h,
        );

        Self {
            window,
            page_pane: offset(page_pane, window),
            remote_pane: offset(remote_pane, window),
            input: offset(input, window),
        }
    }
}

fn offset(rect: Rect, origin: Rect) -> Rect {
    Rect::new(
        origin.x.saturating_add(rect.x),
        origin.y.saturating_add(rect.y),
        rect.width,
        rect.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_docks_to_bottom_with_border() {
        let metrics = LayoutMetrics::default();
        let layout = ConsoleLayout::compute(&metrics, 120, 40);

        assert_eq!(layout.window, Rect::new(1, 19, 118, 20));
        assert_eq!(layout.window.bottom(), 39);
    }

    #[test]
    fn panes_split_one_third_two_thirds() {
        let metrics = LayoutMetrics::default();
        let layout = ConsoleLayout::compute(&metrics, 122, 40);

        // win_w = 120, mid_w = 40
        assert_eq!(layout.page_pane.x, 2);
        assert_eq!(layout.page_pane.width, 38);
        assert_eq!(layout.remote_pane.x, 41);
        assert_eq!(layout.remote_pane.width, 79);
        assert!(layout.page_pane.right() <= layout.remote_pane.x);
    }

    #[test]
    fn input_sits_below_panes() {
        let metrics = LayoutMetrics::default();
        let layout = ConsoleLayout::compute(&metrics, 100, 30);

        assert!(layout.page_pane.bottom() <= layout.input.y);
        assert!(layout.input.bottom() <= layout.window.bottom());
    }

    #[test]
    fn input_gives_up_trim_on_the_right() {
        let metrics = LayoutMetrics::default();
        let layout = ConsoleLayout::compute(&metrics, 122, 40);

        // win_w = 120, trim = 2
        assert_eq!(layout.input.x, 2);
        assert_eq!(layout.input.width, 118);
        assert!(layout.input.right() <= layout.window.right());
    }

    #[test]
    fn never_wider_than_container() {
        let metrics = LayoutMetrics::default();
        for (w, h) in [(0, 0), (1, 1), (3, 5), (10, 4), (80, 24), (400, 200)] {
            let layout = ConsoleLayout::compute(&metrics, w, h);
            for rect in [
                layout.window,
                layout.page_pane,
                layout.remote_pane,
                layout.input,
            ] {
                assert!(rect.width <= w, "{rect:?} wider than {w}");
                assert!(rect.height <= h, "{rect:?} taller than {h}");
            }
        }
    }

    #[test]
    fn short_container_shrinks_window() {
        let metrics = LayoutMetrics::default();
        let layout = ConsoleLayout::compute(&metrics, 80, 12);
        assert_eq!(layout.window.height, 10);
        assert_eq!(layout.window.y, 1);
    }
}
