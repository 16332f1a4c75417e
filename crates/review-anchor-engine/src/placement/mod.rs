//! Keeping popups inside the viewport next to the element they describe.
//!
//! [`place`] is recomputed from scratch on every show and every resize; it
//! keeps no state between calls.

/// Axis-aligned rectangle. `top` is in page coordinates (it includes the
/// vertical scroll offset), `left` in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Visible area and how far the page is scrolled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn scrolled(mut self, scroll_x: f32, scroll_y: f32) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

/// Where the popup's top-left corner goes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupPlacement {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Minimum distance kept from every viewport edge
    pub padding: f32,
    /// Distance between the anchor and the popup
    pub gap: f32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            padding: 16.0,
            gap: 12.0,
        }
    }
}

/// Geometry capability supplied by the rendering surface
pub trait GeometrySource {
    type Element;

    fn measure_anchor(&self, element: &Self::Element) -> Rect;
    fn viewport(&self) -> Viewport;
}

/// Place a popup with the default padding (16) and gap (12).
pub fn place(anchor: Rect, popup: Size, viewport: Viewport) -> PopupPlacement {
    place_with(anchor, popup, viewport, &PlacementOptions::default())
}

/// Measure an element and place a popup next to it.
pub fn place_for<G: GeometrySource>(
    geometry: &G,
    element: &G::Element,
    popup: Size,
    options: &PlacementOptions,
) -> PopupPlacement {
    place_with(geometry.measure_anchor(element), popup, geometry.viewport(), options)
}

/// Place a popup next to `anchor`, fully inside the viewport.
///
/// Horizontally the popup prefers the right of the anchor, then the left,
/// then centered. Vertically it prefers centering on the anchor, then below,
/// then above, then sticks to the edge of the viewport nearest the anchor.
pub fn place_with(
    anchor: Rect,
    popup: Size,
    viewport: Viewport,
    options: &PlacementOptions,
) -> PopupPlacement {
    let padding = options.padding;
    let min_x = padding;
    let max_x = viewport.width - popup.width - padding;
    let min_y = viewport.scroll_y + padding;
    let max_y = viewport.scroll_y + viewport.height - popup.height - padding;

    let x = horizontal(anchor, popup, viewport, options);
    let y = vertical(anchor, popup, viewport, options);

    PopupPlacement {
        x: clamp_into(x, min_x, max_x),
        y: clamp_into(y, min_y, max_y),
    }
}

fn horizontal(anchor: Rect, popup: Size, viewport: Viewport, options: &PlacementOptions) -> f32 {
    let right = anchor.right() + options.gap;
    if right + popup.width <= viewport.width - options.padding {
        return right;
    }

    let left = anchor.left - options.gap - popup.width;
    if left >= options.padding {
        return left;
    }

    clamp_into(
        anchor.center_x() - popup.width / 2.0,
        options.padding,
        viewport.width - popup.width - options.padding,
    )
}

fn vertical(anchor: Rect, popup: Size, viewport: Viewport, options: &PlacementOptions) -> f32 {
    let band_top = viewport.scroll_y + options.padding;
    let band_bottom = viewport.scroll_y + viewport.height - options.padding;
    let fits = |y: f32| y >= band_top && y + popup.height <= band_bottom;

    let centered = anchor.center_y() - popup.height / 2.0;
    if fits(centered) {
        return centered;
    }

    let below = anchor.bottom() + options.gap;
    if fits(below) {
        return below;
    }

    let above = anchor.top - options.gap - popup.height;
    if fits(above) {
        return above;
    }

    let viewport_middle = viewport.scroll_y + viewport.height / 2.0;
    if anchor.center_y() > viewport_middle {
        band_bottom - popup.height
    } else {
        band_top
    }
}

/// Clamp that tolerates an empty interval by pinning to `min`
fn clamp_into(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}
