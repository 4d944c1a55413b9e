//! Window geometry: placement of new windows, DPI factors and conversion
//! between desktop and window-local coordinates.
//!
//! Window positions are stored in OS coordinates while everything the UI
//! sees is in native pixels. `native_pixel_size` is the ratio between the
//! two (1.0 on most platforms, the backing scale on macOS).

use glam::{IVec2, UVec2};

/// Integer rectangle, inclusive of `min`, exclusive of `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> IVec2 {
        self.max - self.min
    }

    /// Inclusive on both edges, matching how cursor hit tests treat borders.
    pub fn contains_inclusive(&self, point: IVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// How a new window is placed relative to the point it is opened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Offset is the new window's corner.
    #[default]
    Absolute,
    /// Offset is the new window's center.
    Center,
    /// Centered on the source window.
    Parent,
}

impl Alignment {
    /// Parses a stored alignment token. Unknown tokens mean `Absolute`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "absolute" => Alignment::Absolute,
            "center" => Alignment::Center,
            "parent" => Alignment::Parent,
            other => {
                tracing::debug!("Unknown window alignment {other:?}, using absolute");
                Alignment::Absolute
            }
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Alignment::Absolute => "absolute",
            Alignment::Center => "center",
            Alignment::Parent => "parent",
        }
    }
}

/// Computes where a window opened from `source_pos`/`source_size` lands.
///
/// `offset` and `size` are in native pixels and are scaled down into OS
/// coordinates first.
pub fn placement_rect(
    source_pos: IVec2,
    source_size: IVec2,
    native_pixel_size: f32,
    offset: IVec2,
    size: IVec2,
    alignment: Alignment,
) -> Rect {
    let nps = if native_pixel_size > 0.0 { native_pixel_size } else { 1.0 };
    let mut min = source_pos + (offset.as_vec2() / nps).as_ivec2();
    let size = (size.as_vec2() / nps).as_ivec2();

    match alignment {
        Alignment::Center => min -= size / 2,
        Alignment::Parent => min += (source_size - size) / 2,
        Alignment::Absolute => {}
    }

    Rect::from_pos_size(min, size)
}

/// Fits `rect` on a screen of `screen` size.
///
/// An axis that is larger than the screen is shrunk to the screen size and
/// re-centered on the rectangle's original center; smaller axes are left
/// untouched.
pub fn fit_to_screen(rect: Rect, screen: UVec2) -> Rect {
    let screen = screen.as_ivec2();
    let mut out = rect;

    if rect.width() > screen.x {
        let center = (rect.min.x + rect.max.x) / 2;
        out.min.x = center - screen.x / 2;
        out.max.x = out.min.x + screen.x;
    }
    if rect.height() > screen.y {
        let center = (rect.min.y + rect.max.y) / 2;
        out.min.y = center - screen.y / 2;
        out.max.y = out.min.y + screen.y;
    }
    out
}

/// Offset of a window's origin in desktop pixels.
fn desktop_origin(window_pos: IVec2, native_pixel_size: f32) -> IVec2 {
    (window_pos.as_vec2() * native_pixel_size).as_ivec2()
}

pub fn local_to_desktop(window_pos: IVec2, native_pixel_size: f32, local: IVec2) -> IVec2 {
    local + desktop_origin(window_pos, native_pixel_size)
}

pub fn desktop_to_local(window_pos: IVec2, native_pixel_size: f32, desktop: IVec2) -> IVec2 {
    desktop - desktop_origin(window_pos, native_pixel_size)
}

/// Size of a window in native pixels.
pub fn pixel_size(size: IVec2, native_pixel_size: f32) -> IVec2 {
    (size.as_vec2() * native_pixel_size).as_ivec2()
}

/// Resolution-dependent UI factors of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowDpi {
    /// DPI per UI pixel.
    pub dpi: i32,
    /// Width of one UI pixel in native pixels, never below 1.
    pub pixelsz: f32,
    pub dpifac: f32,
    pub widget_unit: i32,
}

impl Default for WindowDpi {
    fn default() -> Self {
        Self::compute(96.0, 1.0, 1.0, 0.0)
    }
}

impl WindowDpi {
    /// Derives UI factors from the OS DPI hint and user scale.
    ///
    /// The UI is laid out for 72 DPI while the OS reports 96 for an unscaled
    /// display, hence the 72/96 remap.
    pub fn compute(dpi_hint: f32, native_pixel_size: f32, ui_scale: f32, line_width: f32) -> Self {
        let auto_dpi = dpi_hint.max(96.0) * native_pixel_size;
        let dpi = (auto_dpi * ui_scale * (72.0 / 96.0)) as i32;

        let pixelsz = (dpi / 64).max(1);
        let pixelsz = ((pixelsz as f32 + line_width) as i32).max(1);

        let dpiadj = dpi / pixelsz;
        let dpifac = (pixelsz * dpiadj) as f32 / 72.0;
        let widget_unit = (pixelsz * dpiadj * 20 + 36) / 72 + 2 * (pixelsz - dpifac as i32);

        Self {
            dpi: dpiadj,
            pixelsz: pixelsz as f32,
            dpifac,
            widget_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_alignment() {
        let rect = placement_rect(
            IVec2::ZERO,
            IVec2::new(1920, 1080),
            1.0,
            IVec2::new(960, 540),
            IVec2::new(400, 300),
            Alignment::Center,
        );
        assert_eq!(rect, Rect::new(IVec2::new(760, 390), IVec2::new(1160, 690)));
    }

    #[test]
    fn test_parent_alignment_centers_on_source() {
        let rect = placement_rect(
            IVec2::new(100, 50),
            IVec2::new(1000, 800),
            1.0,
            IVec2::ZERO,
            IVec2::new(400, 200),
            Alignment::Parent,
        );
        assert_eq!(rect.min, IVec2::new(400, 350));
        assert_eq!(rect.size(), IVec2::new(400, 200));
    }

    #[test]
    fn test_absolute_scales_by_native_pixel_size() {
        let rect = placement_rect(
            IVec2::new(10, 10),
            IVec2::new(800, 600),
            2.0,
            IVec2::new(100, 60),
            IVec2::new(400, 300),
            Alignment::Absolute,
        );
        assert_eq!(rect, Rect::new(IVec2::new(60, 40), IVec2::new(260, 190)));
    }

    #[test]
    fn test_unknown_alignment_token_is_absolute() {
        assert_eq!(Alignment::from_token("sideways"), Alignment::Absolute);
        assert_eq!(Alignment::from_token("center"), Alignment::Center);
    }

    #[test]
    fn test_fit_shrinks_and_recenters_overflowing_axis() {
        let rect = Rect::new(IVec2::new(-100, 100), IVec2::new(2100, 400));
        let fitted = fit_to_screen(rect, UVec2::new(1920, 1080));
        assert_eq!(fitted.width(), 1920);
        assert_eq!((fitted.min.x + fitted.max.x) / 2, 1000);
        assert_eq!((fitted.min.y, fitted.max.y), (100, 400));
    }

    #[test]
    fn test_fit_leaves_small_rect_alone() {
        let rect = Rect::new(IVec2::new(3000, 3000), IVec2::new(3100, 3100));
        assert_eq!(fit_to_screen(rect, UVec2::new(1920, 1080)), rect);
    }

    #[test]
    fn test_dpi_at_standard_resolution() {
        let dpi = WindowDpi::compute(96.0, 1.0, 1.0, 0.0);
        assert_eq!(dpi.dpi, 72);
        assert_eq!(dpi.pixelsz, 1.0);
        assert_eq!(dpi.dpifac, 1.0);
        assert_eq!(dpi.widget_unit, 20);
    }

    #[test]
    fn test_dpi_never_below_96_hint() {
        assert_eq!(
            WindowDpi::compute(60.0, 1.0, 1.0, 0.0),
            WindowDpi::compute(96.0, 1.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_hidpi_doubles_pixel_size() {
        let dpi = WindowDpi::compute(96.0, 2.0, 1.0, 0.0);
        assert_eq!(dpi.pixelsz, 2.0);
        assert_eq!(dpi.dpifac, 2.0);
        assert_eq!(dpi.widget_unit, 40);
    }

    #[test]
    fn test_round_trip_example() {
        let pos = IVec2::new(37, 12);
        let desktop = local_to_desktop(pos, 1.25, IVec2::new(5, 9));
        assert_eq!(desktop, IVec2::new(51, 24));
        assert_eq!(desktop_to_local(pos, 1.25, desktop), IVec2::new(5, 9));
    }
}
