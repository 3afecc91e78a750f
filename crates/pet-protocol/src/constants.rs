/// Product name shown in the tray tooltip and about box.
pub const APP_NAME: &str = "Live2D Desktop Pet";

/// One-line description shown in the about box.
pub const APP_DESCRIPTION: &str =
    "Animated desktop companion with motions, expressions, audio and lip sync";

/// Default window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: i32 = 300;

/// Default window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 400;

/// Position sentinel meaning "place at the default bottom-right position".
pub const POSITION_UNSET: i32 = -1;

/// Distance kept between the window and the work-area edges.
pub const DEFAULT_POSITION_MARGIN: i32 = 50;

/// Model scale choices offered in the tray menu (percent).
pub const SCALE_CHOICES: [u16; 5] = [50, 75, 100, 150, 200];

/// Accepted model scale range (percent, inclusive).
pub const SCALE_RANGE: std::ops::RangeInclusive<u16> = 50..=200;

/// Opacity choices offered in the tray menu (percent).
pub const OPACITY_CHOICES: [u8; 4] = [20, 50, 75, 100];

/// Lip-sync sensitivity choices offered in the tray menu.
pub const SENSITIVITY_CHOICES: [u8; 4] = [20, 50, 80, 100];

/// Initial model scale (percent).
pub const DEFAULT_SCALE_PERCENT: u16 = 100;

/// Initial opacity (percent).
pub const DEFAULT_OPACITY_PERCENT: u8 = 100;

/// Initial lip-sync sensitivity.
pub const DEFAULT_SENSITIVITY: u8 = 50;

/// Converts a percentage into the fraction sent to the render surface.
pub fn percent_to_fraction(percent: u16) -> f64 {
    f64::from(percent) / 100.0
}

/// Converts a fraction reported by the render surface back into a percentage.
///
/// Returns `None` for non-finite or negative values.
pub fn fraction_to_percent(fraction: f64) -> Option<u16> {
    if !fraction.is_finite() || fraction < 0.0 {
        return None;
    }
    let percent = (fraction * 100.0).round();
    if percent > f64::from(u16::MAX) {
        return None;
    }
    Some(percent as u16)
}
