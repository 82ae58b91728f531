//! Status output
//!
//! [`StatusScreen`] lays the player's progress lines out on any
//! embedded-graphics panel, one fixed row per [`StatusRow`], under a title
//! bar. [`LogStatus`] sends the same lines to the logger for boards without
//! a panel.

// Panel coordinates are small (at most a few hundred pixels), so i32/u32
// arithmetic on them cannot overflow.
#![allow(
    clippy::cast_possible_wrap,
    clippy::arithmetic_side_effects,
)]

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X18_BOLD};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use platform::config::SCREEN_TITLE;
use platform::{StatusDisplay, StatusRow};

/// Title origin
const TITLE_ORIGIN: Point = Point::new(75, 14);
/// Horizontal rules under the title and above the footer
const RULE_TOP_Y: i32 = 46;
const RULE_BOTTOM_Y: i32 = 220;
/// Left and right margin of the rules
const RULE_MARGIN: i32 = 20;
/// Height cleared behind a status row
const ROW_HEIGHT: u32 = 10;

/// Top-left corner of each status row.
pub const fn row_origin(row: StatusRow) -> Point {
    let y = match row {
        StatusRow::Storage => 60,
        StatusRow::File => 80,
        StatusRow::Header => 100,
        StatusRow::Channels => 120,
        StatusRow::SampleRate => 140,
        StatusRow::BitsPerSample => 160,
        StatusRow::Playback => 180,
        StatusRow::Done => 200,
    };
    // Header details are indented under their caption.
    Point::new(if row.is_detail() { 50 } else { 30 }, y)
}

/// Progress screen drawn on a monochrome-compatible panel.
pub struct StatusScreen<D> {
    display: D,
}

impl<D, C> StatusScreen<D>
where
    D: DrawTarget<Color = C>,
    C: PixelColor + From<BinaryColor>,
{
    /// Wrap a panel. Call [`StatusScreen::draw_frame`] before showing rows.
    pub fn new(display: D) -> Self {
        Self { display }
    }

    /// Clear the panel and draw the title and both rules.
    ///
    /// # Errors
    ///
    /// Returns `D::Error` if any drawing operation fails.
    pub fn draw_frame(&mut self) -> Result<(), D::Error> {
        self.display.clear(C::from(BinaryColor::Off))?;

        let title = MonoTextStyle::new(&FONT_9X18_BOLD, C::from(BinaryColor::On));
        Text::with_baseline(SCREEN_TITLE, TITLE_ORIGIN, title, Baseline::Top)
            .draw(&mut self.display)?;

        let right = self.display.bounding_box().size.width as i32 - RULE_MARGIN;
        let rule = PrimitiveStyle::with_stroke(C::from(BinaryColor::On), 1);
        for y in [RULE_TOP_Y, RULE_BOTTOM_Y] {
            Line::new(Point::new(RULE_MARGIN, y), Point::new(right, y))
                .into_styled(rule)
                .draw(&mut self.display)?;
        }
        Ok(())
    }

    /// The wrapped panel.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Unwrap the panel.
    pub fn into_inner(self) -> D {
        self.display
    }

    fn draw_row(&mut self, row: StatusRow, text: &str) -> Result<(), D::Error> {
        let origin = row_origin(row);
        let width = self
            .display
            .bounding_box()
            .size
            .width
            .saturating_sub(origin.x as u32);
        Rectangle::new(origin, Size::new(width, ROW_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(C::from(BinaryColor::Off)))
            .draw(&mut self.display)?;

        let style = MonoTextStyle::new(&FONT_6X10, C::from(BinaryColor::On));
        Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.display)?;
        Ok(())
    }
}

impl<D, C> StatusDisplay for StatusScreen<D>
where
    D: DrawTarget<Color = C>,
    D::Error: core::fmt::Debug,
    C: PixelColor + From<BinaryColor>,
{
    type Error = D::Error;

    fn show(&mut self, row: StatusRow, text: &str) -> Result<(), Self::Error> {
        self.draw_row(row, text)
    }
}

/// Status sink that logs each line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusDisplay for LogStatus {
    type Error = core::convert::Infallible;

    fn show(&mut self, row: StatusRow, text: &str) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("[{}] {=str}", row, text);
        #[cfg(feature = "tracing")]
        tracing::info!(?row, "{text}");
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = (row, text);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use platform::mocks::MockDisplay;

    #[test]
    fn test_frame_clears_and_draws() {
        let mut screen = StatusScreen::new(MockDisplay::new(320, 240));
        screen.draw_frame().unwrap();
        assert_eq!(screen.display().clears(), 1);
        assert!(screen.display().lit_pixels() > 0);
    }

    #[test]
    fn test_row_text_is_drawn() {
        let mut screen = StatusScreen::new(MockDisplay::new(320, 240));
        screen.show(StatusRow::Storage, "1. Initializing storage").unwrap();
        let after_one = screen.display().lit_pixels();
        assert!(after_one > 0);

        screen.show(StatusRow::Done, "5. End.").unwrap();
        assert!(screen.display().lit_pixels() > after_one);
    }

    #[test]
    fn test_rows_are_distinct_and_ordered() {
        let ys: Vec<i32> = StatusRow::ALL.iter().map(|&r| row_origin(r).y).collect();
        assert!(ys.windows(2).all(|w| w.first() < w.last()));
        for row in StatusRow::ALL {
            let x = row_origin(row).x;
            assert_eq!(x, if row.is_detail() { 50 } else { 30 });
        }
    }

    #[test]
    fn test_rows_sit_between_rules() {
        for row in StatusRow::ALL {
            let y = row_origin(row).y;
            assert!(y > RULE_TOP_Y && y + ROW_HEIGHT as i32 <= RULE_BOTTOM_Y);
        }
    }

    #[test]
    fn test_narrow_panel_does_not_fail() {
        let mut screen = StatusScreen::new(MockDisplay::new(20, 20));
        screen.draw_frame().unwrap();
        screen.show(StatusRow::Header, "3. Get file header:").unwrap();
    }

    #[test]
    fn test_log_status_accepts_every_row() {
        let mut log = LogStatus;
        for row in StatusRow::ALL {
            log.show(row, "line").unwrap();
        }
    }
}
