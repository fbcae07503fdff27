//! This Rust `embedded-hal`-based library is a simple way to control a 16x2 [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display (the ubiquitous "LCD1602") with a PCF8574 or PCF8574A "I2C backpack" in an embedded, `no_std` environment.
//!
//! The backpack is a PCF8574 I2C GPIO expander wired to the display in 4-bit mode: the display data pins D4-D7 sit on P4-P7 of the
//! expander, and P0-P3 carry RS, RW, enable and the backlight. Backpacks built with the PCF8574 answer at 0x20-0x27 (most commonly
//! 0x27), those built with the PCF8574A at 0x38-0x3F (most commonly 0x3F). The library can probe the bus to find which one is fitted.
//!
//! Key features include:
//! - Convenient high-level API for positioned text and numbers
//! - Automatic detection of the backpack I2C address
//! - Backlight control
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! i2c-lcd1602 = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which allows the library's errors to be used with the `defmt` logging
//! framework and emits debug records while the address is being detected. Another optional feature is `features = ["ufmt"]`, which enables the
//! `ufmt` feature, allowing the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Create and initialize the display:
//! ```rust
//! use i2c_lcd1602::{Lcd1602, AUTODETECT_ADDRESS};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = Lcd1602::new(i2c, delay);
//! // pass the backpack address, or `AUTODETECT_ADDRESS` to probe for it
//! match lcd.init(AUTODETECT_ADDRESS) {
//!     Ok(address) => { /* display found at `address` */ }
//!     Err(e) => panic!("Error initializing LCD: {}", e),
//! }
//! ```
//! Use the display:
//! ```rust
//! lcd.show_string("Hello, world!", 0, 0)?;
//! lcd.show_number(-42, 0, 1)?;
//! // can also use the `core::fmt::write!` macro at the current cursor position
//! use core::fmt::Write;
//!
//! write!(lcd, "{}C", 21)?;
//! ```
//!
//! The various methods for controlling the LCD each return a `Result` that wraps the display object in `Ok()`, allowing for easy chaining
//! of commands. For example:
//! ```rust
//! lcd.backlight_on()?.clear()?.show_string("Hello", 5, 1)?;
//! ```
//! Column and row values are not range checked. Row 0 is the first line and any other row value selects the second line.
//!
//! The display object is not meant to be shared between threads. Wrap it in a mutex if several tasks need to draw on it.
//!
#![no_std]
#![allow(non_upper_case_globals)]
use core::fmt::{Display, Write};

use embedded_hal::{delay::DelayNs, i2c};

pub use crate::driver::hd44780::adapter::autodetect::{
    resolve_address, ExpanderVariant, PCF8574A_ADDRESS_RANGE, PCF8574_ADDRESS_RANGE,
};

/// HD44780 based 16x2 character display using a PCF8574 or PCF8574A I2C backpack.
pub type Lcd1602<I2C, DELAY> = CharacterDisplayPCF8574<I2C, DELAY>;

/// Passing this address to `init` requests detection of the backpack address.
pub const AUTODETECT_ADDRESS: u8 = 0;

mod bit_configurations;
mod driver;

/// Longest decimal rendering of an `i32`, "-2147483648".
const MAX_NUMBER_DIGITS: usize = 11;

#[derive(Debug, PartialEq, Copy, Clone)]
/// Errors that can occur when using the LCD backpack
pub enum CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    /// I2C error returned from the underlying I2C implementation
    I2cError(I2C::Error),
    /// No backpack answered in either the PCF8574 or the PCF8574A address range
    AddressNotFound,
    /// The display was used before `init` assigned it an address
    NotInitialized,
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<I2C> From<core::fmt::Error> for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<I2C> From<&CharacterDisplayError<I2C>> for &'static str
where
    I2C: i2c::I2c,
{
    fn from(err: &CharacterDisplayError<I2C>) -> Self {
        match err {
            CharacterDisplayError::I2cError(_) => "I2C error",
            CharacterDisplayError::AddressNotFound => "No LCD backpack found on the I2C bus",
            CharacterDisplayError::NotInitialized => "Display not initialized",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<I2C> defmt::Format for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl<I2C> ufmt::uDisplay for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<I2C> Display for CharacterDisplayError<I2C>
where
    I2C: i2c::I2c,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

/// The bus and delay collaborators used by the display.
pub(crate) struct DeviceSetupConfig<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    i2c: I2C,
    delay: DELAY,
}

pub struct CharacterDisplayPCF8574<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    config: DeviceSetupConfig<I2C, DELAY>,
    device: driver::hd44780::HD44780,
}

impl<I2C, DELAY> CharacterDisplayPCF8574<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    /// Create a new character display object. Nothing is sent on the bus until `init` is called.
    pub fn new(i2c: I2C, delay: DELAY) -> Self {
        Self {
            config: DeviceSetupConfig { i2c, delay },
            device: driver::hd44780::HD44780::default(),
        }
    }

    /// Initialize the display. This must be called before using the display.
    ///
    /// When `address` is `AUTODETECT_ADDRESS` the PCF8574 and then the PCF8574A address ranges are probed,
    /// and `CharacterDisplayError::AddressNotFound` is returned if neither has a backpack. Any other value
    /// is used as the backpack address as is. On success returns the address in use and the display is
    /// on, cleared, with the backlight on.
    pub fn init(&mut self, address: u8) -> Result<u8, CharacterDisplayError<I2C>> {
        self.device.init(&mut self.config, address)
    }

    /// returns the I2C address of the backpack, or `None` before a successful `init`
    pub fn address(&self) -> Option<u8> {
        self.device.address()
    }

    /// returns whether the backlight is currently on
    pub fn is_backlight_on(&self) -> bool {
        self.device.is_backlight_on()
    }

    /// Consumes the display and returns the I2C peripheral and delay objects.
    pub fn release(self) -> (I2C, DELAY) {
        (self.config.i2c, self.config.delay)
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Shows `text` starting at `col` on line `row`. A `row` of 0 is the first line and anything else the second.
    pub fn show_string(
        &mut self,
        text: &str,
        col: u8,
        row: u8,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.set_cursor(col, row)?.print(text)
    }

    /// Shows the decimal representation of `number` starting at `col` on line `row`.
    pub fn show_number(
        &mut self,
        number: i32,
        col: u8,
        row: u8,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        let mut text: heapless::String<MAX_NUMBER_DIGITS> = heapless::String::new();
        write!(text, "{}", number)?;
        self.show_string(&text, col, row)
    }

    /// Turn the display on.
    pub fn on(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.show_display(&mut self.config, true)?;
        Ok(self)
    }

    /// Turn the display off. The displayed text is kept and comes back with `on`.
    pub fn off(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.show_display(&mut self.config, false)?;
        Ok(self)
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.clear(&mut self.config)?;
        Ok(self)
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.home(&mut self.config)?;
        Ok(self)
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    pub fn set_cursor(
        &mut self,
        col: u8,
        row: u8,
    ) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.set_cursor(&mut self.config, col, row)?;
        Ok(self)
    }

    /// Prints a string to the LCD at the current cursor position.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.print(&mut self.config, text)?;
        Ok(self)
    }

    /// Turn the backlight on or off
    pub fn backlight(&mut self, on: bool) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.backlight(&mut self.config, on)?;
        Ok(self)
    }

    pub fn backlight_on(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.backlight(true)
    }

    pub fn backlight_off(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.backlight(false)
    }

    /// Scroll the display to the left.
    pub fn scroll_left(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.scroll_left(&mut self.config)?;
        Ok(self)
    }

    /// Scroll the display to the right.
    pub fn scroll_right(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C>> {
        self.device.scroll_right(&mut self.config)?;
        Ok(self)
    }
}

/// Implement the `core::fmt::Write` trait for the LCD backpack, allowing it to be used with the `write!` macro.
/// This is a convenience method for printing to the display at the current cursor position.
impl<I2C, DELAY> core::fmt::Write for CharacterDisplayPCF8574<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the LCD backpack, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<I2C, DELAY> ufmt::uWrite for CharacterDisplayPCF8574<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<I2C>> {
        self.print(s)?;
        Ok(())
    }

    type Error = CharacterDisplayError<I2C>;
}
