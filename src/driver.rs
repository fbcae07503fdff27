// Driver support for the HD44780 controller behind a PCF8574 family I2C backpack.
pub mod hd44780;
