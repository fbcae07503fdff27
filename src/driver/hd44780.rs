// HD44780 Support
// This module provides the display operations for an HD44780 LCD1602 wired in 4-bit mode behind a
// PCF8574 or PCF8574A backpack. `HD44780` translates the display operations into controller commands,
// and the `PCF8574Adapter` it owns turns each command or character into strobed nibble frames
// on the expander.
//

pub mod adapter;

use embedded_hal::{delay::DelayNs, i2c};

use crate::{
    driver::hd44780::adapter::{autodetect::resolve_address, PCF8574Adapter},
    CharacterDisplayError, DeviceSetupConfig, AUTODETECT_ADDRESS,
};

// commands
const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
const LCD_CMD_CURSORSHIFT: u8 = 0x10; //  Lets you move the cursor
const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display
const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM)
const LCD_CMD_NOOP: u8 = 0x00; //  Does nothing, used to push the backlight bit out

// flags for display entry mode
const LCD_FLAG_ENTRYLEFT: u8 = 0x02; //  Uset to set text to flow from left to right
const LCD_FLAG_ENTRYSHIFTDECREMENT: u8 = 0x00; //  Used to 'left justify' text from the cursor

// flags for display on/off control
const LCD_FLAG_DISPLAYON: u8 = 0x04; //  Turns the display on
const LCD_FLAG_DISPLAYOFF: u8 = 0x00; //  Turns the display off
const LCD_FLAG_CURSOROFF: u8 = 0x00; //  Turns the cursor off
const LCD_FLAG_BLINKOFF: u8 = 0x00; //  Turns off the blinking cursor

// flags for display/cursor shift
const LCD_FLAG_DISPLAYMOVE: u8 = 0x08; //  Flag for moving the display
const LCD_FLAG_MOVERIGHT: u8 = 0x04; //  Flag for moving right
const LCD_FLAG_MOVELEFT: u8 = 0x00; //  Flag for moving left

// flags for function set
const LCD_FLAG_8BITMODE: u8 = 0x10; //  LCD 8 bit mode
const LCD_FLAG_4BITMODE: u8 = 0x00; //  LCD 4 bit mode
const LCD_FLAG_2LINE: u8 = 0x08; //  LCD 2 line mode
const LCD_FLAG_5x8_DOTS: u8 = 0x00; //  8 pixel high font mode

// two 8-bit mode function set nibbles packed in one byte, 0x33
const LCD_CMD_FUNCTIONSET_8BIT_TWICE: u8 =
    (LCD_CMD_FUNCTIONSET | LCD_FLAG_8BITMODE) | ((LCD_CMD_FUNCTIONSET | LCD_FLAG_8BITMODE) >> 4);

// DDRAM offset of the second line
const LCD_ROW1_OFFSET: u8 = 0x40;

/// Wait after each step of the 4-bit mode bring-up, in milliseconds.
const INIT_STEP_DELAY_MS: u32 = 5;

#[derive(Default)]
pub struct HD44780 {
    adapter: PCF8574Adapter,
}

impl HD44780 {
    /// returns the resolved I2C address, or `None` before `init`
    pub fn address(&self) -> Option<u8> {
        self.adapter.address()
    }

    pub fn is_backlight_on(&self) -> bool {
        self.adapter.backlight()
    }

    /// Resolves the bus address and runs the HD44780 reset procedure for 4-bit operation.
    /// Returns the address in use. Any previously resolved address is dropped first, so a
    /// failed autodetection leaves the display uninitialized.
    pub fn init<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        address: u8,
    ) -> Result<u8, CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.adapter.clear_address();
        let address = if address == AUTODETECT_ADDRESS {
            resolve_address(&mut config.i2c)?
        } else {
            address
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("initializing LCD1602 at {=u8:#x}", address);

        self.adapter.set_address(address);
        self.adapter.set_backlight(true);
        self.adapter.set_rs(false);

        // The controller may power up in 8-bit mode or mid-way through a 4-bit transfer. Sending
        // function set with 8-bit mode repeatedly resynchronizes it before 4-bit mode is selected.
        self.send_command(config, LCD_CMD_FUNCTIONSET_8BIT_TWICE)?;
        config.delay.delay_ms(INIT_STEP_DELAY_MS);
        self.adapter
            .write_nibble(config, LCD_CMD_FUNCTIONSET | LCD_FLAG_8BITMODE)?;
        config.delay.delay_ms(INIT_STEP_DELAY_MS);
        self.adapter
            .write_nibble(config, LCD_CMD_FUNCTIONSET | LCD_FLAG_4BITMODE)?;
        config.delay.delay_ms(INIT_STEP_DELAY_MS);

        // now in 4-bit mode, every command is a full byte
        self.send_command(
            config,
            LCD_CMD_FUNCTIONSET | LCD_FLAG_4BITMODE | LCD_FLAG_2LINE | LCD_FLAG_5x8_DOTS,
        )?;
        self.send_command(
            config,
            LCD_CMD_DISPLAYCONTROL | LCD_FLAG_DISPLAYON | LCD_FLAG_CURSOROFF | LCD_FLAG_BLINKOFF,
        )?;
        self.send_command(
            config,
            LCD_CMD_ENTRYMODESET | LCD_FLAG_ENTRYLEFT | LCD_FLAG_ENTRYSHIFTDECREMENT,
        )?;
        self.send_command(config, LCD_CMD_CLEARDISPLAY)?;

        Ok(address)
    }

    fn send_command<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        command: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.adapter.write_command(config, command)
    }

    pub fn clear<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.send_command(config, LCD_CMD_CLEARDISPLAY)
    }

    pub fn home<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.send_command(config, LCD_CMD_RETURNHOME)
    }

    /// Moves the cursor to `col` on the first line when `row` is 0, or on the second line otherwise.
    /// Neither value is range checked.
    pub fn set_cursor<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        col: u8,
        row: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let line_base = if row > 0 {
            LCD_CMD_SETDDRAMADDR | LCD_ROW1_OFFSET
        } else {
            LCD_CMD_SETDDRAMADDR
        };
        self.send_command(config, line_base.wrapping_add(col))
    }

    /// Turns the display on (cursor and blink off) or off. Display data is retained while off.
    pub fn show_display<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        show_display: bool,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let control = if show_display {
            LCD_FLAG_DISPLAYON | LCD_FLAG_CURSOROFF | LCD_FLAG_BLINKOFF
        } else {
            LCD_FLAG_DISPLAYOFF
        };
        self.send_command(config, LCD_CMD_DISPLAYCONTROL | control)
    }

    pub fn scroll_left<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.send_command(
            config,
            LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | LCD_FLAG_MOVELEFT,
        )
    }

    pub fn scroll_right<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.send_command(
            config,
            LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | LCD_FLAG_MOVERIGHT,
        )
    }

    /// Writes `text` at the current cursor position, one data byte per UTF-16 code unit.
    /// Only the low byte of each unit reaches the controller, so a character outside the
    /// basic multilingual plane is sent as the low bytes of its two surrogates.
    pub fn print<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        text: &str,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        for unit in text.encode_utf16() {
            self.adapter.write_data(config, unit as u8)?;
        }
        Ok(())
    }

    /// Sets the backlight and pushes it out immediately with a no-op command, since the
    /// backlight line shares the expander port with the command data. The backlight flag is
    /// left untouched when the display has not been initialized.
    pub fn backlight<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        on: bool,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        if self.adapter.address().is_none() {
            return Err(CharacterDisplayError::NotInitialized);
        }
        self.adapter.set_backlight(on);
        self.send_command(config, LCD_CMD_NOOP)
    }
}
