pub mod autodetect;

use embedded_hal::{delay::DelayNs, i2c};

use crate::{bit_configurations::PCF8574BitField, CharacterDisplayError, DeviceSetupConfig};

/// Settle time after every byte written to the expander, in milliseconds.
const WRITE_SETTLE_MS: u32 = 1;

/// Adapter based on the PCF8574 or PCF8574A I2C GPIO expander interfacing with the HD44780 LCD controller
/// via a 4-bit interface. Holds the controller state that parameterizes every transfer: the resolved
/// bus address and the backlight and register select lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PCF8574Adapter {
    address: Option<u8>,
    bits: PCF8574BitField,
}

impl Default for PCF8574Adapter {
    fn default() -> Self {
        Self {
            address: None,
            bits: PCF8574BitField(0),
        }
    }
}

impl PCF8574Adapter {
    /// returns the bus address, or `None` until the display has been initialized
    pub fn address(&self) -> Option<u8> {
        self.address
    }

    pub fn set_address(&mut self, address: u8) {
        self.address = Some(address);
    }

    /// Forgets the bus address. Writes fail with `NotInitialized` until one is set again.
    pub fn clear_address(&mut self) {
        self.address = None;
    }

    pub fn backlight(&self) -> bool {
        self.bits.backlight() != 0
    }

    /// Sets the backlight line. Takes effect with the next write to the expander.
    pub fn set_backlight(&mut self, value: bool) {
        self.bits.set_backlight(value as u8);
    }

    /// Sets the RS line. A value of `false` selects the instruction register, while
    /// a value of `true` selects the data register.
    pub fn set_rs(&mut self, value: bool) {
        self.bits.set_rs(value as u8);
    }

    fn write_bits_to_gpio<I2C, DELAY>(
        &self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        bits: PCF8574BitField,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let address = self.address.ok_or(CharacterDisplayError::NotInitialized)?;
        config
            .i2c
            .write(address, &[bits.0])
            .map_err(CharacterDisplayError::I2cError)?;
        config.delay.delay_ms(WRITE_SETTLE_MS);
        Ok(())
    }

    /// Latches the high nibble of `value` into the controller. The data lines are set up with
    /// enable low, then enable is pulsed high and dropped again with the data held stable.
    /// These three writes must not be reordered or merged.
    pub fn write_nibble<I2C, DELAY>(
        &self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        value: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let frame = self.bits.frame(value);
        self.write_bits_to_gpio(config, frame)?;
        self.write_bits_to_gpio(config, frame.strobed())?;
        self.write_bits_to_gpio(config, frame)
    }

    /// writes a full byte as two nibbles, high nibble first, using the current RS setting
    fn write_byte<I2C, DELAY>(
        &self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        value: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.write_nibble(config, value)?;
        self.write_nibble(config, value << 4)
    }

    /// Writes a byte to the instruction register.
    pub fn write_command<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        command: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.set_rs(false);
        self.write_byte(config, command)
    }

    /// Writes a byte to the data register, either the CGRAM or DDRAM depending on the prior command.
    pub fn write_data<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        data: u8,
    ) -> Result<(), CharacterDisplayError<I2C>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.set_rs(true);
        self.write_byte(config, data)
    }
}
