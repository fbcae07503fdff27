use core::ops::Range;

use embedded_hal::i2c;

use crate::CharacterDisplayError;

/// Addresses selectable with the A0-A2 pins of a PCF8574.
pub const PCF8574_ADDRESS_RANGE: Range<u8> = 0x20..0x28;
/// Addresses selectable with the A0-A2 pins of a PCF8574A.
pub const PCF8574A_ADDRESS_RANGE: Range<u8> = 0x38..0x40;

// Probe patterns: a 32-bit all-ones word followed by a 16-bit zero word.
const PROBE_RESET_PATTERN: [u8; 4] = [0xFF; 4];
const PROBE_CLEAR_PATTERN: [u8; 2] = [0x00; 2];

// Readback signature of a freshly reset backpack. Opaque hardware heuristic, keep as is.
const PROBE_SIGNATURE_LOW_NIBBLE: u8 = 7;
const PROBE_SIGNATURE_CLEARED: u8 = 0;

/// The I2C GPIO expander family found on the backpack.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ExpanderVariant {
    /// PCF8574 or PCF8574T, addresses 0x20-0x27
    PCF8574,
    /// PCF8574A or PCF8574AT, addresses 0x38-0x3F
    PCF8574A,
}

impl ExpanderVariant {
    /// Returns the expander family owning `address`, if any.
    pub fn from_address(address: u8) -> Option<Self> {
        if PCF8574_ADDRESS_RANGE.contains(&address) {
            Some(ExpanderVariant::PCF8574)
        } else if PCF8574A_ADDRESS_RANGE.contains(&address) {
            Some(ExpanderVariant::PCF8574A)
        } else {
            None
        }
    }
}

impl From<&ExpanderVariant> for &'static str {
    fn from(variant: &ExpanderVariant) -> Self {
        match variant {
            ExpanderVariant::PCF8574 => "PCF8574",
            ExpanderVariant::PCF8574A => "PCF8574A",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ExpanderVariant {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

impl core::fmt::Display for ExpanderVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

/// Scans the PCF8574 address window and then the PCF8574A window, in ascending order, and returns
/// the first address answering with the expected idle signature. Each candidate is probed at most once.
/// A candidate that fails at the bus level (typically a NACK because nothing is there) is skipped.
pub fn resolve_address<I2C>(i2c: &mut I2C) -> Result<u8, CharacterDisplayError<I2C>>
where
    I2C: i2c::I2c,
{
    for address in PCF8574_ADDRESS_RANGE.chain(PCF8574A_ADDRESS_RANGE) {
        match check_signature(i2c, address) {
            Ok(true) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "found {} backpack at {=u8:#x}",
                    ExpanderVariant::from_address(address),
                    address
                );
                return Ok(address);
            }
            Ok(false) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("no backpack signature at {=u8:#x}", address);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("probe at {=u8:#x} failed on the bus", address);
            }
        }
    }
    #[cfg(feature = "defmt")]
    defmt::warn!("no PCF8574 or PCF8574A backpack found");
    Err(CharacterDisplayError::AddressNotFound)
}

/// Runs the two-step signature check against one address. Returns whether the readback matched.
fn check_signature<I2C>(i2c: &mut I2C, address: u8) -> Result<bool, I2C::Error>
where
    I2C: i2c::I2c,
{
    let mut data = [0];
    i2c.write(address, &PROBE_RESET_PATTERN)?;
    i2c.read(address, &mut data)?;
    let reset_readback = data[0] % 16;

    i2c.write(address, &PROBE_CLEAR_PATTERN)?;
    i2c.read(address, &mut data)?;
    let cleared_readback = data[0];

    Ok(reset_readback == PROBE_SIGNATURE_LOW_NIBBLE && cleared_readback == PROBE_SIGNATURE_CLEARED)
}
