use bitfield::bitfield;

// Port layout of the PCF8574/PCF8574A backpack wired to the HD44780 4-bit interface.
// The data pins D4-D7 of the display sit on P4-P7 of the expander.
bitfield! {
    pub struct PCF8574BitField(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub rw, set_rw: 1, 1;
    pub enable, set_enable: 2, 2;
    pub backlight, set_backlight: 3, 3;
    pub data, set_data: 7, 4;
}

impl Clone for PCF8574BitField {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for PCF8574BitField {}

impl PartialEq for PCF8574BitField {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PCF8574BitField {
    /// Builds the frame carrying the high nibble of `value` with the control bits of `self`.
    /// The low nibble of `value` is discarded and the enable line is left low.
    pub fn frame(&self, value: u8) -> Self {
        let mut frame = *self;
        frame.set_data(value >> 4);
        frame.set_rw(0);
        frame.set_enable(0);
        frame
    }

    /// Returns a copy with the enable line raised.
    pub fn strobed(&self) -> Self {
        let mut strobe = *self;
        strobe.set_enable(1);
        strobe
    }
}
