//! WM8731 control-bus driver
//!
//! Speaks the codec's write-only register protocol over any
//! `embedded_hal_async::i2c::I2c`. Sample data never passes through here; it
//! reaches the codec on the serial audio bus driven by the frame interrupt.
//!
//! # I²C Address
//!
//! | CSB pin | 7-bit | 8-bit write |
//! |---------|-------|-------------|
//! | GND     | `0x1A`| `0x34`      |
//! | VDD     | `0x1B`| `0x36`      |

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use platform::config::CODEC_I2C_ADDR;
use platform::{AudioCodec, CodecState, HeadphoneVolume, VolumeLevel};

use super::registers::*;

/// Settling time after power-up before the first command.
const POWER_UP_DELAY_MS: u32 = 100;
/// Settling time after the configuration table.
const CONFIG_SETTLE_MS: u32 = 10;

/// WM8731 codec driver
pub struct Wm8731<I, D> {
    i2c: I,
    delay: D,
    state: CodecState,
}

impl<I: I2c, D: DelayNs> Wm8731<I, D> {
    /// Create a driver for a codec with CSB tied low.
    ///
    /// Nothing is sent until [`AudioCodec::init`].
    pub fn new(i2c: I, delay: D) -> Self {
        Self { i2c, delay, state: CodecState::Reset }
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Write one 9-bit register.
    async fn write_reg(&mut self, reg: u8, value: u16) -> Result<(), I::Error> {
        self.i2c.write(CODEC_I2C_ADDR, &command_bytes(reg, value)).await
    }
}

impl<I: I2c, D: DelayNs> AudioCodec for Wm8731<I, D> {
    type Error = I::Error;

    async fn init(&mut self) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("Initialising WM8731 codec");

        self.delay.delay_ms(POWER_UP_DELAY_MS).await;
        self.write_reg(REG_RESET, RESET_VALUE).await?;
        self.state = CodecState::Reset;
        for (reg, value) in INIT_SEQUENCE {
            self.write_reg(reg, value).await?;
        }
        self.delay.delay_ms(CONFIG_SETTLE_MS).await;
        self.state = CodecState::Configured;

        #[cfg(feature = "defmt")]
        defmt::info!("WM8731 configured");
        Ok(())
    }

    async fn activate(&mut self) -> Result<(), Self::Error> {
        self.write_reg(REG_ACTIVE, ACTIVE_ON).await?;
        self.state = CodecState::Active;
        Ok(())
    }

    async fn deactivate(&mut self) -> Result<(), Self::Error> {
        self.write_reg(REG_ACTIVE, ACTIVE_OFF).await?;
        if self.state == CodecState::Active {
            self.state = CodecState::Configured;
        }
        Ok(())
    }

    async fn set_volume(&mut self, left: u8, right: u8) -> Result<(), Self::Error> {
        let left = HeadphoneVolume::from_level(VolumeLevel::new(left));
        let right = HeadphoneVolume::from_level(VolumeLevel::new(right));
        self.write_reg(REG_LEFT_HP_OUT, left.get()).await?;
        self.write_reg(REG_RIGHT_HP_OUT, right.get()).await
    }

    fn state(&self) -> CodecState {
        self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
