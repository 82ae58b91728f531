//! WM8731 register map
//!
//! Source: Cirrus Logic (Wolfson) WM8731 / WM8731L Datasheet, Rev 4.9
//!
//! # Control interface
//!
//! Registers are write-only and 9 bits wide. Each command is a single
//! two-byte I²C write:
//!
//! ```text
//! byte 0: [ A6 A5 A4 A3 A2 A1 A0 | D8 ]
//! byte 1: [ D7 D6 D5 D4 D3 D2 D1 D0 ]
//! ```
//!
//! There is no read-back. The driver tracks state on its own.

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Left line input volume, mute, simultaneous load
pub const REG_LEFT_LINE_IN: u8 = 0x00;

/// Right line input volume, mute, simultaneous load
pub const REG_RIGHT_LINE_IN: u8 = 0x01;

/// Left headphone output volume, zero-cross, simultaneous load
pub const REG_LEFT_HP_OUT: u8 = 0x02;

/// Right headphone output volume, zero-cross, simultaneous load
pub const REG_RIGHT_HP_OUT: u8 = 0x03;

/// Analogue audio path: DAC select, bypass, mic
pub const REG_ANALOG_PATH: u8 = 0x04;

/// Digital audio path: de-emphasis, DAC soft mute, ADC high-pass
pub const REG_DIGITAL_PATH: u8 = 0x05;

/// Power-down control (1 = powered down)
pub const REG_POWER_DOWN: u8 = 0x06;

/// Digital audio interface format
pub const REG_DIGITAL_IF: u8 = 0x07;

/// Sampling control: USB/normal mode, BOSR, SR\[3:0\]
pub const REG_SAMPLING: u8 = 0x08;

/// Active control: bit 0 enables the digital audio interface
pub const REG_ACTIVE: u8 = 0x09;

/// Writing any value resets every register to its default
pub const REG_RESET: u8 = 0x0F;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Line inputs muted, both channels loaded together (LRINBOTH | LINMUTE)
pub const LINE_IN_MUTED_BOTH: u16 = 0x180;

/// Headphone power-on value (0xF0 ≈ -9 dB)
pub const HP_OUT_DEFAULT: u16 = 0x0F0;

/// DAC selected, bypass and sidetone off, mic muted
pub const ANALOG_DAC_SELECT: u16 = 0x0D0;

/// De-emphasis off, DAC soft mute off, ADC high-pass disabled
pub const DIGITAL_PATH_DEFAULT: u16 = 0x006;

/// Everything powered up
pub const POWER_ALL_ON: u16 = 0x000;

/// Master mode (MS, bit 6): the codec drives BCLK and the frame sync.
/// 16-bit words, DSP mode A (LRP clear), one stereo word per frame sync.
pub const DIGITAL_IF_DSP_16BIT: u16 = 0x043;

/// USB mode (12 MHz MCLK), 44.1 kHz
pub const SAMPLING_USB_44K1: u16 = 0x023;

/// Digital audio interface enabled
pub const ACTIVE_ON: u16 = 0x001;

/// Digital audio interface disabled
pub const ACTIVE_OFF: u16 = 0x000;

/// Value written to [`REG_RESET`]
pub const RESET_VALUE: u16 = 0x000;

/// Mask for the 9-bit register payload
pub const VALUE_MASK: u16 = 0x1FF;

/// Configuration written after the reset command, in order.
pub const INIT_SEQUENCE: [(u8, u16); 9] = [
    (REG_LEFT_LINE_IN, LINE_IN_MUTED_BOTH),
    (REG_RIGHT_LINE_IN, LINE_IN_MUTED_BOTH),
    (REG_LEFT_HP_OUT, HP_OUT_DEFAULT),
    (REG_RIGHT_HP_OUT, HP_OUT_DEFAULT),
    (REG_ANALOG_PATH, ANALOG_DAC_SELECT),
    (REG_DIGITAL_PATH, DIGITAL_PATH_DEFAULT),
    (REG_POWER_DOWN, POWER_ALL_ON),
    (REG_DIGITAL_IF, DIGITAL_IF_DSP_16BIT),
    (REG_SAMPLING, SAMPLING_USB_44K1),
];

/// Two-byte control word for `reg` ← `value`.
///
/// Bit 8 of `value` rides in the low bit of the first byte; bits above 8 are
/// dropped.
pub const fn command_bytes(reg: u8, value: u16) -> [u8; 2] {
    let [d8, low] = (value & VALUE_MASK).to_be_bytes();
    [reg.wrapping_shl(1) | d8, low]
}
