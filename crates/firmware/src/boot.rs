//! Board bring-up for the WM8731 player (STM32H743ZI).
//!
//! Initialization order:
//!   1. Clocks: HSI → PLL1 400 MHz core, HSI48 on for the codec master clock
//!   2. Codec MCLK: HSI48 / 4 = 12 MHz on MCO1 (codec runs in USB mode)
//!   3. SD card on SPI1 at the identification clock, then the data clock
//!   4. Codec control on I2C2 at 100 kHz
//!   5. SPI2 frame port, handler slot, ring buffer
//!   6. Player sequence
//!
//! The codec needs MCLK before its first register write, and the SD card
//! must be identified below 400 kHz before the bus is sped up.
//!
//! # Pin map
//!
//! | Function            | Pins                          |
//! |---------------------|-------------------------------|
//! | Codec control I2C2  | PB10 SCL, PB11 SDA            |
//! | Codec audio SPI2    | PB12 FS, PB13 BCLK, PB14 DATA |
//! | Codec MCLK (MCO1)   | PA8                           |
//! | SD card SPI1        | PA5 SCK, PA6 MISO, PA7 MOSI   |
//! | SD card CS          | PA4                           |

/// Ordered list of boot steps, for documentation and tests.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. RCC: PLL1 400 MHz, HSI48 enabled",
    "2. MCO1: 12 MHz codec master clock from HSI48",
    "3. SPI1: SD card identified at 400 kHz, then 16 MHz",
    "4. I2C2: WM8731 control bus at 100 kHz",
    "5. SPI2: TI-frame slave transmitter, handler slot, ring buffer",
    "6. Player: mount, header, play",
];

/// SD card identification clock (SD cards require 400 kHz or less).
pub const SD_INIT_HZ: u32 = 400_000;

/// SD card data clock once the card has answered.
pub const SD_DATA_HZ: u32 = 16_000_000;

/// Codec master clock produced on MCO1.
pub const CODEC_MCLK_HZ: u32 = 12_000_000;

/// HSI48 divider giving [`CODEC_MCLK_HZ`].
pub const MCO1_HSI48_DIVIDER: u32 = 4;

/// Build the Embassy RCC configuration.
///
/// # Clock Tree
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz (SPI1/SPI2/I2C2 kernel clocks)
/// HSI48 → MCO1 / 4 = 12 MHz (codec MCLK)
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;
    // HSI48 feeds MCO1; without it the codec has no master clock.
    config.rcc.hsi48 = Some(Hsi48Config {
        sync_from_usb: false,
    });

    // ── PLL1: system clock ───────────────────────────────────────────────────
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2), // 400 MHz system clock
        divq: None,
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}
