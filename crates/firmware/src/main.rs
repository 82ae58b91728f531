//! WM8731 WAV player - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI. Plays `SOUND.WAV` from the SD
//! card once, then idles.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::rcc::{Mco, Mco1Source, McoPrescaler};
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use static_cell::ConstStaticCell;

use firmware::audio::codec::wm8731::Wm8731;
use firmware::audio::frame_port::{Spi2FrameIrq, Spi2FramePort};
use firmware::boot::{SD_DATA_HZ, SD_INIT_HZ};
use firmware::player::{Player, PlayerConfig};
use firmware::ui::LogStatus;
use platform::config::{APP_NAME, APP_VERSION, CONTROL_BUS_HZ, RING_CAPACITY};
use platform::storage_sdmmc::{FixedTimeSource, SdmmcStorage};
use playback::{Pipeline, RingBuffer};

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    I2C2_EV => i2c::EventInterruptHandler<peripherals::I2C2>;
    I2C2_ER => i2c::ErrorInterruptHandler<peripherals::I2C2>;
});

/// Ring shared between the feeder and the SPI2 interrupt.
static RING: ConstStaticCell<RingBuffer<RING_CAPACITY>> = ConstStaticCell::new(RingBuffer::new());

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("{=str} v{=str}", APP_NAME, APP_VERSION);
    let p = embassy_stm32::init(firmware::boot::build_embassy_config());

    // Codec master clock: must run before the first control write.
    let _mclk = Mco::new(p.MCO1, p.PA8, Mco1Source::HSI48, McoPrescaler::DIV4);

    // ── SD card (SPI1, blocking) ─────────────────────────────────────────────
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = Hertz(SD_INIT_HZ);
    let sd_bus = Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config);
    let sd_cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
    let sd_spi = match ExclusiveDevice::new(sd_bus, sd_cs, Delay) {
        Ok(dev) => dev,
        Err(never) => match never {},
    };
    let card = SdCard::new(sd_spi, Delay);
    match card.num_bytes() {
        Ok(bytes) => {
            defmt::info!("SD card: {=u64} bytes", bytes);
            let mut fast = SpiConfig::default();
            fast.frequency = Hertz(SD_DATA_HZ);
            if card.spi(|dev| dev.bus_mut().set_config(&fast)).is_err() {
                defmt::warn!("SD clock unchanged at {=u32} Hz", SD_INIT_HZ);
            }
        }
        // Mount will fail too; the player reports it.
        Err(e) => defmt::warn!("SD card not answering: {}", defmt::Debug2Format(&e)),
    }
    let storage = SdmmcStorage::new(card, FixedTimeSource);

    // ── Codec control (I2C2) ─────────────────────────────────────────────────
    let i2c = I2c::new(
        p.I2C2,
        p.PB10,
        p.PB11,
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        Hertz(CONTROL_BUS_HZ),
        Default::default(),
    );
    let codec = Wm8731::new(i2c, Delay);

    // ── Audio frame port (SPI2) ──────────────────────────────────────────────
    let port = Spi2FramePort::new(p.SPI2, p.PB12, p.PB13, p.PB14);
    let mut irq = Spi2FrameIrq::new();
    let mut pipeline = Pipeline::new(RING.take(), port);

    let mut player = Player::new(storage, codec, LogStatus, PlayerConfig::default());
    let outcome = player.run(&mut pipeline, &mut irq).await;
    defmt::info!("run finished: {} (status {=u8})", outcome, outcome.code());

    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}

/// Report the stacked frame over RTT, then halt.
#[cortex_m_rt::exception]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!("HardFault: pc={=u32:#010x} lr={=u32:#010x}", ef.pc(), ef.lr());
}
