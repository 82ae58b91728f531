//! SPI2 as a frame-synchronised slave transmitter (STM32H743)
//!
//! The WM8731 runs its digital audio interface as master in DSP mode: it
//! drives BCLK into SPI2_SCK and the frame sync into SPI2_NSS. SPI2 is set up
//! as a TI-frame slave transmitter with 32-bit data, so each frame sync
//! shifts out one word MSB first (left sample, then right).
//!
//! | Signal   | Pin  | AF  |
//! |----------|------|-----|
//! | BCLK     | PB13 | AF5 |
//! | LRC/FS   | PB12 | AF5 |
//! | DACDAT   | PB14 | AF5 |
//!
//! TXP ("TX FIFO has room") raises the SPI2 interrupt; the ISR hands it to
//! whatever [`FrameEmitter`] is parked in [`FRAME_SLOT`].

use core::cell::RefCell;

use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::Moder;
use embassy_stm32::pac::spi::vals::{Comm, Master, Sp};
use embassy_stm32::peripherals::{PB12, PB13, PB14, SPI2};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::config::RING_CAPACITY;
use platform::{FrameHandler, FrameIrq, FramePort};
use playback::FrameEmitter;

/// Emitter type serviced by the SPI2 interrupt.
pub type Spi2Emitter = FrameEmitter<'static, Spi2FramePort, RING_CAPACITY>;

/// Handler slot read by the SPI2 interrupt.
pub static FRAME_SLOT: Mutex<CriticalSectionRawMutex, RefCell<Option<Spi2Emitter>>> =
    Mutex::new(RefCell::new(None));

/// SPI2 data-size field for 32-bit frames (DSIZE = bits - 1).
const DSIZE_32: u8 = 31;
/// GPIOB pins used by the port: (pin, AFR register, AFR field).
const PINS: [(usize, usize, usize); 3] = [(12, 1, 4), (13, 1, 5), (14, 1, 6)];
/// SPI2 alternate function on GPIOB.
const AF_SPI2: u8 = 5;

/// Register-level handle on SPI2 in slave TX mode.
///
/// Holds the peripheral and pins so nothing else can claim them.
pub struct Spi2FramePort {
    _spi: SPI2,
    _pins: (PB12, PB13, PB14),
}

impl Spi2FramePort {
    /// Claim SPI2 and its pins and configure the TI-frame slave transmitter.
    ///
    /// The port stays disabled until [`Spi2FrameIrq::attach`].
    pub fn new(spi: SPI2, fs: PB12, sck: PB13, sd: PB14) -> Self {
        pac::RCC.apb1lenr().modify(|w| w.set_spi2en(true));

        for (pin, afr, field) in PINS {
            pac::GPIOB.moder().modify(|w| w.set_moder(pin, Moder::ALTERNATE));
            pac::GPIOB.afr(afr).modify(|w| w.set_afr(field, AF_SPI2));
        }

        let regs = pac::SPI2;
        regs.cr1().modify(|w| w.set_spe(false));
        // FIFO threshold left at one data frame: TXP fires per word.
        regs.cfg1().modify(|w| w.set_dsize(DSIZE_32));
        regs.cfg2().modify(|w| {
            w.set_master(Master::SLAVE);
            w.set_sp(Sp::TI);
            w.set_comm(Comm::TRANSMITTER);
            w.set_lsbfrst(false);
        });

        Self { _spi: spi, _pins: (fs, sck, sd) }
    }

    fn enable(&self) {
        let regs = pac::SPI2;
        // Preload one silent word so the first frame does not underrun.
        regs.cr1().modify(|w| w.set_spe(true));
        regs.txdr32().write_value(0);
        regs.ier().modify(|w| w.set_txpie(true));
    }

    fn disable(&self) {
        let regs = pac::SPI2;
        regs.ier().modify(|w| w.set_txpie(false));
        regs.cr1().modify(|w| w.set_spe(false));
    }
}

impl FramePort for Spi2FramePort {
    fn frame_requested(&self) -> bool {
        pac::SPI2.sr().read().txp()
    }

    fn acknowledge(&mut self) {
        // TXP clears itself on the TXDR write; only a stale underrun needs clearing.
        pac::SPI2.ifcr().write(|w| w.set_udrc(true));
    }

    fn write_word(&mut self, word: u32) {
        pac::SPI2.txdr32().write_value(word);
    }
}

/// [`FrameIrq`] over the SPI2 interrupt line and [`FRAME_SLOT`].
pub struct Spi2FrameIrq {
    _private: (),
}

impl Spi2FrameIrq {
    /// Take the SPI2 interrupt line. Only one instance may exist.
    pub fn new() -> Self {
        interrupt::SPI2.set_priority(Priority::P1);
        Self { _private: () }
    }
}

impl FrameIrq<Spi2Emitter> for Spi2FrameIrq {
    fn attach(&mut self, handler: Spi2Emitter) {
        FRAME_SLOT.lock(|slot| {
            let mut slot = slot.borrow_mut();
            let handler = slot.insert(handler);
            handler.port().enable();
        });
        interrupt::SPI2.unpend();
        // SAFETY: the handler slot is populated and the ISR only touches it
        // through the critical-section mutex.
        unsafe { interrupt::SPI2.enable() };
    }

    fn detach(&mut self) -> Option<Spi2Emitter> {
        interrupt::SPI2.disable();
        FRAME_SLOT.lock(|slot| {
            let handler = slot.borrow_mut().take();
            if let Some(h) = handler.as_ref() {
                h.port().disable();
            }
            handler
        })
    }
}

#[interrupt]
fn SPI2() {
    FRAME_SLOT.lock(|slot| {
        if let Some(handler) = slot.borrow_mut().as_mut() {
            handler.on_frame();
        }
    });
}
