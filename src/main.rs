//! uBITX Transceiver Main Application
//!
//! Entry point for the STM32-based uBITX control firmware.
//! Initializes hardware, spawns the encoder and heartbeat tasks and runs
//! the radio control loop.

#![no_std]
#![no_main]

use defmt::{error, info, unwrap};
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_stm32::adc::Adc;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::Channel;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Duration, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ubitx_firmware::drivers::encoder::{PulseCounter, QuadratureDecoder};
use ubitx_firmware::drivers::si5351::{CrystalLoad, Si5351};
use ubitx_firmware::hal::adc::KeyerAdc;
use ubitx_firmware::hal::board::{ControlPanel, RigBoard};
use ubitx_firmware::hal::gpio::{FunctionButton, PttInput, RigLines, StatusLed};
use ubitx_firmware::hal::pwm::Sidetone;
use ubitx_firmware::hal::uart::CatUart;
use ubitx_firmware::prelude::*;
use ubitx_firmware::radio::settings::{self, MemoryStore, Settings};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<peripherals::USART1>;
});

/// Encoder pulses, written by the encoder task and drained by the loop
static PULSES: PulseCounter = PulseCounter::new();

static CAT_TX_BUF: StaticCell<[u8; CAT_RX_BUFFER_SIZE]> = StaticCell::new();
static CAT_RX_BUF: StaticCell<[u8; CAT_RX_BUFFER_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("uBITX firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    info!("Peripherals initialized");

    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));

    // PB8 = SCL, PB9 = SDA
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let mut synth = Si5351::new(i2c);
    if synth.init(CrystalLoad::default()).is_err() {
        error!("si5351: init failed");
    }

    let lines = RigLines::new(
        Output::new(p.PB0, Level::Low, Speed::Low),
        Output::new(p.PB1, Level::Low, Speed::Low),
        Output::new(p.PC0, Level::Low, Speed::Low),
        Output::new(p.PC1, Level::Low, Speed::Low),
        Output::new(p.PC2, Level::Low, Speed::Low),
    );

    let pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new_ch1(p.PA6, OutputType::PushPull)),
        None,
        None,
        None,
        Hertz(defaults::CW_SIDE_TONE),
        Default::default(),
    );
    let sidetone = Sidetone::new(pwm, Channel::Ch1);

    let rig = RigBoard::new(synth, lines, sidetone);

    let button = FunctionButton::new(Input::new(p.PA2, Pull::Up));

    // No EEPROM on this board: settings live in RAM from factory values
    let mut store = MemoryStore::with_settings(Settings::factory());
    if button.is_held() {
        settings::factory_reset(&mut store);
        error!("button held at power-up, settings reset; halting");
        loop {
            Timer::after(Duration::from_secs(1)).await;
        }
    }
    let transceiver = match Transceiver::from_store(rig, store) {
        Ok(transceiver) => transceiver,
        Err(err) => {
            error!("settings unusable ({}), defaults restored; halting", err);
            loop {
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    };

    let mut uart_config = usart::Config::default();
    uart_config.baudrate = CAT_BAUD_RATE;
    let uart = match BufferedUart::new(
        p.USART1,
        Irqs,
        p.PA10,
        p.PA9,
        CAT_TX_BUF.init([0; CAT_RX_BUFFER_SIZE]),
        CAT_RX_BUF.init([0; CAT_RX_BUFFER_SIZE]),
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(_) => {
            error!("CAT: UART config rejected; halting");
            loop {
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    };

    let mut panel = ControlPanel::new(
        CatUart::new(uart),
        KeyerAdc::new(Adc::new(p.ADC2), p.PA4),
        PttInput::new(Input::new(p.PA3, Pull::Up)),
        button,
    );

    let enc_a = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let enc_b = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up);

    // Spawn background tasks
    unwrap!(spawner.spawn(heartbeat_task(led)));
    unwrap!(spawner.spawn(encoder_task(enc_a, enc_b)));

    info!("Tasks spawned, entering control loop");

    let mut radio = Radio::new(transceiver);
    let mut menu = QuickMenu::new();
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_PERIOD_MS));
    while radio.mode() != AppMode::Halted {
        panel.poll();
        radio.tick(&mut panel, &mut menu, &PULSES);
        ticker.next().await;
    }
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Encoder task - decodes every edge into the shared pulse counter
#[embassy_executor::task]
async fn encoder_task(mut a: ExtiInput<'static>, mut b: ExtiInput<'static>) {
    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());
    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        if let Some(direction) = decoder.update(a.is_high(), b.is_high()) {
            PULSES.record(direction);
        }
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: StatusLed<'static>) {
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}
