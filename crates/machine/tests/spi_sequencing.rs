//! Integration test: bias sequencing over the Madera SPI transport.
//!
//! The codec handle is built from `bootstrap()` instead of the register mock,
//! so every clock field write must come out as the expected SPI frame:
//!
//!   1. Registration binds AIF1 to SYSCLK, then SYSCLK to FLL1
//!   2. Prepare programs the FLL reference, then its output
//!   3. Standby stops the FLL with a single reference write
//!   4. A rate the codec cannot express degrades the transition
//!
//! Run with: cargo test -p machine --test spi_sequencing

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use machine::card::{probe, BoardNode, Phandle};
use machine::{BiasOutcome, BiasSequencer, CardConfig, ClockError, CodecHandle, FllController, RegisteredCard};
use platform::mocks::{MockDelay, VirtualClock};
use platform::{bootstrap, CodecVariant, DeviceId, FllTarget, MaderaBus, PowerBiasLevel};

const DAI: DeviceId = DeviceId(1);

const NODE: BoardNode<'static> = BoardNode {
    compatible: "nvidia,tegra-audio-t186ref-mobile-rt565x",
    i2s_controller: Some(Phandle(3)),
};

type Bus = MaderaBus<SpiMock<u8>>;

/// One 16-bit register write as it appears on the bus.
fn reg_write(reg: u16, value: u16) -> [SpiTransaction<u8>; 3] {
    let [r0, r1] = reg.to_be_bytes();
    let [v0, v1] = value.to_be_bytes();
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x00, 0x00, r0, r1, 0x00, 0x00, v0, v1]),
        SpiTransaction::transaction_end(),
    ]
}

fn script(writes: &[(u16, u16)]) -> Vec<SpiTransaction<u8>> {
    writes.iter().flat_map(|&(reg, value)| reg_write(reg, value)).collect()
}

fn codec(spi: &SpiMock<u8>) -> CodecHandle<Bus> {
    let bus = bootstrap(spi.clone(), CodecVariant::Cs47l35).unwrap();
    let clocks = bus.clocks();
    CodecHandle::new(bus, clocks)
}

#[tokio::test]
async fn registered_card_drives_fll_over_spi() {
    let expectations = script(&[
        (0x0503, 0x0048), // AIF1 <- SYSCLK
        (0x0101, 0x0644), // SYSCLK <- FLL1 at 98.304 MHz
        (0x0176, 0x0240), // FLL1 reference <- MCLK1 at 12.288 MHz
        (0x0172, 0x0640), // FLL1 output 98.304 MHz
        (0x0176, 0x0000), // FLL1 stopped
    ]);
    let mut spi = SpiMock::new(&expectations);
    let delay = MockDelay::new(VirtualClock::new());

    let card: RegisteredCard<NoopRawMutex, Bus, MockDelay> = probe(Some(&NODE))
        .unwrap()
        .register(DAI, codec(&spi), delay.clone(), &CardConfig::default())
        .await
        .unwrap();
    let seq = card.sequencer();

    assert_eq!(
        seq.pre_bias_change(DAI, PowerBiasLevel::Prepare).await,
        BiasOutcome::FllEnabled
    );
    seq.post_bias_change(DAI, PowerBiasLevel::Prepare).await;
    assert_eq!(delay.total_us(), 1_000);

    seq.pre_bias_change(DAI, PowerBiasLevel::Standby).await;
    assert_eq!(
        seq.post_bias_change(DAI, PowerBiasLevel::Standby).await,
        BiasOutcome::FllDisabled
    );
    // Already stopped: no further frame.
    seq.post_bias_change(DAI, PowerBiasLevel::Off).await;

    spi.done();
}

#[tokio::test]
async fn unencodable_output_rate_degrades_without_settling() {
    // 44.1 kHz family rate has no SYSCLK code; only the reference write goes out.
    let expectations = script(&[(0x0176, 0x0240)]);
    let mut spi = SpiMock::new(&expectations);
    let delay = MockDelay::new(VirtualClock::new());
    let clocks = bootstrap(spi.clone(), CodecVariant::Cs47l35).unwrap().clocks();
    let fll = FllController::new(clocks, delay.clone(), 1_000);
    let target = FllTarget::from_mclk(12_288_000, 90_316_800);
    let seq: BiasSequencer<NoopRawMutex, Bus, MockDelay> =
        BiasSequencer::new(DAI, target, codec(&spi), fll);

    assert_eq!(
        seq.pre_bias_change(DAI, PowerBiasLevel::Prepare).await,
        BiasOutcome::Degraded(ClockError::RejectedByHardware)
    );
    assert!(!seq.state().await.fll_active);
    assert_eq!(delay.total_us(), 0);

    spi.done();
}
