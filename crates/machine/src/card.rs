//! Sound card description, probe and registration
//!
//! The card is one CS47L35 codec on a Tegra I2S controller, with the codec
//! as bit- and frame-clock master and a headphone output. The static data
//! here is what the audio framework needs to build the routing graph; the
//! only logic is in [`probe`] and [`BoundCard::register`].
//!
//! Registration order matters: the DAI clock must be attached to SYSCLK and
//! SYSCLK to the FLL before any bias transition can enable the FLL. If that
//! bind fails no sequencer is built, so nothing can touch the FLL afterwards.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use platform::{DeviceId, RegisterInterface};

use crate::bias::BiasSequencer;
use crate::clock::{bind_system_clock, CodecHandle, FllController};
use crate::config::CardConfig;
use crate::error::CardError;

/// Serial audio protocol of a DAI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DaiProtocol {
    /// Philips I2S
    I2s,
    /// Left justified
    LeftJustified,
    /// DSP mode A
    DspA,
}

/// Bit and frame clock polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockInversion {
    /// Normal bit clock, normal frame clock
    NormalBitNormalFrame,
    /// Inverted bit clock, normal frame clock
    InvertedBitNormalFrame,
}

/// Which side drives the bit and frame clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockProvider {
    /// Codec is bit- and frame-clock master
    CodecMaster,
    /// CPU side is bit- and frame-clock master
    CpuMaster,
}

/// Wire format of a DAI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFormat {
    /// Serial protocol
    pub protocol: DaiProtocol,
    /// Clock polarity
    pub inversion: ClockInversion,
    /// Clock master
    pub provider: ClockProvider,
}

/// One CPU ↔ codec audio link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaiLink {
    /// Link name
    pub name: &'static str,
    /// PCM stream name
    pub stream_name: &'static str,
    /// Codec-side DAI
    pub codec_dai_name: &'static str,
    /// Codec component
    pub codec_name: &'static str,
    /// Wire format
    pub format: DaiFormat,
}

/// Kind of a board-level routing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    /// Speaker / headphone output
    Speaker,
    /// Microphone input
    Microphone,
}

/// Board-level routing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    /// Endpoint kind
    pub kind: WidgetKind,
    /// Endpoint name
    pub name: &'static str,
}

/// Audio route `sink <- source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Destination widget
    pub sink: &'static str,
    /// Source pin or widget
    pub source: &'static str,
}

/// Static description of a sound card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardDescription {
    /// Card name
    pub name: &'static str,
    /// Driver name
    pub driver_name: &'static str,
    /// Board node compatible string this card binds to
    pub compatible: &'static str,
    /// Audio links
    pub dai_links: &'static [DaiLink],
    /// Board widgets
    pub widgets: &'static [Widget],
    /// Board routes
    pub routes: &'static [Route],
}

/// The Tegra + CS47L35 card.
pub static TEGRA_CIRRUS_CARD: CardDescription = CardDescription {
    name: "tegra-Cirrus",
    driver_name: "tegraCirrus",
    compatible: "nvidia,tegra-audio-t186ref-mobile-rt565x",
    dai_links: &[DaiLink {
        name: "CS47L35",
        stream_name: "CS47L35 AiFi",
        codec_dai_name: "cs47l35-aif1",
        codec_name: "cs47l35-codec",
        format: DaiFormat {
            protocol: DaiProtocol::I2s,
            inversion: ClockInversion::NormalBitNormalFrame,
            provider: ClockProvider::CodecMaster,
        },
    }],
    widgets: &[Widget {
        kind: WidgetKind::Speaker,
        name: "Headphone",
    }],
    routes: &[
        Route {
            sink: "Headphone",
            source: "HPOUTL",
        },
        Route {
            sink: "Headphone",
            source: "HPOUTR",
        },
    ],
};

/// Board-description reference to another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phandle(pub u32);

/// The card's board-description node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardNode<'a> {
    /// Node compatible string
    pub compatible: &'a str,
    /// `i2s-controller` property
    pub i2s_controller: Option<Phandle>,
}

/// Card matched to a board node, CPU side of the link bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundCard {
    description: &'static CardDescription,
    i2s_controller: Phandle,
}

/// Match `node` against [`TEGRA_CIRRUS_CARD`] and bind the CPU side of its
/// DAI link to the node's I2S controller.
///
/// # Errors
/// - [`CardError::NoDevice`] if there is no node or it is for another card.
/// - [`CardError::MissingI2sController`] if the node lacks `i2s-controller`.
pub fn probe(node: Option<&BoardNode<'_>>) -> Result<BoundCard, CardError> {
    let node = node.ok_or(CardError::NoDevice)?;
    if node.compatible != TEGRA_CIRRUS_CARD.compatible {
        return Err(CardError::NoDevice);
    }
    let i2s_controller = node.i2s_controller.ok_or_else(|| {
        error!("Property 'i2s-controller' missing or invalid");
        CardError::MissingI2sController
    })?;
    Ok(BoundCard {
        description: &TEGRA_CIRRUS_CARD,
        i2s_controller,
    })
}

impl BoundCard {
    /// Static card data.
    pub fn description(&self) -> &'static CardDescription {
        self.description
    }

    /// I2S controller feeding the CPU side of the link.
    pub fn i2s_controller(&self) -> Phandle {
        self.i2s_controller
    }

    /// Register the card: validate `config`, bind the codec clocks, then
    /// build the bias sequencer for the codec DAI `dai`.
    ///
    /// # Errors
    /// - [`CardError::Config`] if `config` is invalid; nothing is written.
    /// - [`CardError::ClockBind`] if the system clock bind fails.
    pub async fn register<M, R, D>(
        self,
        dai: DeviceId,
        mut codec: CodecHandle<R>,
        delay: D,
        config: &CardConfig,
    ) -> Result<RegisteredCard<M, R, D>, CardError>
    where
        M: RawMutex,
        R: RegisterInterface,
        D: DelayNs,
    {
        config.validate()?;
        bind_system_clock(&mut codec, config.sysclk_hz)
            .await
            .map_err(CardError::ClockBind)?;

        let fll = FllController::new(codec.clocks, delay, config.settle_us);
        let sequencer = BiasSequencer::new(dai, config.fll_target(), codec, fll);
        info!(
            "{}: registered, SYSCLK {} Hz from MCLK {} Hz",
            self.description.name, config.sysclk_hz, config.mclk_hz
        );
        Ok(RegisteredCard {
            bound: self,
            sequencer,
        })
    }
}

/// A registered card, ready to receive bias transitions.
pub struct RegisteredCard<M: RawMutex, R, D> {
    bound: BoundCard,
    sequencer: BiasSequencer<M, R, D>,
}

impl<M: RawMutex, R, D> RegisteredCard<M, R, D> {
    /// Static card data.
    pub fn description(&self) -> &'static CardDescription {
        self.bound.description
    }

    /// I2S controller feeding the CPU side of the link.
    pub fn i2s_controller(&self) -> Phandle {
        self.bound.i2s_controller
    }

    /// The bias hooks for the codec DAI.
    pub fn sequencer(&self) -> &BiasSequencer<M, R, D> {
        &self.sequencer
    }
}
