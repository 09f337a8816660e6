//! The main loop of the pad.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;

use crate::config::PadConfig;
use crate::debounce::ButtonSource;
use crate::dispatcher::{DispatchState, ReportDispatcher};
use crate::hid::{Report, ReportTransport};
use crate::input_device::rotary_encoder::RotaryEncoder;
use crate::key_mux::KeyMux;

/// Counters of dispatched reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadStats {
    pub consumer_reports: u32,
    pub consumer_releases: u32,
    pub key_reports: u32,
    pub key_releases: u32,
    /// Iterations where the transport was still busy
    pub busy_cycles: u32,
}

impl PadStats {
    fn record(&mut self, report: &Report) {
        let counter = match (report, report.is_neutral()) {
            (Report::Consumer(_), false) => &mut self.consumer_reports,
            (Report::Consumer(_), true) => &mut self.consumer_releases,
            (Report::Keyboard(_), false) => &mut self.key_reports,
            (Report::Keyboard(_), true) => &mut self.key_releases,
        };
        *counter = counter.wrapping_add(1);
    }
}

/// Encoder, key multiplexer and dispatcher wired to a report transport
pub struct RemotePad<'a, A, B, S, T, const N: usize>
where
    A: InputPin,
    B: InputPin,
    S: ButtonSource,
    T: ReportTransport,
{
    encoder: RotaryEncoder<A, B>,
    key_mux: KeyMux<'a, N, S>,
    dispatcher: ReportDispatcher,
    transport: T,
    interval: Duration,
    stats: PadStats,
}

impl<'a, A, B, S, T, const N: usize> RemotePad<'a, A, B, S, T, N>
where
    A: InputPin,
    B: InputPin,
    S: ButtonSource,
    T: ReportTransport,
{
    pub fn new(encoder: RotaryEncoder<A, B>, key_mux: KeyMux<'a, N, S>, transport: T, config: &PadConfig) -> Self {
        Self {
            encoder,
            key_mux,
            dispatcher: ReportDispatcher::new(config.encoder.action),
            transport,
            interval: config.main_loop_interval,
            stats: PadStats::default(),
        }
    }

    /// One main loop iteration.
    ///
    /// Returns the report handed to the transport, if it was ready.
    pub fn poll(&mut self) -> Option<Report> {
        self.encoder.update();
        self.key_mux.update();

        if !self.transport.is_ready() {
            self.stats.busy_cycles = self.stats.busy_cycles.wrapping_add(1);
            return None;
        }

        let direction = self.encoder.consume_direction();
        let report = self.dispatcher.dispatch(direction, &mut self.key_mux);
        self.transport.send_report(&report);
        self.stats.record(&report);
        Some(report)
    }

    /// Run the main loop forever
    pub async fn run(&mut self) -> ! {
        info!("Pad started, {} key bindings", N);
        loop {
            self.poll();
            Timer::after(self.interval).await;
        }
    }

    pub fn stats(&self) -> PadStats {
        self.stats
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
