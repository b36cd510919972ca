//! Test doubles for the renderer, gateway and notification seams.
//!
//! Everything here is deterministic and in-memory. Stubs count their calls
//! so tests can assert that a gateway was or was not reached.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    Ack, AlertMessage, EmergencyContact, GeocodeError, GeocodeGateway, LayerHandle, MapRenderer,
    NotificationChannel, NotificationError, Place, RankedRouteList, RenderError,
    ReverseGeocodeGateway, Route, RouteStyle, RoutingError, RoutingGateway, SafetyRating,
    ScoredRoute, rank,
};

/// A command received by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// `hide_alternative_overlays` was called.
    HideAlternatives,
    /// `set_route_style` succeeded.
    Style {
        /// Target layer.
        layer: LayerHandle,
        /// Applied style.
        style: RouteStyle,
    },
}

/// `MapRenderer` that records every successful command.
///
/// Layers registered with [`fail_layer`](Self::fail_layer) reject styling
/// with [`RenderError::UnknownLayer`] and are not recorded. After
/// [`fail_overlays`](Self::fail_overlays), hiding overlays is rejected too.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    failing: HashSet<LayerHandle>,
    overlays_fail: bool,
}

impl RecordingRenderer {
    /// Make styling `layer` fail from now on.
    pub fn fail_layer(&mut self, layer: LayerHandle) {
        self.failing.insert(layer);
    }

    /// Make `hide_alternative_overlays` fail from now on.
    pub fn fail_overlays(&mut self) {
        self.overlays_fail = true;
    }

    /// Forget recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Commands in the order received.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of successful style commands.
    pub fn style_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Style { .. }))
            .count()
    }

    /// Most recent style applied to `layer`.
    pub fn style_for(&self, layer: LayerHandle) -> Option<RouteStyle> {
        self.commands.iter().rev().find_map(|command| match command {
            RenderCommand::Style { layer: l, style } if *l == layer => Some(*style),
            _ => None,
        })
    }
}

impl MapRenderer for RecordingRenderer {
    fn set_route_style(
        &mut self,
        layer: LayerHandle,
        style: &RouteStyle,
    ) -> Result<(), RenderError> {
        if self.failing.contains(&layer) {
            return Err(RenderError::UnknownLayer(layer));
        }
        self.commands.push(RenderCommand::Style {
            layer,
            style: *style,
        });
        Ok(())
    }

    fn hide_alternative_overlays(&mut self) -> Result<(), RenderError> {
        if self.overlays_fail {
            return Err(RenderError::Rejected {
                message: "overlays unavailable".to_owned(),
            });
        }
        self.commands.push(RenderCommand::HideAlternatives);
        Ok(())
    }
}

/// Straight east-west route with `points` vertices (at least two).
///
/// Travel time assumes a walking pace of 1.25 m/s.
pub fn sample_route(distance_meters: f64, points: usize) -> Route {
    let coords = (0..points.max(2))
        .map(|i| Coord {
            x: -0.09 + i as f64 * 0.0005,
            y: 51.505,
        })
        .collect();
    match Route::from_coords(coords, distance_meters, distance_meters / 1.25) {
        Ok(route) => route,
        Err(err) => panic!("sample route must be valid: {err}"),
    }
}

/// Ranked list whose entry `i` carries `scores[i]` and layer `i`.
///
/// Pass scores in descending order to keep indices and layers aligned.
pub fn ranked_with_scores(scores: &[u8]) -> RankedRouteList {
    let scored = scores
        .iter()
        .enumerate()
        .map(|(i, score)| ScoredRoute {
            route: sample_route(1_000.0 + i as f64, 4).with_layer(LayerHandle(i as u64)),
            safety: SafetyRating::from_score(*score),
        })
        .collect();
    rank(scored)
}

/// Ranked list like [`ranked_with_scores`] whose routes were never drawn.
pub fn ranked_without_layers(scores: &[u8]) -> RankedRouteList {
    let scored = scores
        .iter()
        .enumerate()
        .map(|(i, score)| ScoredRoute {
            route: sample_route(1_000.0 + i as f64, 4),
            safety: SafetyRating::from_score(*score),
        })
        .collect();
    rank(scored)
}

/// `GeocodeGateway` returning a fixed answer.
#[derive(Debug)]
pub struct StubGeocoder {
    answer: Option<Place>,
    error: Option<GeocodeError>,
    calls: Cell<usize>,
}

impl StubGeocoder {
    /// Always resolve to `location`.
    pub fn found(location: Coord<f64>, display_name: &str) -> Self {
        Self {
            answer: Some(Place {
                location,
                display_name: display_name.to_owned(),
            }),
            error: None,
            calls: Cell::new(0),
        }
    }

    /// Never find a match.
    pub fn not_found() -> Self {
        Self {
            answer: None,
            error: None,
            calls: Cell::new(0),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: GeocodeError) -> Self {
        Self {
            answer: None,
            error: Some(error),
            calls: Cell::new(0),
        }
    }

    /// Number of `geocode` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl GeocodeGateway for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Place, GeocodeError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.answer.clone().ok_or_else(|| GeocodeError::NotFound {
            query: address.to_owned(),
        })
    }
}

/// `ReverseGeocodeGateway` returning a fixed answer.
#[derive(Debug)]
pub struct StubReverseGeocoder {
    answer: Result<String, GeocodeError>,
    calls: Cell<usize>,
}

impl StubReverseGeocoder {
    /// Always resolve to `address`.
    pub fn address(address: &str) -> Self {
        Self {
            answer: Ok(address.to_owned()),
            calls: Cell::new(0),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: GeocodeError) -> Self {
        Self {
            answer: Err(error),
            calls: Cell::new(0),
        }
    }

    /// Number of `reverse_geocode` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl ReverseGeocodeGateway for StubReverseGeocoder {
    async fn reverse_geocode(&self, _location: Coord<f64>) -> Result<String, GeocodeError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

/// `RoutingGateway` returning a fixed answer.
#[derive(Debug)]
pub struct StubRouter {
    answer: Result<Vec<Route>, RoutingError>,
    calls: Cell<usize>,
}

impl StubRouter {
    /// Always return `routes` in the given order.
    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            answer: Ok(routes),
            calls: Cell::new(0),
        }
    }

    /// Always fail with `error`.
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            answer: Err(error),
            calls: Cell::new(0),
        }
    }

    /// Number of `find_routes` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl RoutingGateway for StubRouter {
    async fn find_routes(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<Vec<Route>, RoutingError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

/// `NotificationChannel` that records sent messages.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: RefCell<Vec<(Vec<EmergencyContact>, AlertMessage)>>,
    failure: Option<String>,
}

impl RecordingChannel {
    /// Channel that rejects every message with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            sent: RefCell::default(),
            failure: Some(message.to_owned()),
        }
    }

    /// Messages sent so far with their recipients.
    pub fn sent(&self) -> Vec<(Vec<EmergencyContact>, AlertMessage)> {
        self.sent.borrow().clone()
    }
}

#[async_trait(?Send)]
impl NotificationChannel for RecordingChannel {
    async fn send(
        &self,
        contacts: &[EmergencyContact],
        message: &AlertMessage,
    ) -> Result<Ack, NotificationError> {
        if let Some(failure) = &self.failure {
            return Err(NotificationError::Failed {
                message: failure.clone(),
            });
        }
        self.sent
            .borrow_mut()
            .push((contacts.to_vec(), message.clone()));
        Ok(Ack {
            delivered: contacts.len(),
        })
    }
}
