//! Map renderer capability consumed by the selection controller.
//!
//! The engine never draws anything itself. It issues styling commands
//! against a [`MapRenderer`] and records any failure as a [`Diagnostic`].

use thiserror::Error;

use crate::LayerHandle;

/// Colour used for routes that are not selected.
pub const MUTED_COLOR: &str = "#B0BEC5";

/// Visual style applied to one drawn route.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteStyle {
    /// Stroke colour as a hex string.
    pub color: &'static str,
    /// Stroke opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Stroke weight in pixels.
    pub weight: u8,
    /// Whether the route must be drawn above every other route.
    pub bring_to_front: bool,
}

impl RouteStyle {
    /// Style for the selected route, drawn in its safety colour.
    pub const fn selected(color: &'static str) -> Self {
        Self {
            color,
            opacity: 0.9,
            weight: 8,
            bring_to_front: true,
        }
    }

    /// Uniform style for every route that is not selected.
    pub const fn muted() -> Self {
        Self {
            color: MUTED_COLOR,
            opacity: 0.4,
            weight: 4,
            bring_to_front: false,
        }
    }
}

/// Errors a renderer reports when it cannot apply a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer has no drawable for the handle.
    #[error("no drawable layer for handle {0:?}")]
    UnknownLayer(LayerHandle),
    /// The rendering backend refused the command.
    #[error("renderer rejected command: {message}")]
    Rejected {
        /// Backend-provided detail.
        message: String,
    },
}

/// Drawing capability implemented by a map front end.
///
/// Commands must be idempotent: applying the same style twice yields the
/// same picture.
pub trait MapRenderer {
    /// Apply `style` to the route drawn under `layer`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the layer is unknown or the backend fails.
    fn set_route_style(&mut self, layer: LayerHandle, style: &RouteStyle)
    -> Result<(), RenderError>;

    /// Hide renderer-native overlays that only exist for alternative routes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the backend fails.
    fn hide_alternative_overlays(&mut self) -> Result<(), RenderError>;
}

impl<R: MapRenderer + ?Sized> MapRenderer for &mut R {
    fn set_route_style(
        &mut self,
        layer: LayerHandle,
        style: &RouteStyle,
    ) -> Result<(), RenderError> {
        (**self).set_route_style(layer, style)
    }

    fn hide_alternative_overlays(&mut self) -> Result<(), RenderError> {
        (**self).hide_alternative_overlays()
    }
}

/// A restyle step that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    /// The route at `index` has never been drawn.
    #[error("route {index} has no drawable layer")]
    MissingLayer {
        /// Position in the ranked list.
        index: usize,
    },
    /// The renderer rejected the style for the route at `index`.
    #[error("failed to style route {index}: {source}")]
    Style {
        /// Position in the ranked list.
        index: usize,
        /// Renderer error.
        #[source]
        source: RenderError,
    },
    /// Alternative overlays could not be hidden.
    #[error("failed to hide alternative overlays: {source}")]
    Overlays {
        /// Renderer error.
        #[source]
        source: RenderError,
    },
}

/// `select_route` was called with an index outside the loaded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("route index {requested} is out of range ({available} routes loaded)")]
pub struct SelectionRangeError {
    /// Index that was requested.
    pub requested: usize,
    /// Number of loaded routes.
    pub available: usize,
}

/// Non-fatal problem recorded by the selection controller.
///
/// Diagnostics are logged and kept for inspection; they never change the
/// selected index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Restyling one route failed.
    #[error(transparent)]
    Render(#[from] RenderFailure),
    /// A selection request was out of range.
    #[error(transparent)]
    SelectionRange(#[from] SelectionRangeError),
}
