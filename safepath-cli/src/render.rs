//! Headless map renderer that reports restyle commands through the log.

use log::debug;
use safepath_core::{LayerHandle, MapRenderer, RenderError, RouteStyle};

/// `MapRenderer` for terminals: every command is logged and accepted.
#[derive(Debug, Default)]
pub(crate) struct LogRenderer {
    restyles: usize,
}

impl LogRenderer {
    /// Number of style commands received.
    pub(crate) const fn restyles(&self) -> usize {
        self.restyles
    }
}

impl MapRenderer for LogRenderer {
    fn set_route_style(
        &mut self,
        layer: LayerHandle,
        style: &RouteStyle,
    ) -> Result<(), RenderError> {
        self.restyles += 1;
        debug!(
            "layer {} -> {} (opacity {}, weight {}{})",
            layer.0,
            style.color,
            style.opacity,
            style.weight,
            if style.bring_to_front { ", front" } else { "" }
        );
        Ok(())
    }

    fn hide_alternative_overlays(&mut self) -> Result<(), RenderError> {
        debug!("hiding alternative route overlays");
        Ok(())
    }
}
