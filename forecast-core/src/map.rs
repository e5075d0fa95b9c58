//! Map overlay and pan/zoom state.

use std::{fmt, str::FromStr, time::Duration};

pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const PAN_MIN: f64 = 0.0;
pub const PAN_MAX: f64 = 100.0;
pub const PAN_STEP: f64 = 2.5;
pub const FADE_DURATION: Duration = Duration::from_millis(700);

// Zoom is kept in whole tenths so every tick is exactly 0.1.
const ZOOM_MIN_TENTHS: u8 = 10;
const ZOOM_MAX_TENTHS: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overlay {
    Temperature,
    #[default]
    Precipitation,
    WindSpeed,
    Events,
}

impl Overlay {
    pub const fn all() -> &'static [Overlay] {
        &[
            Overlay::Temperature,
            Overlay::Precipitation,
            Overlay::WindSpeed,
            Overlay::Events,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Overlay::Temperature => "Temperature",
            Overlay::Precipitation => "Precipitation",
            Overlay::WindSpeed => "Wind speed",
            Overlay::Events => "Events",
        }
    }

    /// Background image for the layer; `None` means no image.
    pub fn image(&self) -> Option<&'static str> {
        match self {
            Overlay::Temperature => Some(
                "https://images.unsplash.com/photo-1581229929983-f5255a587597?q=80&w=2070&auto=format&fit=crop",
            ),
            Overlay::Precipitation => Some(
                "https://images.unsplash.com/photo-1594247552593-3532186a8559?q=80&w=2070&auto=format&fit=crop",
            ),
            Overlay::WindSpeed => Some(
                "https://images.unsplash.com/photo-1611270219575-587410b64b8a?q=80&w=2070&auto=format&fit=crop",
            ),
            Overlay::Events => None,
        }
    }

    pub fn target_opacity(&self) -> f64 {
        match self {
            Overlay::Events => 0.0,
            Overlay::Precipitation => 1.0,
            Overlay::Temperature | Overlay::WindSpeed => 0.5,
        }
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Overlay {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "temperature" | "temp" => Ok(Overlay::Temperature),
            "precipitation" | "rain" => Ok(Overlay::Precipitation),
            "wind speed" | "wind-speed" | "windspeed" | "wind" => Ok(Overlay::WindSpeed),
            "events" => Ok(Overlay::Events),
            _ => Err(anyhow::anyhow!(
                "Unknown overlay '{s}'. Available overlays: Temperature, Precipitation, Wind speed, Events."
            )),
        }
    }
}

/// One of the two stacked image layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub image: Option<&'static str>,
    pub opacity: f64,
}

/// A fade between the two layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from_layer: usize,
    pub to_layer: usize,
    pub to: Overlay,
    pub duration: Duration,
}

/// Two stacked layers; switching fades the visible one out and the other in.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossFade {
    layers: [Layer; 2],
    visible: usize,
    active: Overlay,
}

impl Default for CrossFade {
    fn default() -> Self {
        let initial = Overlay::default();
        Self {
            layers: [
                Layer {
                    image: initial.image(),
                    opacity: 1.0,
                },
                Layer {
                    image: None,
                    opacity: 0.0,
                },
            ],
            visible: 0,
            active: initial,
        }
    }
}

impl CrossFade {
    pub fn active(&self) -> Overlay {
        self.active
    }

    pub fn layers(&self) -> &[Layer; 2] {
        &self.layers
    }

    pub fn visible_layer(&self) -> usize {
        self.visible
    }

    /// Returns `None` (nothing to animate) when `to` is already active.
    pub fn switch(&mut self, to: Overlay) -> Option<Transition> {
        if to == self.active {
            return None;
        }

        let from_layer = self.visible;
        let to_layer = 1 - from_layer;

        self.layers[to_layer] = Layer {
            image: to.image(),
            opacity: to.target_opacity(),
        };
        self.layers[from_layer].opacity = 0.0;
        self.visible = to_layer;
        self.active = to;

        Some(Transition {
            from_layer,
            to_layer,
            to,
            duration: FADE_DURATION,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
}

impl Control {
    pub const fn all() -> &'static [Control] {
        &[
            Control::ZoomIn,
            Control::ZoomOut,
            Control::PanUp,
            Control::PanDown,
            Control::PanLeft,
            Control::PanRight,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::ZoomIn => "zoom in",
            Control::ZoomOut => "zoom out",
            Control::PanUp => "pan up",
            Control::PanDown => "pan down",
            Control::PanLeft => "pan left",
            Control::PanRight => "pan right",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Control {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Control::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown map control '{s}'."))
    }
}

/// Pan position as percentages of the map, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

impl Default for Pan {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// CSS-style transform derived from the view: scale about an origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    zoom_tenths: u8,
    pan: Pan,
    overlay: CrossFade,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            zoom_tenths: ZOOM_MIN_TENTHS,
            pan: Pan::default(),
            overlay: CrossFade::default(),
        }
    }
}

impl MapView {
    pub fn zoom(&self) -> f64 {
        f64::from(self.zoom_tenths) / 10.0
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn overlay(&self) -> &CrossFade {
        &self.overlay
    }

    pub fn switch_overlay(&mut self, to: Overlay) -> Option<Transition> {
        self.overlay.switch(to)
    }

    /// One tick of a map control, clamped to the allowed range.
    pub fn apply(&mut self, control: Control) {
        match control {
            Control::ZoomIn => self.zoom_tenths = (self.zoom_tenths + 1).min(ZOOM_MAX_TENTHS),
            Control::ZoomOut => {
                self.zoom_tenths = self.zoom_tenths.saturating_sub(1).max(ZOOM_MIN_TENTHS)
            }
            Control::PanUp => self.pan.y = (self.pan.y - PAN_STEP).max(PAN_MIN),
            Control::PanDown => self.pan.y = (self.pan.y + PAN_STEP).min(PAN_MAX),
            Control::PanLeft => self.pan.x = (self.pan.x - PAN_STEP).max(PAN_MIN),
            Control::PanRight => self.pan.x = (self.pan.x + PAN_STEP).min(PAN_MAX),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            scale: self.zoom(),
            origin_x: self.pan.x,
            origin_y: self.pan.y,
        }
    }
}
