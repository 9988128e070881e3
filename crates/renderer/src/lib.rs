//! Rendering of ocean fields to map figures.
//!
//! Builds multi-panel figures from gridded fields:
//! - Colour maps and banded colour scales
//! - Filled bands with bilinear interpolation
//! - Coastlines traced with marching squares
//! - Graticules, titles and colour bars
//! - Tight cropping and PNG encoding with DPI metadata

pub mod canvas;
pub mod color;
pub mod colorbar;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod figure;
pub mod panel;
pub mod png;
pub mod projection;
pub mod scale;
pub mod text;

pub use canvas::Canvas;
pub use color::Color;
pub use colorbar::ColorBar;
pub use colormap::ColorMap;
pub use error::{RenderError, RenderResult};
pub use figure::{Figure, FigureStyle};
pub use panel::MapPanel;
pub use projection::{MapProjection, PixelRect};
pub use scale::{Band, ColorScale, Tick, TickSpec};
pub use text::TextRenderer;
