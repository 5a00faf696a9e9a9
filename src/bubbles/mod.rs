//! Decorative hashtag bubbles floating up the background.
//!
//! The scheduling core is engine-agnostic:
//! - [`sampling`]: bounded-retry random picks
//! - [`band`]: the left/right zones bubbles are biased toward
//! - [`clock`]: deterministic, cancellable task timing
//! - [`surface`]: what the scheduler needs from a renderer
//! - [`scheduler`]: spawn loop, collision avoidance and cleanup
//!
//! [`ui`] hosts it in Bevy and draws bubbles as UI nodes.

pub mod band;
pub mod clock;
pub mod config;
pub mod content;
pub mod sampling;
pub mod scheduler;
pub mod surface;
pub mod ui;

pub use band::{Band, BandHint, BandRange};
pub use config::BubbleConfig;
pub use scheduler::{ActiveBubble, BubbleId, BubbleScheduler};
pub use surface::{BubbleVisual, RenderSurface};
pub use ui::{BackgroundBubbles, BubbleLifecycle, plugin};
