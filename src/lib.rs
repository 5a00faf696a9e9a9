//! Floating hashtag bubbles for app backgrounds.

pub mod bubbles;
pub mod theme;

use bevy::prelude::*;

/// Installs the theme and the bubble background.
pub fn plugin(app: &mut App) {
    app.add_plugins((theme::plugin, bubbles::plugin));
}
