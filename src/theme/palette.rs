use bevy::prelude::*;

/// Warm off-white window background
pub const SCREEN_BACKGROUND: Color = Color::srgb(0.96, 0.92, 0.84);

/// #4666bf, alpha is animated
pub const BUBBLE_BACKGROUND: Color = Color::srgb(0.275, 0.400, 0.750);

/// Near-white text on bubbles
pub const BUBBLE_TEXT: Color = Color::srgb(0.98, 0.98, 0.98);
