//! Colors and fonts for the bubbles.

pub mod palette;

use bevy::prelude::*;

/// Resource holding the bubble font. Needs Hangul glyphs for the default hashtags.
#[derive(Resource)]
pub struct BubbleFont(pub Handle<Font>);

pub fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(palette::SCREEN_BACKGROUND));
    app.add_systems(Startup, load_bubble_font);
}

/// Path of the bubble font under `assets/`.
///
/// The font file is not checked in. Drop `NotoSansKR-Regular.ttf` (or any
/// Hangul-capable TTF renamed to match) into `assets/fonts/`, see
/// `assets/fonts/README.md`. Without it Bevy logs a load error and the
/// bubbles render in the default font, which has no Hangul glyphs.
pub const BUBBLE_FONT_PATH: &str = "fonts/NotoSansKR-Regular.ttf";

fn load_bubble_font(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font = asset_server.load(BUBBLE_FONT_PATH);
    commands.insert_resource(BubbleFont(font));
}
