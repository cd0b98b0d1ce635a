mod ball;
mod input;
mod render;
mod sim;
mod ui;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use input::InputPlugin;
use render::DiscPlugin;
use sim::SimPlugin;
use ui::UiPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Msaa::Sample4)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "balldrop-rs".into(),
                        resolution: (1280., 800.).into(),
                        decorations: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn".into(),
                    ..default()
                }),
        )
        .add_plugins((SimPlugin, DiscPlugin, UiPlugin, InputPlugin))
        .add_systems(Startup, (setup_camera, maximize_window))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = windows.get_single_mut() {
        window.set_maximized(true);
    }
}
