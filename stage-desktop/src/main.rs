//! # Stage Desktop
//!
//! Runs the demo screens in a native window.

use clap::Parser;
use stage_desktop::{demo, CliArgs, DesktopConfig, DesktopHost};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stage_desktop=debug,stage_core=debug,stage_renderer=debug,wgpu=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stage Desktop");

    let args = CliArgs::parse();
    let config = DesktopConfig::from(args);

    tracing::info!(
        "Window config: {}x{} \"{}\" ({}, {:?} backend)",
        config.width,
        config.height,
        config.title,
        if config.windowed { "windowed" } else { "full screen" },
        config.backend
    );

    let background = config.background;
    let mut host = DesktopHost::new(config, move |width, height| {
        demo::demo_app(width, height, background)
    });

    tracing::debug!("Creating event loop");
    let event_loop = EventLoop::new()?;

    let result = event_loop.run_app(&mut host);
    tracing::debug!("run_app returned: {:?}", result);
    result?;

    tracing::info!("Stage Desktop exited");
    Ok(())
}
