use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::{error, info};
use mushroom_classifier::config::Args;
use mushroom_classifier::ui::{LaunchError, MushroomApp, MIN_VIEWPORT_SIZE};
use mushroom_classifier::ModelBundle;

fn load_bundle(args: &Args) -> anyhow::Result<ModelBundle> {
    let path = args.bundle_path();
    info!("Loading model bundle from {}", path.display());
    args.loader()
        .load(&path)
        .with_context(|| format!("could not load model bundle {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    mushroom_classifier::init_logger();
    let args = Args::parse();

    let bundle = load_bundle(&args).map(Arc::new);
    if let Err(err) = &bundle {
        error!("{err:#}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_inner_size([980.0, 820.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "🍄 Mushroom Classification App",
        native_options,
        Box::new(move |_cc| match bundle {
            Ok(bundle) => match MushroomApp::new(bundle) {
                Ok(app) => Ok(Box::new(app) as Box<dyn eframe::App>),
                Err(message) => Ok(Box::new(LaunchError { message }) as Box<dyn eframe::App>),
            },
            Err(err) => Ok(Box::new(LaunchError {
                message: format!("{err:#}"),
            }) as Box<dyn eframe::App>),
        }),
    )
    .map_err(|err| anyhow::anyhow!("window closed with error: {err}"))?;
    Ok(())
}
