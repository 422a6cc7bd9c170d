use eframe::egui;
use salt_shaker_pfp::app::PfpApp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 620.0])
            .with_min_inner_size([460.0, 580.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Salt Shaker PFP",
        options,
        Box::new(move |cc| Ok(Box::new(PfpApp::new(cc, runtime)))),
    )?;

    Ok(())
}
