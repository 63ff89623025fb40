use std::process::ExitCode;

use terrawire::app::{App, AppEvent};
use terrawire::mesh::{GridMesh, GridSpec};
use terrawire::settings::Settings;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting terrawire");

    let settings = Settings::load();
    let spec = match GridSpec::new(settings.grid.width, settings.grid.length) {
        Ok(spec) => spec,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mesh = GridMesh::build(spec);

    let event_loop = match winit::event_loop::EventLoop::<AppEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    // Frames are driven by redraw requests paced by vsync, not by polling.
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Wait);

    let mut app = App::new(settings, mesh, event_loop.create_proxy());
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {e}");
        return ExitCode::FAILURE;
    }

    match app.take_fatal_error() {
        Some(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
