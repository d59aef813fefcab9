/// cubeview - terminal wireframe cube viewer
///
/// Draws the outline of a cube under a fixed-focal perspective projection.
/// Controls:
///   - W/S or Up/Down: Move forward / back
///   - A/D or Left/Right: Move left / right
///   - Space / Left Shift: Move along -y / +y
///   - ESC (release) or Ctrl+C: Quit

use cubeview_core::{Viewer, ViewerConfig};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr and draw over the viewer unless it is redirected,
    // e.g. `RUST_LOG=debug cubeview 2>cubeview.log`
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut viewer = Viewer::new(ViewerConfig::default());
    info!("camera starts at {:?}", viewer.camera.position);

    match cubeview_terminal::run(&mut viewer) {
        Ok(frames) => {
            info!("exited cleanly after {} frames", frames);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
