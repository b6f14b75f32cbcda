/// Platonic Terminal - the five Platonic solids in the terminal
///
/// Usage: platonic-terminal [--config path/to/scene.json]
///
/// Controls:
///   - Mouse drag on a solid: move it
///   - Mouse drag on empty space / Arrow Keys: orbit the camera
///   - H/J/K/L: pan
///   - Scroll / +/-: zoom
///   - Click an icon: show the link to its detail page
///   - W: toggle wireframe on the icons
///   - Q/ESC: Quit

use std::env;
use std::fs;
use std::io;
use platonic_core::SceneConfig;
use platonic_terminal::TerminalApp;
use tracing_subscriber::EnvFilter;

fn load_config(args: &[String]) -> io::Result<SceneConfig> {
    let Some(position) = args.iter().position(|a| a == "--config") else {
        return Ok(SceneConfig::default());
    };
    let path = args.get(position + 1).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "--config needs a file path")
    })?;

    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read config {path}: {e}")))?;

    SceneConfig::from_json(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load config {path}: {e}")))
}

fn main() -> io::Result<()> {
    // The scene owns stdout; logs go to stderr and only when asked for
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;

    println!("Platonic Terminal - Loading...");
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Thank you for using Platonic Terminal!");
    Ok(())
}
