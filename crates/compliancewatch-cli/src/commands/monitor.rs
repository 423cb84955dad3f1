use std::path::PathBuf;

use compliancewatch_core::Synthesizer;

use super::ConfigArgs;

pub fn run(args: &ConfigArgs, seed: Option<u64>, report_dir: &str) {
    // A blank drug is fine here: the dashboard opens on the welcome screen.
    let config = args
        .to_config()
        .unwrap_or_else(|e| super::exit_with_error(e));
    let mut app =
        crate::tui::app::App::new(config, Synthesizer::new(seed), PathBuf::from(report_dir));
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
