use std::path::Path;

use super::ConfigArgs;

pub fn run(args: &ConfigArgs, seed: Option<u64>, output_dir: Option<&str>) {
    let view = super::build_view(args, seed).unwrap_or_else(|e| super::exit_with_error(e));
    let report = &view.report;

    match output_dir {
        Some(dir) => match report.write_to_dir(Path::new(dir)) {
            Ok(path) => {
                println!("📄 Compliance report for {}", view.config.drug_name);
                println!(
                    "   {} events, {} critical, {} actionable alerts",
                    report.total_events,
                    report.critical_events,
                    report.actionable.len()
                );
                println!("   Saved to {}", path.display());
            }
            Err(e) => {
                log::error!("could not write report into {dir}: {e}");
                super::exit_with_error(e)
            }
        },
        None => print!("{}", report.render_markdown()),
    }
}
