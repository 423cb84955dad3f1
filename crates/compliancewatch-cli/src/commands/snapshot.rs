use super::ConfigArgs;

pub fn run(args: &ConfigArgs, seed: Option<u64>, output_path: Option<&str>) {
    let view = super::build_view(args, seed).unwrap_or_else(|e| super::exit_with_error(e));
    let json = serde_json::to_string_pretty(&view).unwrap_or_else(|e| super::exit_with_error(e));

    match output_path {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json + "\n") {
                super::exit_with_error(e);
            }
            println!("Snapshot written to {path}");
        }
        None => println!("{json}"),
    }
}
