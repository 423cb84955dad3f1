use compliancewatch_server::ServerConfig;

pub fn run(config: ServerConfig) {
    let base = format!("http://{}", config.addr());

    println!("🔍 ComplianceWatch Server v{}", compliancewatch_core::VERSION);
    println!("   {base}");
    match config.seed {
        Some(seed) => println!("   synthetic data seeded with {seed}"),
        None => println!("   synthetic data seeded from the OS"),
    }
    println!();
    println!("   Endpoints:");
    println!("     GET  /                   Dashboard page (open in a browser)");
    println!("     GET  /api                API index");
    println!("     GET  /api/v1/dashboard   Full dashboard view as JSON");
    println!("     GET  /api/v1/alerts      Alert board as JSON");
    println!("     GET  /api/v1/report      Markdown compliance report download");
    println!("     GET  /health             Health check");
    println!("     GET  /session/report     Report shown on this browser's screen");
    println!("     POST /session/end        End the browser session");
    println!();
    println!("   Query params for /api/v1/*:");
    println!("     drug=<name>              Drug to monitor (required)");
    println!("     source=<slug>            reddit|twitter|facebook|forums|faers (repeatable)");
    println!("     window=24h|7d|30d|90d    Monitoring period");
    println!("     severity=1-10            Severity threshold");
    println!("     confidence=50-100        Confidence threshold");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/dashboard?drug=Ozempic&source=reddit&window=7d'");
    println!("     curl -OJ '{base}/api/v1/report?drug=Ozempic'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => super::exit_with_error(e),
    };
    log::info!("starting server on {}", config.addr());
    if let Err(e) = rt.block_on(compliancewatch_server::run_server(config)) {
        log::error!("server stopped: {e}");
        super::exit_with_error(e);
    }
}
