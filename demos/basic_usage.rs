//! Basic usage of the hierarchical logging core.

use logtree::prelude::*;
use logtree::{info, warn};

fn main() {
    // Structural tree built in code.
    let app = Logger::new("App", 128);
    let net = app.create_child("Net", 64);
    app.set_console_output(true);

    info!(app, "application starting");
    warn!(net, "connection retry {} of {}", 1, 3);

    // Registry-materialized loggers, addressable by path.
    let importer = registry().get_or_create("Tools/Importer", true);
    importer.set_level_filter(LevelFilter::DEVELOPMENT);
    info!(importer, "imported {} assets", 42);

    // Timed scope: END is logged even if the logger is disabled mid-scope.
    {
        let _scope = LogScope::begin(Some(&importer), LogLevel::Info, "rebuild");
        importer.debug("rebuilding cache");
    }

    // Bulk control by pattern.
    registry().disable_pattern("Root/Tools/**");

    println!("{}", app.extract_logs(0, LevelFilter::ALL, None, None));
    println!("{}", registry().extract_all(LevelFilter::ALL, None, None));
}
