// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use price_analyzer::{export_html, Catalog, Ingestor, Mode, Settings, Shell};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the query loop
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let settings = Settings::from_args(env::args().skip(1)).context("Invalid arguments")?;
    info!(
        "price-analyzer {} reading {}",
        price_analyzer::VERSION,
        settings.source_dir.display()
    );

    // 1. Load every price list; a missing directory or no files ends the run
    let mut catalog = Catalog::new();
    let report = match Ingestor::new(settings.ingest_config()).ingest(&mut catalog) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("❌ Failed to load price lists: {}", err);
            std::process::exit(1);
        }
    };
    println!(
        "✓ Loaded {} record(s) from {} file(s)",
        report.total_records,
        report.loaded_files()
    );

    // 2. Search; a broken session still gets exported
    let session = match settings.mode {
        Mode::Shell => run_shell(&catalog),
        Mode::Tui => run_ui_mode(&catalog),
    };

    // 3. Export; a failure is reported, not fatal
    match finish_session(&catalog, session, &settings.output_file) {
        Ok(path) => println!("✓ Data saved to {}", path.display()),
        Err(err) => {
            error!("export failed: {:#}", err);
            eprintln!("❌ Export to HTML failed: {:#}", err);
        }
    }

    Ok(())
}

/// Report a failed session, then export regardless
fn finish_session(catalog: &Catalog, session: Result<()>, output: &Path) -> Result<PathBuf> {
    if let Err(err) = session {
        error!("search session failed: {:#}", err);
        eprintln!("❌ Search session ended with an error: {:#}", err);
    }
    export_html(catalog, output)
}

fn run_shell(catalog: &Catalog) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock());
    let searches = shell.run(catalog).context("Console I/O failed")?;
    info!("session ended after {} search(es)", searches);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog: &Catalog) -> Result<()> {
    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;
    println!("\n✅ UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog: &Catalog) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run without \"tui\" for the console search");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_analyzer::Record;

    #[test]
    fn test_failed_session_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.html");
        let mut catalog = Catalog::new();
        catalog.append(vec![Record::new("хлеб", 40, 1, "price_1.csv").unwrap()]);

        let session = Err(anyhow::anyhow!("stdin closed unexpectedly"));
        let written = finish_session(&catalog, session, &path).unwrap();

        assert_eq!(written, path);
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<td>хлеб</td>"));
    }
}
