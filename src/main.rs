//! game-rental - recreates the GameRental schema and prints its reports.

use game_rental::app::App;
use game_rental::cli::Cli;
use game_rental::config::Config;
use game_rental::db::MySqlClient;
use game_rental::error::Result;
use game_rental::logging;
use game_rental::output::Printer;
use game_rental::reports;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list_reports {
        let mut printer = Printer::new(&mut out, Default::default());
        printer.lines(reports::catalog().iter().map(|r| r.title))?;
        return printer.flush();
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = cli.resolve_connection(&config)?;
    let options = cli.run_options(&connection, &config)?;
    info!("Connection: {}", connection.display_string());

    let client = MySqlClient::new(connection);
    let summary = App::new(&client, options).run(&mut out).await?;

    if !summary.all_succeeded() {
        info!(
            schema = ?summary.schema_created,
            procedure = summary.procedure_succeeded,
            failed_reports = summary.reports_failed,
            "Completed with errors"
        );
    }
    Ok(())
}
