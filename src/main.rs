use clap::Parser;
use std::process;
use stockprice_loader::cli::{args::Args, commands};
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown = CancellationToken::new();

        // Ctrl+C asks the active session to stop; the command still finishes
        // normally and reports the cancellation itself.
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, cancelling load...");
                    signal_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C signal handler: {}", e),
            }
        });

        commands::run(args, shutdown).await
    });

    match result {
        Ok(report) => process::exit(report.exit_code()),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Stock Price Loader");
    println!("==================");
    println!();
    println!("Load stock price series from delimited text files into validated records.");
    println!();
    println!("USAGE:");
    println!("    stockprice-loader <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    load        Load a price file and print its records");
    println!("    validate    Report every line of a price file that cannot be parsed");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Load the default file and print all records:");
    println!("    stockprice-loader load");
    println!();
    println!("    # Load two tickers from stdin as JSON, skipping bad lines:");
    println!("    cat prices.csv | stockprice-loader load --source - --ticker AAPL,MSFT \\");
    println!("                                       --on-malformed skip --output-format json");
    println!();
    println!("    # Check a file before importing it:");
    println!("    stockprice-loader validate --source prices.csv");
    println!();
    println!("Press Ctrl+C during a load to cancel it; no partial data is printed.");
    println!();
    println!("For detailed help on any command, use:");
    println!("    stockprice-loader <COMMAND> --help");
}
