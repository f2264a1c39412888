// src/main.rs - morse-send entry point
use clap::Parser;
use clap::error::ErrorKind;
use std::io::Write;
use std::process::ExitCode;
use tokio::signal::unix::{signal, SignalKind};

use morse_beacon::cli::{Cli, EXAMPLE, USAGE};
use morse_beacon::{
    open_line, ArgumentError, CancelToken, TransmitError, TransmitEvent, Transmitter,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            println!("{USAGE}");
            println!("{EXAMPLE}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; stdout is reserved for the transcript
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let request = match cli.request() {
        Ok(request) => request,
        Err(ArgumentError::Count) => {
            println!("{USAGE}");
            println!("{EXAMPLE}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let resolved = cli.resolve_config().and_then(|config| {
        let timing = config.timing.profile()?;
        Ok((config, timing))
    });
    let (config, timing) = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let line = match open_line(&config.output) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to open output line: {}", e);
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Registered before the line is driven so an early Ctrl-C still cleans up
    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(interrupt) => interrupt,
        Err(e) => {
            tracing::error!("Failed to install SIGINT handler: {}", e);
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cancel = CancelToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if interrupt.recv().await.is_some() {
            tracing::debug!("Ctrl-C received, cancelling transmission");
            signal_cancel.cancel();
        }
    });

    println!("Sending message '{}' {} time(s)", request.message, request.repetitions);
    println!("Morse code pattern:");
    tracing::info!(
        "Unit {:?} (~{:.1} WPM), one pass takes {:?}",
        timing.unit(),
        timing.wpm(),
        timing.message_duration(&request.message)
    );

    let mut transmitter = Transmitter::new(line, timing)
        .with_cancel_token(cancel)
        .with_listener(print_progress);

    let outcome = tokio::task::spawn_blocking(move || transmitter.run(&request)).await;

    match outcome {
        Ok(Ok(report)) => {
            tracing::debug!("{:?}", report);
            println!("Transmission complete!");
            ExitCode::SUCCESS
        }
        Ok(Err(TransmitError::Interrupted)) => {
            println!("\nTransmission interrupted by user");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!("Transmission failed: {}", e);
            println!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Transmitter task failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_progress(event: TransmitEvent) {
    let mut stdout = std::io::stdout().lock();
    let _ = match event {
        TransmitEvent::Character { code, .. } => write!(stdout, "{code} "),
        TransmitEvent::WordBoundary => Ok(()),
        TransmitEvent::PassComplete { .. } => writeln!(stdout),
    };
    let _ = stdout.flush();
}
