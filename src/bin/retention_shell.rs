//! Interactive retention calculator session
//!
//! Reads one command per line from stdin, re-derives after every edit and
//! redraws. Saves run in the background and report back when they finish.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use retention_calculator::shell::{render, Command, SaveDispatcher, Session, HELP};
use retention_calculator::snapshot::{HttpTransport, RemoteSaver};
use retention_calculator::SessionConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "retention_shell", version, about = "Interactive customer retention calculator")]
struct Args {
    /// JSON session config (inputs, call metadata, export dir)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    client: Option<String>,

    #[arg(long)]
    rep: Option<String>,

    /// Call date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,

    /// Spreadsheet web-app endpoint
    #[arg(long)]
    sheet_url: Option<String>,

    #[arg(long)]
    export_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut SessionConfig) {
        if let Some(client) = self.client {
            config.call.client_name = client;
        }
        if let Some(rep) = self.rep {
            config.call.sales_rep_name = rep;
        }
        if let Some(date) = self.date {
            config.call.call_date = date;
        }
        if let Some(url) = self.sheet_url {
            config.call.google_sheet_url = url;
        }
        if let Some(dir) = self.export_dir {
            config.export_dir = dir;
        }
    }
}

enum Event {
    Line(Option<String>),
    Saved(Result<(), retention_calculator::error::SaveError>),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = SessionConfig::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);

    let mut session = Session::new(config);
    let mut dispatcher = SaveDispatcher::new(RemoteSaver::new(HttpTransport::new()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", render(&session, Instant::now()));
    println!("\nType 'help' for commands.");
    prompt()?;

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            Some(outcome) = dispatcher.next_outcome() => Event::Saved(outcome),
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => handle(command, &mut session, &dispatcher),
                Err(msg) => println!("{}", msg),
            },
            Event::Saved(outcome) => {
                let now = Instant::now();
                session.record_save(&outcome, now);
                if let Some(status) = session.save_status(now) {
                    println!("\n{}", status.message());
                }
            }
        }
        prompt()?;
    }

    info!("Session ended");
    Ok(())
}

fn handle(command: Command, session: &mut Session, dispatcher: &SaveDispatcher<HttpTransport>) {
    match command {
        Command::Set(field, raw) => {
            session.set_field(field, &raw);
            print!("{}", render(session, Instant::now()));
        }
        Command::Meta(field, value) => {
            session.set_meta(field, value);
            print!("{}", render(session, Instant::now()));
        }
        Command::Toggle(panel) => {
            session.toggle(panel);
            print!("{}", render(session, Instant::now()));
        }
        Command::Save => {
            let now = Instant::now();
            if dispatcher.dispatch(session, now) {
                println!("Saving...");
            } else if let Some(status) = session.save_status(now) {
                println!("{}", status.message());
            }
        }
        Command::Export(dir) => match session.export(dir.as_deref()) {
            Ok(path) => println!("Exported to {}", path.display()),
            Err(e) => {
                warn!("Export failed: {}", e);
                println!("Export failed: {}", e);
            }
        },
        Command::Show => print!("{}", render(session, Instant::now())),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
