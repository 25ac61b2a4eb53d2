// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interactive Mandelbrot explorer.  Navigate with w, a, s and d, zoom
//! in and out with e and q, and write a bitmap of the current view
//! with ` or ~.  Any other key quits.

use clap::App;
use log::{info, warn};
use mandelterm::export::{self, ExportFrame};
use mandelterm::planes::preview_shape;
use mandelterm::scheduler::NO_ROW;
use mandelterm::terminal::Terminal;
use mandelterm::{CancelToken, Command, Error, EscapeTime, Result, Scheduler, Settings, Viewport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Run the export on a worker while the main thread watches the
/// keyboard for a cancel request.
fn export_cancellable(
    term: &mut Terminal,
    viewport: &Viewport,
    settings: &Settings,
) -> Result<ExportFrame> {
    let token = CancelToken::new();
    let scheduler = Scheduler::new(settings.threads).with_cancel(token.clone());
    let job = settings.job();
    let done = AtomicBool::new(false);

    let (outcome, watched) = crossbeam::scope(|spawner| {
        let handle = spawner.spawn(|_| {
            let outcome = export::export(viewport, &job, &scheduler, &EscapeTime);
            done.store(true, Ordering::SeqCst);
            outcome
        });
        let mut watched = Ok(());
        while !done.load(Ordering::SeqCst) {
            match term.poll_cancel(Duration::from_millis(100)) {
                Ok(true) => token.cancel(),
                Ok(false) => {}
                Err(e) => {
                    token.cancel();
                    watched = Err(e);
                    break;
                }
            }
        }
        let outcome = handle.join().unwrap_or_else(|_| {
            Err(Error::WorkerFailure {
                row: NO_ROW,
                reason: "export thread panicked".to_string(),
            })
        });
        (outcome, watched)
    })
    .map_err(|_| Error::WorkerFailure {
        row: NO_ROW,
        reason: "export thread panicked".to_string(),
    })?;
    watched?;
    outcome
}

fn explore(settings: &Settings) -> Result<()> {
    let mut term = Terminal::enter()?;
    let (cols, lines) = term.size()?;
    let mut viewport = Viewport::fit(cols, lines)?;
    let scheduler = Scheduler::new(settings.threads);
    let (rows, columns) = preview_shape(cols, lines);

    loop {
        let grid = scheduler.render(&viewport, rows, columns, settings.preview, &EscapeTime)?;
        term.draw(&grid)?;
        match term.read_command()? {
            Command::Quit => return Ok(()),
            Command::Export => {
                term.show_loading()?;
                let frame = export_cancellable(&mut term, &viewport, settings)?;
                info!("exported {}x{} from {:?}", frame.columns, frame.rows, frame.viewport);
                return Ok(());
            }
            command => viewport = viewport.apply(command),
        }
    }
}

fn main() {
    env_logger::init();
    let matches = App::new("mandelterm")
        .version("0.1.0")
        .about("Terminal Mandelbrot explorer")
        .args(&Settings::args())
        .get_matches();
    let settings = match Settings::from_matches(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match explore(&settings) {
        Ok(()) => {}
        Err(Error::Cancelled) => warn!("export cancelled, nothing written"),
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    }
}
