use std::error::Error;
use std::sync::Arc;

use clap::Parser;

use ascii_preview::ascii::Rasterizer;
use ascii_preview::cli::{self, Args, Command, Settings};
use ascii_preview::config::Config;
use ascii_preview::handoff::FrameHandoff;
use ascii_preview::input::TerminalInput;
use ascii_preview::logging;
use ascii_preview::producer::FrameProducer;
use ascii_preview::renderer::{Renderer, RunExit};
use ascii_preview::shutdown;
use ascii_preview::source;
use ascii_preview::terminal::Tui;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match &args.command {
        Some(Command::ListCameras) => {
            cli::list_cameras()?;
            return Ok(());
        }
        Some(Command::Config { action }) => {
            cli::handle_config_action(action.clone(), args.config.as_deref())?;
            return Ok(());
        }
        None => {}
    }

    let input = args.input.clone().ok_or("missing <INPUT>")?;
    let config = Config::load(args.config.as_deref())?;
    let settings = Settings::resolve(&input, &args, &config)?;

    // Guard must live until the end of run so buffered records are flushed
    let _log_guard = logging::init(&settings.log_level, settings.log_file.as_deref())?;
    log::info!("Starting preview of '{}'", settings.input);

    shutdown::setup_ctrlc_handler()?;

    let handoff = Arc::new(FrameHandoff::new());
    let open_input = settings.input.clone();
    let mut producer = FrameProducer::spawn(
        move || source::open(&open_input),
        Arc::clone(&handoff),
        settings.producer.clone(),
    )?;

    let mut tui = Tui::new()?;
    let exit = {
        let mut renderer = Renderer::new(
            tui.screen(),
            Arc::clone(&handoff),
            Rasterizer::new(settings.ramp.clone()),
            settings.render,
        )
        .with_idle(settings.producer.schedule.idle);
        renderer.run(shutdown::flag(), &mut TerminalInput, settings.exit_on_end)
    };
    tui.restore()?;

    let loop_exit = producer.stop();
    let stats = handoff.stats();
    log::info!(
        "Preview finished ({:?}, capture {:?}): {} frames shown, {} dropped",
        exit,
        loop_exit,
        stats.delivered,
        stats.dropped
    );

    if let RunExit::EndOfStream = exit? {
        println!("End of stream.");
    }
    Ok(())
}
