/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Invoking the SPARK application
mod exec;
/// Filesystem operations
mod fs;
/// Command-line settings with paths and defaults resolved
mod settings;
/// Text UI
mod ui;
/// Argument integrity checks
mod validate;

/// --SETUP handler
mod setup;
/// --RUN handler
mod runner;
/// --WRAP-UP handler
mod wrapup;

// exported for tests:
pub use app::App;
pub use args::{Args, Mode, RunArgs, SetupArgs, WrapUpArgs};
pub use settings::Settings;

/// Run the command-line app with already-parsed args.
pub fn run_with(args: Args) -> Result<(), anyhow::Error> {
    use clap::CommandFactory;

    if args.mode.is_none() {
        Args::command().print_long_help()?;
        return Ok(());
    }

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()
}
