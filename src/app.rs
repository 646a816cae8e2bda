use anyhow::Result;

use crate::exec::Exe;
use crate::runner::Runner;
use crate::settings::{Command, Settings};
use crate::setup::Setup;
use crate::ui::Ui;
use crate::wrapup::WrapUp;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// User interface
    ui: Ui,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let ui = Ui::new(settings.verbose > 0);
        Self { settings, ui }
    }

    /// Run the app, dispatching to the handler of the selected mode.
    pub fn run(mut self) -> Result<()> {
        let exe = Exe::new(&self.settings.exe);
        self.ui
            .verbose_msg(&format!("Using SPARK application {:?}", exe.path()));

        match &self.settings.command {
            Command::Setup(setup) => Setup::new(setup, &exe, &mut self.ui).run(),
            Command::Run(run) => Runner::new(run, &exe, &mut self.ui).run(),
            Command::WrapUp(wrapup) => WrapUp::new(wrapup, &mut self.ui).run(),
        }
    }
}
