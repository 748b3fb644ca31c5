use MolarCalc::cli::cli_main::run_interactive_menu;
use MolarCalc::settings::{CalculatorSettings, SETTINGS_FILE};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

pub fn main() {
    if let Err(e) = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]) {
        eprintln!("logger is not initialized: {}", e);
    }
    let settings = match CalculatorSettings::load_from_file(SETTINGS_FILE) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}; falling back to default settings", e);
            CalculatorSettings::default()
        }
    };
    if let Err(e) = run_interactive_menu(&settings) {
        error!("terminal error: {}", e);
    }
}
