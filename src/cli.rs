/// interactive terminal menu of the calculator
pub mod cli_main;
