use crate::Chemistry::chem_error::ChemError;
use crate::Chemistry::molmass::{MolarMassCalculator, SubstanceInput};
use crate::Chemistry::moles::{MoleInput, moles_of_unknown_substance};
use crate::settings::{CalculatorSettings, SettingsError, StrategyKind};
use log::error;
use std::io::{self, BufRead, Write};

pub fn run_interactive_menu(settings: &CalculatorSettings) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    menu_loop(&mut input, &mut output, settings)
}

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Red (\x1b[31m) - calculation errors

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "\x1b[34m\n Welcome to MolarCalc: molar mass and amount of substance calculator\x1b[0m"
    )?;
    writeln!(out, "\x1b[33m1. Molar mass (library strategy)\x1b[0m")?;
    writeln!(out, "\x1b[33m2. Molar mass (custom group parser)\x1b[0m")?;
    writeln!(out, "\x1b[33m3. Moles of a substance\x1b[0m")?;
    writeln!(out, "\x1b[33m4. Moles of an unknown substance\x1b[0m")?;
    writeln!(out, "\x1b[33m5. Element composition table\x1b[0m")?;
    writeln!(out, "\x1b[33m0. Exit\x1b[0m")?;
    write!(out, "\x1b[36mEnter your choice: \x1b[0m")?;
    out.flush()
}

/// prompts and reads one trimmed line; `None` at end of input
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(out, "\x1b[36m{}\x1b[0m", text)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_number(text: &str) -> Result<f64, ChemError> {
    text.parse::<f64>()
        .map_err(|_| ChemError::InvalidInput(format!("'{}' is not a number", text)))
}

fn calculator_for(
    settings: &CalculatorSettings,
    kind: StrategyKind,
) -> Result<MolarMassCalculator, SettingsError> {
    settings.strategy(kind).map(MolarMassCalculator::new)
}

fn report<W: Write>(out: &mut W, result: Result<String, String>) -> io::Result<()> {
    match result {
        Ok(text) => writeln!(out, "{}", text),
        Err(e) => {
            error!("{}", e);
            writeln!(out, "\x1b[31m{}\x1b[0m", e)
        }
    }
}

fn menu_loop<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    settings: &CalculatorSettings,
) -> io::Result<()> {
    loop {
        show_main_menu(out)?;
        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            return Ok(());
        }
        match choice.trim() {
            "1" | "2" => {
                let kind = if choice.trim() == "1" {
                    StrategyKind::Library
                } else {
                    StrategyKind::Custom
                };
                let Some(formula) = prompt(input, out, "Formula: ")? else {
                    return Ok(());
                };
                let result = calculator_for(settings, kind)
                    .map_err(|e| e.to_string())
                    .and_then(|calculator| {
                        calculator
                            .molar_mass(&SubstanceInput::Formula(formula.clone()))
                            .map_err(|e| e.to_string())
                    })
                    .map(|m| format!("Molar mass of {}: {:.4} g/mol ({:e})", formula, m, m));
                report(out, result)?;
            }
            "3" => {
                let Some(formula) = prompt(input, out, "Formula: ")? else {
                    return Ok(());
                };
                let Some(mass) = prompt(input, out, "Sample mass, g: ")? else {
                    return Ok(());
                };
                let result = settings
                    .build_calculator()
                    .map_err(|e| e.to_string())
                    .and_then(|calculator| {
                        let mass = parse_number(&mass).map_err(|e| e.to_string())?;
                        calculator
                            .moles(
                                mass,
                                &MoleInput::Substance(SubstanceInput::Formula(formula.clone())),
                            )
                            .map_err(|e| e.to_string())
                    })
                    .map(|n| format!("Amount of {}: {:e} mol", formula, n));
                report(out, result)?;
            }
            "4" => {
                let Some(mass) = prompt(input, out, "Sample mass, g: ")? else {
                    return Ok(());
                };
                let Some(weight) = prompt(input, out, "Molecular weight, g/mol: ")? else {
                    return Ok(());
                };
                let result = parse_number(&mass)
                    .and_then(|mass| {
                        parse_number(&weight)
                            .and_then(|weight| moles_of_unknown_substance(mass, weight))
                    })
                    .map(|n| format!("Amount: {:e} mol", n))
                    .map_err(|e| e.to_string());
                report(out, result)?;
            }
            "5" => {
                let Some(formula) = prompt(input, out, "Formula: ")? else {
                    return Ok(());
                };
                let result = settings
                    .build_calculator()
                    .map_err(|e| e.to_string())
                    .and_then(|calculator| {
                        calculator
                            .composition(&SubstanceInput::Formula(formula.clone()))
                            .and_then(|composition| composition.pretty_print())
                            .map(|table| table.to_string())
                            .map_err(|e| e.to_string())
                    });
                report(out, result)?;
            }
            "0" => {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            _ => writeln!(out, "Invalid choice. Please try again.")?,
        }
    }
}
