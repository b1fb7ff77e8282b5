mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::depreciation::DepreciationArgs;
use commands::discount::DiscountArgs;
use commands::salary::SalaryArgs;
use commands::student_loan::StudentLoanArgs;
use commands::tax::{BracketTaxArgs, IncomeTaxArgs};

/// Financial calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Financial calculators with decimal precision",
    long_about = "A CLI for the fincalc calculation engines: depreciation \
                  schedules, discount stacking, progressive income tax, \
                  salary net pay, and student loan amortization."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Year-by-year depreciation schedule under five methods
    Depreciation(DepreciationArgs),
    /// Discounted price with stacked discounts, tax, and reverse mode
    Discount(DiscountArgs),
    /// Federal income tax pipeline (adjustments, deduction, brackets, credits)
    IncomeTax(IncomeTaxArgs),
    /// Raw progressive bracket walk on a taxable income figure
    BracketTax(BracketTaxArgs),
    /// Annual and per-period net pay breakdown
    Salary(SalaryArgs),
    /// Student loan amortization and repayment plan comparison
    StudentLoan(StudentLoanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::Discount(args) => commands::discount::run_discount(args),
        Commands::IncomeTax(args) => commands::tax::run_income_tax(args),
        Commands::BracketTax(args) => commands::tax::run_bracket_tax(args),
        Commands::Salary(args) => commands::salary::run_salary(args),
        Commands::StudentLoan(args) => commands::student_loan::run_student_loan(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
