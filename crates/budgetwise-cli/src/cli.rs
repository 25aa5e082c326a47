//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Budgetwise - Understand your monthly budget
#[derive(Parser)]
#[command(name = "budgetwise")]
#[command(about = "Budget analysis, saving tips, and financial terms", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Generation settings file (overrides BUDGETWISE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., frontend/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Analyze a monthly budget
    ///
    /// Read a JSON budget with --file, or give --income and one --expense per
    /// category.
    Analyze {
        /// JSON file with monthly_income, expenses, and goal
        #[arg(short, long, conflicts_with_all = ["income", "expenses"])]
        file: Option<PathBuf>,

        /// Monthly income
        #[arg(short, long)]
        income: Option<f64>,

        /// Expense as category=amount (repeatable)
        #[arg(short = 'e', long = "expense")]
        expenses: Vec<String>,

        /// Goal (general, emergency_fund, debt_payoff, big_purchase)
        #[arg(short, long)]
        goal: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the financial glossary
    Glossary {
        /// Show one term by ID
        #[arg(long, conflicts_with_all = ["category", "search"])]
        id: Option<i64>,

        /// Filter by category (basics, investing, economics)
        #[arg(short, long)]
        category: Option<String>,

        /// Search term names and definitions
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Explain a financial term
    Explain {
        /// Term to explain
        term: String,

        /// Reading level (beginner, intermediate, advanced)
        #[arg(short, long)]
        complexity: Option<String>,

        /// A specific question about the term
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Show configuration and narrative backend status
    Status,
}
