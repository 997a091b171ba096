//! Command-line surface.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stockroom_core::Money;

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Inventory and sales tracker")]
pub struct Cli {
    /// Database file (overrides STOCKROOM_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or migrate the database and report its status
    Init,

    /// Record a new stock lot
    AddItem(AddItemArgs),

    /// Register a dealer
    AddDealer(AddDealerArgs),

    /// Show one stock lot
    Item(LotArgs),

    /// List every stock lot
    Products,

    /// List dealer names
    Dealers,

    /// List customer names
    Customers,

    /// Sell from one or more stock lots in a single transaction
    Sell(SellArgs),

    /// Added and sold activity for one day
    Report(ReportArgs),

    /// Delete every row of the selected relations
    Clear(ClearArgs),
}

#[derive(Debug, Args)]
pub struct AddItemArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub quantity: i64,

    #[arg(long)]
    pub batch_no: String,

    /// YYYY-MM-DD
    #[arg(long)]
    pub manufacture_date: NaiveDate,

    /// YYYY-MM-DD
    #[arg(long)]
    pub expiry_date: NaiveDate,

    #[arg(long)]
    pub dealer_name: String,

    /// Unit price, e.g. 12.50
    #[arg(long)]
    pub price: Money,
}

#[derive(Debug, Args)]
pub struct AddDealerArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub email: String,

    /// Tax registration (PAN) number
    #[arg(long, default_value = "")]
    pub tax_id: String,

    /// Trade registration number
    #[arg(long, default_value = "")]
    pub registration_id: String,
}

#[derive(Debug, Args)]
pub struct LotArgs {
    #[arg(long)]
    pub product_id: i64,

    #[arg(long)]
    pub batch_no: String,
}

/// Product ids and batch numbers pair up by position:
/// `--product-id 1,2 --batch-no B1,B2` sells from (1, B1) and (2, B2).
#[derive(Debug, Args)]
pub struct SellArgs {
    #[arg(long = "product-id", value_delimiter = ',', required = true)]
    pub product_ids: Vec<i64>,

    #[arg(long = "batch-no", value_delimiter = ',', required = true)]
    pub batch_nos: Vec<String>,

    /// Units taken from every listed lot
    #[arg(long)]
    pub quantity: i64,

    /// Total for the whole sale
    #[arg(long)]
    pub total_price: Money,

    #[arg(long)]
    pub customer_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report day, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub dealer_name: Option<String>,

    #[arg(long)]
    pub customer_name: Option<String>,

    /// Narrows the day further; ignored unless --end-date is also given
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Narrows the day further; ignored unless --start-date is also given
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[arg(long)]
    pub items: bool,

    #[arg(long)]
    pub sales: bool,

    #[arg(long)]
    pub customers: bool,

    #[arg(long)]
    pub dealers: bool,

    /// Shorthand for all four
    #[arg(long, conflicts_with_all = ["items", "sales", "customers", "dealers"])]
    pub all: bool,
}
