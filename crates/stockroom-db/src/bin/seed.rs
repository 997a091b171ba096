//! # Seed Data Generator
//!
//! Populates the database with dealers and stock lots for development.
//!
//! ## Usage
//! ```bash
//! # 40 lots (default) into ./stockroom_dev.db
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p stockroom-db --bin seed -- --count 200 --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - One dealer per entry in `DEALERS`
//! - Lots cycling through `PRODUCTS`, each with its own batch number
//!   `{PREFIX}-{YYMM}-{NN}`, a 0-120 quantity and a two-year shelf life

use chrono::{Datelike, Months, NaiveDate, Utc};
use clap::Parser;
use stockroom_core::{Money, NewDealer, NewItem};
use stockroom_db::{Database, DbConfig};

/// Dealers: (name, address, phone, tax id)
const DEALERS: &[(&str, &str, &str, &str)] = &[
    ("Himal Pharma", "Teku, Kathmandu", "01-4260011", "PAN-300112"),
    ("Everest Distributors", "Lakeside, Pokhara", "061-520334", "PAN-301877"),
    ("Sagarmatha Medical Supply", "Birgunj Road", "051-522190", "PAN-302456"),
];

/// Products: (name, batch prefix, unit price in minor units)
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Paracetamol 500mg", "PCM", 250),
    ("Amoxicillin 250mg", "AMX", 1200),
    ("Cetirizine 10mg", "CTZ", 300),
    ("Omeprazole 20mg", "OMZ", 950),
    ("Metformin 500mg", "MTF", 600),
    ("Azithromycin 500mg", "AZT", 2800),
    ("Ibuprofen 400mg", "IBU", 400),
    ("ORS Sachet", "ORS", 150),
];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Stockroom seed data generator")]
struct Args {
    /// Number of stock lots to generate
    #[arg(short, long, default_value_t = 40)]
    count: usize,

    /// Database file path
    #[arg(short, long, default_value = "./stockroom_dev.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", args.db);
    println!("Lots:     {}", args.count);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} stock lots", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Run `stockroom clear --items --dealers` or delete the file to regenerate.");
        return Ok(());
    }

    for (name, address, phone, tax_id) in DEALERS {
        db.dealers()
            .add_dealer(&NewDealer {
                name: name.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
                tax_id: tax_id.to_string(),
                ..Default::default()
            })
            .await?;
    }
    println!("✓ Added {} dealers", DEALERS.len());

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut generated = 0;

    for seed in 0..args.count {
        let lot = generate_lot(seed, today);

        if let Err(e) = db.items().add_item(&lot).await {
            eprintln!("Failed to insert {} ({}): {}", lot.name, lot.batch_no, e);
            continue;
        }

        generated += 1;
    }

    println!();
    println!("✓ Generated {} stock lots in {:?}", generated, start.elapsed());
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds one deterministic stock lot.
fn generate_lot(seed: usize, today: NaiveDate) -> NewItem {
    let (name, prefix, price_cents) = PRODUCTS[seed % PRODUCTS.len()];
    let (dealer, ..) = DEALERS[seed % DEALERS.len()];

    // Made 0-11 months ago, expires two years after manufacture
    let manufacture_date = today
        .checked_sub_months(Months::new((seed % 12) as u32))
        .unwrap_or(today);
    let expiry_date = manufacture_date
        .checked_add_months(Months::new(24))
        .unwrap_or(manufacture_date);

    let batch_no = format!(
        "{}-{:02}{:02}-{:02}",
        prefix,
        manufacture_date.year() % 100,
        manufacture_date.month(),
        seed / PRODUCTS.len()
    );

    NewItem {
        name: name.to_string(),
        quantity: ((seed * 37) % 121) as i64,
        batch_no,
        manufacture_date,
        expiry_date,
        dealer_name: dealer.to_string(),
        price: Money::from_cents(price_cents),
    }
}
