//! # Seed Data Generator
//!
//! Populates the database with demo tenants, clients and products for
//! development, then runs one sale and one quote→order conversion per tenant
//! so the engine's tables are not empty.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p mercantile-db --bin seed
//!
//! # Custom product count per tenant
//! cargo run -p mercantile-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p mercantile-db --bin seed -- --db ./data/mercantile.db
//! ```

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use mercantile_core::{
    Client, ClientRef, CreateQuoteInput, CreateSaleInput, DocumentTotals, LineInput, Product,
};
use mercantile_db::repository::client::generate_client_id;
use mercantile_db::repository::product::generate_product_id;
use mercantile_db::{Database, DbConfig};

/// Demo tenants seeded side by side, so tenant isolation is visible in dev.
const TENANTS: &[&str] = &["tenant-alpha", "tenant-beta"];

/// Product categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Coca-Cola 330ml",
            "Sparkling Water 500ml",
            "Orange Juice 1L",
            "Cold Brew Coffee",
            "Green Tea 500ml",
            "Lemonade 1L",
        ],
    ),
    (
        "OFC",
        &[
            "A4 Paper Ream",
            "Ballpoint Pens 10pk",
            "Stapler",
            "Sticky Notes",
            "Laser Toner Black",
            "Desk Organizer",
        ],
    ),
    (
        "HRD",
        &[
            "Claw Hammer",
            "Screwdriver Set",
            "Measuring Tape 5m",
            "Duct Tape",
            "Wood Screws 100pk",
            "Safety Glasses",
        ],
    ),
];

/// Demo registered clients per tenant.
const CLIENT_NAMES: &[(&str, Option<&str>)] = &[
    ("Acme Retail SA", Some("ACM840101AB1")),
    ("Bolt Logistics", Some("BLT900215CD2")),
    ("Corner Cafe", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./mercantile_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercantile Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Products per tenant (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./mercantile_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    // The demo documents below use the first two products
    let count = count.max(2);

    println!("🌱 Mercantile Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Tenants:  {}", TENANTS.len());
    println!("Products: {} per tenant", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.products().list_active(TENANTS[0], 1).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    for tenant_id in TENANTS {
        println!();
        println!("Seeding {}...", tenant_id);

        let products = seed_products(&db, tenant_id, count).await?;
        println!("  ✓ {} products", products.len());

        let clients = seed_clients(&db, tenant_id).await?;
        println!("  ✓ {} clients", clients.len());

        // One sale and one quote→order conversion, so every document table
        // and the counters have rows.
        let sale = db
            .engine()
            .create_sale(
                tenant_id,
                CreateSaleInput {
                    client: None,
                    lines: vec![demo_line(&products[0], 2)],
                    totals: demo_totals(&products[0], 2),
                    payment_method: Some("cash".to_string()),
                    notes: None,
                },
            )
            .await?;
        println!("  ✓ Sale {}", sale.header.number);

        let quote = db
            .engine()
            .create_quote(
                tenant_id,
                CreateQuoteInput {
                    client: Some(ClientRef::Registered {
                        client_id: clients[0].id.clone(),
                    }),
                    lines: vec![demo_line(&products[1], 5)],
                    totals: demo_totals(&products[1], 5),
                    validity_date: (Utc::now() + Duration::days(30)).date_naive(),
                    notes: Some("Seed quote".to_string()),
                },
            )
            .await?;
        println!("  ✓ Quote {}", quote.header.number);

        let order = db
            .engine()
            .convert_quote_to_order(tenant_id, &quote.header.id)
            .await?;
        println!("  ✓ Order {} (from {})", order.header.number, quote.header.number);
    }

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    Ok(())
}

/// Seeds `count` products for a tenant, cycling through the categories.
async fn seed_products(
    db: &Database,
    tenant_id: &str,
    count: usize,
) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut products = Vec::with_capacity(count);

    let mut seeded = 0;
    'outer: loop {
        for (category, names) in CATEGORIES {
            for name in *names {
                if seeded >= count {
                    break 'outer;
                }

                // Price $1.99 - $9.99, cost around 70% of price
                let price_cents = 199 + ((seeded * 37) % 800) as i64;
                let product = Product {
                    id: generate_product_id(),
                    tenant_id: tenant_id.to_string(),
                    sku: format!("{}-{:04}", category, seeded),
                    name: format!("{} #{}", name, seeded / (names.len() * 3) + 1),
                    stock_quantity: (seeded % 90 + 10) as i64,
                    cost_cents: Some(price_cents * 70 / 100),
                    price_cents,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };

                db.products().insert(&product).await?;
                products.push(product);
                seeded += 1;
            }
        }
    }

    Ok(products)
}

/// Seeds the demo registered clients for a tenant.
async fn seed_clients(
    db: &Database,
    tenant_id: &str,
) -> Result<Vec<Client>, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut clients = Vec::with_capacity(CLIENT_NAMES.len());

    for (name, tax_id) in CLIENT_NAMES {
        let client = Client {
            id: generate_client_id(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            tax_id: tax_id.map(|t| t.to_string()),
            email: Some(format!(
                "billing@{}.example.com",
                name.to_lowercase().replace(' ', "-")
            )),
            phone: None,
            created_at: now,
            updated_at: now,
        };

        db.clients().insert(&client).await?;
        clients.push(client);
    }

    Ok(clients)
}

fn demo_line(product: &Product, quantity: i64) -> LineInput {
    LineInput {
        product_id: product.id.clone(),
        quantity,
        unit_price_cents: product.price_cents,
        subtotal_cents: product.price_cents * quantity,
        discount_cents: 0,
    }
}

fn demo_totals(product: &Product, quantity: i64) -> DocumentTotals {
    let subtotal = product.price_cents * quantity;
    DocumentTotals {
        subtotal_cents: subtotal,
        discount_cents: 0,
        tax_cents: 0,
        total_cents: subtotal,
    }
}
