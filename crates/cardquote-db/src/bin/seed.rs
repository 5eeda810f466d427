//! # Seed Catalog Generator
//!
//! Populates the database with a card-services catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p cardquote-db --bin seed
//!
//! # Specify database path
//! cargo run -p cardquote-db --bin seed -- --db ./data/cardquote.db
//! ```
//!
//! ## Generated Catalog
//! A realistic card-issuing/processing price list:
//! - Setup (one-time program and integration fees)
//! - Issuance (per-card fees, tiered by volume)
//! - Processing (per-transaction fees, tiered by volume)
//! - Services (fraud monitoring, support, card design changes)
//!
//! Plus the auto-add/quantity-sync mappings that drive the configurator
//! (e.g. `monthly_active_cards` keeps the Active Cards line in sync).

use chrono::Utc;
use std::env;

use cardquote_core::{
    BillingFrequency, PricingItem, PricingMode, PricingTier, ServiceMapping, TriggerCondition,
};
use cardquote_db::{Database, DbConfig};
use uuid::Uuid;

/// One catalog entry: (name, category, unit label, price cents, tiers, tags).
struct SeedItem {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    unit_label: &'static str,
    price_cents: i64,
    tiers: &'static [(i64, Option<i64>, i64)],
    tags: &'static [&'static str],
    // (config_field, trigger, auto_add, sync_quantity, multiplier)
    mapping: Option<(&'static str, TriggerCondition, bool, bool, i64)>,
}

const CATALOG: &[SeedItem] = &[
    // -- Setup (one-time) -----------------------------------------------------
    SeedItem {
        name: "Program Setup",
        description: "Card program onboarding: BIN sponsorship, compliance review, scheme registration",
        category: "setup",
        unit_label: "one-time",
        price_cents: 2_500_000, // $25,000
        tiers: &[],
        tags: &["setup"],
        mapping: None,
    },
    SeedItem {
        name: "API Integration",
        description: "Dedicated integration engineering for issuing and webhook APIs",
        category: "setup",
        unit_label: "one-time",
        price_cents: 1_000_000, // $10,000
        tiers: &[],
        tags: &["setup", "engineering"],
        mapping: None,
    },
    SeedItem {
        name: "Card Design Change",
        description: "Artwork revision and scheme re-approval for an existing card design",
        category: "services",
        unit_label: "per change",
        price_cents: 150_000, // $1,500
        tiers: &[],
        tags: &["design"],
        mapping: None,
    },
    // -- Issuance (monthly, tiered) -------------------------------------------
    SeedItem {
        name: "Physical Card Issuance",
        description: "Production, personalization and fulfilment of physical cards",
        category: "issuance",
        unit_label: "per card",
        price_cents: 0,
        tiers: &[
            (1, Some(1_000), 450),      // $4.50
            (1_001, Some(10_000), 350), // $3.50
            (10_001, None, 250),        // $2.50
        ],
        tags: &["cards", "physical"],
        mapping: Some((
            "physical_cards_per_month",
            TriggerCondition::Number,
            true,
            true,
            1,
        )),
    },
    SeedItem {
        name: "Virtual Card Issuance",
        description: "Instant virtual card creation",
        category: "issuance",
        unit_label: "per card",
        price_cents: 0,
        tiers: &[
            (1, Some(10_000), 50),      // $0.50
            (10_001, Some(100_000), 25), // $0.25
            (100_001, None, 10),        // $0.10
        ],
        tags: &["cards", "virtual"],
        mapping: Some((
            "virtual_cards_per_month",
            TriggerCondition::Number,
            true,
            true,
            1,
        )),
    },
    SeedItem {
        name: "Active Card Management",
        description: "Monthly fee per active card on file",
        category: "issuance",
        unit_label: "per card",
        price_cents: 0,
        tiers: &[
            (1, Some(5_000), 30),       // $0.30
            (5_001, Some(50_000), 20),  // $0.20
            (50_001, None, 12),         // $0.12
        ],
        tags: &["cards"],
        mapping: Some((
            "monthly_active_cards",
            TriggerCondition::Number,
            true,
            true,
            1,
        )),
    },
    // -- Processing (monthly, tiered) -----------------------------------------
    SeedItem {
        name: "Transaction Processing",
        description: "Authorization, clearing and settlement per transaction",
        category: "processing",
        unit_label: "per transaction",
        price_cents: 0,
        tiers: &[
            (1, Some(100_000), 8),        // $0.08
            (100_001, Some(1_000_000), 5), // $0.05
            (1_000_001, None, 3),          // $0.03
        ],
        tags: &["processing"],
        mapping: Some((
            "monthly_transactions",
            TriggerCondition::Number,
            true,
            true,
            1,
        )),
    },
    // -- Services (monthly, simple) -------------------------------------------
    SeedItem {
        name: "Fraud Monitoring",
        description: "Real-time transaction screening and alerting",
        category: "services",
        unit_label: "per month",
        price_cents: 50_000, // $500
        tiers: &[],
        tags: &["risk"],
        mapping: Some(("fraud_monitoring", TriggerCondition::Boolean, true, false, 1)),
    },
    SeedItem {
        name: "3DS Authentication",
        description: "3-D Secure challenge flows for e-commerce transactions",
        category: "services",
        unit_label: "per month",
        price_cents: 30_000, // $300
        tiers: &[],
        tags: &["risk", "ecommerce"],
        mapping: Some(("threeds_enabled", TriggerCondition::Boolean, true, false, 1)),
    },
    SeedItem {
        name: "Dedicated Support",
        description: "Named support engineer and priority SLA",
        category: "services",
        unit_label: "per month",
        price_cents: 200_000, // $2,000
        tiers: &[],
        tags: &["support"],
        mapping: None,
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces the db layer's tracing output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cardquote_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("cardquote Seed Catalog Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cardquote_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 cardquote Seed Catalog Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} catalog items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut inserted = 0;
    for entry in CATALOG {
        let item = build_item(entry);

        db.catalog().insert(&item).await?;

        if let Some((field, trigger, auto_add, sync_quantity, multiplier)) = entry.mapping {
            let mut mapping = ServiceMapping::new(&item.id, field, trigger);
            if auto_add {
                mapping = mapping.with_auto_add();
            }
            if sync_quantity {
                mapping = mapping.with_sync_quantity();
            }
            if multiplier != 1 {
                mapping = mapping.with_multiplier(multiplier);
            }
            db.catalog().upsert_mapping(&mapping).await?;
        }

        inserted += 1;
        println!("  + {} ({})", item.name, item.category_id);
    }

    println!();
    println!("✓ Seeded {} catalog items", inserted);
    println!(
        "  Mappings: {}",
        db.catalog().list_mappings().await?.len()
    );
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a catalog item from a seed entry.
fn build_item(entry: &SeedItem) -> PricingItem {
    let now = Utc::now();

    let tiers: Vec<PricingTier> = entry
        .tiers
        .iter()
        .map(|&(min, max, price)| PricingTier {
            id: Uuid::new_v4().to_string(),
            name: tier_name(min, max),
            min_quantity: min,
            max_quantity: max,
            unit_price_cents: price,
            description: None,
            config_field: entry.mapping.map(|(field, ..)| field.to_string()),
        })
        .collect();

    PricingItem {
        id: Uuid::new_v4().to_string(),
        name: entry.name.to_string(),
        description: Some(entry.description.to_string()),
        category_id: entry.category.to_string(),
        unit_label: entry.unit_label.to_string(),
        billing_frequency: BillingFrequency::from_unit_label(entry.category, entry.unit_label),
        pricing_mode: if tiers.is_empty() {
            PricingMode::Simple
        } else {
            PricingMode::Tiered
        },
        unit_price_cents: entry.price_cents,
        tiers,
        tags: entry.tags.iter().map(|t| t.to_string()).collect(),
        is_active: true,
        created_at: now,
        updated_at: now,
        sync_version: 0,
    }
}

fn tier_name(min: i64, max: Option<i64>) -> String {
    match max {
        Some(max) => format!("{}-{}", min, max),
        None => format!("{}+", min),
    }
}
