//! # mercantile-db: Storage Layer + Commerce Engine
//!
//! This crate provides database access and the transactional commerce engine
//! for Mercantile. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mercantile Data Flow                               │
//! │                                                                         │
//! │  Caller (validated tenant id + typed input)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  mercantile-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ CommerceEngine│    │ Repositories │  │   │
//! │  │   │   (pool.rs)   │◄───│  (engine/)    │    │ (read side)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ sale/order/   │    │ product      │  │   │
//! │  │   │ Migrations    │    │ quote flows   │    │ client/docs  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ one transaction per workflow  │   │
//! │  └────────────────────────────────┼────────────────────────────────┘  │
//! │                                   ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   products / clients / sales / orders / quotes (+lines)        │   │
//! │  │   document_counters                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and engine error types
//! - [`repository`] - Read-side repositories (product, client, documents)
//! - [`engine`] - Transactional workflows: sales, orders, quotes, conversion
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercantile_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mercantile.db")).await?;
//!
//! let sale = db.engine().create_sale(tenant_id, input).await?;
//! let stock = db.products().get_by_id(tenant_id, product_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, EngineError};
pub use pool::{Database, DbConfig};

// Engine and repository re-exports for convenience
pub use engine::CommerceEngine;
pub use repository::client::ClientRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::quote::QuoteRepository;
pub use repository::sale::SaleRepository;
