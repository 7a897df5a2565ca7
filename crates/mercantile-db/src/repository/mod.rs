//! # Repository Module
//!
//! Read-side repository implementations for Mercantile entities.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Responsibilities                         │
//! │                                                                         │
//! │  Repositories (this module)          CommerceEngine (engine/)          │
//! │  ──────────────────────────          ─────────────────────────         │
//! │  • Tenant-scoped reads               • All document writes             │
//! │  • Catalog/client inserts            • All stock mutations             │
//! │    (seeding, external CRUD)          • Number allocation               │
//! │  • Materializing header + lines      • One transaction per workflow    │
//! │                                                                         │
//! │  A repository method is a single statement against the pool;           │
//! │  multi-write consistency lives exclusively in the engine.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod order;
pub mod product;
pub mod quote;
pub mod sale;
