//! # Koinonia Repository
//!
//! Data access for the Koinonia backend:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PostDao>         (DAO interface)
//! PgPostDaoImpl | MemoryStore   (DAO impl)
//!   ↓
//! PostgreSQL | process memory
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   pool.rs                      ← DatabasePool (sqlx PgPool)
//!   health.rs                    ← StoreHealth readiness check
//!   dao/
//!     post_dao.rs …              ← one trait per entity
//!     impl/
//!       postgres/                ← Pg*DaoImpl
//!       memory.rs                ← MemoryStore
//! ```
//!
//! Enable the `mocks` feature to get mockall `Mock*Dao` types.

pub mod dao;
pub mod health;
pub mod pool;

pub use dao::*;
pub use health::StoreHealth;
pub use pool::*;
