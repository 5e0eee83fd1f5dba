//! # Roster Repository
//!
//! Persistence gateway for user records.
//!
//! ```text
//! UserService
//!   ↓  Arc<dyn UserRepository>
//! PgUserRepository | InMemoryUserRepository
//!   ↓
//! PostgreSQL (users table, unique username/email)
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryUserRepository;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
