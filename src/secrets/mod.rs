//! One-time secret core: token generation and the take-once store.
//!
//! A secret is stored under a fresh random token and handed back to the
//! first caller that presents that token. After that it is gone.
//!
//! ```ignore
//! let store = secrets::create_secret_store();
//! let token = TokenGenerator::new().generate()?;
//! store.put(token.clone(), Secret::new("hunter2")).await;
//!
//! assert!(store.take_and_delete(&token).await.is_some());
//! assert!(store.take_and_delete(&token).await.is_none());
//! ```

pub mod store;
pub mod token;

pub use store::{create_secret_store, Secret, SecretStore, SharedSecretStore};
pub use token::{is_valid_token_format, RandomSourceError, Token, TokenGenerator};
