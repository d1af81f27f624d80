//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.
//!
//! Le query usano l'API runtime di sqlx (`query`/`query_as` con bind espliciti
//! e entità `FromRow`), così la compilazione non richiede un database attivo.
//! Le scritture multi-riga (amicizie simmetriche, creazione chat con membri,
//! sostituzione dell'insieme membri) avvengono dentro una transazione esplicita.

pub mod chat;
pub mod comment;
pub mod message;
pub mod post;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use chat::ChatRepository;
pub use comment::CommentRepository;
pub use message::MessageRepository;
pub use post::PostRepository;
pub use user::UserRepository;
