//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};

/// Livello di visibilità di un utente, dal meno al più restrittivo:
/// PUBLIC (interagibile da chiunque), INTERNAL (richiede amicizia),
/// PRIVATE (solo il proprietario, o un amico già presente).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Publicity {
    Private,
    Internal,
    Public,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatType {
    Group,
    Private,
}
