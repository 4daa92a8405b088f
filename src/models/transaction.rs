// ============================================================================
// Structure : Transaction
// ============================================================================
// Une transaction reçue par une adresse, telle que renvoyée par
// get_tx_received. Lecture seule : la liste entière est remplacée d'un bloc
// quand une nouvelle recherche aboutit.
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::FetchError;
use crate::models::parse_decimal;

/// Format d'affichage des dates (UTC)
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Transaction reçue
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Identifiant de la transaction (vide si absent de la réponse)
    pub txid: String,

    /// Valeur telle que renvoyée par l'API (ex: "0.00100000")
    pub value: String,

    /// Valeur parsée, utilisée pour le tri
    pub amount: Decimal,

    /// Nombre de confirmations
    pub confirmations: u64,

    /// Timestamp Unix (secondes)
    pub time: i64,

    /// `time` converti ; construit une seule fois, toujours valide
    received_at: DateTime<Utc>,
}

impl Transaction {
    /// Crée une transaction en validant la valeur et la date
    ///
    /// CONCEPT RUST : Constructeur faillible
    /// - Retourne Result : un enregistrement invalide ne peut pas exister
    /// - Invariant : received_at est toujours une date représentable
    pub fn new(
        txid: impl Into<String>,
        value: impl Into<String>,
        confirmations: u64,
        time: i64,
    ) -> Result<Self, FetchError> {
        let value = value.into();
        let amount = parse_decimal(&value).ok_or_else(|| {
            FetchError::MalformedResponse(format!("valeur de transaction invalide : {:?}", value))
        })?;
        let received_at = DateTime::from_timestamp(time, 0).ok_or_else(|| {
            FetchError::MalformedResponse(format!("timestamp de transaction invalide : {}", time))
        })?;

        Ok(Self {
            txid: txid.into(),
            value,
            amount,
            confirmations,
            time,
            received_at,
        })
    }

    /// Date formatée, ex: "07/01/2021 06:13:20"
    pub fn formatted_time(&self) -> String {
        self.received_at.format(DATE_FORMAT).to_string()
    }

    /// Txid tronqué pour le tableau : "abcdef12…89abcdef"
    pub fn short_txid(&self) -> String {
        let count = self.txid.chars().count();
        if count <= 20 {
            return self.txid.clone();
        }
        let head: String = self.txid.chars().take(8).collect();
        let tail: String = self.txid.chars().skip(count - 8).collect();
        format!("{}…{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;

    #[test]
    fn test_formatted_time_is_stable() {
        let tx = Transaction::new("abc", "0.001", 3, 1_610_000_000).unwrap();
        assert_eq!(tx.formatted_time(), "07/01/2021 06:13:20");
        assert_eq!(tx.formatted_time(), tx.formatted_time());
    }

    #[test]
    fn test_invalid_value() {
        let err = Transaction::new("abc", "n/a", 0, 1_610_000_000).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_invalid_time() {
        let err = Transaction::new("abc", "1.0", 0, i64::MAX).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_short_txid() {
        let txid = "0123456789abcdef0123456789abcdef";
        let tx = Transaction::new(txid, "1", 1, 0).unwrap();
        assert_eq!(tx.short_txid(), "01234567…89abcdef");

        let short = Transaction::new("abc", "1", 1, 0).unwrap();
        assert_eq!(short.short_txid(), "abc");
    }
}
