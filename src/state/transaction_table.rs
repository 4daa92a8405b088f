// ============================================================================
// TransactionTable : projection triée et paginée
// ============================================================================
// Ne possède pas les transactions : projette une slice empruntée au
// WalletLookup en une page de lignes à afficher.
//
// CONCEPTS RUST :
// 1. Lifetimes : TablePage<'a> emprunte les transactions, aucune copie
// 2. sort_by est stable : à clé égale, l'ordre de l'API est conservé
// ============================================================================

use std::cmp::Ordering;

use crate::models::Transaction;

/// Colonne de tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Value,
    Confirmations,
    Time,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Value => "Valor",
            SortKey::Confirmations => "Confirmações",
            SortKey::Time => "Data",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::Value => a.amount.cmp(&b.amount),
            SortKey::Confirmations => a.confirmations.cmp(&b.confirmations),
            SortKey::Time => a.time.cmp(&b.time),
        }
    }
}

/// Sens du tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(&self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Une page du tableau, prête à être rendue
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Transaction>,
    /// Index de page (0-based)
    pub page: usize,
    /// Toujours >= 1, même sans transaction
    pub page_count: usize,
    /// Nombre total de transactions
    pub total: usize,
}

impl TablePage<'_> {
    /// Aucune ligne : affiché comme "no rows", pas comme "adresse inconnue"
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// État de vue du tableau : tri + page courante
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTable {
    sort: Option<(SortKey, SortOrder)>,
    page: usize,
    page_size: usize,
}

impl TransactionTable {
    /// `page_size` est ramené à 1 au minimum
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn sort(&self) -> Option<(SortKey, SortOrder)> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Change le tri et revient à la première page
    pub fn set_sort(&mut self, sort: Option<(SortKey, SortOrder)>) {
        self.sort = sort;
        self.page = 0;
    }

    /// Aucun -> Data ▼ -> Valor -> Confirmações -> aucun (le sens est conservé)
    pub fn cycle_sort_key(&mut self) {
        let next = match self.sort {
            None => Some((SortKey::Time, SortOrder::Descending)),
            Some((SortKey::Time, order)) => Some((SortKey::Value, order)),
            Some((SortKey::Value, order)) => Some((SortKey::Confirmations, order)),
            Some((SortKey::Confirmations, _)) => None,
        };
        self.set_sort(next);
    }

    /// Inverse le sens ; sans tri actif, ne fait rien
    pub fn toggle_order(&mut self) {
        if let Some((key, order)) = self.sort {
            self.set_sort(Some((key, order.toggled())));
        }
    }

    /// Nombre de pages pour `total` lignes (au moins 1)
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self, total: usize) {
        self.page = (self.page + 1).min(self.page_count(total) - 1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Retour à la première page (nouvelle recherche)
    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Toutes les transactions dans l'ordre de tri courant
    pub fn sorted<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = transactions.iter().collect();
        if let Some((key, order)) = self.sort {
            // CONCEPT : inverser l'Ordering, pas le Vec
            // - Equal reste Equal : les ex-aequo gardent l'ordre de l'API
            rows.sort_by(|a, b| match order {
                SortOrder::Ascending => key.compare(a, b),
                SortOrder::Descending => key.compare(a, b).reverse(),
            });
        }
        rows
    }

    /// Page courante (index borné au nombre de pages)
    pub fn project<'a>(&self, transactions: &'a [Transaction]) -> TablePage<'a> {
        let total = transactions.len();
        let page_count = self.page_count(total);
        let page = self.page.min(page_count - 1);

        let rows = self
            .sorted(transactions)
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            page,
            page_count,
            total,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(txid: &str, value: &str, confirmations: u64, time: i64) -> Transaction {
        Transaction::new(txid, value, confirmations, time).unwrap()
    }

    fn ids(rows: &[&Transaction]) -> Vec<String> {
        rows.iter().map(|tx| tx.txid.clone()).collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("a", "0.5", 10, 1_610_000_000),
            tx("b", "2", 3, 1_600_000_000),
            tx("c", "0.10", 10, 1_610_000_000),
            tx("d", "1", 7, 1_620_000_000),
        ]
    }

    #[test]
    fn test_unsorted_keeps_upstream_order() {
        let table = TransactionTable::new(10);
        assert_eq!(ids(&table.sorted(&sample())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_time_descending_is_stable() {
        let mut table = TransactionTable::new(10);
        table.set_sort(Some((SortKey::Time, SortOrder::Descending)));
        // a et c ont le même timestamp : a reste avant c
        assert_eq!(ids(&table.sorted(&sample())), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_sort_time_ascending_is_stable() {
        let mut table = TransactionTable::new(10);
        table.set_sort(Some((SortKey::Time, SortOrder::Ascending)));
        assert_eq!(ids(&table.sorted(&sample())), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_sort_by_value_is_numeric() {
        let mut table = TransactionTable::new(10);
        table.set_sort(Some((SortKey::Value, SortOrder::Ascending)));
        // "0.10" < "0.5" < "1" < "2" numériquement
        assert_eq!(ids(&table.sorted(&sample())), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_sort_by_confirmations_descending() {
        let mut table = TransactionTable::new(10);
        table.set_sort(Some((SortKey::Confirmations, SortOrder::Descending)));
        assert_eq!(ids(&table.sorted(&sample())), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_pagination() {
        let mut table = TransactionTable::new(3);
        let txs = sample();

        let first = table.project(&txs);
        assert_eq!(first.page_count, 2);
        assert_eq!(ids(&first.rows), vec!["a", "b", "c"]);

        table.next_page(txs.len());
        let second = table.project(&txs);
        assert_eq!(second.page, 1);
        assert_eq!(ids(&second.rows), vec!["d"]);

        // Saturation aux deux bouts
        table.next_page(txs.len());
        assert_eq!(table.page(), 1);
        table.previous_page();
        table.previous_page();
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn test_empty_projection() {
        let table = TransactionTable::new(10);
        let page = table.project(&[]);
        assert!(page.is_empty());
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_page_is_clamped_when_list_shrinks() {
        let mut table = TransactionTable::new(1);
        let txs = sample();
        table.next_page(txs.len());
        table.next_page(txs.len());

        let page = table.project(&txs[..1]);
        assert_eq!(page.page, 0);
        assert_eq!(ids(&page.rows), vec!["a"]);
    }

    #[test]
    fn test_cycle_sort_key() {
        let mut table = TransactionTable::new(10);
        table.cycle_sort_key();
        assert_eq!(table.sort(), Some((SortKey::Time, SortOrder::Descending)));
        table.toggle_order();
        assert_eq!(table.sort(), Some((SortKey::Time, SortOrder::Ascending)));
        table.cycle_sort_key();
        assert_eq!(table.sort(), Some((SortKey::Value, SortOrder::Ascending)));
        table.cycle_sort_key();
        assert_eq!(table.sort(), Some((SortKey::Confirmations, SortOrder::Ascending)));
        table.cycle_sort_key();
        assert_eq!(table.sort(), None);
        table.toggle_order();
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn test_sort_change_resets_page() {
        let mut table = TransactionTable::new(1);
        table.next_page(4);
        assert_eq!(table.page(), 1);
        table.cycle_sort_key();
        assert_eq!(table.page(), 0);
    }
}
