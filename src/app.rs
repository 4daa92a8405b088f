// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Pas de Mutex : App appartient au seul thread UI ; le worker ne la
//    touche jamais, il renvoie des Outcome que l'UI applique ici
//
// PATTERN : "Application State"
// - Les intentions de l'utilisateur produisent des Command (pour le worker)
// - Les Outcome du worker sont appliqués au PriceFeed / WalletLookup
// ============================================================================

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::Symbol;
use crate::state::{PriceFeed, TablePage, TransactionTable, WalletLookup};
use crate::worker::{Command, Outcome};

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : prix (+ portefeuille sur la page Bitcoin)
    Dashboard,

    /// Mode saisie de l'adresse du portefeuille
    /// - Enter valide, ESC annule
    AddressInput,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Page affichée (un symbole par page)
    page: Symbol,

    /// Barre latérale de navigation ouverte ou fermée (pur chrome UI)
    sidebar_open: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Prix de la page courante ; recréé à chaque changement de page
    price_feed: PriceFeed,

    /// Recherche de portefeuille (page Bitcoin)
    wallet: WalletLookup,

    /// Tri et pagination du tableau de transactions
    table: TransactionTable,

    /// Intervalle de revalidation des prix
    refresh_interval: Duration,

    /// Buffer de saisie de l'adresse
    pub input_buffer: String,

    /// Prompt affiché en mode saisie
    pub input_prompt: String,

    /// Two-step quit : première pression de 'q' -> confirmation
    pub confirm_quit: bool,
}

impl App {
    /// Crée l'application sur la page Bitcoin
    pub fn new(refresh_interval: Duration, page_size: usize) -> Self {
        let page = Symbol::default();
        Self {
            running: true,
            page,
            sidebar_open: false,
            current_screen: Screen::Dashboard,
            price_feed: PriceFeed::new(page, refresh_interval),
            wallet: WalletLookup::new(),
            table: TransactionTable::new(page_size),
            refresh_interval,
            input_buffer: String::new(),
            input_prompt: String::new(),
            confirm_quit: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.refresh_interval(), config.page_size)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Accès en lecture pour le rendu
    // ========================================================================

    pub fn page(&self) -> Symbol {
        self.page
    }

    pub fn price_feed(&self) -> &PriceFeed {
        &self.price_feed
    }

    pub fn wallet(&self) -> &WalletLookup {
        &self.wallet
    }

    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    /// La page courante propose la recherche de portefeuille
    pub fn has_wallet_panel(&self) -> bool {
        self.page == Symbol::Btc
    }

    /// Page du tableau à afficher, seulement si la recherche a abouti
    pub fn wallet_page(&self) -> Option<TablePage<'_>> {
        self.wallet
            .transactions()
            .map(|transactions| self.table.project(transactions))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Affiche la page d'un symbole
    ///
    /// Un autre symbole = un nouveau PriceFeed : l'ancien est jeté avec son
    /// jeton, ses réponses tardives seront ignorées.
    pub fn show_page(&mut self, symbol: Symbol) {
        if symbol == self.page {
            return;
        }
        info!(page = %symbol, "Switching page");
        self.page = symbol;
        self.price_feed = PriceFeed::new(symbol, self.refresh_interval);
        if !self.has_wallet_panel() {
            self.cancel_input();
        }
    }

    pub fn next_page(&mut self) {
        self.show_page(self.page.next());
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    // ========================================================================
    // Prix
    // ========================================================================

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// Retourne la commande de revalidation si elle est due.
    pub fn tick(&mut self, now: Instant) -> Option<Command> {
        let symbol = self.page;
        self.price_feed
            .poll_due(now)
            .map(|token| Command::FetchPrice { symbol, token })
    }

    /// Rafraîchissement manuel ('r') : remplace la requête en cours
    pub fn refresh_price(&mut self, now: Instant) -> Command {
        let token = self.price_feed.start_refresh(now);
        Command::FetchPrice {
            symbol: self.page,
            token,
        }
    }

    /// Le terminal a retrouvé le focus
    pub fn on_focus_gained(&mut self, now: Instant) -> Option<Command> {
        let symbol = self.page;
        self.price_feed
            .revalidate(now)
            .map(|token| Command::FetchPrice { symbol, token })
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat ; retourne false s'il était périmé
    pub fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Price {
                symbol,
                token,
                result,
            } => {
                if symbol != self.price_feed.symbol() {
                    debug!(%symbol, %token, "Ignoring price for a page no longer shown");
                    return false;
                }
                self.price_feed.apply(token, result)
            }
            Outcome::Wallet { token, result } => {
                let applied = self.wallet.apply(token, result);
                if applied {
                    self.table.reset();
                }
                applied
            }
        }
    }

    /// La commande n'a pas pu être transmise au worker
    pub fn command_failed(&mut self, command: Command) {
        let error = FetchError::Network("worker indisponible".to_string());
        self.apply_outcome(Outcome::failed(command, error));
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode saisie (page Bitcoin uniquement)
    pub fn start_input(&mut self) {
        if !self.has_wallet_panel() {
            return;
        }
        self.current_screen = Screen::AddressInput;
        self.input_buffer.clear();
        self.input_prompt = "Endereço da carteira: ".to_string();
    }

    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Valide la saisie et lance la recherche
    ///
    /// Adresse vide : on quitte le mode saisie, l'état du portefeuille ne
    /// change pas et aucune commande n'est émise.
    pub fn submit_input(&mut self) -> Option<Command> {
        let value = std::mem::take(&mut self.input_buffer);
        self.cancel_input();

        let (token, address) = self.wallet.submit(&value)?;
        self.table.reset();
        Some(Command::LookupWallet { address, token })
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::AddressInput
    }

    // ========================================================================
    // Tableau
    // ========================================================================

    fn transaction_count(&self) -> usize {
        self.wallet.transactions().map_or(0, |txs| txs.len())
    }

    pub fn cycle_sort(&mut self) {
        self.table.cycle_sort_key();
    }

    pub fn toggle_sort_order(&mut self) {
        self.table.toggle_order();
    }

    pub fn next_table_page(&mut self) {
        let total = self.transaction_count();
        self.table.next_page(total);
    }

    pub fn previous_table_page(&mut self) {
        self.table.previous_page();
    }

    // ========================================================================
    // Quit confirmation
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ReceivedTransactions;
    use crate::models::{parse_decimal, Transaction};
    use crate::state::{PriceStatus, WalletStatus};

    fn app() -> App {
        App::new(Duration::from_secs(30), 2)
    }

    fn price_command(command: Option<Command>) -> (Symbol, crate::state::RequestToken) {
        match command {
            Some(Command::FetchPrice { symbol, token }) => (symbol, token),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_app_creation() {
        let app = app();
        assert!(app.is_running());
        assert_eq!(app.page(), Symbol::Btc);
        assert!(!app.is_sidebar_open());
        assert_eq!(app.price_feed().status(), &PriceStatus::Loading);
        assert_eq!(app.wallet().status(), &WalletStatus::Idle);
    }

    #[test]
    fn test_first_tick_fetches_price() {
        let mut app = app();
        let now = Instant::now();
        let (symbol, token) = price_command(app.tick(now));
        assert_eq!(symbol, Symbol::Btc);
        assert!(app.tick(now).is_none());

        assert!(app.apply_outcome(Outcome::Price {
            symbol,
            token,
            result: Ok(parse_decimal("50000.5").unwrap()),
        }));
        assert_eq!(app.price_feed().display(), "$50,000.50");
    }

    #[test]
    fn test_page_switch_creates_new_feed() {
        let mut app = app();
        let now = Instant::now();
        let (_, btc_token) = price_command(app.tick(now));

        app.show_page(Symbol::Ltc);
        assert_eq!(app.price_feed().symbol(), Symbol::Ltc);
        assert_eq!(app.price_feed().status(), &PriceStatus::Loading);

        // Réponse tardive de l'ancien feed BTC
        assert!(!app.apply_outcome(Outcome::Price {
            symbol: Symbol::Btc,
            token: btc_token,
            result: Ok(parse_decimal("1").unwrap()),
        }));

        let (symbol, _) = price_command(app.tick(now));
        assert_eq!(symbol, Symbol::Ltc);
    }

    #[test]
    fn test_back_to_same_symbol_ignores_old_token() {
        let mut app = app();
        let now = Instant::now();
        let (_, old_token) = price_command(app.tick(now));
        app.show_page(Symbol::Ltc);
        app.show_page(Symbol::Btc);
        let _ = app.tick(now);

        assert!(!app.apply_outcome(Outcome::Price {
            symbol: Symbol::Btc,
            token: old_token,
            result: Ok(parse_decimal("1").unwrap()),
        }));
        assert_eq!(app.price_feed().status(), &PriceStatus::Loading);
    }

    #[test]
    fn test_sidebar_toggle() {
        let mut app = app();
        app.toggle_sidebar();
        assert!(app.is_sidebar_open());
        app.toggle_sidebar();
        assert!(!app.is_sidebar_open());
    }

    #[test]
    fn test_submit_address() {
        let mut app = app();
        app.start_input();
        assert!(app.is_in_input_mode());
        for c in "1abc".chars() {
            app.append_char(c);
        }

        let command = app.submit_input().unwrap();
        assert!(!app.is_in_input_mode());
        match command {
            Command::LookupWallet { address, .. } => assert_eq!(address, "1abc"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(app.wallet().is_loading());
    }

    #[test]
    fn test_empty_submit_does_nothing() {
        let mut app = app();
        app.start_input();
        assert!(app.submit_input().is_none());
        assert_eq!(app.wallet().status(), &WalletStatus::Idle);
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_no_wallet_input_on_litecoin_page() {
        let mut app = app();
        app.show_page(Symbol::Ltc);
        app.start_input();
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_wallet_table_paging() {
        let mut app = app();
        app.start_input();
        app.append_char('x');
        let token = app.submit_input().unwrap().token();

        let transactions = (0..5)
            .map(|i| Transaction::new(format!("t{}", i), "1", i, 1_600_000_000 + i as i64).unwrap())
            .collect();
        assert!(app.apply_outcome(Outcome::Wallet {
            token,
            result: Ok(ReceivedTransactions::Found {
                address: "x".to_string(),
                transactions,
            }),
        }));

        let page = app.wallet_page().unwrap();
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows.len(), 2);

        app.next_table_page();
        app.next_table_page();
        app.next_table_page();
        assert_eq!(app.wallet_page().unwrap().page, 2);
        assert_eq!(app.wallet_page().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_command_failed_sets_error() {
        let mut app = app();
        let command = app.refresh_price(Instant::now());
        app.command_failed(command);
        assert!(matches!(app.price_feed().status(), PriceStatus::Error(_)));
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = app();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }
}
