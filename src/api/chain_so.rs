// ============================================================================
// API Client : chain.so
// ============================================================================
// Récupère les prix BTC/LTC et les transactions reçues par une adresse
//
// CONCEPTS RUST :
// 1. async/await : appels HTTP non-bloquants (reqwest)
// 2. Serde : désérialisation des enveloppes JSON de chain.so
// 3. Fonctions pures de parsing : testables sans réseau
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::api::{ExplorerApi, ReceivedTransactions};
use crate::config::Config;
use crate::error::FetchError;
use crate::models::money::DecimalRepr;
use crate::models::{select_quote, ExchangeQuote, Symbol, Transaction};

// ============================================================================
// Structures pour parser les réponses JSON
// ============================================================================
// get_price :       { "data": { "prices": [ { "exchange": "...", "price": "..." } ] } }
// get_tx_received : { "status": "success"|"fail", "data": { "address": "...", "txs": [...] } }
// ============================================================================

#[derive(Debug, Deserialize)]
struct PriceResponse {
    data: PriceData,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    prices: Vec<ExchangeQuote>,
}

/// Enveloppe lue en deux temps : le status décide si "data" doit être parsé
#[derive(Debug, Deserialize)]
struct TxReceivedEnvelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TxReceivedData {
    address: String,
    txs: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(default)]
    txid: String,
    value: DecimalRepr,
    confirmations: u64,
    time: i64,
}

// ============================================================================
// Parsing (fonctions pures)
// ============================================================================

/// Parse une réponse get_price et sélectionne la cotation de `exchange`
pub fn parse_price_response(
    body: &str,
    symbol: Symbol,
    exchange: &str,
) -> Result<Decimal, FetchError> {
    let response: PriceResponse = serde_json::from_str(body)?;
    select_quote(&response.data.prices, exchange, symbol)?.price()
}

/// Parse une réponse get_tx_received
///
/// status == "fail" -> NotFound (réponse valide, adresse inconnue)
pub fn parse_tx_received_response(body: &str) -> Result<ReceivedTransactions, FetchError> {
    let envelope: TxReceivedEnvelope = serde_json::from_str(body)?;
    if envelope.status == "fail" {
        return Ok(ReceivedTransactions::NotFound);
    }

    let data = envelope
        .data
        .ok_or_else(|| FetchError::MalformedResponse("champ \"data\" absent".to_string()))?;
    let data: TxReceivedData = serde_json::from_value(data)?;

    // CONCEPT RUST : collect::<Result<Vec<_>, _>>()
    // - S'arrête à la première transaction invalide
    // - La liste est remplacée en entier ou pas du tout
    let transactions = data
        .txs
        .into_iter()
        .map(|raw| Transaction::new(raw.txid, raw.value.into_text(), raw.confirmations, raw.time))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReceivedTransactions::Found {
        address: data.address,
        transactions,
    })
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client de l'API chain.so v2
#[derive(Debug, Clone)]
pub struct ChainSoClient {
    http: reqwest::Client,
    base_url: String,
    reference_exchange: String,
    wallet_network: String,
}

impl ChainSoClient {
    /// Crée un client
    ///
    /// # Arguments
    /// * `base_url` - Racine de l'API (ex: "https://chain.so/api/v2")
    /// * `reference_exchange` - Exchange dont le prix est affiché ("bitfinex")
    /// * `wallet_network` - Réseau des adresses recherchées ("btc")
    /// * `timeout` - Timeout par requête
    pub fn new(
        base_url: impl Into<String>,
        reference_exchange: impl Into<String>,
        wallet_network: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rbravo/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            reference_exchange: reference_exchange.into(),
            wallet_network: wallet_network.into(),
        })
    }

    /// Crée un client à partir de la configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.reference_exchange.clone(),
            config.wallet_network.clone(),
            config.request_timeout(),
        )
    }

    /// Construit l'URL d'un endpoint ; chaque segment est encodé
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Network(format!("URL de base invalide : {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Network(format!("URL de base invalide : {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET et lecture du corps, quel que soit le statut HTTP
    async fn get_body(&self, url: Url) -> Result<(StatusCode, String), FetchError> {
        debug!(url = %url, "Sending HTTP request");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Received HTTP response");
        Ok((status, body))
    }
}

#[async_trait]
impl ExplorerApi for ChainSoClient {
    #[instrument(skip(self))]
    async fn fetch_price(&self, symbol: Symbol) -> Result<Decimal, FetchError> {
        let url = self.endpoint(&["get_price", symbol.api_code(), "USD"])?;
        let (status, body) = self.get_body(url).await?;

        if !status.is_success() {
            warn!(status = %status, "chain.so returned error status");
            return Err(FetchError::Network(format!("HTTP {}", status)));
        }

        let price = parse_price_response(&body, symbol, &self.reference_exchange)?;
        info!(price = %price, exchange = %self.reference_exchange, "Price fetched");
        Ok(price)
    }

    #[instrument(skip(self))]
    async fn fetch_received(&self, address: &str) -> Result<ReceivedTransactions, FetchError> {
        let url = self.endpoint(&["get_tx_received", self.wallet_network.as_str(), address])?;
        let (status, body) = self.get_body(url).await?;
        let parsed = parse_tx_received_response(&body);

        // chain.so répond parfois "fail" avec un statut HTTP d'erreur :
        // c'est toujours une adresse inconnue, pas une panne
        if !status.is_success() {
            return match parsed {
                Ok(ReceivedTransactions::NotFound) => Ok(ReceivedTransactions::NotFound),
                _ => {
                    warn!(status = %status, "chain.so returned error status");
                    Err(FetchError::Network(format!("HTTP {}", status)))
                }
            };
        }

        if let Ok(ReceivedTransactions::Found { transactions, .. }) = &parsed {
            info!(count = transactions.len(), "Received transactions fetched");
        }
        parsed
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use crate::models::parse_decimal;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PRICE_BODY: &str = r#"{
        "status": "success",
        "data": {
            "network": "BTC",
            "prices": [
                { "price": "49990.1", "price_base": "USD", "exchange": "coinbase", "time": 1610000000 },
                { "price": "50000.5", "price_base": "USD", "exchange": "bitfinex", "time": 1610000000 }
            ]
        }
    }"#;

    fn client(base_url: &str) -> ChainSoClient {
        ChainSoClient::new(base_url, "bitfinex", "btc", Duration::from_secs(2)).unwrap()
    }

    /// Sert une seule réponse HTTP brute sur un port local éphémère
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{}/api/v2", addr)
    }

    #[test]
    fn test_parse_price_selects_bitfinex() {
        let price = parse_price_response(PRICE_BODY, Symbol::Btc, "bitfinex").unwrap();
        assert_eq!(price, parse_decimal("50000.5").unwrap());
    }

    #[test]
    fn test_parse_price_without_reference_exchange() {
        let body = r#"{"data":{"prices":[{"exchange":"coinbase","price":"1"}]}}"#;
        let err = parse_price_response(body, Symbol::Ltc, "bitfinex").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::QuoteNotFound);
    }

    #[test]
    fn test_parse_price_ignores_other_exchanges_bad_prices() {
        let body = r#"{"data":{"prices":[{"exchange":"gemini","price":null},{"exchange":"kraken","price":""},{"exchange":"bitfinex","price":"50000.5"}]}}"#;
        let price = parse_price_response(body, Symbol::Btc, "bitfinex").unwrap();
        assert_eq!(price, parse_decimal("50000.5").unwrap());
    }

    #[test]
    fn test_parse_price_bad_reference_price_is_malformed() {
        let body = r#"{"data":{"prices":[{"exchange":"coinbase","price":"1"},{"exchange":"bitfinex","price":null}]}}"#;
        let err = parse_price_response(body, Symbol::Btc, "bitfinex").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_price_malformed() {
        let err = parse_price_response(r#"{"data":{}}"#, Symbol::Btc, "bitfinex").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);

        let err = parse_price_response("<html>", Symbol::Btc, "bitfinex").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_parse_tx_received_fail_is_not_found() {
        let parsed = parse_tx_received_response(r#"{"status":"fail"}"#).unwrap();
        assert_eq!(parsed, ReceivedTransactions::NotFound);

        let parsed = parse_tx_received_response(
            r#"{"status":"fail","data":{"address":"Valid address is required"}}"#,
        )
        .unwrap();
        assert_eq!(parsed, ReceivedTransactions::NotFound);
    }

    #[test]
    fn test_parse_tx_received_empty() {
        let parsed =
            parse_tx_received_response(r#"{"status":"success","data":{"address":"1abc","txs":[]}}"#)
                .unwrap();
        assert_eq!(
            parsed,
            ReceivedTransactions::Found {
                address: "1abc".to_string(),
                transactions: vec![],
            }
        );
    }

    #[test]
    fn test_parse_tx_received_keeps_upstream_order() {
        let body = r#"{
            "status": "success",
            "data": {
                "network": "BTC",
                "address": "1abc",
                "txs": [
                    { "txid": "b", "output_no": 0, "value": "0.5", "confirmations": 10, "time": 1610000000 },
                    { "txid": "a", "output_no": 1, "value": "0.00100000", "confirmations": 200, "time": 1500000000 }
                ]
            }
        }"#;
        match parse_tx_received_response(body).unwrap() {
            ReceivedTransactions::Found { address, transactions } => {
                assert_eq!(address, "1abc");
                let ids: Vec<&str> = transactions.iter().map(|tx| tx.txid.as_str()).collect();
                assert_eq!(ids, vec!["b", "a"]);
                assert_eq!(transactions[1].value, "0.00100000");
                assert_eq!(transactions[1].confirmations, 200);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_tx_received_malformed() {
        let err = parse_tx_received_response(r#"{"status":"success"}"#).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);

        let body = r#"{"status":"success","data":{"address":"1abc","txs":[{"value":"1","confirmations":-1,"time":0}]}}"#;
        let err = parse_tx_received_response(body).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_endpoint() {
        let url = client("https://chain.so/api/v2")
            .endpoint(&["get_price", "btc", "USD"])
            .unwrap();
        assert_eq!(url.as_str(), "https://chain.so/api/v2/get_price/btc/USD");

        let url = client("https://chain.so/api/v2/")
            .endpoint(&["get_tx_received", "btc", "1abc"])
            .unwrap();
        assert_eq!(url.as_str(), "https://chain.so/api/v2/get_tx_received/btc/1abc");
    }

    #[test]
    fn test_endpoint_encodes_address() {
        let url = client("https://chain.so/api/v2")
            .endpoint(&["get_tx_received", "btc", "a/b c"])
            .unwrap();
        assert_eq!(url.as_str(), "https://chain.so/api/v2/get_tx_received/btc/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_fetch_price_from_local_server() {
        let base = serve_once("200 OK", PRICE_BODY).await;
        let price = client(&base).fetch_price(Symbol::Btc).await.unwrap();
        assert_eq!(price, parse_decimal("50000.5").unwrap());
    }

    #[tokio::test]
    async fn test_fetch_received_fail_with_http_error() {
        let base = serve_once("404 Not Found", r#"{"status":"fail","data":{}}"#).await;
        let result = client(&base).fetch_received("nope").await.unwrap();
        assert_eq!(result, ReceivedTransactions::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_price_http_error_is_network() {
        let base = serve_once("500 Internal Server Error", "oops").await;
        let err = client(&base).fetch_price(Symbol::Ltc).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network() {
        // Bind puis drop : le port est libre, la connexion est refusée
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/api/v2", addr))
            .fetch_received("1abc")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }
}
