use api_types::ErrorResponse;
use ledger::{Account, AccountNew, RemoteError, RemoteLedger, Transaction, TransactionNew};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// reqwest-backed implementation of the backend contract.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::BaseUrl(err.to_string()))?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Transport(format!("invalid base_url: {err}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<T, RemoteError> {
        let res = request.send().await.map_err(|err| {
            tracing::debug!("request failed: {err}");
            RemoteError::Transport(err.to_string())
        })?;
        tracing::debug!("{} {}", res.status(), res.url());
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> std::result::Result<T, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return res
            .json::<T>()
            .await
            .map_err(|err| RemoteError::Decode(err.to_string()));
    }

    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_text)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

impl RemoteLedger for Client {
    async fn list_accounts(&self) -> std::result::Result<Vec<Account>, RemoteError> {
        let endpoint = self.endpoint("api/accounts")?;
        self.send(self.http.get(endpoint)).await
    }

    async fn list_transactions(
        &self,
        account_id: &str,
    ) -> std::result::Result<Vec<Transaction>, RemoteError> {
        let mut endpoint = self.endpoint("api/transactions")?;
        endpoint
            .path_segments_mut()
            .map_err(|_| RemoteError::Transport("base_url cannot carry a path".to_string()))?
            .push(account_id);
        self.send(self.http.get(endpoint)).await
    }

    async fn create_account(
        &self,
        payload: &AccountNew,
    ) -> std::result::Result<Account, RemoteError> {
        let endpoint = self.endpoint("api/accounts")?;
        self.send(self.http.post(endpoint).json(payload)).await
    }

    async fn create_transaction(
        &self,
        payload: &TransactionNew,
    ) -> std::result::Result<Transaction, RemoteError> {
        let endpoint = self.endpoint("api/transactions")?;
        self.send(self.http.post(endpoint).json(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use ledger::Amount;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    async fn setup() -> (MockServer, Client) {
        let server = MockServer::start().await;
        let client = Client::new(&server.uri()).unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn lists_accounts() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a1", "name": "Cash", "createdAt": "2024-01-01T00:00:00.000Z"},
                {"_id": "a2", "name": "Bank"}
            ])))
            .mount(&server)
            .await;

        let accounts = client.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, "a1");
        assert_eq!(accounts[1].name, "Bank");
    }

    #[tokio::test]
    async fn lists_transactions_for_account() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/transactions/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "_id": "t1",
                "accountId": "a1",
                "dateOfEntry": "2024-02-01T00:00:00.000Z",
                "dueOn": null,
                "reference": "INV-001",
                "description": "Rent",
                "debit": 120.5,
                "credit": 0,
                "remarks": "",
                "balance": -120.5
            }])))
            .mount(&server)
            .await;

        let items = client.list_transactions("a1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].reference, "INV-001");
        assert_eq!(items[0].debit, Amount::new(12_050));
        assert_eq!(items[0].balance, Amount::new(-12_050));
    }

    #[tokio::test]
    async fn creates_account_with_json_body() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/accounts"))
            .and(body_json(json!({"name": "Travel"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"_id": "a9", "name": "Travel"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let created = client
            .create_account(&AccountNew {
                name: "Travel".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "a9");
    }

    #[tokio::test]
    async fn creates_transaction_with_wire_field_names() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/transactions"))
            .and(body_json(json!({
                "accountId": "a1",
                "dateOfEntry": "2024-02-01",
                "dueOn": null,
                "reference": "",
                "description": "Coffee",
                "debit": 10,
                "credit": 0,
                "remarks": ""
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_id": "t2",
                "accountId": "a1",
                "dateOfEntry": "2024-02-01T00:00:00.000Z",
                "description": "Coffee",
                "debit": 10,
                "credit": 0,
                "balance": -10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client
            .create_transaction(&TransactionNew {
                account_id: "a1".to_string(),
                date_of_entry: "2024-02-01".to_string(),
                due_on: None,
                reference: String::new(),
                description: "Coffee".to_string(),
                debit: Amount::new(1000),
                credit: Amount::ZERO,
                remarks: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.balance, Amount::new(-1000));
    }

    #[tokio::test]
    async fn non_success_carries_server_message() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "database down"})),
            )
            .mount(&server)
            .await;

        let err = client.list_accounts().await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Status {
                status: 500,
                message: "database down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_success_without_body_uses_reason() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/transactions/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client.list_transactions("missing").await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Status {
                status: 404,
                message: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client.list_accounts().await.unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = Client::new("http://127.0.0.1:9").unwrap();
        let err = client.list_accounts().await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(matches!(Client::new("not a url"), Err(AppError::BaseUrl(_))));
    }
}
