use api_types::{
    StatusAck,
    category::{CategoryAnalysis, CategoryLimit},
    cycle::{CurrentCycle, CycleAnalysis, CycleStarted, CycleSummary},
    invoice::{Invoice, InvoiceUpdate},
    rule::{Rule, RuleNew},
    sms::{SmsRequest, SmsResponse},
};
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    NotFound,
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

impl ErrorResponse {
    fn message(self) -> String {
        match self.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

fn error_for_status(status: StatusCode, detail: String) -> ClientError {
    match status.as_u16() {
        404 => ClientError::NotFound,
        422 => ClientError::Validation(detail),
        _ => ClientError::Server(detail),
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint {path}: {err}")))
    }

    async fn decode<T: DeserializeOwned>(
        res: reqwest::Response,
    ) -> std::result::Result<T, ClientError> {
        if res.status().is_success() {
            return res.json::<T>().await.map_err(ClientError::Transport);
        }

        let status = res.status();
        let detail = res
            .json::<ErrorResponse>()
            .await
            .map(ErrorResponse::message)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(error_for_status(status, detail))
    }

    pub async fn invoices(&self) -> std::result::Result<Vec<Invoice>, ClientError> {
        let endpoint = self.endpoint("invoices/")?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn process_sms(&self, message: &str) -> std::result::Result<SmsResponse, ClientError> {
        let endpoint = self.endpoint("sms/")?;
        let payload = SmsRequest {
            message: message.to_string(),
        };
        let res = self
            .http
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn categories(&self) -> std::result::Result<Vec<String>, ClientError> {
        let endpoint = self.endpoint("categories/")?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn category_remaining_limit(
        &self,
        category: &str,
    ) -> std::result::Result<CategoryLimit, ClientError> {
        let endpoint = self.endpoint(&format!("category/remaining_limit/{category}"))?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn category_analysis(
        &self,
        category: &str,
    ) -> std::result::Result<CategoryAnalysis, ClientError> {
        let endpoint = self.endpoint(&format!("category/analysis/{category}"))?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn rules_list(&self) -> std::result::Result<Vec<Rule>, ClientError> {
        let endpoint = self.endpoint("rules_list/")?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn rule_create(&self, rule: &RuleNew) -> std::result::Result<StatusAck, ClientError> {
        let endpoint = self.endpoint("rules/")?;
        let res = self
            .http
            .post(endpoint)
            .json(rule)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn rule_update(
        &self,
        rule_id: i64,
        rule: &RuleNew,
    ) -> std::result::Result<StatusAck, ClientError> {
        let endpoint = self.endpoint(&format!("rule/{rule_id}"))?;
        let res = self
            .http
            .patch(endpoint)
            .json(rule)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn rule_delete(&self, rule_id: i64) -> std::result::Result<StatusAck, ClientError> {
        let endpoint = self.endpoint(&format!("rules/{rule_id}"))?;
        let res = self
            .http
            .delete(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn invoice_update(
        &self,
        invoice_id: i64,
        update: &InvoiceUpdate,
    ) -> std::result::Result<StatusAck, ClientError> {
        let endpoint = self.endpoint(&format!("invoice/{invoice_id}"))?;
        let res = self
            .http
            .patch(endpoint)
            .json(update)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn invoice_delete(
        &self,
        invoice_id: i64,
    ) -> std::result::Result<StatusAck, ClientError> {
        let endpoint = self.endpoint(&format!("invoice/{invoice_id}"))?;
        let res = self
            .http
            .delete(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn cycle_start(
        &self,
        start_date: NaiveDate,
    ) -> std::result::Result<CycleStarted, ClientError> {
        let endpoint = self.endpoint("cycle/start")?;
        let res = self
            .http
            .post(endpoint)
            .query(&[("start_date", start_date.format("%Y-%m-%d").to_string())])
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn cycle_current(&self) -> std::result::Result<CurrentCycle, ClientError> {
        let endpoint = self.endpoint("cycle/current")?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn cycle_history(
        &self,
        limit: u32,
    ) -> std::result::Result<Vec<CycleSummary>, ClientError> {
        let endpoint = self.endpoint("cycle/history")?;
        let res = self
            .http
            .get(endpoint)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn cycle_analysis(
        &self,
        cycle_id: i64,
    ) -> std::result::Result<CycleAnalysis, ClientError> {
        let endpoint = self.endpoint(&format!("cycle/{cycle_id}/analysis"))?;
        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_404_maps_to_not_found() {
        let err = error_for_status(StatusCode::NOT_FOUND, "Not Found".to_string());
        assert!(matches!(err, ClientError::NotFound));
    }

    #[test]
    fn status_422_maps_to_validation() {
        let err = error_for_status(StatusCode::UNPROCESSABLE_ENTITY, "bad field".to_string());
        assert!(matches!(err, ClientError::Validation(msg) if msg == "bad field"));
    }

    #[test]
    fn unexpected_status_maps_to_server() {
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(matches!(err, ClientError::Server(msg) if msg == "boom"));
    }

    #[test]
    fn endpoint_joins_paths_against_the_base() {
        let client = Client::new("http://127.0.0.1:8000").unwrap();
        let url = client.endpoint("rules_list/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/rules_list/");
    }

    #[test]
    fn category_endpoints_keep_the_name_as_last_segment() {
        let client = Client::new("http://127.0.0.1:8000").unwrap();
        let limit = client
            .endpoint(&format!("category/remaining_limit/{}", "Food"))
            .unwrap();
        let analysis = client
            .endpoint(&format!("category/analysis/{}", "Food"))
            .unwrap();
        assert_eq!(limit.path(), "/category/remaining_limit/Food");
        assert_eq!(analysis.path(), "/category/analysis/Food");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(Client::new("not a base url").is_err());
    }

    #[test]
    fn string_detail_is_used_verbatim() {
        let body: ErrorResponse = serde_json::from_str(r#"{"detail": "No such cycle"}"#).unwrap();
        assert_eq!(body.message(), "No such cycle");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let raw = r#"{"detail": [{"loc": ["query", "start_date"], "msg": "field required"}]}"#;
        let body: ErrorResponse = serde_json::from_str(raw).unwrap();
        assert!(body.message().contains("field required"));
    }
}
