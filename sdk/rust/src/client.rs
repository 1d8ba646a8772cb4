use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::{Customer, CustomerFilter, CustomerInput};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status and its error body.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct CustomerClient {
    client: Client,
    base_url: String,
}

impl CustomerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, ClientError> {
        let resp = self
            .client
            .post(format!("{}/customers", self.base_url))
            .json(input)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get(&self, id: i64) -> Result<Customer, ClientError> {
        let resp = self
            .client
            .get(format!("{}/customers/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn update(&self, id: i64, input: &CustomerInput) -> Result<Customer, ClientError> {
        let resp = self
            .client
            .put(format!("{}/customers/{}", self.base_url, id))
            .json(input)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/customers", self.base_url))
            .query(filter)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn suspend(&self, id: i64) -> Result<Customer, ClientError> {
        let resp = self
            .client
            .put(format!("{}/customers/{}/suspend", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(format!("{}/customers/{}", self.base_url, id))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) => text,
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(check(resp).await?.json().await?)
}
