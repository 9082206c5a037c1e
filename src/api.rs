// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the shop API and the forecasting service.

use crate::models::{ForecastRequest, ForecastResponse, User};
use crate::utils::http_client;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} is not configured; run `umkmboard config set --key {0} --value <url>`")]
    NotConfigured(&'static str),

    #[error("session rejected by the server; run `umkmboard login` again")]
    Unauthorized,

    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pulls `error` or `message` out of a JSON error body, else the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn check(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(ApiError::Status {
            status,
            message: error_message(&body),
        });
    }
    Ok(resp)
}

pub struct ApiClient {
    http: Client,
    api_url: Option<String>,
    forecast_url: Option<String>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        api_url: Option<String>,
        forecast_url: Option<String>,
        token: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client()?,
            api_url,
            forecast_url,
            token,
        })
    }

    fn api(&self, path: &str) -> ApiResult<String> {
        self.api_url
            .as_deref()
            .map(|base| join_url(base, path))
            .ok_or(ApiError::NotConfigured("api_url"))
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => rb.bearer_auth(t),
            None => rb,
        }
    }

    fn get_text(&self, path: &str) -> ApiResult<String> {
        let url = self.api(path)?;
        tracing::debug!(%url, "GET");
        let resp = check(self.authed(self.http.get(url)).send()?)?;
        Ok(resp.text()?)
    }

    pub fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let url = self.api("auth/login")?;
        let resp = self
            .http
            .post(url)
            .json(&json!({ "username": username, "password": password }))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: error_message(&body),
            });
        }
        let body: LoginResponse = serde_json::from_str(&resp.text()?)?;
        Ok(body.token)
    }

    pub fn me(&self) -> ApiResult<User> {
        Ok(serde_json::from_str(&self.get_text("auth/me")?)?)
    }

    /// Raw `/audit` body; decoding stays with the caller so the verbatim
    /// elements can be cached.
    pub fn audit_payload(&self) -> ApiResult<String> {
        self.get_text("audit")
    }

    pub fn products_payload(&self) -> ApiResult<String> {
        self.get_text("produk")
    }

    pub fn predict(&self, req: &ForecastRequest) -> ApiResult<ForecastResponse> {
        let base = self
            .forecast_url
            .as_deref()
            .ok_or(ApiError::NotConfigured("forecast_url"))?;
        let url = join_url(base, "predict");
        tracing::debug!(%url, product = %req.product_name, steps = req.forecast_steps, "POST");
        let resp = check(self.authed(self.http.post(url)).json(req).send()?)?;
        Ok(serde_json::from_str(&resp.text()?)?)
    }
}
