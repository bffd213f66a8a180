//! Shared HTTP response helpers for the survey client.

use serde::de::DeserializeOwned;

use crate::error::SurveyError;

/// Return the response unchanged on success, or [`SurveyError::Api`] with
/// the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SurveyError> {
    if !resp.status().is_success() {
        return Err(SurveyError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Read the whole body and decode it as JSON.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, SurveyError> {
    let body = resp.text().await?;
    parse_json(&body)
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, SurveyError> {
    serde_json::from_str(body).map_err(|e| SurveyError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_api_error_keeps_body() {
        let err = check_response(mock_response(502, "bad gateway"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Api { status: 502, ref message } if message == "bad gateway"
        ));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }

    #[tokio::test]
    async fn read_json_reports_parse_errors() {
        let err = read_json::<serde_json::Value>(mock_response(200, "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::Parse(_)));
    }
}
