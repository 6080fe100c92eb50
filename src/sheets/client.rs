use crate::error::{SpendbookError, body_preview};
use crate::google_oauth::AccessTokenProvider;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Identity of one tab inside the spreadsheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

/// Thin REST v4 client bound to one spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    api_url: Url,
    spreadsheet_id: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl SheetsClient {
    pub fn new(
        http: reqwest::Client,
        api_url: Url,
        spreadsheet_id: String,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            http,
            api_url,
            spreadsheet_id,
            tokens,
        }
    }

    /// Tabs of the spreadsheet, in sheet order.
    pub async fn sheet_properties(&self) -> Result<Vec<SheetProperties>, SpendbookError> {
        let url = self.endpoint(&[self.spreadsheet_id.as_str()])?;
        let req = self
            .http
            .request(Method::GET, url)
            .query(&[("fields", "sheets.properties(sheetId,title)")]);
        let meta: SpreadsheetMeta = self.send(req).await?.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    /// Cell values of `range`, row-major, with numbers left unformatted.
    ///
    /// Trailing empty cells and rows are omitted by the API, so rows may be ragged.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<Value>>, SpendbookError> {
        let url = self.endpoint(&[self.spreadsheet_id.as_str(), "values", range])?;
        let req = self.http.request(Method::GET, url).query(&[
            ("valueRenderOption", "UNFORMATTED_VALUE"),
            ("majorDimension", "ROWS"),
        ]);
        let body: ValueRange = self.send(req).await?.json().await?;
        debug!(range, rows = body.values.len(), "sheet values read");
        Ok(body.values)
    }

    /// Overwrites `range` with `rows`; values are stored exactly as given.
    pub async fn update_values(
        &self,
        range: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), SpendbookError> {
        let url = self.endpoint(&[self.spreadsheet_id.as_str(), "values", range])?;
        let req = self
            .http
            .request(Method::PUT, url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRangeBody {
                range,
                major_dimension: "ROWS",
                values: rows,
            });
        self.send(req).await?;
        debug!(range, "sheet values written");
        Ok(())
    }

    /// Applies structural `requests` atomically and returns one reply per request.
    pub async fn batch_update(&self, requests: Vec<Value>) -> Result<Vec<Value>, SpendbookError> {
        let target = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.endpoint(&[target.as_str()])?;
        let req = self
            .http
            .request(Method::POST, url)
            .json(&json!({ "requests": requests }));
        let body: BatchUpdateResponse = self.send(req).await?.json().await?;
        Ok(body.replies)
    }

    /// Creates a tab named `title` and returns its sheet id.
    pub async fn add_sheet(&self, title: &str) -> Result<i64, SpendbookError> {
        let replies = self
            .batch_update(vec![json!({
                "addSheet": { "properties": { "title": title } }
            })])
            .await?;
        replies
            .first()
            .and_then(|reply| reply.pointer("/addSheet/properties/sheetId"))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                SpendbookError::UnexpectedResponse("addSheet reply carries no sheetId".into())
            })
    }

    /// Removes the 1-based sheet rows `first..=last`; rows below shift up.
    pub async fn delete_rows(
        &self,
        sheet_id: i64,
        first: usize,
        last: usize,
    ) -> Result<(), SpendbookError> {
        self.batch_update(vec![json!({
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": first - 1,
                    "endIndex": last,
                }
            }
        })])
        .await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SpendbookError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["v4", "spreadsheets"])
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, SpendbookError> {
        let token = self.tokens.access_token().await?;
        let resp = req.bearer_auth(token).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        Err(SpendbookError::UpstreamStatus {
            status,
            body: body_preview(&body),
        })
    }
}
