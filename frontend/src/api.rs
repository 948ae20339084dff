use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use gloo_storage::{LocalStorage, Storage};
use shared::session::parse_credits;
use shared::{
    CreditsRefresher, FieldValue, HttpReply, Payload, Submission, TokenSource, Transport,
    TransportError, UserProfile, VisionConfig,
};
use std::future::Future;
use wasm_bindgen::JsValue;
use web_sys::{FormData, UrlSearchParams};
use yew::Callback;

pub const TOKEN_KEY: &str = "auth_token";
const CONFIG_PATH: &str = "/vision.yaml";

pub type ApiResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Loads `/vision.yaml`. The caller falls back to defaults on error.
pub async fn load_config() -> ApiResult<VisionConfig> {
    let resp = Request::get(CONFIG_PATH).send().await?;
    if !resp.ok() {
        return Err(format!("{} returned {}", CONFIG_PATH, resp.status()).into());
    }
    let source = resp.text().await?;
    Ok(VisionConfig::from_yaml_str(&source)?)
}

pub async fn fetch_user_info(config: &VisionConfig, token: &str) -> ApiResult<UserProfile> {
    log::info!("🔍 Fetching user info");
    let resp = Request::get(config.profile_url()?.as_str())
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await?;

    if !resp.ok() {
        let status = resp.status();
        let error_text = resp.text().await.unwrap_or_default();
        log::error!("❌ /auth/me failed with status {}: {}", status, error_text);
        return Err(format!("Failed to fetch user info: {} - {}", status, error_text).into());
    }
    let profile = resp.json::<UserProfile>().await?;
    log::info!("✅ User info fetched: {}", profile.email);
    Ok(profile)
}

pub async fn fetch_credits(config: &VisionConfig, token: &str, user_id: &str) -> ApiResult<u32> {
    let resp = Request::get(config.credits_url(user_id)?.as_str())
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !resp.ok() {
        return Err(TransportError::Status { status, body }.into());
    }
    Ok(parse_credits(&body)?)
}

pub fn stored_token() -> Option<String> {
    LocalStorage::get::<String>(TOKEN_KEY)
        .ok()
        .filter(|t| !t.is_empty())
}

pub fn store_token(token: &str) {
    if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
        log::error!("❌ Failed to persist auth token: {:?}", e);
    }
}

pub fn clear_token() {
    LocalStorage::delete(TOKEN_KEY);
}

/// Moves a `?token=` left by the login redirect into storage and strips
/// it from the address bar.
pub fn capture_token_from_url() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let search = location.search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    let token = params.get("token").filter(|t| !t.is_empty())?;

    log::info!("🔄 Token received from login redirect (length: {})", token.len());
    store_token(&token);
    params.delete("token");

    let query = String::from(params.to_string());
    let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
    let cleaned = if query.is_empty() {
        pathname
    } else {
        format!("{}?{}", pathname, query)
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&cleaned));
    }
    Some(token)
}

/// Reads the token from storage at call time, so a logout in another tab
/// is seen by the next submission.
pub struct LocalStorageTokens;

impl TokenSource for LocalStorageTokens {
    fn access_token(&self) -> Option<String> {
        stored_token()
    }
}

pub struct CreditsCallback(pub Callback<String>);

impl CreditsRefresher for CreditsCallback {
    fn refresh(&self, user_id: &str) {
        self.0.emit(user_id.to_string());
    }
}

/// Multipart POST through the browser's fetch.
pub struct GlooTransport;

impl Transport<GlooFile> for GlooTransport {
    fn post(
        &self,
        submission: &Submission<GlooFile>,
    ) -> impl Future<Output = Result<HttpReply, TransportError>> {
        let form = build_form(&submission.payload);
        let url = submission.url.to_string();
        let token = submission.bearer_token.clone();
        let request_id = submission.request_id;

        async move {
            let form = form?;
            let mut builder = Request::post(&url);
            if let Some(token) = token {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }
            let request = builder
                .body(form)
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            log::info!("request {} answered with {}", request_id, status);
            Ok(HttpReply { status, body })
        }
    }
}

fn build_form(payload: &Payload<GlooFile>) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(js_error)?;
    for field in &payload.fields {
        match &field.value {
            FieldValue::Text(value) => form.append_with_str(field.name, value),
            FieldValue::File(file) => {
                form.append_with_blob_and_filename(field.name, file.as_ref(), &file.name())
            }
        }
        .map_err(js_error)?;
    }
    Ok(form)
}

fn js_error(err: JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", err))
}
