//! Machine translation capability and its Google Cloud Translation backends.
//!
//! The engine only ever sees the [`Translator`] trait; which REST surface is
//! spoken (v3 with ADC-style bearer tokens, or v2 with an API key) is decided
//! once, from the credential shape.

use color_eyre::eyre::eyre;
use droidloc_core::Result;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = "DroidLoc/cli";
const MIME_TEXT: &str = "text/plain";

/// Default Cloud Translation location for project-based calls.
pub const DEFAULT_LOCATION: &str = "global";

/// Environment fallbacks for credentials the user prefers not to store in
/// config files.
pub const ENV_API_KEY: &str = "DROIDLOC_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "DROIDLOC_ACCESS_TOKEN";

/// One blocking call per missing string. Implementations own any timeout or
/// retry policy; the engine adds none.
pub trait Translator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String>;

    /// Short human-readable description for logs and prompts.
    fn label(&self) -> String;
}

/// Accepted credential shapes, mirrored by config and CLI flags.
#[derive(Debug, Clone)]
pub enum TranslateCredentials {
    CloudProject {
        project_id: String,
        location: String,
        /// Bearer token, e.g. from `gcloud auth application-default print-access-token`.
        access_token: String,
    },
    ApiKey(String),
}

/// Pick the backend matching the credential shape.
pub fn translator_for(creds: &TranslateCredentials) -> Result<Box<dyn Translator>> {
    match creds {
        TranslateCredentials::CloudProject {
            project_id,
            location,
            access_token,
        } => Ok(Box::new(CloudProjectTranslator::new(
            project_id.clone(),
            location.clone(),
            access_token.clone(),
        )?)),
        TranslateCredentials::ApiKey(key) => Ok(Box::new(ApiKeyTranslator::new(key.clone())?)),
    }
}

fn http_client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()?)
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    let mut sample: String = trimmed.chars().take(200).collect();
    if trimmed.chars().count() > 200 {
        sample.push('…');
    }
    sample
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

fn first_candidate(mut translations: Vec<TranslatedText>) -> Result<String> {
    if translations.is_empty() {
        return Err(eyre!("translation service returned no candidates"));
    }
    Ok(translations.remove(0).translated_text)
}

/// Cloud Translation v3, authenticated with a bearer access token.
pub struct CloudProjectTranslator {
    http: reqwest::blocking::Client,
    project_id: String,
    location: String,
    access_token: String,
}

#[derive(Debug, Serialize)]
struct V3Request<'a> {
    contents: [&'a str; 1],
    #[serde(rename = "targetLanguageCode")]
    target_language_code: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct V3Response {
    translations: Vec<TranslatedText>,
}

impl CloudProjectTranslator {
    pub fn new(project_id: String, location: String, access_token: String) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            project_id,
            location,
            access_token,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://translation.googleapis.com/v3/projects/{}/locations/{}:translateText",
            self.project_id, self.location
        )
    }
}

impl Translator for CloudProjectTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.access_token)
            .json(&V3Request {
                contents: [text],
                target_language_code: target_lang,
                mime_type: MIME_TEXT,
            })
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(eyre!(
                "translation request failed with {status}: {}",
                body_snippet(&body)
            ));
        }
        let parsed: V3Response = resp.json()?;
        first_candidate(parsed.translations)
    }

    fn label(&self) -> String {
        format!("Cloud Translation v3, project {}", self.project_id)
    }
}

/// Cloud Translation v2, authenticated with an API key in the query string.
pub struct ApiKeyTranslator {
    http: reqwest::blocking::Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct V2Request<'a> {
    q: [&'a str; 1],
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct V2Response {
    data: V2Data,
}

#[derive(Debug, Deserialize)]
struct V2Data {
    translations: Vec<TranslatedText>,
}

impl ApiKeyTranslator {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            api_key,
        })
    }
}

const V2_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

impl Translator for ApiKeyTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let resp = self
            .http
            .post(V2_ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&V2Request {
                q: [text],
                target: target_lang,
                format: "text",
            })
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(eyre!(
                "translation request failed with {status}: {}",
                body_snippet(&body)
            ));
        }
        let parsed: V2Response = resp.json()?;
        first_candidate(parsed.data.translations)
    }

    fn label(&self) -> String {
        "Cloud Translation v2, API key".to_string()
    }
}
