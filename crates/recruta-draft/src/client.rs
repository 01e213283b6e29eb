//! HTTP text generator speaking the Ollama `/api/generate` protocol.

use crate::error::{DraftError, DraftResult};
use crate::types::{GenerateOptions, GenerateRequest, GenerateResponse};
use recruta_config::GeneratorConfig;
use reqwest::Client;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

/// Produces text from a prompt.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> DraftResult<String>;
}

/// Blocking client for a remote text generation service.
pub struct HttpGenerator {
    client: Client,
    host: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    rt: Runtime,
}

impl HttpGenerator {
    /// Create a generator from configuration.
    ///
    /// Fails when generation is disabled or the configured key variable is unset.
    pub fn from_config(config: &GeneratorConfig) -> DraftResult<Self> {
        if !config.enabled {
            return Err(DraftError::Disabled);
        }

        let api_key = match config.api_key_env.trim() {
            "" => None,
            var => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Some(key.trim().to_string()),
                _ => {
                    return Err(DraftError::MissingCredential {
                        var: var.to_string(),
                    })
                }
            },
        };

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DraftError::Http)?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DraftError::Runtime(e.to_string()))?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout,
            rt,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the service answers at all.
    pub fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        self.rt.block_on(async {
            match self.authorized(self.client.get(&url)).send().await {
                Ok(resp) => resp.status().is_success(),
                Err(_) => false,
            }
        })
    }

    /// Send one generation request.
    pub async fn generate_async(&self, request: GenerateRequest) -> DraftResult<String> {
        let url = format!("{}/api/generate", self.host);
        debug!("Generating with model {}", request.model);

        let mut request = request;
        request.stream = false;

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if text.contains("not found") || status.as_u16() == 404 {
                return Err(DraftError::ModelNotFound {
                    model: request.model,
                });
            }

            return Err(DraftError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await?;
        parse_generate_response(&body)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> DraftError {
        if e.is_connect() {
            DraftError::ServerNotRunning {
                host: self.host.clone(),
            }
        } else if e.is_timeout() {
            DraftError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            DraftError::Http(e)
        }
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&self, prompt: &str) -> DraftResult<String> {
        let request = GenerateRequest::new(&self.model, prompt)
            .with_system(
                "Você é um consultor de recrutamento. Escreva em português do Brasil, \
                 em tom profissional, sem listas e sem preâmbulos.",
            )
            .with_options(GenerateOptions::new().with_temperature(0.3).with_num_predict(400));

        self.rt.block_on(self.generate_async(request))
    }
}

/// Pull the generated text out of a non-streamed `/api/generate` body.
fn parse_generate_response(body: &str) -> DraftResult<String> {
    let body: GenerateResponse = serde_json::from_str(body)?;
    let text = body.response.trim().to_string();
    if text.is_empty() {
        return Err(DraftError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key_env: &str) -> GeneratorConfig {
        GeneratorConfig {
            api_key_env: api_key_env.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_generator() {
        let config = GeneratorConfig {
            enabled: false,
            ..config("")
        };
        let err = HttpGenerator::from_config(&config).err().unwrap();
        assert!(matches!(err, DraftError::Disabled));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_missing_credential() {
        let err = HttpGenerator::from_config(&config("RECRUTA_TEST_KEY_THAT_IS_NEVER_SET"))
            .err()
            .unwrap();
        match err {
            DraftError::MissingCredential { var } => {
                assert_eq!(var, "RECRUTA_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_no_credential_needed() {
        let mut cfg = config("");
        cfg.host = "http://localhost:11434/".to_string();
        let generator = HttpGenerator::from_config(&cfg).unwrap();
        assert_eq!(generator.host, "http://localhost:11434");
        assert!(generator.api_key.is_none());
        assert_eq!(generator.model(), "llama3.1:8b");
    }

    #[test]
    fn test_unreachable_service() {
        let cfg = GeneratorConfig {
            host: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..config("")
        };
        let generator = HttpGenerator::from_config(&cfg).unwrap();
        assert!(!generator.is_available());

        let err = generator.generate("teste").unwrap_err();
        assert!(matches!(
            err,
            DraftError::ServerNotRunning { .. } | DraftError::Timeout { .. } | DraftError::Http(_)
        ));
    }

    #[test]
    fn test_parse_generate_response() {
        let body = r#"{"model":"llama3.1:8b","response":"  Perfil sólido.\n","done":true}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "Perfil sólido.");

        assert!(matches!(
            parse_generate_response(r#"{"response":"   ","done":true}"#),
            Err(DraftError::EmptyResponse)
        ));
        assert!(matches!(
            parse_generate_response("<html>Bad Gateway</html>"),
            Err(DraftError::Json(_))
        ));
    }
}
