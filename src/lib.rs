pub mod config;
pub mod error;
pub mod geocode;
pub mod history;
pub mod http;
pub mod images;
pub mod llm;
pub mod output;
pub mod planner;
pub mod prompts;
pub mod text;
pub mod trip;
pub mod weather;
pub mod web;

/// CLI override for LLM provider/model.
pub struct LlmOverride {
    pub provider: Option<llm::Provider>,
    pub model: Option<String>,
}

/// Build an LlmClient from config + optional CLI override.
///
/// A provider switched on the command line brings its own defaults: the
/// configured model, key variable and base URL only apply to the configured
/// provider.
pub fn build_llm_client(
    llm_config: &config::LlmConfig,
    llm_override: Option<&LlmOverride>,
) -> error::Result<llm::LlmClient> {
    let provider = llm_override
        .and_then(|o| o.provider.clone())
        .unwrap_or_else(|| llm_config.provider.clone());
    let switched = provider != llm_config.provider;

    let model = llm_override
        .and_then(|o| o.model.clone())
        .or_else(|| (!switched).then(|| llm_config.model.clone()).flatten())
        .unwrap_or_else(|| provider.default_model().into());
    let (api_key_env, base_url) = if switched {
        (None, None)
    } else {
        (llm_config.api_key_env.clone(), llm_config.base_url.clone())
    };

    llm::LlmClient::from_config(provider, model, llm_config.max_tokens, api_key_env, base_url)
}

pub fn make_llm_override(provider: Option<String>, model: Option<String>) -> Option<LlmOverride> {
    if provider.is_none() && model.is_none() {
        return None;
    }
    Some(LlmOverride {
        provider: provider.map(|p| llm::Provider::from_name(&p)),
        model,
    })
}
