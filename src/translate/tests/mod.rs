//! Tests for translation backends

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{
    DeepLConfig, LibreTranslateConfig, OllamaConfig, TranslatorConfig, TranslatorProvider,
};
use crate::error::{Error, TranslateError};
use crate::translate::*;

fn ollama_config(host: &str) -> TranslatorConfig {
    TranslatorConfig {
        ollama: OllamaConfig {
            host: host.to_string(),
            ..OllamaConfig::default()
        },
        ..TranslatorConfig::default()
    }
}

fn libre_config(host: &str) -> TranslatorConfig {
    TranslatorConfig {
        provider: TranslatorProvider::LibreTranslate,
        libretranslate: LibreTranslateConfig {
            host: host.to_string(),
            api_key: None,
        },
        ..TranslatorConfig::default()
    }
}

fn deepl_config(key: Option<&str>) -> TranslatorConfig {
    TranslatorConfig {
        provider: TranslatorProvider::DeepL,
        deepl: DeepLConfig {
            api_key: key.map(ToString::to_string),
            free: true,
        },
        ..TranslatorConfig::default()
    }
}

#[tokio::test]
async fn test_ollama_translate_sends_chat_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "gemma2:9b",
            "stream": false,
            "options": {"temperature": 0.15, "top_p": 0.9, "num_ctx": 8192}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "  Новый мотоцикл\n"},
            "done": true
        })))
        .mount(&server)
        .await;

    let translator = OllamaTranslator::new(&ollama_config(&server.uri())).unwrap();
    let result = translator.translate("The new motorcycle").await.unwrap();

    assert_eq!(result, "Новый мотоцикл");
    assert_eq!(translator.name(), "Ollama (gemma2:9b)");
}

#[tokio::test]
async fn test_ollama_title_reuses_body_prompt_override() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [{"role": "system", "content": "Translate faithfully."}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "Заголовок"},
            "done": true
        })))
        .mount(&server)
        .await;

    let config = TranslatorConfig {
        ollama: OllamaConfig {
            host: server.uri(),
            prompt: Some("Translate faithfully.".to_string()),
            ..OllamaConfig::default()
        },
        ..TranslatorConfig::default()
    };
    let translator = OllamaTranslator::new(&config).unwrap();

    assert_eq!(
        translator.translate_title("Headline").await.unwrap(),
        "Заголовок"
    );
}

#[tokio::test]
async fn test_ollama_error_status_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let translator = OllamaTranslator::new(&ollama_config(&server.uri())).unwrap();
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::Backend { .. })
    ));
}

#[tokio::test]
async fn test_ollama_empty_translation_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "  \n"},
            "done": true
        })))
        .mount(&server)
        .await;

    let translator = OllamaTranslator::new(&ollama_config(&server.uri())).unwrap();
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::EmptyResult { .. })
    ));
}

#[tokio::test]
async fn test_ollama_check_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .mount(&server)
        .await;

    let translator = OllamaTranslator::new(&ollama_config(&server.uri())).unwrap();
    assert!(translator.check_connection().await.is_ok());

    // A server that does not know the endpoint reports as unavailable
    let empty_server = MockServer::start().await;
    let translator = OllamaTranslator::new(&ollama_config(&empty_server.uri())).unwrap();
    let err = translator.check_connection().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn test_libretranslate_translate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({
            "q": "Two wheels good",
            "source": "en",
            "target": "ru",
            "format": "text"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translatedText": " Два колеса хорошо "
        })))
        .mount(&server)
        .await;

    let translator = LibreTranslateTranslator::new(&libre_config(&server.uri())).unwrap();

    assert_eq!(
        translator.translate("Two wheels good").await.unwrap(),
        "Два колеса хорошо"
    );
    assert_eq!(translator.name(), "LibreTranslate");
}

#[tokio::test]
async fn test_libretranslate_sends_api_key_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({
            "q": "Helmets",
            "api_key": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translatedText": "Шлемы"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = libre_config(&server.uri());
    config.libretranslate.api_key = Some("secret".to_string());
    let translator = LibreTranslateTranslator::new(&config).unwrap();

    assert_eq!(translator.translate("Helmets").await.unwrap(), "Шлемы");
}

#[tokio::test]
async fn test_libretranslate_error_status_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unsupported language"))
        .mount(&server)
        .await;

    let translator = LibreTranslateTranslator::new(&libre_config(&server.uri())).unwrap();
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::Backend { .. })
    ));
}

#[tokio::test]
async fn test_deepl_translate_uppercases_lang_codes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .and(header("Authorization", "DeepL-Auth-Key test-key"))
        .and(body_partial_json(json!({
            "text": ["Brakes"],
            "target_lang": "RU",
            "source_lang": "EN"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [{"detected_source_language": "EN", "text": " Тормоза "}]
        })))
        .mount(&server)
        .await;

    let translator = DeepLTranslator::new(&deepl_config(Some("test-key")))
        .unwrap()
        .with_host(&server.uri());

    assert_eq!(translator.translate("Brakes").await.unwrap(), "Тормоза");
    assert_eq!(translator.name(), "DeepL");
}

#[tokio::test]
async fn test_deepl_invalid_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let translator = DeepLTranslator::new(&deepl_config(Some("bad-key")))
        .unwrap()
        .with_host(&server.uri());
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::InvalidApiKey { .. })
    ));
}

#[tokio::test]
async fn test_deepl_quota_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(ResponseTemplate::new(456).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let translator = DeepLTranslator::new(&deepl_config(Some("test-key")))
        .unwrap()
        .with_host(&server.uri());
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::QuotaExceeded { .. })
    ));
}

#[tokio::test]
async fn test_deepl_empty_translations_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translations": []})))
        .mount(&server)
        .await;

    let translator = DeepLTranslator::new(&deepl_config(Some("test-key")))
        .unwrap()
        .with_host(&server.uri());
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::EmptyResult { .. })
    ));
}

#[tokio::test]
async fn test_deepl_requires_api_key() {
    let translator = DeepLTranslator::new(&deepl_config(None))
        .unwrap()
        .without_key();
    let err = translator.translate("text").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::Unavailable { .. })
    ));

    let translator = DeepLTranslator::new(&deepl_config(None))
        .unwrap()
        .without_key();
    let err = translator.check_connection().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Translate(TranslateError::Unavailable { .. })
    ));
}

#[test]
fn test_create_translator_selects_provider() {
    let translator = create_translator(&TranslatorConfig::default()).unwrap();
    assert!(translator.name().starts_with("Ollama"));

    let config = TranslatorConfig {
        provider: TranslatorProvider::LibreTranslate,
        ..TranslatorConfig::default()
    };
    assert_eq!(create_translator(&config).unwrap().name(), "LibreTranslate");

    let config = TranslatorConfig {
        provider: TranslatorProvider::DeepL,
        ..TranslatorConfig::default()
    };
    assert_eq!(create_translator(&config).unwrap().name(), "DeepL");
}
