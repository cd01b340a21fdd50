use super::*;

/// # Safety
/// Env mutation races with other threads; keep every env test in this one
/// function so the default parallel runner cannot interleave them.
unsafe fn clear_gallery_env() {
    unsafe {
        std::env::remove_var(BASE_URL_VAR);
        std::env::remove_var(FALLBACK_BASE_URL_VAR);
        std::env::remove_var(REQUEST_TIMEOUT_VAR);
        std::env::remove_var(CONNECT_TIMEOUT_VAR);
    }
}

#[test]
fn from_env_resolution_order_and_timeouts() {
    unsafe { clear_gallery_env() };
    assert!(matches!(GalleryConfig::from_env(), Err(ConfigError::MissingBaseUrl)));

    unsafe { std::env::set_var(FALLBACK_BASE_URL_VAR, "http://vite.test/") };
    let cfg = GalleryConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://vite.test");
    assert_eq!(cfg.timeouts, HttpTimeouts::default());

    unsafe {
        std::env::set_var(BASE_URL_VAR, "https://items.test/api/");
        std::env::set_var(REQUEST_TIMEOUT_VAR, "30");
        std::env::set_var(CONNECT_TIMEOUT_VAR, "nope");
    }
    let cfg = GalleryConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://items.test/api");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: Some(30), connect_secs: None });

    let cfg = GalleryConfig::resolve(Some("http://flag.test")).unwrap();
    assert_eq!(cfg.base_url, "http://flag.test");

    // Timeouts still apply when only the flag supplies the URL.
    unsafe {
        clear_gallery_env();
        std::env::set_var(REQUEST_TIMEOUT_VAR, "5");
    }
    assert!(matches!(GalleryConfig::from_env(), Err(ConfigError::MissingBaseUrl)));
    assert_eq!(HttpTimeouts::from_env(), HttpTimeouts { request_secs: Some(5), connect_secs: None });
    let cfg = GalleryConfig::resolve(Some("http://flag.test")).unwrap();
    assert_eq!(cfg.timeouts.request_secs, Some(5));

    unsafe { clear_gallery_env() };
}

#[test]
fn with_base_url_trims_trailing_slashes() {
    let cfg = GalleryConfig::with_base_url("http://localhost:8000//").unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8000");
}

#[test]
fn with_base_url_rejects_blank() {
    assert!(matches!(GalleryConfig::with_base_url("   "), Err(ConfigError::MissingBaseUrl)));
}

#[test]
fn with_base_url_rejects_non_http_scheme() {
    let err = GalleryConfig::with_base_url("ftp://files.test").unwrap_err().to_string();
    assert!(err.contains("unsupported scheme 'ftp'"));
}

#[test]
fn with_base_url_rejects_garbage() {
    let err = GalleryConfig::with_base_url("not a url").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
}
