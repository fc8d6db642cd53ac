//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

const FALLBACK_OS: &str = "Windows NT 10.0; Win64; x64";

/// Generate a random but realistic desktop browser user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let chrome_versions = ["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];
    let firefox_versions = ["123.0", "124.0", "125.0"];

    let os_strings = [
        "Windows NT 10.0; Win64; x64",
        "Macintosh; Intel Mac OS X 10_15_7",
        "X11; Linux x86_64",
    ];

    let os = os_strings.choose(&mut rng).copied().unwrap_or(FALLBACK_OS);

    // Pages are more likely to serve full markup to Chrome
    if rng.gen_range(0..10) < 7 {
        let chrome = chrome_versions.choose(&mut rng).copied().unwrap_or("124.0.0.0");
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else {
        let firefox = firefox_versions.choose(&mut rng).copied().unwrap_or("125.0");
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    if lang == "all" || lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
