#![allow(clippy::uninlined_format_args)]

use browsafe::config::Config;
use browsafe::safe_browsing::SafeBrowsingClient;
use browsafe::VerdictAggregator;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Testing Safe Browsing lookups...");

    let mut config = Config::default();
    config.apply_env()?;
    config.validate()?;

    let client = SafeBrowsingClient::new(&config.safe_browsing)?;
    let aggregator = VerdictAggregator::new(Arc::new(client));

    // Google's published test pages for each threat type
    let cases = [
        ("Clean site", "https://www.google.com"),
        (
            "Malware test page",
            "http://testsafebrowsing.appspot.com/s/malware.html",
        ),
        (
            "Phishing test page",
            "http://testsafebrowsing.appspot.com/s/phishing.html",
        ),
        (
            "Unwanted software test page",
            "http://testsafebrowsing.appspot.com/s/unwanted.html",
        ),
        (
            "Heuristics only",
            "http://secure-login.account-verify.example.com/login",
        ),
    ];

    for (label, url) in cases {
        println!("\n=== {}: {} ===", label, url);
        let verdict = aggregator.evaluate(url).await;
        println!("Safe: {}", verdict.safe);
        println!("Confidence: {}", verdict.confidence);
        println!("Check ID: {}", verdict.check_id);
        for reason in &verdict.reasons {
            println!("Reason: {} ({} tips)", reason.threat_type, reason.prevention.len());
        }
    }

    println!("\n=== Safe Browsing Testing Complete ===");
    Ok(())
}
