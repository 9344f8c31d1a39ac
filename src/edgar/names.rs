use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Preferred display names for frequently searched symbols. The upstream
/// titles are the registrant's legal name in capitals ("MICROSOFT CORP"),
/// which reads poorly in a result header.
static DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AAPL", "Apple Inc."),
        ("MSFT", "Microsoft Corporation"),
        ("GOOGL", "Alphabet Inc."),
        ("GOOG", "Alphabet Inc."),
        ("AMZN", "Amazon.com, Inc."),
        ("META", "Meta Platforms, Inc."),
        ("NVDA", "NVIDIA Corporation"),
        ("TSLA", "Tesla, Inc."),
        ("BRK-B", "Berkshire Hathaway Inc."),
        ("JPM", "JPMorgan Chase & Co."),
        ("JNJ", "Johnson & Johnson"),
        ("V", "Visa Inc."),
        ("WMT", "Walmart Inc."),
    ])
});

pub fn display_name(symbol: &str) -> Option<&'static str> {
    DISPLAY_NAMES.get(symbol).copied()
}
