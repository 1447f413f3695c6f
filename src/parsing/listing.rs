use std::sync::LazyLock;

use regex::Regex;

static TICKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(NYSE|NASDAQ|LSE AIM|NASDQA):\s*([A-Z]+)").expect("ticker pattern is valid")
});

static ACQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Acquired(?:\s+by\s+(.+?))?$").expect("acquisition pattern is valid")
});

// A word is Title-Case or CamelCase ("Acme", "BigCo"); the name is the
// trailing run of such words.
static TRAILING_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[A-Z][a-z]+)+(?:\s+(?:[A-Z][a-z]+)+)*)\s*$")
        .expect("name pattern is valid")
});

/// Exchange listing found in a raw name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerMatch {
    pub exchange: String,
    pub symbol: String,
    /// Input with every exchange listing removed
    pub rest: String,
}

/// Exit clause found at the end of a raw name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionMatch {
    pub acquirer: Option<String>,
    /// Input with the clause removed
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSplit {
    pub name: String,
    pub tagline: String,
}

/// Everything recoverable from a listing card's raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub tagline: String,
    pub ticker: String,
    pub exchange: String,
    pub acquisition: bool,
    pub acquirer: String,
}

/// Find an `EXCHANGE: SYMBOL` listing, e.g. `NASDAQ: DDOG`
pub fn parse_ticker(text: &str) -> Option<TickerMatch> {
    let caps = TICKER_RE.captures(text)?;
    let exchange = match &caps[1] {
        "NASDQA" => "NASDAQ",
        other => other,
    };

    Some(TickerMatch {
        exchange: exchange.to_string(),
        symbol: caps[2].to_string(),
        rest: TICKER_RE.replace_all(text, "").into_owned(),
    })
}

/// Find a trailing `Acquired` / `Acquired by X` clause (case-insensitive)
pub fn parse_acquisition(text: &str) -> Option<AcquisitionMatch> {
    let caps = ACQUIRED_RE.captures(text)?;
    let whole = caps.get(0)?;
    let acquirer = caps
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    Some(AcquisitionMatch {
        acquirer,
        rest: text[..whole.start()].to_string(),
    })
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `"<tagline> <Name Words>"` on the trailing capitalized phrase
///
/// Returns `None` when there is no such phrase or it is shorter than two
/// characters; callers fall back to [`name_from_slug`].
pub fn split_name_and_tagline(text: &str) -> Option<NameSplit> {
    let caps = TRAILING_NAME_RE.captures(text)?;
    let name = caps.get(1)?;
    if name.as_str().chars().count() < 2 {
        return None;
    }

    Some(NameSplit {
        name: name.as_str().to_string(),
        tagline: text[..name.start()].trim().to_string(),
    })
}

/// `"acme-robotics"` -> `"Acme Robotics"`
pub fn name_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the full name pipeline: ticker, exit clause, whitespace, name/tagline
///
/// Never fails; an unparseable name falls back to the slug.
pub fn parse_listing_name(raw: &str, slug: &str) -> ParsedName {
    let mut parsed = ParsedName::default();
    let mut text = raw.trim().to_string();

    if let Some(ticker) = parse_ticker(&text) {
        parsed.exchange = ticker.exchange;
        parsed.ticker = ticker.symbol;
        text = ticker.rest;
    }

    if let Some(acquisition) = parse_acquisition(&text) {
        parsed.acquisition = true;
        parsed.acquirer = acquisition.acquirer.unwrap_or_default();
        text = acquisition.rest;
    }

    let text = collapse_whitespace(&text);

    match split_name_and_tagline(&text) {
        Some(split) => {
            parsed.name = split.name;
            parsed.tagline = split.tagline;
        }
        None => {
            parsed.name = name_from_slug(slug);
        }
    }

    parsed
}
